// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Add-activity decision flow.
//!
//! Turns a set of validated drafts plus the freshly fetched activity
//! list into a single atomic write plan:
//! 1. Detect an ongoing walk (walk with no end time).
//! 2. Submissions containing a sleep never prompt; a nap during a walk
//!    is a valid concurrent state and the walk is left untouched.
//! 3. Otherwise an ongoing walk suspends the flow until the caller
//!    chooses to close the walk or nest the new activities under it.
//! 4. Within a batch, a new walk sorts first and becomes the parent of
//!    its non-walk siblings, regardless of input order.
//! 5. The resulting plan (close-update plus inserts) is applied as one
//!    Firestore transaction by the store.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Activity, ActivityDraft, ActivityKind};

/// How to resolve a submission that collides with an ongoing walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictChoice {
    /// End the ongoing walk at the new activity's start time.
    CloseWalk,
    /// Keep the walk open and nest the new activities under it.
    NestUnderWalk,
}

/// Close-walk update carried inside a write plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseWalk {
    pub walk_id: String,
    pub end_time: DateTime<Utc>,
}

/// One atomic batch: at most one walk-closing update plus all inserts.
#[derive(Debug, Clone)]
pub struct WritePlan {
    pub close_walk: Option<CloseWalk>,
    pub inserts: Vec<Activity>,
}

/// A submission suspended on the walk-conflict prompt.
///
/// Exactly two resuming continuations exist: [`PendingSubmission::resolve`]
/// with either choice. Dropping it abandons the submission.
#[derive(Debug, Clone)]
pub struct PendingSubmission {
    drafts: Vec<ActivityDraft>,
    walk_id: String,
    now: DateTime<Utc>,
}

/// Outcome of starting a submission.
#[derive(Debug, Clone)]
pub enum Submission {
    /// No conflict; the plan is ready to apply.
    Ready(WritePlan),
    /// A walk is ongoing; the caller must choose how to resolve it.
    AwaitingConflictResolution(PendingSubmission),
}

/// Start the add-activity flow against a fresh snapshot of the diary.
///
/// `existing` must be the full re-fetched activity list; the ongoing-walk
/// invariant is re-derived from it on every submission rather than held
/// as server-side state.
pub fn begin(
    existing: &[Activity],
    drafts: Vec<ActivityDraft>,
    now: DateTime<Utc>,
) -> Result<Submission, AppError> {
    if drafts.is_empty() {
        return Err(AppError::BadRequest(
            "at least one activity entry is required".to_string(),
        ));
    }

    let ongoing_walk = existing.iter().find(|a| a.is_ongoing_walk());
    let has_sleep = drafts.iter().any(|d| d.kind == ActivityKind::Sleep);

    match ongoing_walk {
        // Sleep during a walk is fine; apply without prompting and leave
        // the walk untouched.
        Some(_) if has_sleep => Ok(Submission::Ready(build_plan(drafts, None, None, now))),
        Some(walk) => Ok(Submission::AwaitingConflictResolution(PendingSubmission {
            drafts,
            walk_id: walk.id.clone(),
            now,
        })),
        None => Ok(Submission::Ready(build_plan(drafts, None, None, now))),
    }
}

impl PendingSubmission {
    /// ID of the walk the submission collided with.
    pub fn walk_id(&self) -> &str {
        &self.walk_id
    }

    /// Resume the flow with the caller's choice, producing the terminal plan.
    pub fn resolve(self, choice: ConflictChoice) -> WritePlan {
        match choice {
            ConflictChoice::CloseWalk => {
                // The walk ends when the new activity starts.
                let end_time = self
                    .drafts
                    .iter()
                    .map(|d| d.start_time)
                    .min()
                    .unwrap_or(self.now);
                let close = CloseWalk {
                    walk_id: self.walk_id,
                    end_time,
                };
                build_plan(self.drafts, Some(close), None, self.now)
            }
            ConflictChoice::NestUnderWalk => {
                let walk_id = self.walk_id;
                build_plan(self.drafts, None, Some(walk_id), self.now)
            }
        }
    }
}

/// Build the insert list with deterministic parent/child linkage.
///
/// `nest_under` (an ongoing walk) takes precedence and keeps nesting to a
/// single level; otherwise a new walk in the batch adopts its siblings.
fn build_plan(
    mut drafts: Vec<ActivityDraft>,
    close_walk: Option<CloseWalk>,
    nest_under: Option<String>,
    now: DateTime<Utc>,
) -> WritePlan {
    // Walks first, so a batch walk exists before anything nests under it.
    drafts.sort_by_key(|d| d.kind != ActivityKind::Walk);

    let mut inserts = Vec::with_capacity(drafts.len());
    let mut batch_walk_id: Option<String> = None;

    for draft in drafts {
        let id = Uuid::new_v4().to_string();

        let parent_id = if let Some(walk_id) = &nest_under {
            Some(walk_id.clone())
        } else if draft.kind == ActivityKind::Walk {
            None
        } else {
            batch_walk_id.clone()
        };

        if draft.kind == ActivityKind::Walk && batch_walk_id.is_none() {
            batch_walk_id = Some(id.clone());
        }

        inserts.push(Activity {
            id,
            kind: draft.kind,
            start_time: draft.start_time,
            end_time: draft.end_time,
            notes: draft.notes,
            created_at: now,
            parent_id,
        });
    }

    WritePlan {
        close_walk,
        inserts,
    }
}
