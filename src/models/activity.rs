// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Diary activity model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// What kind of event was logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Meal,
    Wee,
    Poo,
    Walk,
    Play,
    Sleep,
    Wake,
    Training,
    Chew,
    Med,
    Vet,
    Other,
}

impl ActivityKind {
    /// Interval kinds may carry an end time; everything else is a point event.
    pub fn is_interval(self) -> bool {
        matches!(self, ActivityKind::Walk | ActivityKind::Sleep)
    }
}

/// Stored activity record in Firestore.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    /// Generated document ID (uuid v4)
    pub id: String,
    /// Activity kind
    pub kind: ActivityKind,
    /// When the activity started
    #[serde(with = "firestore::serialize_as_timestamp")]
    pub start_time: DateTime<Utc>,
    /// When the activity ended; absent means ongoing (walk/sleep only)
    #[serde(default, with = "firestore::serialize_as_optional_timestamp")]
    pub end_time: Option<DateTime<Utc>>,
    /// Free-text notes
    #[serde(default)]
    pub notes: String,
    /// When this record was created
    #[serde(with = "firestore::serialize_as_timestamp")]
    pub created_at: DateTime<Utc>,
    /// Parent activity ID when nested under a walk (one level only)
    #[serde(default)]
    pub parent_id: Option<String>,
}

impl Activity {
    /// An ongoing walk is a walk with no end time yet.
    pub fn is_ongoing_walk(&self) -> bool {
        self.kind == ActivityKind::Walk && self.end_time.is_none()
    }
}

/// A validated new-activity submission, before IDs and parent links are
/// assigned by the submission flow.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = validate_draft))]
pub struct ActivityDraft {
    pub kind: ActivityKind,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    #[validate(length(max = 500, message = "notes too long"))]
    pub notes: String,
}

/// Cross-field draft checks: notes required for "other", end times only on
/// interval kinds and never before the start.
fn validate_draft(draft: &ActivityDraft) -> Result<(), ValidationError> {
    if draft.kind == ActivityKind::Other && draft.notes.trim().is_empty() {
        return Err(ValidationError::new("notes_required")
            .with_message("notes are required for 'other' activities".into()));
    }

    if let Some(end) = draft.end_time {
        if !draft.kind.is_interval() {
            return Err(ValidationError::new("end_time_not_allowed")
                .with_message("end_time is only valid for walk and sleep".into()));
        }
        if end < draft.start_time {
            return Err(ValidationError::new("end_before_start")
                .with_message("end_time must not be before start_time".into()));
        }
    }

    Ok(())
}
