// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes behind the session gate: activity CRUD, timeline,
//! calendar, and stats views.
//!
//! Every mutation re-fetches the full diary and responds with the
//! refreshed list; the client never applies optimistic local updates.

use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::models::stats::{
    counts_by_type, filter_by_range, nap_minutes, walk_minutes, StatsRange,
    NAP_WINDOW_END_HOUR, NAP_WINDOW_START_HOUR,
};
use crate::models::timeline::{children_of, date_key, group_by_day};
use crate::models::{Activity, ActivityDraft, ActivityKind};
use crate::services::submit::{self, ConflictChoice, Submission};
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;

/// API routes (require a session; the gate is applied in routes/mod.rs).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/activities", get(get_activities).post(submit_activities))
        .route("/api/activities/{id}", delete(delete_activity))
        .route("/api/activities/{id}/close", post(close_activity))
        .route("/api/timeline", get(get_timeline))
        .route("/api/calendar", get(get_calendar))
        .route("/api/stats", get(get_stats))
}

// ─── Views ───────────────────────────────────────────────────

/// Wire representation of one activity record.
#[derive(Serialize, Clone, Debug)]
pub struct ActivityView {
    pub id: String,
    pub kind: ActivityKind,
    pub start_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    pub notes: String,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

impl From<&Activity> for ActivityView {
    fn from(a: &Activity) -> Self {
        Self {
            id: a.id.clone(),
            kind: a.kind,
            start_time: format_utc_rfc3339(a.start_time),
            end_time: a.end_time.map(format_utc_rfc3339),
            notes: a.notes.clone(),
            created_at: format_utc_rfc3339(a.created_at),
            parent_id: a.parent_id.clone(),
        }
    }
}

#[derive(Serialize)]
pub struct ActivitiesResponse {
    pub activities: Vec<ActivityView>,
}

fn list_response(activities: &[Activity]) -> Json<ActivitiesResponse> {
    Json(ActivitiesResponse {
        activities: activities.iter().map(ActivityView::from).collect(),
    })
}

// ─── Activities ──────────────────────────────────────────────

/// Flat activity list, newest first.
async fn get_activities(State(state): State<Arc<AppState>>) -> Json<ActivitiesResponse> {
    let activities = state.store.fetch_all().await;
    list_response(&activities)
}

#[derive(Deserialize, Validate)]
struct SubmitRequest {
    #[validate(length(min = 1, message = "at least one entry is required"), nested)]
    entries: Vec<ActivityDraft>,
    /// Present when re-submitting after a walk-conflict 409.
    #[serde(default)]
    resolution: Option<ConflictChoice>,
}

/// Submit one or more new activities.
///
/// Runs the add-activity decision flow against a fresh snapshot. A
/// collision with an ongoing walk (for non-sleep submissions) returns
/// 409 with the walk ID; the client re-submits with `resolution` set to
/// `close-walk` or `nest-under-walk`.
async fn submit_activities(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SubmitRequest>,
) -> Result<Json<ActivitiesResponse>> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let now = Utc::now();
    let snapshot = state.store.fetch_all().await;

    let plan = match submit::begin(&snapshot, payload.entries, now)? {
        Submission::Ready(plan) => plan,
        Submission::AwaitingConflictResolution(pending) => match payload.resolution {
            Some(choice) => pending.resolve(choice),
            None => {
                return Err(AppError::WalkInProgress {
                    walk_id: pending.walk_id().to_string(),
                })
            }
        },
    };

    state.store.apply_plan(&plan).await?;

    let refreshed = state.store.fetch_all().await;
    Ok(list_response(&refreshed))
}

#[derive(Deserialize)]
struct CloseRequest {
    end_time: DateTime<Utc>,
}

/// Close an open-ended walk or sleep.
async fn close_activity(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<CloseRequest>,
) -> Result<Json<ActivitiesResponse>> {
    state.store.close_ongoing(&id, payload.end_time).await?;

    let refreshed = state.store.fetch_all().await;
    Ok(list_response(&refreshed))
}

/// Delete one activity. Children of a deleted parent are left in place.
async fn delete_activity(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ActivitiesResponse>> {
    state.store.delete_one(&id).await?;

    let refreshed = state.store.fetch_all().await;
    Ok(list_response(&refreshed))
}

// ─── Timeline ────────────────────────────────────────────────

#[derive(Serialize)]
pub struct TimelineEntry {
    #[serde(flatten)]
    pub activity: ActivityView,
    pub children: Vec<ActivityView>,
}

#[derive(Serialize)]
pub struct TimelineDay {
    pub date: String,
    pub activities: Vec<TimelineEntry>,
}

#[derive(Serialize)]
pub struct TimelineResponse {
    pub days: Vec<TimelineDay>,
}

/// Day-grouped timeline with children attached to their parent.
async fn get_timeline(State(state): State<Arc<AppState>>) -> Json<TimelineResponse> {
    let activities = state.store.fetch_all().await;

    let days = group_by_day(&activities)
        .into_iter()
        .map(|group| TimelineDay {
            date: group.date,
            activities: group
                .activities
                .iter()
                .map(|a| TimelineEntry {
                    activity: ActivityView::from(a),
                    children: children_of(&a.id, &activities)
                        .iter()
                        .map(ActivityView::from)
                        .collect(),
                })
                .collect(),
        })
        .collect();

    Json(TimelineResponse { days })
}

// ─── Calendar ────────────────────────────────────────────────

#[derive(Serialize)]
pub struct CalendarResponse {
    /// Activity count per local calendar day ("YYYY-MM-DD")
    pub days: HashMap<String, u32>,
}

/// Calendar-presence marking: which days have activity, and how much.
async fn get_calendar(State(state): State<Arc<AppState>>) -> Json<CalendarResponse> {
    let activities = state.store.fetch_all().await;

    let mut days: HashMap<String, u32> = HashMap::new();
    for activity in &activities {
        *days.entry(date_key(activity)).or_insert(0) += 1;
    }

    Json(CalendarResponse { days })
}

// ─── Stats ───────────────────────────────────────────────────

#[derive(Deserialize)]
struct StatsQuery {
    #[serde(default = "default_range")]
    range: StatsRange,
}

fn default_range() -> StatsRange {
    StatsRange::Day
}

#[derive(Serialize)]
pub struct StatsResponse {
    pub counts: HashMap<ActivityKind, u32>,
    pub nap_minutes: i64,
    pub walk_minutes: i64,
}

/// Aggregate statistics for the requested day/week/month range.
async fn get_stats(
    State(state): State<Arc<AppState>>,
    Query(params): Query<StatsQuery>,
) -> Json<StatsResponse> {
    let now = Utc::now();
    let activities = state.store.fetch_all().await;
    let in_range = filter_by_range(&activities, params.range, now);

    Json(StatsResponse {
        counts: counts_by_type(&in_range),
        nap_minutes: nap_minutes(&in_range, NAP_WINDOW_START_HOUR, NAP_WINDOW_END_HOUR, now),
        walk_minutes: walk_minutes(&in_range),
    })
}
