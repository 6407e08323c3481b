// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Draft validation tests over the wire.
//!
//! Invalid submissions must be rejected with 400 before any store
//! interaction; the offline mock store errors on writes, so a 500 here
//! would mean validation was skipped.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use tower::ServiceExt;

mod common;

async fn submit(body: serde_json::Value) -> axum::response::Response {
    let (app, state) = common::create_test_app();
    let token = common::test_session_token(&state);

    app.oneshot(
        Request::builder()
            .method("POST")
            .uri("/api/activities")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

#[tokio::test]
async fn test_empty_submission_rejected() {
    let response = submit(serde_json::json!({"entries": []})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_other_without_notes_rejected() {
    let response = submit(serde_json::json!({
        "entries": [{
            "kind": "other",
            "start_time": "2026-08-30T09:00:00Z",
            "notes": "   "
        }]
    }))
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_end_time_on_point_kind_rejected() {
    let response = submit(serde_json::json!({
        "entries": [{
            "kind": "meal",
            "start_time": "2026-08-30T09:00:00Z",
            "end_time": "2026-08-30T09:30:00Z"
        }]
    }))
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_end_before_start_rejected() {
    let response = submit(serde_json::json!({
        "entries": [{
            "kind": "walk",
            "start_time": "2026-08-30T09:00:00Z",
            "end_time": "2026-08-30T08:00:00Z"
        }]
    }))
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_valid_submission_reaches_the_store() {
    // A valid draft passes validation and hits the (offline) store,
    // whose write failure propagates as a database error.
    let response = submit(serde_json::json!({
        "entries": [{
            "kind": "meal",
            "start_time": "2026-08-30T09:00:00Z",
            "notes": "breakfast"
        }]
    }))
    .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
