// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore integration tests (require the emulator).
//!
//! Run with FIRESTORE_EMULATOR_HOST set; each test uses its own
//! activity payloads so tests can share the emulator project.

use chrono::{DateTime, Duration, TimeZone, Utc};
use pup_diary::models::{ActivityDraft, ActivityKind};
use pup_diary::services::submit::{self, ConflictChoice, Submission};

mod common;

fn at(h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, 30, h, m, 0).unwrap()
}

fn draft(kind: ActivityKind, start: DateTime<Utc>) -> ActivityDraft {
    ActivityDraft {
        kind,
        start_time: start,
        end_time: None,
        notes: String::new(),
    }
}

#[tokio::test]
async fn test_create_fetch_delete_roundtrip() {
    require_emulator!();
    let store = common::test_store().await;

    let meal_id = store
        .create_one(draft(ActivityKind::Meal, at(8, 0)), None, at(8, 1))
        .await
        .expect("create");
    let wee_id = store
        .create_one(draft(ActivityKind::Wee, at(9, 0)), None, at(9, 1))
        .await
        .expect("create");

    let all = store.fetch_all().await;
    let ids: Vec<&str> = all.iter().map(|a| a.id.as_str()).collect();
    assert!(ids.contains(&meal_id.as_str()));
    assert!(ids.contains(&wee_id.as_str()));

    // Newest first
    let meal_pos = ids.iter().position(|id| *id == meal_id).unwrap();
    let wee_pos = ids.iter().position(|id| *id == wee_id).unwrap();
    assert!(wee_pos < meal_pos);

    // Deleting one record leaves the other untouched
    store.delete_one(&meal_id).await.expect("delete");
    let all = store.fetch_all().await;
    assert!(!all.iter().any(|a| a.id == meal_id));
    assert!(all.iter().any(|a| a.id == wee_id));

    store.delete_one(&wee_id).await.expect("cleanup");
}

#[tokio::test]
async fn test_submission_plan_applies_atomically() {
    require_emulator!();
    let store = common::test_store().await;

    // Seed an ongoing walk
    let walk_id = store
        .create_one(draft(ActivityKind::Walk, at(11, 0)), None, at(11, 0))
        .await
        .expect("create walk");

    // Submit a meal against the fresh snapshot, closing the walk
    let snapshot = store.fetch_all().await;
    let pending = match submit::begin(&snapshot, vec![draft(ActivityKind::Meal, at(12, 0))], at(12, 0))
        .expect("begin")
    {
        Submission::AwaitingConflictResolution(p) => p,
        Submission::Ready(_) => panic!("expected walk conflict"),
    };
    let plan = pending.resolve(ConflictChoice::CloseWalk);
    store.apply_plan(&plan).await.expect("apply");

    let all = store.fetch_all().await;
    let walk = all.iter().find(|a| a.id == walk_id).expect("walk persists");
    assert_eq!(walk.end_time, Some(at(12, 0)));
    let meal = all
        .iter()
        .find(|a| a.kind == ActivityKind::Meal && a.start_time == at(12, 0))
        .expect("meal created");
    assert!(meal.parent_id.is_none());

    for a in &all {
        store.delete_one(&a.id).await.expect("cleanup");
    }
}

#[tokio::test]
async fn test_close_ongoing_sets_end_time_only() {
    require_emulator!();
    let store = common::test_store().await;

    let sleep_id = store
        .create_one(
            draft(ActivityKind::Sleep, at(14, 0)),
            None,
            at(14, 0),
        )
        .await
        .expect("create sleep");

    store
        .close_ongoing(&sleep_id, at(14, 0) + Duration::minutes(40))
        .await
        .expect("close");

    let all = store.fetch_all().await;
    let sleep = all.iter().find(|a| a.id == sleep_id).expect("sleep");
    assert_eq!(sleep.end_time, Some(at(14, 40)));
    assert_eq!(sleep.start_time, at(14, 0));

    store.delete_one(&sleep_id).await.expect("cleanup");
}
