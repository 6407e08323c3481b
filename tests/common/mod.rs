// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use pup_diary::config::Config;
use pup_diary::db::ActivityStore;
use pup_diary::middleware::auth::create_session_token;
use pup_diary::routes::create_router;
use pup_diary::AppState;
use std::sync::Arc;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test store against the Firestore emulator.
#[allow(dead_code)]
pub async fn test_store() -> ActivityStore {
    ActivityStore::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a mock store (offline). Reads surface as an empty diary,
/// writes fail.
#[allow(dead_code)]
pub fn test_store_offline() -> ActivityStore {
    ActivityStore::new_mock()
}

/// Create a test app with an offline mock store.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with_config(Config::test_default())
}

/// Create a test app with a caller-supplied config.
#[allow(dead_code)]
pub fn create_test_app_with_config(config: Config) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState {
        config,
        store: test_store_offline(),
    });

    (create_router(state.clone()), state)
}

/// Mint a valid session token for the test config's signing key.
#[allow(dead_code)]
pub fn test_session_token(state: &AppState) -> String {
    create_session_token(&state.config.session_signing_key).expect("token creation")
}
