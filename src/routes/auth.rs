// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Passcode verification routes.
//!
//! The diary is gated by one shared passcode. `POST /auth/verify`
//! compares the submitted passcode against the configured secret and on
//! success sets a year-long session cookie. Non-POST methods get a 405
//! from the method router; an unconfigured passcode is a 500.

use axum::{extract::State, routing::post, Json, Router};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use subtle::ConstantTimeEq;

use crate::error::{AppError, Result};
use crate::middleware::auth::{create_session_token, SESSION_COOKIE, SESSION_DAYS};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/verify", post(verify))
        .route("/auth/logout", post(logout))
}

#[derive(Deserialize)]
struct VerifyRequest {
    passcode: String,
}

/// Boolean verification result; a mismatch is not an HTTP error, the
/// client re-prompts on `success: false`.
#[derive(Serialize)]
pub struct VerifyResponse {
    pub success: bool,
}

/// Check the passcode and establish a session.
async fn verify(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(payload): Json<VerifyRequest>,
) -> Result<(CookieJar, Json<VerifyResponse>)> {
    let Some(expected) = state.config.passcode.as_deref() else {
        return Err(AppError::Internal(anyhow::anyhow!(
            "DIARY_PASSCODE is not configured"
        )));
    };

    if !passcode_matches(expected, &payload.passcode) {
        tracing::warn!("Passcode verification failed");
        return Ok((jar, Json(VerifyResponse { success: false })));
    }

    let token = create_session_token(&state.config.session_signing_key)?;

    let cookie = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::days(SESSION_DAYS));

    tracing::info!("Passcode verified, session established");

    Ok((jar.add(cookie), Json(VerifyResponse { success: true })))
}

/// Clear the session cookie.
async fn logout(jar: CookieJar) -> (CookieJar, Json<VerifyResponse>) {
    let cookie = Cookie::build((SESSION_COOKIE, "")).path("/");
    (jar.remove(cookie), Json(VerifyResponse { success: true }))
}

/// Constant-time passcode comparison.
fn passcode_matches(expected: &str, submitted: &str) -> bool {
    expected.as_bytes().ct_eq(submitted.as_bytes()).into()
}
