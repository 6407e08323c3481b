// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Pup-Diary: a shared puppy-activity diary.
//!
//! This crate provides the backend API for logging timestamped puppy
//! activities (meals, walks, naps, ...) and serving timeline, calendar,
//! and statistics views over them.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::ActivityStore;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: ActivityStore,
}
