// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod activity;
pub mod stats;
pub mod timeline;

pub use activity::{Activity, ActivityDraft, ActivityKind};
pub use timeline::DayGroup;
