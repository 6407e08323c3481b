// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer (Firestore).

pub mod firestore;

pub use firestore::ActivityStore;

/// Collection names as constants.
pub mod collections {
    pub const ACTIVITIES: &str = "activities";
}
