// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Business logic services.

pub mod submit;

pub use submit::{ConflictChoice, PendingSubmission, Submission, WritePlan};
