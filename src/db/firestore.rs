// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed activity operations.
//!
//! The diary lives in a single `activities` collection. Reads always
//! fetch the whole collection ordered by start time descending; writes
//! are single-document creates/updates/deletes plus one transactional
//! batch path for the add-activity flow.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::db::collections;
use crate::error::AppError;
use crate::models::{Activity, ActivityDraft};
use crate::services::WritePlan;

/// Firestore database client for the activity collection.
#[derive(Clone)]
pub struct ActivityStore {
    client: Option<firestore::FirestoreDb>,
}

impl ActivityStore {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock client for testing (offline mode).
    ///
    /// All raw database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── Reads ──────────────────────────────────────────────────

    /// Fetch the whole diary, ordered by start time descending.
    ///
    /// A read failure is logged and surfaced as an empty list; callers
    /// never see the error and the UI simply renders an empty diary
    /// until a later fetch succeeds.
    pub async fn fetch_all(&self) -> Vec<Activity> {
        match self.query_all().await {
            Ok(activities) => activities,
            Err(e) => {
                tracing::error!(error = %e, "Failed to fetch activities, returning empty list");
                Vec::new()
            }
        }
    }

    async fn query_all(&self) -> Result<Vec<Activity>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::ACTIVITIES)
            .order_by([(
                "start_time",
                firestore::FirestoreQueryDirection::Descending,
            )])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a single activity by ID.
    pub async fn get_one(&self, activity_id: &str) -> Result<Option<Activity>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::ACTIVITIES)
            .obj()
            .one(activity_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Writes ─────────────────────────────────────────────────

    /// Create a single activity record. Returns the generated ID.
    pub async fn create_one(
        &self,
        draft: ActivityDraft,
        parent_id: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<String, AppError> {
        let activity = Activity {
            id: Uuid::new_v4().to_string(),
            kind: draft.kind,
            start_time: draft.start_time,
            end_time: draft.end_time,
            notes: draft.notes,
            created_at: now,
            parent_id,
        };

        self.write_activity(&activity).await?;
        Ok(activity.id)
    }

    async fn write_activity(&self, activity: &Activity) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::ACTIVITIES)
            .document_id(&activity.id)
            .object(activity)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Apply a submission plan: the optional walk-closing update plus all
    /// inserts, in a single Firestore transaction.
    ///
    /// All writes succeed or fail together; partial application cannot
    /// occur.
    pub async fn apply_plan(&self, plan: &WritePlan) -> Result<(), AppError> {
        let client = self.get_client()?;

        // Read the walk to close before opening the transaction; the
        // transaction registers it for conflict detection on commit.
        let closing_walk = match &plan.close_walk {
            Some(close) => {
                let mut walk = self
                    .get_one(&close.walk_id)
                    .await?
                    .ok_or_else(|| AppError::NotFound(format!("Walk {}", close.walk_id)))?;
                if close.end_time < walk.start_time {
                    return Err(AppError::BadRequest(
                        "walk end time is before its start time".to_string(),
                    ));
                }
                walk.end_time = Some(close.end_time);
                Some(walk)
            }
            None => None,
        };

        let mut transaction = client
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        if let Some(walk) = &closing_walk {
            client
                .fluent()
                .update()
                .in_col(collections::ACTIVITIES)
                .document_id(&walk.id)
                .object(walk)
                .add_to_transaction(&mut transaction)
                .map_err(|e| {
                    AppError::Database(format!("Failed to add walk close to transaction: {}", e))
                })?;
        }

        for activity in &plan.inserts {
            client
                .fluent()
                .update()
                .in_col(collections::ACTIVITIES)
                .document_id(&activity.id)
                .object(activity)
                .add_to_transaction(&mut transaction)
                .map_err(|e| {
                    AppError::Database(format!("Failed to add insert to transaction: {}", e))
                })?;
        }

        transaction
            .commit()
            .await
            .map_err(|e| AppError::Database(format!("Transaction commit failed: {}", e)))?;

        tracing::info!(
            inserts = plan.inserts.len(),
            closed_walk = plan.close_walk.is_some(),
            "Submission applied atomically"
        );

        Ok(())
    }

    /// Set the end time on an open-ended walk/sleep record.
    pub async fn close_ongoing(
        &self,
        activity_id: &str,
        end_time: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let mut activity = self
            .get_one(activity_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Activity {}", activity_id)))?;

        if !activity.kind.is_interval() {
            return Err(AppError::BadRequest(format!(
                "activity {} is not an interval kind",
                activity_id
            )));
        }
        if end_time < activity.start_time {
            return Err(AppError::BadRequest(
                "end time is before the start time".to_string(),
            ));
        }

        activity.end_time = Some(end_time);
        self.write_activity(&activity).await?;

        tracing::info!(activity_id, "Closed ongoing activity");
        Ok(())
    }

    /// Delete one activity. No cascade: children of a deleted parent are
    /// left in place, addressable only by direct ID.
    pub async fn delete_one(&self, activity_id: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::ACTIVITIES)
            .document_id(activity_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::info!(activity_id, "Deleted activity");
        Ok(())
    }
}
