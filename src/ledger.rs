// ABOUTME: Completion ledger service for logging and reporting workout completions
// ABOUTME: Append-only writes plus windowed read-side queries for progress displays
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cadence Fitness

//! # Completion Ledger
//!
//! Append-only record of workout completions and skips. Logging a
//! completion never advances [`crate::models::UserProgress`]; advancing a
//! user after a completion is an explicit, separate call made by the
//! completion handler. Reads here serve progress displays only and are
//! never used to infer position.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::database_plugins::CompletionStore;
use crate::errors::{AppError, AppResult};
use crate::models::WorkoutCompletion;

/// Service over the append-only completion store
pub struct CompletionLedger {
    completions: Arc<dyn CompletionStore>,
}

impl CompletionLedger {
    /// Create a ledger over the injected completion store
    #[must_use]
    pub fn new(completions: Arc<dyn CompletionStore>) -> Self {
        Self { completions }
    }

    /// Append one completion or skip record, returning its id.
    ///
    /// Validates required fields only; exercise or workout content is never
    /// inspected here.
    ///
    /// # Errors
    ///
    /// Returns an error if a required id is nil or the store write fails
    pub async fn record_completion(
        &self,
        user_id: Uuid,
        workout_id: Uuid,
        completed_at: DateTime<Utc>,
        skipped: bool,
        notes: Option<&str>,
    ) -> AppResult<Uuid> {
        if user_id.is_nil() {
            return Err(AppError::invalid_input("user_id is required"));
        }
        if workout_id.is_nil() {
            return Err(AppError::invalid_input("workout_id is required"));
        }

        let completion_id = self
            .completions
            .create(user_id, workout_id, completed_at, skipped, notes)
            .await?;

        debug!(
            user_id = %user_id,
            workout_id = %workout_id,
            completion_id = %completion_id,
            skipped,
            "completion recorded"
        );

        Ok(completion_id)
    }

    /// List a user's completions, most recent first, optionally windowed.
    /// Both bounds are inclusive.
    ///
    /// # Errors
    ///
    /// Returns an error if the store read fails
    pub async fn list_completions(
        &self,
        user_id: Uuid,
        range_start: Option<DateTime<Utc>>,
        range_end: Option<DateTime<Utc>>,
    ) -> AppResult<Vec<WorkoutCompletion>> {
        self.completions.list(user_id, range_start, range_end).await
    }

    /// List a user's non-skipped completions inside an inclusive window,
    /// most recent first
    ///
    /// # Errors
    ///
    /// Returns an error if the store read fails
    pub async fn list_weekly_completions(
        &self,
        user_id: Uuid,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> AppResult<Vec<WorkoutCompletion>> {
        self.completions
            .list_completed_in_window(user_id, window_start, window_end)
            .await
    }

    /// Count a user's non-skipped completions inside an inclusive window
    ///
    /// # Errors
    ///
    /// Returns an error if the store read fails
    pub async fn weekly_completion_count(
        &self,
        user_id: Uuid,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> AppResult<usize> {
        Ok(self
            .list_weekly_completions(user_id, window_start, window_end)
            .await?
            .len())
    }
}
