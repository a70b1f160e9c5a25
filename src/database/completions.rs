// ABOUTME: Append-only workout completion ledger storage
// ABOUTME: Insert and windowed list queries; records are never mutated or deleted
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cadence Fitness

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::WorkoutCompletion;
use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, Row};
use uuid::Uuid;

impl Database {
    /// Create the completion ledger table
    pub(super) async fn migrate_completions(&self) -> anyhow::Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS workout_completions (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                workout_id TEXT NOT NULL,
                completed_at TEXT NOT NULL,
                skipped INTEGER NOT NULL DEFAULT 0,
                notes TEXT
            )
            ",
        )
        .execute(self.pool())
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_completions_user_time ON workout_completions(user_id, completed_at)",
        )
        .execute(self.pool())
        .await?;

        Ok(())
    }

    /// Append a completion record, returning its id
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn insert_completion(
        &self,
        user_id: Uuid,
        workout_id: Uuid,
        completed_at: DateTime<Utc>,
        skipped: bool,
        notes: Option<&str>,
    ) -> AppResult<Uuid> {
        let id = Uuid::new_v4();

        sqlx::query(
            r"
            INSERT INTO workout_completions (id, user_id, workout_id, completed_at, skipped, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(id.to_string())
        .bind(user_id.to_string())
        .bind(workout_id.to_string())
        .bind(completed_at.to_rfc3339())
        .bind(i64::from(skipped))
        .bind(notes)
        .execute(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to record completion: {e}")))?;

        Ok(id)
    }

    /// List a user's completions, most recent first, optionally windowed.
    /// Both bounds are inclusive.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn list_completions(
        &self,
        user_id: Uuid,
        range_start: Option<DateTime<Utc>>,
        range_end: Option<DateTime<Utc>>,
    ) -> AppResult<Vec<WorkoutCompletion>> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, workout_id, completed_at, skipped, notes
            FROM workout_completions
            WHERE user_id = $1
              AND ($2 IS NULL OR completed_at >= $2)
              AND ($3 IS NULL OR completed_at <= $3)
            ORDER BY completed_at DESC
            ",
        )
        .bind(user_id.to_string())
        .bind(range_start.map(|t| t.to_rfc3339()))
        .bind(range_end.map(|t| t.to_rfc3339()))
        .fetch_all(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to list completions: {e}")))?;

        rows.iter().map(row_to_completion).collect()
    }

    /// List a user's non-skipped completions inside an inclusive window,
    /// most recent first
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn list_completed_in_window(
        &self,
        user_id: Uuid,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> AppResult<Vec<WorkoutCompletion>> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, workout_id, completed_at, skipped, notes
            FROM workout_completions
            WHERE user_id = $1
              AND skipped = 0
              AND completed_at >= $2
              AND completed_at <= $3
            ORDER BY completed_at DESC
            ",
        )
        .bind(user_id.to_string())
        .bind(window_start.to_rfc3339())
        .bind(window_end.to_rfc3339())
        .fetch_all(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to list weekly completions: {e}")))?;

        rows.iter().map(row_to_completion).collect()
    }
}

/// Convert a database row to a `WorkoutCompletion`
fn row_to_completion(row: &SqliteRow) -> AppResult<WorkoutCompletion> {
    let id_str: String = row.get("id");
    let user_id_str: String = row.get("user_id");
    let workout_id_str: String = row.get("workout_id");
    let completed_at_str: String = row.get("completed_at");
    let skipped: i64 = row.get("skipped");

    Ok(WorkoutCompletion {
        id: Uuid::parse_str(&id_str)
            .map_err(|e| AppError::internal(format!("Invalid UUID: {e}")))?,
        user_id: Uuid::parse_str(&user_id_str)
            .map_err(|e| AppError::internal(format!("Invalid UUID: {e}")))?,
        workout_id: Uuid::parse_str(&workout_id_str)
            .map_err(|e| AppError::internal(format!("Invalid UUID: {e}")))?,
        completed_at: DateTime::parse_from_rfc3339(&completed_at_str)
            .map_err(|e| AppError::internal(format!("Invalid datetime: {e}")))?
            .with_timezone(&Utc),
        skipped: skipped == 1,
        notes: row.get("notes"),
    })
}
