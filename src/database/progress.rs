// ABOUTME: User progress and program assignment storage
// ABOUTME: Holds the per-user (week, day) pointer and its conflict-checked position write
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cadence Fitness

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{ProgramAssignment, ProgressUpdate, UserProgress};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{sqlite::SqliteRow, Row};
use uuid::Uuid;

impl Database {
    /// Create progress and assignment tables
    pub(super) async fn migrate_progress(&self) -> anyhow::Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS program_assignments (
                user_id TEXT PRIMARY KEY,
                program_id TEXT NOT NULL,
                target_event_date TEXT,
                assigned_at TEXT NOT NULL
            )
            ",
        )
        .execute(self.pool())
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS user_progress (
                user_id TEXT PRIMARY KEY,
                program_id TEXT NOT NULL,
                current_week INTEGER NOT NULL CHECK (current_week >= 1),
                current_day INTEGER NOT NULL CHECK (current_day >= 1),
                start_date TEXT NOT NULL,
                completed_workouts_count INTEGER NOT NULL DEFAULT 0,
                total_workouts_count INTEGER NOT NULL DEFAULT 0,
                is_active INTEGER NOT NULL DEFAULT 1,
                updated_at TEXT NOT NULL
            )
            ",
        )
        .execute(self.pool())
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_progress_program ON user_progress(program_id)",
        )
        .execute(self.pool())
        .await?;

        Ok(())
    }

    /// Get a user's current program assignment
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn get_assignment(&self, user_id: Uuid) -> AppResult<Option<ProgramAssignment>> {
        let row = sqlx::query(
            r"
            SELECT user_id, program_id, target_event_date, assigned_at
            FROM program_assignments
            WHERE user_id = $1
            ",
        )
        .bind(user_id.to_string())
        .fetch_optional(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to fetch assignment: {e}")))?;

        row.as_ref().map(row_to_assignment).transpose()
    }

    /// Create or replace a user's program assignment (collaborator support)
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn upsert_assignment(&self, assignment: &ProgramAssignment) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO program_assignments (user_id, program_id, target_event_date, assigned_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id) DO UPDATE SET
                program_id = excluded.program_id,
                target_event_date = excluded.target_event_date,
                assigned_at = excluded.assigned_at
            ",
        )
        .bind(assignment.user_id.to_string())
        .bind(assignment.program_id.to_string())
        .bind(assignment.target_event_date.map(|d| d.to_string()))
        .bind(assignment.assigned_at.to_rfc3339())
        .execute(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to upsert assignment: {e}")))?;

        Ok(())
    }

    /// Get a user's progress record
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn get_progress(&self, user_id: Uuid) -> AppResult<Option<UserProgress>> {
        let row = sqlx::query(
            r"
            SELECT user_id, program_id, current_week, current_day, start_date,
                   completed_workouts_count, total_workouts_count, is_active
            FROM user_progress
            WHERE user_id = $1
            ",
        )
        .bind(user_id.to_string())
        .fetch_optional(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to fetch progress: {e}")))?;

        row.as_ref().map(row_to_progress).transpose()
    }

    /// Create a user's progress record
    ///
    /// # Errors
    ///
    /// Returns an error if a record already exists for the user or the
    /// database operation fails
    pub async fn create_progress(
        &self,
        user_id: Uuid,
        program_id: Uuid,
        week: u32,
        day: u32,
        start_date: NaiveDate,
        total_workouts: u32,
    ) -> AppResult<UserProgress> {
        sqlx::query(
            r"
            INSERT INTO user_progress (
                user_id, program_id, current_week, current_day, start_date,
                completed_workouts_count, total_workouts_count, is_active, updated_at
            ) VALUES ($1, $2, $3, $4, $5, 0, $6, 1, $7)
            ",
        )
        .bind(user_id.to_string())
        .bind(program_id.to_string())
        .bind(i64::from(week))
        .bind(i64::from(day))
        .bind(start_date.to_string())
        .bind(i64::from(total_workouts))
        .bind(Utc::now().to_rfc3339())
        .execute(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to create progress: {e}")))?;

        Ok(UserProgress {
            user_id,
            program_id,
            current_week: week,
            current_day: day,
            start_date,
            completed_workouts_count: 0,
            total_workouts_count: total_workouts,
            is_active: true,
        })
    }

    /// Apply a partial update to a user's progress record
    ///
    /// # Errors
    ///
    /// Returns an error if no record exists for the user or the database
    /// operation fails
    pub async fn update_progress(
        &self,
        user_id: Uuid,
        update: &ProgressUpdate,
    ) -> AppResult<UserProgress> {
        let result = sqlx::query(
            r"
            UPDATE user_progress SET
                program_id = COALESCE($2, program_id),
                current_week = COALESCE($3, current_week),
                current_day = COALESCE($4, current_day),
                start_date = COALESCE($5, start_date),
                completed_workouts_count = COALESCE($6, completed_workouts_count),
                total_workouts_count = COALESCE($7, total_workouts_count),
                is_active = COALESCE($8, is_active),
                updated_at = $9
            WHERE user_id = $1
            ",
        )
        .bind(user_id.to_string())
        .bind(update.program_id.map(|id| id.to_string()))
        .bind(update.current_week.map(i64::from))
        .bind(update.current_day.map(i64::from))
        .bind(update.start_date.map(|d| d.to_string()))
        .bind(update.completed_workouts_count.map(i64::from))
        .bind(update.total_workouts_count.map(i64::from))
        .bind(update.is_active.map(i64::from))
        .bind(Utc::now().to_rfc3339())
        .execute(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to update progress: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("UserProgress").with_user_id(user_id));
        }

        self.get_progress(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("UserProgress").with_user_id(user_id))
    }

    /// Move a user's position from `expected` to `new` if nothing else wrote
    /// in between. Returns false when the guard does not match (lost race).
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn compare_and_set_position(
        &self,
        user_id: Uuid,
        expected: (u32, u32),
        new: (u32, u32),
    ) -> AppResult<bool> {
        let result = sqlx::query(
            r"
            UPDATE user_progress SET
                current_week = $4,
                current_day = $5,
                updated_at = $6
            WHERE user_id = $1 AND current_week = $2 AND current_day = $3
            ",
        )
        .bind(user_id.to_string())
        .bind(i64::from(expected.0))
        .bind(i64::from(expected.1))
        .bind(i64::from(new.0))
        .bind(i64::from(new.1))
        .bind(Utc::now().to_rfc3339())
        .execute(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to advance progress: {e}")))?;

        Ok(result.rows_affected() == 1)
    }
}

/// Convert a database row to a `ProgramAssignment`
fn row_to_assignment(row: &SqliteRow) -> AppResult<ProgramAssignment> {
    let user_id_str: String = row.get("user_id");
    let program_id_str: String = row.get("program_id");
    let target_event_date_str: Option<String> = row.get("target_event_date");
    let assigned_at_str: String = row.get("assigned_at");

    Ok(ProgramAssignment {
        user_id: Uuid::parse_str(&user_id_str)
            .map_err(|e| AppError::internal(format!("Invalid UUID: {e}")))?,
        program_id: Uuid::parse_str(&program_id_str)
            .map_err(|e| AppError::internal(format!("Invalid UUID: {e}")))?,
        target_event_date: target_event_date_str
            .map(|s| {
                s.parse::<NaiveDate>()
                    .map_err(|e| AppError::internal(format!("Invalid date: {e}")))
            })
            .transpose()?,
        assigned_at: DateTime::parse_from_rfc3339(&assigned_at_str)
            .map_err(|e| AppError::internal(format!("Invalid datetime: {e}")))?
            .with_timezone(&Utc),
    })
}

/// Convert a database row to a `UserProgress`
fn row_to_progress(row: &SqliteRow) -> AppResult<UserProgress> {
    let user_id_str: String = row.get("user_id");
    let program_id_str: String = row.get("program_id");
    let current_week: i64 = row.get("current_week");
    let current_day: i64 = row.get("current_day");
    let start_date_str: String = row.get("start_date");
    let completed: i64 = row.get("completed_workouts_count");
    let total: i64 = row.get("total_workouts_count");
    let is_active: i64 = row.get("is_active");

    Ok(UserProgress {
        user_id: Uuid::parse_str(&user_id_str)
            .map_err(|e| AppError::internal(format!("Invalid UUID: {e}")))?,
        program_id: Uuid::parse_str(&program_id_str)
            .map_err(|e| AppError::internal(format!("Invalid UUID: {e}")))?,
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        current_week: current_week as u32,
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        current_day: current_day as u32,
        start_date: start_date_str
            .parse::<NaiveDate>()
            .map_err(|e| AppError::internal(format!("Invalid date: {e}")))?,
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        completed_workouts_count: completed as u32,
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        total_workouts_count: total as u32,
        is_active: is_active == 1,
    })
}
