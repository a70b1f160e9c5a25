// ABOUTME: Catalog queries for programs and their authored workout grid
// ABOUTME: Read side for the resolver plus insert support for seeding utilities
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cadence Fitness

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{parse_exercises, Program, ProgramCategory, Workout};
use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Row};
use uuid::Uuid;

impl Database {
    /// Create program and workout tables
    pub(super) async fn migrate_catalog(&self) -> anyhow::Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS programs (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                duration_weeks INTEGER NOT NULL CHECK (duration_weeks >= 1),
                sessions_per_week INTEGER NOT NULL,
                category TEXT NOT NULL DEFAULT 'general',
                target_event_weeks INTEGER,
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(self.pool())
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS workouts (
                id TEXT PRIMARY KEY,
                program_id TEXT NOT NULL REFERENCES programs(id) ON DELETE CASCADE,
                week INTEGER NOT NULL CHECK (week >= 1),
                day INTEGER NOT NULL CHECK (day >= 1),
                name TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                estimated_duration_minutes INTEGER NOT NULL DEFAULT 0,
                exercises TEXT NOT NULL DEFAULT '[]',
                UNIQUE (program_id, week, day)
            )
            ",
        )
        .execute(self.pool())
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_workouts_program_slot ON workouts(program_id, week, day)",
        )
        .execute(self.pool())
        .await?;

        Ok(())
    }

    /// Get a program by ID
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn get_program(&self, program_id: Uuid) -> AppResult<Option<Program>> {
        let row = sqlx::query(
            r"
            SELECT id, name, duration_weeks, sessions_per_week, category, target_event_weeks
            FROM programs
            WHERE id = $1
            ",
        )
        .bind(program_id.to_string())
        .fetch_optional(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to fetch program: {e}")))?;

        row.as_ref().map(row_to_program).transpose()
    }

    /// List a program's authored workouts ordered by (week, day)
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn list_workouts(&self, program_id: Uuid) -> AppResult<Vec<Workout>> {
        let rows = sqlx::query(
            r"
            SELECT id, program_id, week, day, name, description,
                   estimated_duration_minutes, exercises
            FROM workouts
            WHERE program_id = $1
            ORDER BY week ASC, day ASC
            ",
        )
        .bind(program_id.to_string())
        .fetch_all(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to list workouts: {e}")))?;

        rows.iter().map(row_to_workout).collect()
    }

    /// Insert a program (seeding support; catalog authoring is external)
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn insert_program(&self, program: &Program) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO programs (
                id, name, duration_weeks, sessions_per_week, category,
                target_event_weeks, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(program.id.to_string())
        .bind(&program.name)
        .bind(i64::from(program.duration_weeks))
        .bind(i64::from(program.sessions_per_week))
        .bind(program.category.as_str())
        .bind(program.target_event_weeks.map(i64::from))
        .bind(Utc::now().to_rfc3339())
        .execute(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to insert program: {e}")))?;

        Ok(())
    }

    /// Insert a workout (seeding support; catalog authoring is external)
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn insert_workout(&self, workout: &Workout) -> AppResult<()> {
        let exercises_json = serde_json::to_string(&workout.exercises)?;

        sqlx::query(
            r"
            INSERT INTO workouts (
                id, program_id, week, day, name, description,
                estimated_duration_minutes, exercises
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(workout.id.to_string())
        .bind(workout.program_id.to_string())
        .bind(i64::from(workout.week))
        .bind(i64::from(workout.day))
        .bind(&workout.name)
        .bind(&workout.description)
        .bind(i64::from(workout.estimated_duration_minutes))
        .bind(&exercises_json)
        .execute(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to insert workout: {e}")))?;

        Ok(())
    }

    /// Count authored programs (seeding guard)
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn count_programs(&self) -> AppResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM programs")
            .fetch_one(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to count programs: {e}")))?;

        Ok(row.get("count"))
    }
}

/// Convert a database row to a `Program`
fn row_to_program(row: &SqliteRow) -> AppResult<Program> {
    let id_str: String = row.get("id");
    let category_str: String = row.get("category");
    let duration_weeks: i64 = row.get("duration_weeks");
    let sessions_per_week: i64 = row.get("sessions_per_week");
    let target_event_weeks: Option<i64> = row.get("target_event_weeks");

    Ok(Program {
        id: Uuid::parse_str(&id_str)
            .map_err(|e| AppError::internal(format!("Invalid UUID: {e}")))?,
        name: row.get("name"),
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        duration_weeks: duration_weeks as u32,
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        sessions_per_week: sessions_per_week as u32,
        category: ProgramCategory::parse(&category_str),
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        target_event_weeks: target_event_weeks.map(|w| w as u32),
    })
}

/// Convert a database row to a `Workout`
fn row_to_workout(row: &SqliteRow) -> AppResult<Workout> {
    let id_str: String = row.get("id");
    let program_id_str: String = row.get("program_id");
    let week: i64 = row.get("week");
    let day: i64 = row.get("day");
    let estimated_duration_minutes: i64 = row.get("estimated_duration_minutes");
    let exercises_json: String = row.get("exercises");

    Ok(Workout {
        id: Uuid::parse_str(&id_str)
            .map_err(|e| AppError::internal(format!("Invalid UUID: {e}")))?,
        program_id: Uuid::parse_str(&program_id_str)
            .map_err(|e| AppError::internal(format!("Invalid UUID: {e}")))?,
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        week: week as u32,
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        day: day as u32,
        name: row.get("name"),
        description: row.get("description"),
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        estimated_duration_minutes: estimated_duration_minutes as u32,
        // Malformed payloads pass through opaquely; never an error here.
        exercises: parse_exercises(&exercises_json),
    })
}
