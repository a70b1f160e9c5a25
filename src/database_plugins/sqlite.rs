// ABOUTME: SQLite implementation of the store abstraction traits
// ABOUTME: Thin delegating wrapper around the database module
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cadence Fitness

//! SQLite store implementation
//!
//! Wraps [`crate::database::Database`] to implement the store traits. One
//! instance backs all four collaborator roles; the composition root hands
//! out `Arc` clones per role.

use super::{AssignmentProvider, CatalogProvider, CompletionStore, ProgressStore};
use crate::database::Database;
use crate::errors::AppResult;
use crate::models::{
    Program, ProgramAssignment, ProgressUpdate, UserProgress, Workout, WorkoutCompletion,
};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

/// SQLite database implementation of all store traits
#[derive(Clone)]
pub struct SqliteDatabase {
    inner: Database,
}

impl SqliteDatabase {
    /// Create a new SQLite store and run migrations
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or a
    /// migration fails
    pub async fn new(database_url: &str) -> Result<Self> {
        let inner = Database::new(database_url).await?;
        Ok(Self { inner })
    }

    /// Get a reference to the inner database for seeding and maintenance
    #[must_use]
    pub const fn inner(&self) -> &Database {
        &self.inner
    }
}

#[async_trait]
impl CatalogProvider for SqliteDatabase {
    async fn get_program(&self, program_id: Uuid) -> AppResult<Option<Program>> {
        self.inner.get_program(program_id).await
    }

    async fn list_workouts(&self, program_id: Uuid) -> AppResult<Vec<Workout>> {
        self.inner.list_workouts(program_id).await
    }
}

#[async_trait]
impl AssignmentProvider for SqliteDatabase {
    async fn get_assignment(&self, user_id: Uuid) -> AppResult<Option<ProgramAssignment>> {
        self.inner.get_assignment(user_id).await
    }
}

#[async_trait]
impl ProgressStore for SqliteDatabase {
    async fn get(&self, user_id: Uuid) -> AppResult<Option<UserProgress>> {
        self.inner.get_progress(user_id).await
    }

    async fn create(
        &self,
        user_id: Uuid,
        program_id: Uuid,
        week: u32,
        day: u32,
        start_date: NaiveDate,
        total_workouts: u32,
    ) -> AppResult<UserProgress> {
        self.inner
            .create_progress(user_id, program_id, week, day, start_date, total_workouts)
            .await
    }

    async fn update(&self, user_id: Uuid, update: &ProgressUpdate) -> AppResult<UserProgress> {
        self.inner.update_progress(user_id, update).await
    }

    async fn compare_and_set_position(
        &self,
        user_id: Uuid,
        expected: (u32, u32),
        new: (u32, u32),
    ) -> AppResult<bool> {
        self.inner
            .compare_and_set_position(user_id, expected, new)
            .await
    }
}

#[async_trait]
impl CompletionStore for SqliteDatabase {
    async fn create(
        &self,
        user_id: Uuid,
        workout_id: Uuid,
        completed_at: DateTime<Utc>,
        skipped: bool,
        notes: Option<&str>,
    ) -> AppResult<Uuid> {
        self.inner
            .insert_completion(user_id, workout_id, completed_at, skipped, notes)
            .await
    }

    async fn list(
        &self,
        user_id: Uuid,
        range_start: Option<DateTime<Utc>>,
        range_end: Option<DateTime<Utc>>,
    ) -> AppResult<Vec<WorkoutCompletion>> {
        self.inner
            .list_completions(user_id, range_start, range_end)
            .await
    }

    async fn list_completed_in_window(
        &self,
        user_id: Uuid,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> AppResult<Vec<WorkoutCompletion>> {
        self.inner
            .list_completed_in_window(user_id, window_start, window_end)
            .await
    }
}
