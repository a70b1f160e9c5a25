// ABOUTME: Store abstraction layer for the Cadence training core
// ABOUTME: Async traits per collaborator with a SQLite backend implementation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cadence Fitness

//! # Store Abstractions
//!
//! One narrow trait per external collaborator the core consumes: the
//! read-only program catalog, the user progress store, the completion
//! ledger store, and the program-assignment directory. Services take these
//! as `Arc<dyn Trait>` dependencies; lifecycle is owned by the composition
//! root, never by module-level global state.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::errors::AppResult;
use crate::models::{
    Program, ProgramAssignment, ProgressUpdate, UserProgress, Workout, WorkoutCompletion,
};

pub mod sqlite;

pub use sqlite::SqliteDatabase;

/// Read side of the program/workout catalog.
///
/// The catalog is owned by an external collaborator; this core never writes
/// through this trait.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Get a program by ID
    async fn get_program(&self, program_id: Uuid) -> AppResult<Option<Program>>;

    /// List a program's authored workouts ordered by (week ascending, day
    /// ascending). This ordering is the contract the resolver relies on.
    async fn list_workouts(&self, program_id: Uuid) -> AppResult<Vec<Workout>>;
}

/// The user's current program assignment, supplied by program management
#[async_trait]
pub trait AssignmentProvider: Send + Sync {
    /// Get a user's current assignment, if any
    async fn get_assignment(&self, user_id: Uuid) -> AppResult<Option<ProgramAssignment>>;
}

/// Mutable storage for the per-user progress pointer
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Get a user's progress record
    async fn get(&self, user_id: Uuid) -> AppResult<Option<UserProgress>>;

    /// Create a user's progress record seeded at the given position
    async fn create(
        &self,
        user_id: Uuid,
        program_id: Uuid,
        week: u32,
        day: u32,
        start_date: NaiveDate,
        total_workouts: u32,
    ) -> AppResult<UserProgress>;

    /// Apply a partial update; `None` fields are left untouched
    async fn update(&self, user_id: Uuid, update: &ProgressUpdate) -> AppResult<UserProgress>;

    /// Conflict-checked position write: move from `expected` to `new` only
    /// if the stored position still equals `expected`. Returns false when
    /// the write lost a race with another writer.
    async fn compare_and_set_position(
        &self,
        user_id: Uuid,
        expected: (u32, u32),
        new: (u32, u32),
    ) -> AppResult<bool>;
}

/// Append-only storage for workout completions
#[async_trait]
pub trait CompletionStore: Send + Sync {
    /// Append a completion record, returning its id
    async fn create(
        &self,
        user_id: Uuid,
        workout_id: Uuid,
        completed_at: DateTime<Utc>,
        skipped: bool,
        notes: Option<&str>,
    ) -> AppResult<Uuid>;

    /// List a user's completions most recent first, optionally windowed
    /// (inclusive bounds)
    async fn list(
        &self,
        user_id: Uuid,
        range_start: Option<DateTime<Utc>>,
        range_end: Option<DateTime<Utc>>,
    ) -> AppResult<Vec<WorkoutCompletion>>;

    /// List a user's non-skipped completions inside an inclusive window
    async fn list_completed_in_window(
        &self,
        user_id: Uuid,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> AppResult<Vec<WorkoutCompletion>>;
}
