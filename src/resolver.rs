// ABOUTME: Today-workout resolver mapping a user's stored position to a concrete session
// ABOUTME: Applies lazy seeding, program-switch reset, catch-up, and cycle policies
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cadence Fitness

//! # Today-Workout Resolver
//!
//! Answers "what is this user's workout today". Reads and conditionally
//! rewrites the user's [`UserProgress`] record:
//!
//! 1. progress is created lazily on the first request and reset on a
//!    program switch, both seeded through the schedule calculator;
//! 2. an exact (week, day) catalog match is returned without writing, so
//!    repeated calls are idempotent;
//! 3. a position pointing at a hole in the catalog is caught up to the
//!    first later slot (forward only);
//! 4. a position at or past the end of the authored sequence cycles back
//!    to the first slot.
//!
//! Steps execute as one unit under a per-user lock; position writes are
//! conflict-checked and happen only after the terminal branch is known.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::database_plugins::{AssignmentProvider, CatalogProvider, ProgressStore};
use crate::errors::{AppError, AppResult};
use crate::models::{ProgramAssignment, ProgressUpdate, TodayResolution, UserProgress, Workout};
use crate::schedule::compute_schedule;

/// Outcome of one resolution pass
enum ResolveAttempt {
    Done(TodayResolution),
    LostRace,
}

/// Resolver for a user's workout of the day
pub struct TodayWorkoutResolver {
    catalog: Arc<dyn CatalogProvider>,
    progress: Arc<dyn ProgressStore>,
    assignments: Arc<dyn AssignmentProvider>,
    /// Per-user exclusive scope spanning one whole resolution
    user_locks: DashMap<Uuid, Arc<Mutex<()>>>,
}

impl TodayWorkoutResolver {
    /// Create a resolver over the injected store dependencies
    #[must_use]
    pub fn new(
        catalog: Arc<dyn CatalogProvider>,
        progress: Arc<dyn ProgressStore>,
        assignments: Arc<dyn AssignmentProvider>,
    ) -> Self {
        Self {
            catalog,
            progress,
            assignments,
            user_locks: DashMap::new(),
        }
    }

    /// Resolve the user's workout for today
    ///
    /// # Errors
    ///
    /// Returns an error if a store operation fails, the assigned program
    /// does not exist in the catalog, or a position write loses its race
    /// twice in a row
    pub async fn resolve_today(&self, user_id: Uuid) -> AppResult<TodayResolution> {
        self.resolve_today_at(user_id, Utc::now().date_naive())
            .await
    }

    /// Resolve the user's workout for a pinned calendar date
    ///
    /// # Errors
    ///
    /// Same failure conditions as [`Self::resolve_today`]
    pub async fn resolve_today_at(
        &self,
        user_id: Uuid,
        today: NaiveDate,
    ) -> AppResult<TodayResolution> {
        // Clone the lock out so the map shard is not held across the await.
        let lock = {
            let entry = self.user_locks.entry(user_id).or_default();
            Arc::clone(entry.value())
        };
        let _guard = lock.lock().await;

        match self.resolve_once(user_id, today).await? {
            ResolveAttempt::Done(resolution) => Ok(resolution),
            ResolveAttempt::LostRace => {
                // Another writer moved the position under us; retry exactly once.
                warn!(user_id = %user_id, "progress position changed concurrently, retrying resolution");
                match self.resolve_once(user_id, today).await? {
                    ResolveAttempt::Done(resolution) => Ok(resolution),
                    ResolveAttempt::LostRace => Err(AppError::progress_conflict(user_id)),
                }
            }
        }
    }

    /// One pass over resolution steps 1-7
    async fn resolve_once(&self, user_id: Uuid, today: NaiveDate) -> AppResult<ResolveAttempt> {
        let Some(assignment) = self.assignments.get_assignment(user_id).await? else {
            return Ok(ResolveAttempt::Done(TodayResolution::NoProgram));
        };

        let progress = match self.progress.get(user_id).await? {
            None => self.seed_progress(&assignment, today, false).await?,
            Some(existing) if existing.program_id != assignment.program_id => {
                info!(
                    user_id = %user_id,
                    from_program = %existing.program_id,
                    to_program = %assignment.program_id,
                    "program switch detected, resetting progress"
                );
                self.seed_progress(&assignment, today, true).await?
            }
            Some(existing) => existing,
        };

        let mut sequence = self.catalog.list_workouts(progress.program_id).await?;
        // (week, day) ordering is the single source of truth for "next" and
        // "first"; re-sort rather than trusting the collaborator.
        sequence.sort_by_key(Workout::slot);

        if sequence.is_empty() {
            return Ok(ResolveAttempt::Done(TodayResolution::NoWorkout));
        }

        let position = progress.position();

        // Exact match: return without writing so repeated calls stay idempotent.
        if let Some(workout) = sequence.iter().find(|w| w.slot() == position) {
            return Ok(ResolveAttempt::Done(TodayResolution::Workout {
                workout: workout.clone(),
            }));
        }

        // Catch-up skips authored rest days and catalog holes, forward only.
        let target = match sequence.iter().find(|w| w.slot() > position) {
            Some(workout) => workout,
            None => {
                debug!(
                    user_id = %user_id,
                    week = position.0,
                    day = position.1,
                    "position past end of authored sequence, cycling to start"
                );
                &sequence[0]
            }
        };

        if self
            .progress
            .compare_and_set_position(user_id, position, target.slot())
            .await?
        {
            Ok(ResolveAttempt::Done(TodayResolution::Workout {
                workout: target.clone(),
            }))
        } else {
            Ok(ResolveAttempt::LostRace)
        }
    }

    /// Seed (or reset) a progress record from the assignment via the
    /// schedule calculator
    async fn seed_progress(
        &self,
        assignment: &ProgramAssignment,
        today: NaiveDate,
        reset_existing: bool,
    ) -> AppResult<UserProgress> {
        let program = self
            .catalog
            .get_program(assignment.program_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found("Program").with_resource_id(assignment.program_id.to_string())
            })?;

        let schedule = compute_schedule(
            today,
            program.duration_weeks,
            assignment.target_event_date,
        );

        info!(
            user_id = %assignment.user_id,
            program_id = %program.id,
            phase = %schedule.phase,
            week = schedule.current_week,
            day = schedule.current_day,
            "seeding progress record"
        );

        if reset_existing {
            self.progress
                .update(
                    assignment.user_id,
                    &ProgressUpdate {
                        program_id: Some(program.id),
                        current_week: Some(schedule.current_week),
                        current_day: Some(schedule.current_day),
                        start_date: Some(schedule.start_date),
                        completed_workouts_count: Some(0),
                        total_workouts_count: Some(program.total_workouts()),
                        is_active: Some(true),
                    },
                )
                .await
        } else {
            self.progress
                .create(
                    assignment.user_id,
                    program.id,
                    schedule.current_week,
                    schedule.current_day,
                    schedule.start_date,
                    program.total_workouts(),
                )
                .await
        }
    }
}
