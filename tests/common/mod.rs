// ABOUTME: Shared helpers for integration tests
// ABOUTME: In-memory database construction and catalog seeding utilities
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cadence Fitness

#![allow(dead_code)]
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use cadence_training_api::database_plugins::SqliteDatabase;
use cadence_training_api::models::{Program, ProgramAssignment, ProgramCategory, Workout};
use cadence_training_api::resolver::TodayWorkoutResolver;

/// Pinned "today" so resolver tests are calendar-independent
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
}

/// Create an isolated in-memory test database
pub async fn create_test_db() -> Arc<SqliteDatabase> {
    Arc::new(SqliteDatabase::new("sqlite::memory:").await.unwrap())
}

/// Build a resolver whose catalog, progress, and assignment stores all share
/// the given database
pub fn make_resolver(db: &Arc<SqliteDatabase>) -> TodayWorkoutResolver {
    let catalog: Arc<SqliteDatabase> = Arc::clone(db);
    let progress: Arc<SqliteDatabase> = Arc::clone(db);
    let assignments: Arc<SqliteDatabase> = Arc::clone(db);
    TodayWorkoutResolver::new(catalog, progress, assignments)
}

/// Build a program record (not yet persisted)
pub fn program(duration_weeks: u32, sessions_per_week: u32) -> Program {
    Program {
        id: Uuid::new_v4(),
        name: "Beginner".into(),
        duration_weeks,
        sessions_per_week,
        category: ProgramCategory::Strength,
        target_event_weeks: None,
    }
}

/// Persist a program and author workouts for the given cycle days of every
/// week (missing days model rest days / catalog holes)
pub async fn seed_program_grid(db: &Arc<SqliteDatabase>, program: &Program, days: &[u32]) {
    db.inner().insert_program(program).await.unwrap();
    for week in 1..=program.duration_weeks {
        for &day in days {
            db.inner()
                .insert_workout(&workout(program.id, week, day))
                .await
                .unwrap();
        }
    }
}

/// Build an authored workout for one grid slot
pub fn workout(program_id: Uuid, week: u32, day: u32) -> Workout {
    Workout {
        id: Uuid::new_v4(),
        program_id,
        week,
        day,
        name: format!("Week {week} Day {day}"),
        description: "Session".into(),
        estimated_duration_minutes: 45,
        exercises: Vec::new(),
    }
}

/// Assign a program to a user with no target event date
pub async fn assign(db: &Arc<SqliteDatabase>, user_id: Uuid, program_id: Uuid) {
    assign_with_event(db, user_id, program_id, None).await;
}

/// Assign a program to a user with an optional target event date
pub async fn assign_with_event(
    db: &Arc<SqliteDatabase>,
    user_id: Uuid,
    program_id: Uuid,
    target_event_date: Option<NaiveDate>,
) {
    db.inner()
        .upsert_assignment(&ProgramAssignment {
            user_id,
            program_id,
            target_event_date,
            assigned_at: Utc::now(),
        })
        .await
        .unwrap();
}
