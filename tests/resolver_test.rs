// ABOUTME: Integration tests for the today-workout resolver
// ABOUTME: Validates lazy seeding, idempotence, catch-up, cycle, and switch reset behavior
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cadence Fitness

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use uuid::Uuid;

use cadence_training_api::database_plugins::{ProgressStore, SqliteDatabase};
use cadence_training_api::errors::{AppResult, ErrorCode};
use cadence_training_api::models::{ProgressUpdate, TodayResolution, UserProgress};
use cadence_training_api::resolver::TodayWorkoutResolver;

use common::{
    assign, assign_with_event, create_test_db, make_resolver, program, seed_program_grid, today,
};

/// Progress store decorator counting mutating calls
struct CountingProgressStore {
    inner: Arc<SqliteDatabase>,
    writes: AtomicUsize,
}

impl CountingProgressStore {
    fn new(inner: Arc<SqliteDatabase>) -> Self {
        Self {
            inner,
            writes: AtomicUsize::new(0),
        }
    }

    fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProgressStore for CountingProgressStore {
    async fn get(&self, user_id: Uuid) -> AppResult<Option<UserProgress>> {
        self.inner.get(user_id).await
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
            .create(user_id, program_id, week, day, start_date, total_workouts)
            .await
    }

    async fn update(&self, user_id: Uuid, update: &ProgressUpdate) -> AppResult<UserProgress> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.update(user_id, update).await
    }

    async fn compare_and_set_position(
        &self,
        user_id: Uuid,
        expected: (u32, u32),
        new: (u32, u32),
    ) -> AppResult<bool> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner
            .compare_and_set_position(user_id, expected, new)
            .await
    }
}

/// Progress store decorator whose position writes always lose their race
struct LosingCasStore {
    inner: Arc<SqliteDatabase>,
}

#[async_trait]
impl ProgressStore for LosingCasStore {
    async fn get(&self, user_id: Uuid) -> AppResult<Option<UserProgress>> {
        self.inner.get(user_id).await
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
            .create(user_id, program_id, week, day, start_date, total_workouts)
            .await
    }

    async fn update(&self, user_id: Uuid, update: &ProgressUpdate) -> AppResult<UserProgress> {
        self.inner.update(user_id, update).await
    }

    async fn compare_and_set_position(
        &self,
        _user_id: Uuid,
        _expected: (u32, u32),
        _new: (u32, u32),
    ) -> AppResult<bool> {
        Ok(false)
    }
}

fn expect_workout(resolution: &TodayResolution) -> (u32, u32) {
    match resolution.workout() {
        Some(workout) => workout.slot(),
        None => panic!("expected a workout, got {resolution:?}"),
    }
}

/// Point an existing progress record at a grid position (the external
/// completion handler's advance path)
async fn set_position(db: &Arc<SqliteDatabase>, user_id: Uuid, week: u32, day: u32) {
    db.update(
        user_id,
        &ProgressUpdate {
            current_week: Some(week),
            current_day: Some(day),
            ..ProgressUpdate::default()
        },
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn test_no_assignment_returns_no_program() {
    let db = create_test_db().await;
    let resolver = make_resolver(&db);

    let resolution = resolver
        .resolve_today_at(Uuid::new_v4(), today())
        .await
        .unwrap();
    assert!(matches!(resolution, TodayResolution::NoProgram));
}

#[tokio::test]
async fn test_empty_catalog_returns_no_workout() {
    let db = create_test_db().await;
    let resolver = make_resolver(&db);
    let user_id = Uuid::new_v4();

    let prog = program(14, 6);
    db.inner().insert_program(&prog).await.unwrap();
    assign(&db, user_id, prog.id).await;

    let resolution = resolver.resolve_today_at(user_id, today()).await.unwrap();
    assert!(matches!(resolution, TodayResolution::NoWorkout));

    // Progress was still created lazily, seeded at (1, 1).
    let progress = db.get(user_id).await.unwrap().unwrap();
    assert_eq!(progress.position(), (1, 1));
    assert_eq!(progress.program_id, prog.id);
}

#[tokio::test]
async fn test_first_resolution_seeds_progress_and_returns_first_workout() {
    let db = create_test_db().await;
    let resolver = make_resolver(&db);
    let user_id = Uuid::new_v4();

    let prog = program(14, 6);
    seed_program_grid(&db, &prog, &[1, 2, 3, 4, 5, 6]).await;
    assign(&db, user_id, prog.id).await;

    let resolution = resolver.resolve_today_at(user_id, today()).await.unwrap();
    assert_eq!(expect_workout(&resolution), (1, 1));

    let progress = db.get(user_id).await.unwrap().unwrap();
    assert_eq!(progress.position(), (1, 1));
    assert_eq!(progress.start_date, today());
    assert_eq!(progress.completed_workouts_count, 0);
    assert_eq!(progress.total_workouts_count, 84);
    assert!(progress.is_active);
}

#[tokio::test]
async fn test_repeated_resolution_is_idempotent_with_no_writes() {
    let db = create_test_db().await;
    let counting = Arc::new(CountingProgressStore::new(Arc::clone(&db)));
    let resolver = TodayWorkoutResolver::new(
        db.clone(),
        counting.clone(),
        db.clone(),
    );
    let user_id = Uuid::new_v4();

    let prog = program(14, 6);
    seed_program_grid(&db, &prog, &[1, 2, 3, 4, 5, 6]).await;
    assign(&db, user_id, prog.id).await;

    let first = resolver.resolve_today_at(user_id, today()).await.unwrap();
    let writes_after_first = counting.write_count();
    let second = resolver.resolve_today_at(user_id, today()).await.unwrap();

    assert_eq!(expect_workout(&first), expect_workout(&second));
    assert_eq!(
        first.workout().unwrap().id,
        second.workout().unwrap().id,
        "same concrete workout both times"
    );
    // Exact match issues no progress write on either call.
    assert_eq!(writes_after_first, 0);
    assert_eq!(counting.write_count(), 0);
}

#[tokio::test]
async fn test_catch_up_skips_unauthored_rest_day() {
    let db = create_test_db().await;
    let resolver = make_resolver(&db);
    let user_id = Uuid::new_v4();

    // 14 weeks x 6 authored days; day 7 has no entry.
    let prog = program(14, 6);
    seed_program_grid(&db, &prog, &[1, 2, 3, 4, 5, 6]).await;
    assign(&db, user_id, prog.id).await;

    resolver.resolve_today_at(user_id, today()).await.unwrap();
    set_position(&db, user_id, 1, 7).await;

    let resolution = resolver.resolve_today_at(user_id, today()).await.unwrap();
    assert_eq!(expect_workout(&resolution), (2, 1));

    let progress = db.get(user_id).await.unwrap().unwrap();
    assert_eq!(progress.position(), (2, 1));
}

#[tokio::test]
async fn test_catch_up_moves_only_forward() {
    let db = create_test_db().await;
    let resolver = make_resolver(&db);
    let user_id = Uuid::new_v4();

    // Week grid with a hole at day 3.
    let prog = program(4, 4);
    seed_program_grid(&db, &prog, &[1, 2, 4, 5]).await;
    assign(&db, user_id, prog.id).await;

    resolver.resolve_today_at(user_id, today()).await.unwrap();
    set_position(&db, user_id, 2, 3).await;

    let resolution = resolver.resolve_today_at(user_id, today()).await.unwrap();
    let slot = expect_workout(&resolution);
    assert!(slot > (2, 3), "resolver must never move backwards");
    assert_eq!(slot, (2, 4));
}

#[tokio::test]
async fn test_cycle_restarts_at_first_entry_past_end() {
    let db = create_test_db().await;
    let resolver = make_resolver(&db);
    let user_id = Uuid::new_v4();

    // Last authored entry is (14, 6); position (14, 7) is past the end.
    let prog = program(14, 6);
    seed_program_grid(&db, &prog, &[1, 2, 3, 4, 5, 6]).await;
    assign(&db, user_id, prog.id).await;

    resolver.resolve_today_at(user_id, today()).await.unwrap();
    set_position(&db, user_id, 14, 7).await;

    let resolution = resolver.resolve_today_at(user_id, today()).await.unwrap();
    assert_eq!(expect_workout(&resolution), (1, 1));

    let progress = db.get(user_id).await.unwrap().unwrap();
    assert_eq!(progress.position(), (1, 1));
}

#[tokio::test]
async fn test_last_authored_entry_is_exact_match_not_cycle() {
    let db = create_test_db().await;
    let resolver = make_resolver(&db);
    let user_id = Uuid::new_v4();

    let prog = program(14, 6);
    seed_program_grid(&db, &prog, &[1, 2, 3, 4, 5, 6]).await;
    assign(&db, user_id, prog.id).await;

    resolver.resolve_today_at(user_id, today()).await.unwrap();
    set_position(&db, user_id, 14, 6).await;

    let resolution = resolver.resolve_today_at(user_id, today()).await.unwrap();
    assert_eq!(expect_workout(&resolution), (14, 6));

    let progress = db.get(user_id).await.unwrap().unwrap();
    assert_eq!(progress.position(), (14, 6));
}

#[tokio::test]
async fn test_program_switch_resets_progress() {
    let db = create_test_db().await;
    let resolver = make_resolver(&db);
    let user_id = Uuid::new_v4();

    let first_program = program(14, 6);
    seed_program_grid(&db, &first_program, &[1, 2, 3, 4, 5, 6]).await;
    assign(&db, user_id, first_program.id).await;
    resolver.resolve_today_at(user_id, today()).await.unwrap();

    // Simulate mid-program state before the switch.
    db.update(
        user_id,
        &ProgressUpdate {
            current_week: Some(7),
            current_day: Some(3),
            completed_workouts_count: Some(23),
            ..ProgressUpdate::default()
        },
    )
    .await
    .unwrap();

    let second_program = program(8, 3);
    seed_program_grid(&db, &second_program, &[1, 3, 5]).await;
    assign(&db, user_id, second_program.id).await;

    let later = today() + Duration::days(40);
    let resolution = resolver.resolve_today_at(user_id, later).await.unwrap();
    assert_eq!(expect_workout(&resolution), (1, 1));
    assert_eq!(resolution.workout().unwrap().program_id, second_program.id);

    let progress = db.get(user_id).await.unwrap().unwrap();
    assert_eq!(progress.program_id, second_program.id);
    assert_eq!(progress.position(), (1, 1));
    assert_eq!(progress.completed_workouts_count, 0);
    assert_eq!(progress.total_workouts_count, 24);
    assert_eq!(progress.start_date, later);
}

#[tokio::test]
async fn test_target_event_seeds_mid_program_position() {
    let db = create_test_db().await;
    let resolver = make_resolver(&db);
    let user_id = Uuid::new_v4();

    let prog = program(14, 6);
    seed_program_grid(&db, &prog, &[1, 2, 3, 4, 5, 6]).await;
    // Event 50 days out: calculator places the user at week 7, day 7; day 7
    // is unauthored, so the resolver catches up to (8, 1).
    assign_with_event(&db, user_id, prog.id, Some(today() + Duration::days(50))).await;

    let resolution = resolver.resolve_today_at(user_id, today()).await.unwrap();
    assert_eq!(expect_workout(&resolution), (8, 1));

    let progress = db.get(user_id).await.unwrap().unwrap();
    assert_eq!(progress.position(), (8, 1));
    assert_eq!(progress.start_date, today() - Duration::days(48));
}

#[tokio::test]
async fn test_lost_race_twice_surfaces_conflict() {
    let db = create_test_db().await;
    let losing = Arc::new(LosingCasStore {
        inner: Arc::clone(&db),
    });
    let resolver = TodayWorkoutResolver::new(db.clone(), losing.clone(), db.clone());
    let user_id = Uuid::new_v4();

    let prog = program(4, 2);
    seed_program_grid(&db, &prog, &[1, 2]).await;
    assign(&db, user_id, prog.id).await;

    resolver.resolve_today_at(user_id, today()).await.unwrap();
    // Point at a hole so resolution needs a position write.
    set_position(&db, user_id, 1, 3).await;

    let error = resolver
        .resolve_today_at(user_id, today())
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::ProgressConflict);
}

#[tokio::test]
async fn test_unsorted_catalog_is_resorted_before_use() {
    let db = create_test_db().await;
    let resolver = make_resolver(&db);
    let user_id = Uuid::new_v4();

    // Insert out of order; the resolver must still pick (1, 1) first.
    let prog = program(2, 3);
    db.inner().insert_program(&prog).await.unwrap();
    for (week, day) in [(2, 2), (1, 3), (2, 1), (1, 1), (1, 2)] {
        db.inner()
            .insert_workout(&common::workout(prog.id, week, day))
            .await
            .unwrap();
    }
    assign(&db, user_id, prog.id).await;

    let resolution = resolver.resolve_today_at(user_id, today()).await.unwrap();
    assert_eq!(expect_workout(&resolution), (1, 1));
}
