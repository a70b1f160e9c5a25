// ABOUTME: Schedule calculator mapping calendar dates onto a program's (week, day) grid
// ABOUTME: Derives phase, anchor start date, and initial position from today and a target event
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cadence Fitness

//! # Schedule Calculator
//!
//! Pure placement arithmetic, run once at program assignment or restart time
//! to seed a [`crate::models::UserProgress`] record. Purely a function of its
//! inputs; identical inputs always yield identical output.

use chrono::{Duration, NaiveDate};

use crate::constants::schedule::DAYS_PER_WEEK;
use crate::models::ProgramPhase;

/// Result of a schedule computation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComputedSchedule {
    /// Phase of the user's relationship to the program timeline
    pub phase: ProgramPhase,
    /// Anchor start date; back-dated when the program is already underway
    pub start_date: NaiveDate,
    /// Initial program week (≥ 1)
    pub current_week: u32,
    /// Initial day within the weekly cycle (≥ 1)
    pub current_day: u32,
}

/// Map (today, program duration, optional target event) onto the program grid.
///
/// - No target event: the program starts today at (1, 1).
/// - Event already passed: maintenance, position (1, 1).
/// - Event within the program window: the program is treated as having
///   started in the past so it completes exactly on the event date; the
///   start date is back-dated and the position advanced accordingly.
/// - Event beyond the program window: prep phase, position (1, 1); the
///   prep→main handoff is an external concern.
#[must_use]
pub fn compute_schedule(
    today: NaiveDate,
    duration_weeks: u32,
    target_event_date: Option<NaiveDate>,
) -> ComputedSchedule {
    let program_duration_days = i64::from(duration_weeks * DAYS_PER_WEEK);

    let Some(event_date) = target_event_date else {
        return ComputedSchedule {
            phase: ProgramPhase::Main,
            start_date: today,
            current_week: 1,
            current_day: 1,
        };
    };

    let days_until_event = (event_date - today).num_days();

    if days_until_event < 0 {
        // Event already passed; no forward schedule to compute.
        return ComputedSchedule {
            phase: ProgramPhase::Maintenance,
            start_date: today,
            current_week: 1,
            current_day: 1,
        };
    }

    if days_until_event < program_duration_days {
        let days_into_program = program_duration_days - days_until_event;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let current_week = (days_into_program / i64::from(DAYS_PER_WEEK)) as u32 + 1;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let current_day = (days_into_program % i64::from(DAYS_PER_WEEK)) as u32 + 1;
        return ComputedSchedule {
            phase: ProgramPhase::Main,
            start_date: today - Duration::days(days_into_program),
            current_week,
            current_day,
        };
    }

    ComputedSchedule {
        phase: ProgramPhase::Prep,
        start_date: today,
        current_week: 1,
        current_day: 1,
    }
}
