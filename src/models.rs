// ABOUTME: Core data models for the Cadence training scheduling core
// ABOUTME: Defines Program, Workout, UserProgress, WorkoutCompletion and related types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cadence Fitness

//! # Data Models
//!
//! Core data structures shared by the schedule calculator, the today-workout
//! resolver, and the completion ledger.
//!
//! ## Design Principles
//!
//! - **Catalog Agnostic**: `Program` and `Workout` are owned by the catalog
//!   collaborator and referenced by id; this core never mutates them
//! - **Serializable**: All models support JSON serialization for the API layer
//! - **Opaque Exercises**: Exercise payloads are a tagged union with a
//!   catch-all variant; this core never rejects a workout for content reasons

use std::fmt::{Display, Formatter, Result as FmtResult};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::schedule::DAYS_PER_WEEK;

/// Phase of a user's relationship to a program timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgramPhase {
    /// Before the program start: the target event is further out than the
    /// program duration
    Prep,
    /// Actively progressing through the program
    Main,
    /// After the target event has passed
    Maintenance,
}

impl ProgramPhase {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Prep => "prep",
            Self::Main => "main",
            Self::Maintenance => "maintenance",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "prep" => Self::Prep,
            "maintenance" => Self::Maintenance,
            _ => Self::Main,
        }
    }
}

impl Display for ProgramPhase {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// Program category for organization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProgramCategory {
    /// Strength and resistance focused programs
    Strength,
    /// Running, cycling, and other endurance programs
    Endurance,
    /// Mixed strength and conditioning programs
    Hybrid,
    /// Mobility and recovery programs
    Mobility,
    /// Uncategorized programs
    #[default]
    General,
}

impl ProgramCategory {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Strength => "strength",
            Self::Endurance => "endurance",
            Self::Hybrid => "hybrid",
            Self::Mobility => "mobility",
            Self::General => "general",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "strength" => Self::Strength,
            "endurance" => Self::Endurance,
            "hybrid" => Self::Hybrid,
            "mobility" => Self::Mobility,
            _ => Self::General,
        }
    }
}

/// A named, fixed-length training curriculum with a weekly cadence.
///
/// Owned by the catalog collaborator; immutable from this core's view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Program {
    /// Unique program identifier
    pub id: Uuid,
    /// Display name (e.g., "Beginner Base Building")
    pub name: String,
    /// Program length in weeks (≥ 1)
    pub duration_weeks: u32,
    /// Authored training sessions per week
    pub sessions_per_week: u32,
    /// Category tag
    pub category: ProgramCategory,
    /// Recommended lead time before a target event, in weeks
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_event_weeks: Option<u32>,
}

impl Program {
    /// Program length in calendar days
    #[must_use]
    pub const fn duration_days(&self) -> u32 {
        self.duration_weeks * DAYS_PER_WEEK
    }

    /// Total authored workout slots across the program grid
    #[must_use]
    pub const fn total_workouts(&self) -> u32 {
        self.duration_weeks * self.sessions_per_week
    }
}

/// A known exercise prescription shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum KnownExercise {
    /// Set/rep based resistance work
    Strength {
        /// Exercise name
        name: String,
        /// Number of sets
        sets: u32,
        /// Repetitions per set
        reps: u32,
        /// Prescribed load in kilograms
        #[serde(skip_serializing_if = "Option::is_none")]
        weight_kg: Option<f64>,
        /// Rest between sets in seconds
        #[serde(skip_serializing_if = "Option::is_none")]
        rest_seconds: Option<u32>,
    },
    /// Duration based work (planks, intervals, holds)
    Timed {
        /// Exercise name
        name: String,
        /// Prescribed duration in seconds
        duration_seconds: u32,
    },
    /// Distance based work (runs, rows, rides)
    Distance {
        /// Exercise name
        name: String,
        /// Prescribed distance in meters
        distance_meters: f64,
        /// Target pace description (e.g., "5:30/km")
        #[serde(skip_serializing_if = "Option::is_none")]
        target_pace: Option<String>,
    },
}

/// One entry in a workout's exercise list.
///
/// Known prescription shapes deserialize into [`KnownExercise`]; anything
/// else is preserved verbatim in the opaque variant. This core never rejects
/// a workout for exercise content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExerciseEntry {
    /// A recognized prescription shape
    Known(KnownExercise),
    /// Free-form payload passed through unchanged
    Opaque(serde_json::Value),
}

/// Parse a raw exercises payload, preserving unparseable content opaquely.
///
/// Text that is not a JSON array of entries is wrapped whole into a single
/// opaque entry rather than dropped.
#[must_use]
pub fn parse_exercises(raw: &str) -> Vec<ExerciseEntry> {
    serde_json::from_str::<Vec<ExerciseEntry>>(raw)
        .unwrap_or_else(|_| vec![ExerciseEntry::Opaque(serde_json::Value::String(raw.into()))])
}

/// One authored training session, addressed by (`program_id`, week, day).
///
/// The (week, day) grid need not be dense: missing days represent rest days
/// or unauthored content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workout {
    /// Unique workout identifier
    pub id: Uuid,
    /// Owning program
    pub program_id: Uuid,
    /// Program week this session belongs to (≥ 1)
    pub week: u32,
    /// Day within the weekly cycle (≥ 1)
    pub day: u32,
    /// Display name
    pub name: String,
    /// Session description
    pub description: String,
    /// Estimated session duration in minutes
    pub estimated_duration_minutes: u32,
    /// Ordered exercise list; free-form per-entry shape
    pub exercises: Vec<ExerciseEntry>,
}

impl Workout {
    /// Position of this workout in the program grid
    #[must_use]
    pub const fn slot(&self) -> (u32, u32) {
        (self.week, self.day)
    }
}

/// Per-user pointer into a program's (week, day) grid, plus completion
/// counters.
///
/// Exactly one active record per user; the only mutable state owned by this
/// core. `current_week` and `current_day` are always ≥ 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProgress {
    /// Owning user
    pub user_id: Uuid,
    /// Program the pointer is bound to
    pub program_id: Uuid,
    /// Current program week (≥ 1)
    pub current_week: u32,
    /// Current day within the weekly cycle (≥ 1)
    pub current_day: u32,
    /// Anchor start date for week/day arithmetic
    pub start_date: NaiveDate,
    /// Sessions marked done since the program (re)started
    pub completed_workouts_count: u32,
    /// Total authored slots in the bound program
    pub total_workouts_count: u32,
    /// Whether this record is the user's active progress
    pub is_active: bool,
}

impl UserProgress {
    /// Current (week, day) position
    #[must_use]
    pub const fn position(&self) -> (u32, u32) {
        (self.current_week, self.current_day)
    }
}

/// Partial update to a [`UserProgress`] record.
///
/// `None` fields are left untouched. This is the external completion
/// handler's path for advancing a user after marking a session done.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgressUpdate {
    /// Rebind the record to a different program
    pub program_id: Option<Uuid>,
    /// New current week
    pub current_week: Option<u32>,
    /// New current day
    pub current_day: Option<u32>,
    /// New anchor start date
    pub start_date: Option<NaiveDate>,
    /// New completed sessions counter
    pub completed_workouts_count: Option<u32>,
    /// New total slots counter
    pub total_workouts_count: Option<u32>,
    /// New active flag
    pub is_active: Option<bool>,
}

/// A user's current program assignment, supplied by the program-management
/// collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramAssignment {
    /// Assigned user
    pub user_id: Uuid,
    /// Assigned program
    pub program_id: Uuid,
    /// Optional target event date driving schedule placement
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_event_date: Option<NaiveDate>,
    /// When the assignment was made
    pub assigned_at: DateTime<Utc>,
}

/// Append-only record of one workout completion or skip
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutCompletion {
    /// Unique completion identifier
    pub id: Uuid,
    /// User who completed or skipped the session
    pub user_id: Uuid,
    /// Workout that was completed or skipped
    pub workout_id: Uuid,
    /// When the session was logged
    pub completed_at: DateTime<Utc>,
    /// True if the session was skipped rather than completed
    pub skipped: bool,
    /// Free-form user notes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Outcome of a today-workout resolution
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TodayResolution {
    /// A concrete workout for today
    Workout {
        /// The resolved session
        workout: Workout,
    },
    /// The user has no current program assignment
    NoProgram,
    /// The assigned program has zero authored workouts
    NoWorkout,
}

impl TodayResolution {
    /// The resolved workout, if any
    #[must_use]
    pub const fn workout(&self) -> Option<&Workout> {
        match self {
            Self::Workout { workout } => Some(workout),
            Self::NoProgram | Self::NoWorkout => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_round_trip() {
        for phase in [
            ProgramPhase::Prep,
            ProgramPhase::Main,
            ProgramPhase::Maintenance,
        ] {
            assert_eq!(ProgramPhase::parse(phase.as_str()), phase);
        }
    }

    #[test]
    fn test_parse_exercises_known_shapes() {
        let raw = r#"[
            {"type": "strength", "name": "Back Squat", "sets": 5, "reps": 5},
            {"type": "timed", "name": "Plank", "duration_seconds": 60}
        ]"#;
        let entries = parse_exercises(raw);
        assert_eq!(entries.len(), 2);
        assert!(matches!(
            entries[0],
            ExerciseEntry::Known(KnownExercise::Strength { .. })
        ));
        assert!(matches!(
            entries[1],
            ExerciseEntry::Known(KnownExercise::Timed { .. })
        ));
    }

    #[test]
    fn test_parse_exercises_unknown_shape_is_opaque() {
        let raw = r#"[{"movement": "mystery", "tempo": "3-1-1"}]"#;
        let entries = parse_exercises(raw);
        assert_eq!(entries.len(), 1);
        assert!(matches!(entries[0], ExerciseEntry::Opaque(_)));
    }

    #[test]
    fn test_parse_exercises_malformed_text_preserved() {
        let raw = "not json at all";
        let entries = parse_exercises(raw);
        assert_eq!(entries.len(), 1);
        match &entries[0] {
            ExerciseEntry::Opaque(serde_json::Value::String(s)) => assert_eq!(s, raw),
            other => panic!("expected opaque string, got {other:?}"),
        }
    }

    #[test]
    fn test_program_totals() {
        let program = Program {
            id: Uuid::new_v4(),
            name: "Beginner".into(),
            duration_weeks: 14,
            sessions_per_week: 6,
            category: ProgramCategory::Strength,
            target_event_weeks: None,
        };
        assert_eq!(program.duration_days(), 98);
        assert_eq!(program.total_workouts(), 84);
    }
}
