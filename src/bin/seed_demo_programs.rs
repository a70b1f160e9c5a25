// ABOUTME: Demo program seeding utility for the Cadence Training API
// ABOUTME: Creates a demo training program catalog and a demo user assignment
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cadence Fitness

//! Demo catalog seeder for the Cadence Training API.
//!
//! Creates the "Beginner Base Building" demo program (14 weeks, 6 authored
//! days per week, day 7 left unauthored as a rest day) and assigns it to a
//! demo user so a fresh database has something to resolve against.
//!
//! Usage:
//! ```bash
//! # Seed the demo catalog (uses DATABASE_URL from environment)
//! cargo run --bin seed-demo-programs
//!
//! # Override database URL
//! cargo run --bin seed-demo-programs -- --database-url sqlite:./data/cadence.db
//!
//! # Force re-seed (skip existing check)
//! cargo run --bin seed-demo-programs -- --force
//! ```

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use tracing::info;
use uuid::Uuid;

use cadence_training_api::config::ServerConfig;
use cadence_training_api::database_plugins::SqliteDatabase;
use cadence_training_api::logging::LoggingConfig;
use cadence_training_api::models::{
    ExerciseEntry, KnownExercise, Program, ProgramAssignment, ProgramCategory, Workout,
};

#[derive(Parser)]
#[command(
    name = "seed-demo-programs",
    about = "Cadence Training API demo catalog seeder",
    long_about = "Create the demo training program and a demo user assignment"
)]
struct SeedArgs {
    /// Database URL override
    #[arg(long)]
    database_url: Option<String>,

    /// Force re-seed even if programs already exist
    #[arg(long)]
    force: bool,
}

/// Fixed ids so repeated seeding stays addressable from scripts and docs
const DEMO_PROGRAM_ID: &str = "11111111-1111-1111-1111-111111111111";
const DEMO_USER_ID: &str = "22222222-2222-2222-2222-222222222222";

/// One authored session template per weekly cycle day (day 7 is rest)
struct SessionTemplate {
    day: u32,
    name: &'static str,
    description: &'static str,
    estimated_duration_minutes: u32,
}

const WEEKLY_SESSIONS: &[SessionTemplate] = &[
    SessionTemplate {
        day: 1,
        name: "Lower Body Strength",
        description: "Squat-focused strength session with accessory work",
        estimated_duration_minutes: 60,
    },
    SessionTemplate {
        day: 2,
        name: "Easy Aerobic Run",
        description: "Conversational-pace aerobic base building",
        estimated_duration_minutes: 40,
    },
    SessionTemplate {
        day: 3,
        name: "Upper Body Strength",
        description: "Press and pull strength session",
        estimated_duration_minutes: 55,
    },
    SessionTemplate {
        day: 4,
        name: "Tempo Intervals",
        description: "Threshold intervals with full recoveries",
        estimated_duration_minutes: 45,
    },
    SessionTemplate {
        day: 5,
        name: "Full Body Conditioning",
        description: "Mixed-modal conditioning circuit",
        estimated_duration_minutes: 50,
    },
    SessionTemplate {
        day: 6,
        name: "Long Easy Effort",
        description: "Extended low-intensity endurance work",
        estimated_duration_minutes: 75,
    },
];

fn demo_exercises(template: &SessionTemplate) -> Vec<ExerciseEntry> {
    match template.day {
        1 | 3 | 5 => vec![
            ExerciseEntry::Known(KnownExercise::Strength {
                name: "Back Squat".into(),
                sets: 5,
                reps: 5,
                weight_kg: None,
                rest_seconds: Some(180),
            }),
            ExerciseEntry::Known(KnownExercise::Timed {
                name: "Plank".into(),
                duration_seconds: 60,
            }),
        ],
        _ => vec![ExerciseEntry::Known(KnownExercise::Distance {
            name: "Run".into(),
            distance_meters: 5000.0,
            target_pace: Some("easy".into()),
        })],
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = SeedArgs::parse();

    LoggingConfig::from_env().init()?;

    let config = ServerConfig::from_env()?;
    let database_url = args.database_url.unwrap_or(config.database_url);

    let db = SqliteDatabase::new(&database_url).await?;

    let existing = db.inner().count_programs().await?;
    if existing > 0 && !args.force {
        info!(existing, "programs already seeded, nothing to do (use --force to re-seed)");
        return Ok(());
    }

    let program = Program {
        id: Uuid::parse_str(DEMO_PROGRAM_ID)?,
        name: "Beginner Base Building".into(),
        duration_weeks: 14,
        sessions_per_week: 6,
        category: ProgramCategory::Hybrid,
        target_event_weeks: Some(14),
    };
    db.inner().insert_program(&program).await?;

    for week in 1..=program.duration_weeks {
        for template in WEEKLY_SESSIONS {
            let workout = Workout {
                id: Uuid::new_v4(),
                program_id: program.id,
                week,
                day: template.day,
                name: format!("Week {week} - {}", template.name),
                description: template.description.into(),
                estimated_duration_minutes: template.estimated_duration_minutes,
                exercises: demo_exercises(template),
            };
            db.inner().insert_workout(&workout).await?;
        }
    }

    let assignment = ProgramAssignment {
        user_id: Uuid::parse_str(DEMO_USER_ID)?,
        program_id: program.id,
        target_event_date: None,
        assigned_at: Utc::now(),
    };
    db.inner().upsert_assignment(&assignment).await?;

    info!(
        program_id = %program.id,
        workouts = program.duration_weeks * 6,
        demo_user = %assignment.user_id,
        "demo catalog seeded"
    );

    Ok(())
}
