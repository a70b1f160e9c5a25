// ABOUTME: Main library entry point for the Cadence training scheduling core
// ABOUTME: Provides schedule calculation, today-workout resolution, and completion tracking
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cadence Fitness

#![deny(unsafe_code)]

//! # Cadence Training API
//!
//! Core scheduling engine for multi-week training programs. Assigns each
//! user exactly one workout per day and advances that assignment over time,
//! reconciling elapsed calendar time, an optional target event date, gaps in
//! the authored workout catalog, and explicit program switches.
//!
//! ## Architecture
//!
//! - **Schedule Calculator**: pure mapping from calendar dates to a program
//!   phase and (week, day) position, run once at assignment time
//! - **Today-Workout Resolver**: per-request resolution of a stored position
//!   to a concrete workout, with catch-up and cycle policies
//! - **Completion Ledger**: append-only completion/skip records with
//!   windowed read-side queries
//! - **Stores**: narrow async traits per external collaborator, with a
//!   SQLite implementation; lifecycle owned by the composition root
//!
//! Catalog authoring, authentication, billing, and third-party fitness
//! platform integration are external collaborators consumed through the
//! store traits only.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use cadence_training_api::database_plugins::SqliteDatabase;
//! use cadence_training_api::resolver::TodayWorkoutResolver;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let db = Arc::new(SqliteDatabase::new("sqlite:./data/cadence.db").await?);
//!     let resolver = TodayWorkoutResolver::new(db.clone(), db.clone(), db);
//!     let resolution = resolver.resolve_today(uuid::Uuid::new_v4()).await?;
//!     println!("{resolution:?}");
//!     Ok(())
//! }
//! ```

/// Configuration management and persistence
pub mod config;

/// Application constants and environment defaults
pub mod constants;

/// SQLite persistence for catalog, progress, and completions
pub mod database;

/// Store abstraction traits and backends
pub mod database_plugins;

/// Unified error handling
pub mod errors;

/// Completion ledger service
pub mod ledger;

/// Structured logging setup
pub mod logging;

/// Core data models
pub mod models;

/// Today-workout resolver
pub mod resolver;

/// Schedule calculator
pub mod schedule;
