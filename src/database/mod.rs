// ABOUTME: SQLite-backed store collaborator for the Cadence training core
// ABOUTME: Owns the connection pool, schema migrations, and per-domain query modules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cadence Fitness

//! # Database Management
//!
//! SQLite persistence for the program catalog, user progress, program
//! assignments, and the completion ledger. The rest of the crate consumes
//! this through the store traits in [`crate::database_plugins`]; nothing
//! outside this module writes SQL.

mod catalog;
mod completions;
mod progress;

use anyhow::Result;
use sqlx::{Pool, Sqlite, SqlitePool};

/// Database handle for catalog, progress, and completion storage
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Create a new database connection pool and run migrations
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or a
    /// migration fails.
    pub async fn new(database_url: &str) -> Result<Self> {
        // Ensure SQLite creates the database file if it doesn't exist
        let connection_options = if database_url.starts_with("sqlite:") {
            format!("{database_url}?mode=rwc")
        } else {
            database_url.to_string()
        };

        let pool = SqlitePool::connect(&connection_options).await?;

        let db = Self { pool };
        db.migrate().await?;

        Ok(db)
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Run database migrations
    ///
    /// # Errors
    ///
    /// Returns an error if table or index creation fails.
    pub async fn migrate(&self) -> Result<()> {
        self.migrate_catalog().await?;
        self.migrate_progress().await?;
        self.migrate_completions().await?;
        Ok(())
    }
}
