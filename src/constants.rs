// ABOUTME: System-wide constants and environment-based defaults for the Cadence training core
// ABOUTME: Contains service identity, env var accessors, and scheduling defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cadence Fitness

//! # Constants Module
//!
//! Application constants and environment variable configuration defaults.

use std::env;

/// Service identity constants
pub mod service {
    /// Service name used in structured logs
    pub const SERVICE_NAME: &str = "cadence-training-api";

    /// Service version from Cargo.toml
    pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");
}

/// Environment-based configuration
pub mod env_config {
    use super::env;

    /// Get database `URL` from environment or default
    #[must_use]
    pub fn database_url() -> String {
        env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:./data/cadence.db".into())
    }

    /// Get deployment environment from environment or default
    #[must_use]
    pub fn environment() -> String {
        env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into())
    }

    /// Get log level from environment or default
    #[must_use]
    pub fn log_level() -> String {
        env::var("RUST_LOG").unwrap_or_else(|_| "info".into())
    }
}

/// Scheduling constants
pub mod schedule {
    /// Calendar days in one program week
    pub const DAYS_PER_WEEK: u32 = 7;
}
