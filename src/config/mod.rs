// ABOUTME: Configuration module for the Cadence training core
// ABOUTME: Re-exports environment-based server configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cadence Fitness

//! Configuration management

/// Environment-based server configuration
pub mod environment;

pub use environment::{Environment, ServerConfig};
