// ABOUTME: Logging configuration and structured logging setup
// ABOUTME: Configures tracing-subscriber with env-driven level and output format
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Flock Contributors

//! Structured logging setup

use std::env;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::errors::{AppError, AppResult};

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// JSON format for production logging
    Json,
    /// Pretty format for development
    Pretty,
    /// Compact single-line format
    Compact,
}

impl LogFormat {
    fn from_env() -> Self {
        match env::var("FLOCK_LOG_FORMAT").as_deref() {
            Ok("json") => Self::Json,
            Ok("pretty") => Self::Pretty,
            _ => Self::Compact,
        }
    }
}

/// Initialize the global tracing subscriber from environment variables.
///
/// `RUST_LOG` controls the filter (default `flock_server=info,tower_http=info`)
/// and `FLOCK_LOG_FORMAT` selects `json`, `pretty`, or `compact`.
///
/// # Errors
/// Returns an error if a global subscriber is already installed
pub fn init_from_env() -> AppResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("flock_server=info,tower_http=info"));

    let registry = tracing_subscriber::registry().with(filter);

    let init_result = match LogFormat::from_env() {
        LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
        LogFormat::Pretty => registry.with(fmt::layer().pretty()).try_init(),
        LogFormat::Compact => registry.with(fmt::layer().compact()).try_init(),
    };

    init_result.map_err(|e| AppError::config(format!("Failed to install tracing subscriber: {e}")))
}
