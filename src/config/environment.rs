// ABOUTME: Environment-based server configuration with typed sub-configs
// ABOUTME: Loads ports, database URL, and auth settings from environment variables
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Flock Contributors

//! Environment-only configuration for the Flock server.
//!
//! Everything is read once at startup via [`ServerConfig::from_env`]; there
//! is no config file beyond the optional role-table override JSON.

use base64::{engine::general_purpose, Engine as _};
use std::env;
use std::path::PathBuf;
use tracing::warn;

use crate::constants::limits;
use crate::errors::{AppError, AppResult};

/// Top-level server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,
    /// Database settings
    pub database: DatabaseConfig,
    /// Authentication settings
    pub auth: AuthConfig,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Connection URL (`sqlite:...`)
    pub url: String,
}

/// Authentication configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// Decoded signing secret bytes, injected into the token codec at startup
    pub jwt_secret: Vec<u8>,
    /// Access token lifetime in minutes
    pub access_token_expiry_minutes: i64,
    /// Refresh token lifetime in days
    pub refresh_token_expiry_days: i64,
    /// Optional JSON file overriding the built-in role table
    pub role_table_path: Option<PathBuf>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field(
                "access_token_expiry_minutes",
                &self.access_token_expiry_minutes,
            )
            .field("refresh_token_expiry_days", &self.refresh_token_expiry_days)
            .field("role_table_path", &self.role_table_path)
            .finish()
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a variable is present but unparseable, or if
    /// secret generation fails when `FLOCK_JWT_SECRET` is unset
    pub fn from_env() -> AppResult<Self> {
        Ok(Self {
            http_port: parse_env("FLOCK_HTTP_PORT", 8080)?,
            database: DatabaseConfig {
                url: env_or_default("DATABASE_URL", "sqlite:./data/flock.db"),
            },
            auth: AuthConfig {
                jwt_secret: load_jwt_secret()?,
                access_token_expiry_minutes: parse_env(
                    "FLOCK_ACCESS_TOKEN_EXPIRY_MINUTES",
                    limits::ACCESS_TOKEN_EXPIRY_MINUTES,
                )?,
                refresh_token_expiry_days: parse_env(
                    "FLOCK_REFRESH_TOKEN_EXPIRY_DAYS",
                    limits::REFRESH_TOKEN_EXPIRY_DAYS,
                )?,
                role_table_path: env::var("FLOCK_ROLE_TABLE").ok().map(PathBuf::from),
            },
        })
    }

    /// One-line non-secret summary for startup logging
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "port={} database={} access_token_expiry={}m refresh_token_expiry={}d",
            self.http_port,
            self.database.url,
            self.auth.access_token_expiry_minutes,
            self.auth.refresh_token_expiry_days
        )
    }
}

/// Read the signing secret from `FLOCK_JWT_SECRET` (base64), or generate an
/// ephemeral one.
///
/// An ephemeral secret invalidates all outstanding access tokens on restart,
/// which is acceptable for development only.
fn load_jwt_secret() -> AppResult<Vec<u8>> {
    match env::var("FLOCK_JWT_SECRET") {
        Ok(encoded) => general_purpose::STANDARD
            .decode(encoded.trim())
            .map_err(|e| AppError::config(format!("FLOCK_JWT_SECRET is not valid base64: {e}"))),
        Err(_) => {
            warn!("FLOCK_JWT_SECRET not set; generating an ephemeral signing secret");
            Ok(crate::auth::generate_jwt_secret()?.to_vec())
        }
    }
}

fn env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.into())
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> AppResult<T>
where
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| AppError::config(format!("{key} is invalid: {e}"))),
        Err(_) => Ok(default),
    }
}
