// ABOUTME: Centralized resource container for dependency injection
// ABOUTME: Builds and shares the database, token codec, ledger, and middleware
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Flock Contributors

//! # Server Resources
//!
//! Centralized resource container for dependency injection. Expensive shared
//! objects are constructed once at startup and shared behind `Arc`s instead
//! of being recreated per request. The signing secret is consumed here and
//! injected into the token codec; nothing else sees it.

use std::sync::Arc;

use crate::auth::AuthManager;
use crate::config::environment::ServerConfig;
use crate::database_plugins::factory::Database;
use crate::errors::{AppError, AppResult};
use crate::middleware::AuthMiddleware;
use crate::permissions::PermissionResolver;
use crate::refresh_tokens::RefreshTokenManager;

/// Shared server resources
#[derive(Clone)]
pub struct ServerResources {
    /// Credential store and refresh token ledger
    pub database: Arc<Database>,
    /// Access token codec
    pub auth_manager: Arc<AuthManager>,
    /// Refresh token ledger manager
    pub refresh_tokens: RefreshTokenManager,
    /// Role → permission resolver
    pub permissions: Arc<PermissionResolver>,
    /// Per-request authentication guard
    pub auth_middleware: AuthMiddleware,
    /// Loaded configuration
    pub config: Arc<ServerConfig>,
}

impl ServerResources {
    /// Assemble server resources from a connected database and loaded config
    ///
    /// # Errors
    /// Returns an error if the role-table override file cannot be read or parsed
    pub fn new(database: Database, config: ServerConfig) -> AppResult<Self> {
        let database = Arc::new(database);

        let permissions = Arc::new(load_permission_resolver(&config)?);
        let auth_manager = Arc::new(AuthManager::new(
            &config.auth.jwt_secret,
            config.auth.access_token_expiry_minutes,
        ));
        let refresh_tokens = RefreshTokenManager::new(
            Arc::clone(&database),
            config.auth.refresh_token_expiry_days,
        );
        let auth_middleware =
            AuthMiddleware::new(Arc::clone(&auth_manager), Arc::clone(&permissions));

        Ok(Self {
            database,
            auth_manager,
            refresh_tokens,
            permissions,
            auth_middleware,
            config: Arc::new(config),
        })
    }
}

/// Build the permission resolver from its single source of truth: the
/// built-in table, or the JSON override named by the config.
fn load_permission_resolver(config: &ServerConfig) -> AppResult<PermissionResolver> {
    match &config.auth.role_table_path {
        Some(path) => {
            let json = std::fs::read_to_string(path).map_err(|e| {
                AppError::config(format!("Failed to read role table {}: {e}", path.display()))
            })?;
            let resolver = PermissionResolver::from_json(&json).map_err(|e| {
                AppError::config(format!("Invalid role table {}: {e}", path.display()))
            })?;
            tracing::info!("Loaded role table override from {}", path.display());
            Ok(resolver)
        }
        None => Ok(PermissionResolver::with_defaults()),
    }
}
