// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides database, resource container, and user creation helpers
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Flock Contributors
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]

//! Shared test utilities for `flock_server` integration tests

use anyhow::Result;
use flock_server::{
    auth::generate_jwt_secret,
    config::environment::{AuthConfig, DatabaseConfig, ServerConfig},
    database_plugins::{factory::Database, DatabaseProvider},
    models::User,
    permissions::Role,
    resources::ServerResources,
};
use std::sync::{Arc, Once};
use tempfile::TempDir;

/// Low bcrypt cost keeps test logins fast; production uses the default cost
pub const TEST_BCRYPT_COST: u32 = 4;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_test_writer()
            .init();
    });
}

/// A resource container plus the temp dir backing its database file.
///
/// The directory must outlive the pool, so it rides along here.
pub struct TestContext {
    pub resources: Arc<ServerResources>,
    _temp_dir: TempDir,
}

impl TestContext {
    pub fn database(&self) -> &Arc<Database> {
        &self.resources.database
    }
}

/// Build a config suitable for tests, pointing at `database_url`
pub fn test_config(database_url: String) -> ServerConfig {
    ServerConfig {
        http_port: 0,
        database: DatabaseConfig { url: database_url },
        auth: AuthConfig {
            jwt_secret: generate_jwt_secret().unwrap().to_vec(),
            access_token_expiry_minutes: 30,
            refresh_token_expiry_days: 30,
            role_table_path: None,
        },
    }
}

/// Standard test setup: on-disk SQLite in a temp dir plus full resources
pub async fn create_test_resources() -> Result<TestContext> {
    init_test_logging();

    let temp_dir = TempDir::new()?;
    let database_url = format!("sqlite:{}/test.db", temp_dir.path().display());

    let database = Database::new(&database_url).await?;
    let resources = Arc::new(ServerResources::new(database, test_config(database_url))?);

    Ok(TestContext {
        resources,
        _temp_dir: temp_dir,
    })
}

/// Create a test user with the given role and passkey
pub async fn create_test_user(
    database: &Database,
    email: &str,
    role: Role,
    password: &str,
) -> Result<User> {
    let password_hash = bcrypt::hash(password, TEST_BCRYPT_COST)?;
    let user = User::new(email.into(), password_hash, Some("Test User".into()), role);
    database.create_user(&user).await?;
    Ok(user)
}
