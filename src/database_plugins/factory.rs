// ABOUTME: Database factory with runtime backend selection from the connection string
// ABOUTME: Wraps concrete providers behind one Database enum for the application layer
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Flock Contributors

//! Database factory for creating database providers from connection strings

use super::sqlite::SqliteDatabase;
use super::DatabaseProvider;
use crate::models::{RefreshTokenRecord, User};
use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

/// Database instance wrapper that delegates to the selected implementation
#[derive(Clone)]
pub enum Database {
    /// Embedded SQLite backend
    SQLite(SqliteDatabase),
}

impl Database {
    /// A descriptive string for the current database backend
    #[must_use]
    pub const fn backend_info(&self) -> &'static str {
        match self {
            Self::SQLite(_) => "SQLite (embedded)",
        }
    }
}

#[async_trait]
impl DatabaseProvider for Database {
    async fn new(database_url: &str) -> Result<Self> {
        if database_url.starts_with("sqlite:") {
            info!("Using SQLite database: {database_url}");
            Ok(Self::SQLite(SqliteDatabase::new(database_url).await?))
        } else if database_url.starts_with("postgresql:") || database_url.starts_with("postgres:") {
            bail!("PostgreSQL support is not compiled into this build")
        } else {
            bail!("Unsupported database URL: {database_url}")
        }
    }

    async fn migrate(&self) -> Result<()> {
        match self {
            Self::SQLite(db) => db.migrate().await,
        }
    }

    async fn create_user(&self, user: &User) -> Result<Uuid> {
        match self {
            Self::SQLite(db) => db.create_user(user).await,
        }
    }

    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>> {
        match self {
            Self::SQLite(db) => db.get_user(user_id).await,
        }
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        match self {
            Self::SQLite(db) => db.get_user_by_email(email).await,
        }
    }

    async fn update_last_login(&self, user_id: Uuid) -> Result<()> {
        match self {
            Self::SQLite(db) => db.update_last_login(user_id).await,
        }
    }

    async fn get_user_count(&self) -> Result<i64> {
        match self {
            Self::SQLite(db) => db.get_user_count().await,
        }
    }

    async fn create_refresh_token(&self, record: &RefreshTokenRecord) -> Result<()> {
        match self {
            Self::SQLite(db) => db.create_refresh_token(record).await,
        }
    }

    async fn get_refresh_token(&self, token_hash: &str) -> Result<Option<RefreshTokenRecord>> {
        match self {
            Self::SQLite(db) => db.get_refresh_token(token_hash).await,
        }
    }

    async fn claim_refresh_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<RefreshTokenRecord>> {
        match self {
            Self::SQLite(db) => db.claim_refresh_token(token_hash, now).await,
        }
    }

    async fn revoke_user_refresh_tokens(&self, user_id: Uuid) -> Result<u64> {
        match self {
            Self::SQLite(db) => db.revoke_user_refresh_tokens(user_id).await,
        }
    }
}
