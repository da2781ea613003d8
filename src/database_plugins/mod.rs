// ABOUTME: Database abstraction layer for the Flock server
// ABOUTME: Plugin architecture with a SQLite backend behind a provider trait
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Flock Contributors

//! Database abstraction for credential reads and the refresh token ledger.
//!
//! All database implementations must implement [`DatabaseProvider`] to give
//! the application layer one consistent interface.

use crate::models::{RefreshTokenRecord, User};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

pub mod factory;
pub mod sqlite;

/// Core database abstraction trait
#[async_trait]
pub trait DatabaseProvider: Send + Sync + Clone {
    /// Create a new database connection
    async fn new(database_url: &str) -> Result<Self>
    where
        Self: Sized;

    /// Run database migrations to set up the schema
    async fn migrate(&self) -> Result<()>;

    // ================================
    // Credential Store
    // ================================

    /// Create a new user account (registration flows and seeding only)
    async fn create_user(&self, user: &User) -> Result<Uuid>;

    /// Get user by id
    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>>;

    /// Get user by email address
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Record a successful login (best-effort bookkeeping)
    async fn update_last_login(&self, user_id: Uuid) -> Result<()>;

    /// Total number of users
    async fn get_user_count(&self) -> Result<i64>;

    // ================================
    // Refresh Token Ledger
    // ================================

    /// Persist a new refresh token ledger row
    async fn create_refresh_token(&self, record: &RefreshTokenRecord) -> Result<()>;

    /// Look up a ledger row by token hash, revoked or not
    async fn get_refresh_token(&self, token_hash: &str) -> Result<Option<RefreshTokenRecord>>;

    /// Atomically revoke the row matching `token_hash` if it is currently
    /// active, returning the claimed row.
    ///
    /// This is a single conditional mutation: of any number of concurrent
    /// callers presenting the same token, exactly one receives `Some` and the
    /// rest observe the already-revoked state as `None`.
    async fn claim_refresh_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<RefreshTokenRecord>>;

    /// Revoke every active refresh token for a user; returns how many rows
    /// were revoked
    async fn revoke_user_refresh_tokens(&self, user_id: Uuid) -> Result<u64>;
}
