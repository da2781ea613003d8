// ABOUTME: Core data models for credentials and the refresh token ledger
// ABOUTME: Defines User records and persisted RefreshTokenRecord rows
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Flock Contributors

//! # Data Models
//!
//! Core data structures shared across the server. `User` rows are created by
//! member-registration flows outside this core (the `seed-demo-users` binary
//! stands in for those flows in development); the auth core reads them and
//! updates last-login bookkeeping only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::permissions::Role;

/// A user credential record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub id: Uuid,
    /// Email address (used as the login identifier)
    pub email: String,
    /// Display name
    pub display_name: Option<String>,
    /// bcrypt hash of the passkey; never serialized outward
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Role for the permission system
    pub role: Role,
    /// Whether the account may log in
    pub is_active: bool,
    /// When the account was created
    pub created_at: DateTime<Utc>,
    /// Last successful login, if any
    pub last_login: Option<DateTime<Utc>>,
}

impl User {
    /// Create a new user record with a fresh id
    #[must_use]
    pub fn new(
        email: String,
        password_hash: String,
        display_name: Option<String>,
        role: Role,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            display_name,
            password_hash,
            role,
            is_active: true,
            created_at: Utc::now(),
            last_login: None,
        }
    }
}

/// A persisted refresh token ledger row.
///
/// Only the SHA-256 hash of the opaque token is stored; the plaintext exists
/// solely in the response that issued it. Rows are revoked, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenRecord {
    /// Ledger row identifier
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// SHA-256 hex digest of the opaque token
    pub token_hash: String,
    /// When the token was issued
    pub issued_at: DateTime<Utc>,
    /// When the token expires
    pub expires_at: DateTime<Utc>,
    /// Whether the token has been revoked (rotation, logout, or reuse response)
    pub revoked: bool,
    /// Ledger row this token replaced, forming the rotation chain
    pub replaces: Option<Uuid>,
}

impl RefreshTokenRecord {
    /// Whether the token is past its expiry
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Whether the token can still be redeemed
    #[must_use]
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        !self.revoked && !self.is_expired(now)
    }
}
