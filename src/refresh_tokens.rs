// ABOUTME: Refresh token ledger manager handling issuance, rotation, and revocation
// ABOUTME: Enforces single-use rotation with atomic claims and reuse-triggered chain revocation
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Flock Contributors

//! # Refresh Token Ledger
//!
//! Durable record of refresh-token issuance and revocation. Tokens are opaque
//! high-entropy strings stored only as SHA-256 hashes; rotation claims the old
//! row through a single atomic conditional update, so a token can be redeemed
//! exactly once no matter how many callers present it concurrently. A second
//! presentation of an already-rotated token is treated as a security signal
//! and revokes the owner's entire chain.

use chrono::{Duration, Utc};
use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::constants::{key_prefixes, limits};
use crate::database_plugins::{factory::Database, DatabaseProvider};
use crate::errors::AppError;
use crate::models::RefreshTokenRecord;

/// Refresh token redemption failure kinds
#[derive(Debug, thiserror::Error)]
pub enum RefreshTokenError {
    /// The token matched a ledger row but is past its expiry
    #[error("refresh token has expired")]
    Expired,
    /// The token is unknown, revoked, or was already rotated (reuse signal)
    #[error("refresh token is invalid or has already been used")]
    InvalidOrReused,
    /// Ledger storage failed
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<RefreshTokenError> for AppError {
    fn from(e: RefreshTokenError) -> Self {
        match e {
            RefreshTokenError::Expired => Self::auth_expired(),
            RefreshTokenError::InvalidOrReused => Self::auth_invalid(
                crate::constants::error_messages::INVALID_OR_REUSED_REFRESH_TOKEN,
            ),
            RefreshTokenError::Internal(err) => Self::database(err.to_string()),
        }
    }
}

/// Manager for the persisted refresh token ledger
#[derive(Clone)]
pub struct RefreshTokenManager {
    database: Arc<Database>,
    expiry_days: i64,
}

impl RefreshTokenManager {
    /// Create a manager over the given ledger storage
    #[must_use]
    pub const fn new(database: Arc<Database>, expiry_days: i64) -> Self {
        Self {
            database,
            expiry_days,
        }
    }

    /// Generate a new opaque refresh token string
    fn generate_token() -> String {
        let random_chars: String = thread_rng()
            .sample_iter(&Alphanumeric)
            .take(limits::REFRESH_TOKEN_RANDOM_CHARS)
            .map(char::from)
            .collect();
        format!("{}{random_chars}", key_prefixes::REFRESH_TOKEN)
    }

    /// SHA-256 hex digest used for hash-at-rest storage and lookups
    #[must_use]
    pub fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Issue a fresh refresh token for a user (login)
    ///
    /// # Errors
    /// Returns an error if the ledger insert fails
    pub async fn issue(&self, user_id: Uuid) -> anyhow::Result<String> {
        self.issue_chained(user_id, None).await
    }

    async fn issue_chained(
        &self,
        user_id: Uuid,
        replaces: Option<Uuid>,
    ) -> anyhow::Result<String> {
        let token = Self::generate_token();
        let now = Utc::now();

        let record = RefreshTokenRecord {
            id: Uuid::new_v4(),
            user_id,
            token_hash: Self::hash_token(&token),
            issued_at: now,
            expires_at: now + Duration::days(self.expiry_days),
            revoked: false,
            replaces,
        };
        self.database.create_refresh_token(&record).await?;

        Ok(token)
    }

    /// Redeem a refresh token and rotate it.
    ///
    /// Atomically revokes the presented token and, only if that succeeded,
    /// issues a replacement chained to it. Of concurrent callers presenting
    /// the same token, exactly one succeeds.
    ///
    /// # Errors
    /// - [`RefreshTokenError::Expired`] if the token is past its expiry
    /// - [`RefreshTokenError::InvalidOrReused`] if the token is unknown or was
    ///   already rotated; reuse also revokes the owner's whole chain
    /// - [`RefreshTokenError::Internal`] on storage failure
    pub async fn redeem_and_rotate(
        &self,
        token: &str,
    ) -> Result<(String, Uuid), RefreshTokenError> {
        let token_hash = Self::hash_token(token);
        let now = Utc::now();

        if let Some(old) = self.database.claim_refresh_token(&token_hash, now).await? {
            let new_token = self.issue_chained(old.user_id, Some(old.id)).await?;
            return Ok((new_token, old.user_id));
        }

        // The claim did not apply; classify why without widening the race
        match self.database.get_refresh_token(&token_hash).await? {
            Some(record) if record.revoked => {
                warn!(
                    user_id = %record.user_id,
                    "refresh token reuse detected; revoking token chain"
                );
                if let Err(e) = self
                    .database
                    .revoke_user_refresh_tokens(record.user_id)
                    .await
                {
                    warn!(user_id = %record.user_id, "chain revocation failed: {e}");
                }
                Err(RefreshTokenError::InvalidOrReused)
            }
            Some(record) if record.is_expired(now) => Err(RefreshTokenError::Expired),
            _ => Err(RefreshTokenError::InvalidOrReused),
        }
    }

    /// Revoke every active refresh token for a user
    ///
    /// # Errors
    /// Returns an error if the ledger update fails
    pub async fn revoke_all(&self, user_id: Uuid) -> anyhow::Result<u64> {
        let revoked = self.database.revoke_user_refresh_tokens(user_id).await?;
        info!(%user_id, revoked, "revoked refresh tokens");
        Ok(revoked)
    }

    /// Best-effort revocation for logout.
    ///
    /// Logout is a courtesy operation, not a security boundary; failures are
    /// logged and swallowed so repeated or stale logouts still succeed from
    /// the caller's perspective.
    pub async fn logout(&self, token: &str) {
        let token_hash = Self::hash_token(token);
        match self.database.get_refresh_token(&token_hash).await {
            Ok(Some(record)) => {
                if let Err(e) = self.revoke_all(record.user_id).await {
                    warn!(user_id = %record.user_id, "logout revocation failed: {e}");
                }
            }
            Ok(None) => {}
            Err(e) => warn!("logout lookup failed: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_tokens_are_prefixed_and_unique() {
        let a = RefreshTokenManager::generate_token();
        let b = RefreshTokenManager::generate_token();
        assert!(a.starts_with(key_prefixes::REFRESH_TOKEN));
        assert_eq!(
            a.len(),
            key_prefixes::REFRESH_TOKEN.len() + limits::REFRESH_TOKEN_RANDOM_CHARS
        );
        assert_ne!(a, b);
    }

    #[test]
    fn test_hash_is_stable_and_hex() {
        let token = "frt_abc123";
        let h1 = RefreshTokenManager::hash_token(token);
        let h2 = RefreshTokenManager::hash_token(token);
        assert_eq!(h1, h2);
        assert_eq!(h1.len(), 64);
        assert!(h1.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
