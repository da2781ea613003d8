// ABOUTME: Authentication business logic for login, refresh, and logout
// ABOUTME: Orchestrates the credential store, token codec, and refresh ledger
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Flock Contributors

//! Authentication service layer.
//!
//! Handlers in `auth_routes` are thin wrappers around [`AuthRoutes`], which
//! owns the login/refresh/logout orchestration over the credential store,
//! the token codec, and the refresh token ledger.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::constants::error_messages;
use crate::database_plugins::DatabaseProvider;
use crate::errors::{AppError, AppResult};
use crate::models::User;
use crate::resources::ServerResources;

/// User login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Login identifier
    pub email: String,
    /// Plaintext passkey, verified against the stored bcrypt hash
    pub password: String,
}

/// Minimal user summary returned on login
#[derive(Debug, Serialize)]
pub struct UserInfo {
    /// User id
    pub user_id: String,
    /// Email address
    pub email: String,
    /// Display name
    pub display_name: Option<String>,
    /// Role name
    pub role: String,
    /// Resolved permission keys for the role
    pub permissions: Vec<String>,
}

/// User login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Short-lived signed access token
    pub access_token: String,
    /// Opaque rotating refresh token
    pub refresh_token: String,
    /// Access token expiry (RFC 3339)
    pub expires_at: String,
    /// Authenticated user summary
    pub user: UserInfo,
}

/// Token refresh request
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    /// The refresh token being redeemed
    pub refresh_token: String,
}

/// Token refresh response
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    /// Fresh access token
    pub access_token: String,
    /// Replacement refresh token; the redeemed one is now dead
    pub refresh_token: String,
    /// Access token expiry (RFC 3339)
    pub expires_at: String,
}

/// Logout request
#[derive(Debug, Deserialize)]
pub struct LogoutRequest {
    /// The refresh token to revoke
    pub refresh_token: String,
}

/// Logout response
#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    /// Human-readable confirmation
    pub message: String,
}

/// Authentication service
#[derive(Clone)]
pub struct AuthRoutes {
    resources: Arc<ServerResources>,
}

impl AuthRoutes {
    /// Create the service over shared resources
    #[must_use]
    pub const fn new(resources: Arc<ServerResources>) -> Self {
        Self { resources }
    }

    /// Handle user login
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The request is missing an email or password
    /// - The credentials do not match (identical error for unknown user and
    ///   wrong password)
    /// - The account is disabled
    /// - Token generation or ledger writes fail
    pub async fn login(&self, request: LoginRequest) -> AppResult<LoginResponse> {
        if request.email.is_empty() || request.password.is_empty() {
            return Err(AppError::invalid_input("email and password are required"));
        }

        info!("login attempt for {}", request.email);

        let user = self
            .resources
            .database
            .get_user_by_email(&request.email)
            .await
            .map_err(|e| AppError::database(e.to_string()))?
            .ok_or_else(|| AppError::auth_invalid(error_messages::INVALID_CREDENTIALS))?;

        let password_ok = bcrypt::verify(&request.password, &user.password_hash)
            .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))?;
        if !password_ok {
            return Err(
                AppError::auth_invalid(error_messages::INVALID_CREDENTIALS).with_user_id(user.id)
            );
        }

        if !user.is_active {
            warn!(user_id = %user.id, "login refused for disabled account");
            return Err(
                AppError::auth_invalid(error_messages::ACCOUNT_DISABLED).with_user_id(user.id)
            );
        }

        let access_token = self.resources.auth_manager.generate_token(&user)?;
        let refresh_token = self
            .resources
            .refresh_tokens
            .issue(user.id)
            .await
            .map_err(|e| AppError::database(e.to_string()).with_user_id(user.id))?;

        self.record_last_login(user.id);

        info!(user_id = %user.id, role = %user.role, "login succeeded");

        Ok(LoginResponse {
            access_token,
            refresh_token,
            expires_at: self.access_token_expiry(),
            user: self.user_info(&user),
        })
    }

    /// Handle refresh token rotation
    ///
    /// # Errors
    ///
    /// Returns an error if the refresh token is expired, unknown, or already
    /// used, or if the owning account no longer exists or is disabled; the
    /// caller must force re-login in every case
    pub async fn refresh(&self, request: RefreshRequest) -> AppResult<RefreshResponse> {
        let (new_refresh_token, user_id) = self
            .resources
            .refresh_tokens
            .redeem_and_rotate(&request.refresh_token)
            .await?;

        let user = self
            .resources
            .database
            .get_user(user_id)
            .await
            .map_err(|e| AppError::database(e.to_string()))?
            .ok_or_else(|| {
                AppError::auth_invalid("Account no longer exists").with_user_id(user_id)
            })?;

        if !user.is_active {
            return Err(
                AppError::auth_invalid(error_messages::ACCOUNT_DISABLED).with_user_id(user.id)
            );
        }

        let access_token = self.resources.auth_manager.generate_token(&user)?;

        info!(user_id = %user.id, "refresh token rotated");

        Ok(RefreshResponse {
            access_token,
            refresh_token: new_refresh_token,
            expires_at: self.access_token_expiry(),
        })
    }

    /// Handle logout.
    ///
    /// Best-effort revocation: always succeeds from the caller's perspective
    /// and is idempotent; outstanding access tokens expire on their own.
    pub async fn logout(&self, request: LogoutRequest) -> LogoutResponse {
        self.resources
            .refresh_tokens
            .logout(&request.refresh_token)
            .await;

        LogoutResponse {
            message: "Logged out successfully".into(),
        }
    }

    /// Sorted permission keys for a user's role
    #[must_use]
    pub fn permission_keys(&self, role: &str) -> Vec<String> {
        let mut keys: Vec<String> = self
            .resources
            .permissions
            .permissions_for(role)
            .iter()
            .map(ToString::to_string)
            .collect();
        keys.sort_unstable();
        keys
    }

    fn user_info(&self, user: &User) -> UserInfo {
        let role = user.role.to_string();
        UserInfo {
            user_id: user.id.to_string(),
            email: user.email.clone(),
            display_name: user.display_name.clone(),
            permissions: self.permission_keys(&role),
            role,
        }
    }

    fn access_token_expiry(&self) -> String {
        (Utc::now() + self.resources.auth_manager.access_token_expiry()).to_rfc3339()
    }

    /// Best-effort last-login bookkeeping, off the response path
    fn record_last_login(&self, user_id: uuid::Uuid) {
        let database = Arc::clone(&self.resources.database);
        tokio::spawn(async move {
            if let Err(e) = database.update_last_login(user_id).await {
                warn!(%user_id, "failed to record last login: {e}");
            }
        });
    }
}
