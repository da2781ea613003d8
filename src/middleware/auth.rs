// ABOUTME: Request authentication middleware verifying bearer tokens and permissions
// ABOUTME: The per-request guard every protected route goes through
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Flock Contributors

//! # Authentication Middleware
//!
//! Extracts and verifies the bearer token on protected requests and composes
//! verification with permission checks. Verification is pure computation over
//! the token claims: no allocation-heavy work, no I/O, no locking, because it
//! runs on essentially every request the server handles.

use axum::http::HeaderMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::{AuthManager, Claims};
use crate::errors::{AppError, AppResult};
use crate::permissions::{Permission, PermissionResolver};

/// Authenticated request context
#[derive(Debug)]
pub struct AuthResult {
    /// Verified user id
    pub user_id: Uuid,
    /// Role name carried by the token
    pub role: String,
    /// Full verified claim set
    pub claims: Claims,
}

/// Middleware guarding protected routes
#[derive(Clone)]
pub struct AuthMiddleware {
    auth_manager: Arc<AuthManager>,
    permissions: Arc<PermissionResolver>,
}

impl AuthMiddleware {
    /// Create new auth middleware
    #[must_use]
    pub const fn new(
        auth_manager: Arc<AuthManager>,
        permissions: Arc<PermissionResolver>,
    ) -> Self {
        Self {
            auth_manager,
            permissions,
        }
    }

    /// Parse an `Authorization: Bearer <token>` header.
    ///
    /// Absent or malformed headers are `None`, not an error; whether a token
    /// is required is the caller's decision.
    #[must_use]
    pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
        headers
            .get("authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
    }

    /// Authenticate a request from its headers
    ///
    /// # Errors
    /// Returns 401-mapped errors when the token is missing, malformed,
    /// tampered with, or expired
    pub fn authenticate_headers(&self, headers: &HeaderMap) -> AppResult<AuthResult> {
        let Some(token) = Self::extract_bearer_token(headers) else {
            tracing::debug!("authentication failed: no bearer token presented");
            return Err(AppError::auth_required());
        };
        self.authenticate_token(token)
    }

    /// Authenticate a bare token string
    ///
    /// # Errors
    /// Returns 401-mapped errors when the token does not verify
    pub fn authenticate_token(&self, token: &str) -> AppResult<AuthResult> {
        let claims = self.auth_manager.validate_token_detailed(token)?;
        let user_id = claims.user_id()?;

        tracing::debug!(%user_id, role = %claims.role, "bearer token verified");
        Ok(AuthResult {
            user_id,
            role: claims.role.clone(),
            claims,
        })
    }

    /// Authenticate and require a permission.
    ///
    /// # Errors
    /// 401-mapped errors when verification fails; `PermissionDenied` (403)
    /// when the token is valid but the role lacks `permission`
    pub fn check_permission(
        &self,
        headers: &HeaderMap,
        permission: Permission,
    ) -> AppResult<AuthResult> {
        let auth = self.authenticate_headers(headers)?;

        if !self.permissions.has_permission(&auth.role, permission) {
            return Err(AppError::permission_denied(format!(
                "Role {} lacks permission {permission}",
                auth.role
            ))
            .with_user_id(auth.user_id));
        }

        Ok(auth)
    }

    /// The resolver backing permission checks
    #[must_use]
    pub fn permissions(&self) -> &PermissionResolver {
        &self.permissions
    }
}
