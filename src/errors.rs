// ABOUTME: Unified error handling system with error codes and HTTP response mapping
// ABOUTME: Defines the application-wide error taxonomy shared by all route handlers
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Flock Contributors

//! # Unified Error Handling System
//!
//! Centralized error handling for the Flock server. Every failure a route can
//! surface is expressed as an [`AppError`] carrying an [`ErrorCode`], which in
//! turn decides the HTTP status and the JSON error body. Component-level
//! errors ([`crate::auth::TokenError`], [`crate::refresh_tokens::RefreshTokenError`])
//! are converted at the route boundary so callers always see one shape.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Standard error codes used throughout the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Authentication & Authorization (1000-1999)
    /// No credentials were presented on a protected endpoint
    #[serde(rename = "AUTH_REQUIRED")]
    AuthRequired = 1000,
    /// Credentials or token were presented but are not valid
    #[serde(rename = "AUTH_INVALID")]
    AuthInvalid = 1001,
    /// The presented token has expired
    #[serde(rename = "AUTH_EXPIRED")]
    AuthExpired = 1002,
    /// The presented token is structurally malformed
    #[serde(rename = "AUTH_MALFORMED")]
    AuthMalformed = 1003,
    /// Token verified but the role lacks the required permission
    #[serde(rename = "PERMISSION_DENIED")]
    PermissionDenied = 1004,

    // Validation (3000-3999)
    /// The request body or parameters are invalid
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput = 3000,
    /// A required field is missing
    #[serde(rename = "MISSING_REQUIRED_FIELD")]
    MissingRequiredField = 3001,

    // Resource Management (4000-4999)
    /// The requested resource does not exist
    #[serde(rename = "RESOURCE_NOT_FOUND")]
    ResourceNotFound = 4000,

    // Configuration (6000-6999)
    /// Server-side configuration problem
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError = 6000,

    // Internal Errors (9000-9999)
    /// Unexpected internal failure
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError = 9000,
    /// Database operation failed
    #[serde(rename = "DATABASE_ERROR")]
    DatabaseError = 9001,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            // 400 Bad Request
            Self::InvalidInput | Self::MissingRequiredField => 400,

            // 401 Unauthorized: missing, invalid, malformed or expired
            // credentials all read as "re-authenticate"
            Self::AuthRequired | Self::AuthInvalid | Self::AuthExpired | Self::AuthMalformed => 401,

            // 403 Forbidden: the token is fine, the role is not
            Self::PermissionDenied => 403,

            // 404 Not Found
            Self::ResourceNotFound => 404,

            // 500 Internal Server Error
            Self::InternalError | Self::DatabaseError | Self::ConfigError => 500,
        }
    }

    /// Get a user-facing description of this error
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::AuthRequired => "Authentication is required to access this resource",
            Self::AuthInvalid => "The provided authentication credentials are invalid",
            Self::AuthExpired => "The authentication token has expired",
            Self::AuthMalformed => "The authentication token is malformed or corrupted",
            Self::PermissionDenied => "You do not have permission to perform this action",
            Self::InvalidInput => "The provided input is invalid",
            Self::MissingRequiredField => "A required field is missing from the request",
            Self::ResourceNotFound => "The requested resource was not found",
            Self::ConfigError => "Configuration error encountered",
            Self::InternalError => "An internal server error occurred",
            Self::DatabaseError => "Database operation failed",
        }
    }
}

/// Unified error type for the application
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Acting user, when known, for audit logging
    pub user_id: Option<Uuid>,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            user_id: None,
            source: None,
        }
    }

    /// Attach the acting user id for audit trails
    #[must_use]
    pub const fn with_user_id(mut self, user_id: Uuid) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        self.code.http_status()
    }

    /// Authentication required
    #[must_use]
    pub fn auth_required() -> Self {
        Self::new(ErrorCode::AuthRequired, "Authentication required")
    }

    /// Invalid authentication
    pub fn auth_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AuthInvalid, message)
    }

    /// Authentication expired
    #[must_use]
    pub fn auth_expired() -> Self {
        Self::new(ErrorCode::AuthExpired, "Authentication token has expired")
    }

    /// Malformed authentication token
    pub fn auth_malformed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AuthMalformed, message)
    }

    /// Permission denied for an otherwise valid token
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PermissionDenied, message)
    }

    /// Invalid input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Resource not found
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            format!("{} not found", resource.into()),
        )
    }

    /// Internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Database error
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// HTTP error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error payload
    pub error: ErrorResponseDetails,
}

/// Body of an HTTP error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponseDetails {
    /// Stable machine-readable code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
}

impl From<&AppError> for ErrorResponse {
    fn from(error: &AppError) -> Self {
        Self {
            error: ErrorResponseDetails {
                code: error.code,
                message: error.message.clone(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Audit trail: error kind and acting user only, never token contents
        match self.user_id {
            Some(user_id) => {
                tracing::warn!(code = ?self.code, %user_id, "request failed: {}", self.message);
            }
            None => {
                tracing::warn!(code = ?self.code, "request failed: {}", self.message);
            }
        }
        let status = StatusCode::from_u16(self.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(ErrorResponse::from(&self))).into_response()
    }
}

/// Conversion from `anyhow::Error` (database/infrastructure boundary)
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::new(ErrorCode::InternalError, error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_http_status() {
        assert_eq!(ErrorCode::AuthRequired.http_status(), 401);
        assert_eq!(ErrorCode::AuthExpired.http_status(), 401);
        assert_eq!(ErrorCode::PermissionDenied.http_status(), 403);
        assert_eq!(ErrorCode::InvalidInput.http_status(), 400);
        assert_eq!(ErrorCode::ResourceNotFound.http_status(), 404);
        assert_eq!(ErrorCode::InternalError.http_status(), 500);
    }

    #[test]
    fn test_app_error_creation() {
        let user_id = Uuid::new_v4();
        let error = AppError::auth_required().with_user_id(user_id);

        assert_eq!(error.code, ErrorCode::AuthRequired);
        assert_eq!(error.user_id, Some(user_id));
    }

    #[test]
    fn test_error_response_serialization() {
        let error = AppError::permission_denied("missing manage_roles");
        let response = ErrorResponse::from(&error);

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("PERMISSION_DENIED"));
        assert!(json.contains("manage_roles"));
    }
}
