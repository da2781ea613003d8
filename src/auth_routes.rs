// ABOUTME: HTTP route handlers for the authentication endpoints
// ABOUTME: Thin axum wrappers delegating to the AuthRoutes service layer
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Flock Contributors

//! Authentication HTTP surface.
//!
//! `POST /api/auth/login`, `POST /api/auth/refresh`, `POST /api/auth/logout`
//! and the protected `GET /api/auth/me` introspection endpoint. All handlers
//! are thin wrappers that delegate business logic to [`AuthRoutes`].

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

use crate::errors::AppError;
use crate::resources::ServerResources;
use crate::routes::{AuthRoutes as AuthService, LoginRequest, LogoutRequest, RefreshRequest};

/// Claims echo returned by `GET /api/auth/me`
#[derive(Debug, Serialize)]
struct MeResponse {
    user_id: String,
    role: String,
    permissions: Vec<String>,
    expires_at: i64,
}

/// Authentication API routes
pub struct AuthApiRoutes;

impl AuthApiRoutes {
    /// Create all authentication routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/auth/login", post(Self::handle_login))
            .route("/api/auth/refresh", post(Self::handle_refresh))
            .route("/api/auth/logout", post(Self::handle_logout))
            .route("/api/auth/me", get(Self::handle_me))
            .with_state(resources)
    }

    async fn handle_login(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<LoginRequest>,
    ) -> Result<Response, AppError> {
        let service = AuthService::new(resources);
        let response = service.login(request).await?;

        Ok((StatusCode::OK, Json(response)).into_response())
    }

    async fn handle_refresh(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<RefreshRequest>,
    ) -> Result<Response, AppError> {
        let service = AuthService::new(resources);
        let response = service.refresh(request).await?;

        Ok((StatusCode::OK, Json(response)).into_response())
    }

    async fn handle_logout(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<LogoutRequest>,
    ) -> Result<Response, AppError> {
        let service = AuthService::new(resources);
        let response = service.logout(request).await;

        Ok((StatusCode::OK, Json(response)).into_response())
    }

    async fn handle_me(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = resources.auth_middleware.authenticate_headers(&headers)?;

        let service = AuthService::new(Arc::clone(&resources));
        let response = MeResponse {
            user_id: auth.user_id.to_string(),
            permissions: service.permission_keys(&auth.role),
            role: auth.role,
            expires_at: auth.claims.exp,
        };

        Ok((StatusCode::OK, Json(response)).into_response())
    }
}
