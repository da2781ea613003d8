// ABOUTME: Health check endpoint for liveness probes
// ABOUTME: Reports service identity and database backend status
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Flock Contributors

//! Health check route

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

use crate::constants::service_names;
use crate::resources::ServerResources;

/// Health probe response
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    database: &'static str,
    timestamp: String,
}

/// Health check routes
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create the health route
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/health", get(Self::handle_health))
            .with_state(resources)
    }

    async fn handle_health(State(resources): State<Arc<ServerResources>>) -> Response {
        let response = HealthResponse {
            status: "ok",
            service: service_names::FLOCK_SERVER,
            database: resources.database.backend_info(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };
        (StatusCode::OK, Json(response)).into_response()
    }
}
