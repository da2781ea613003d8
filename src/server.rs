// ABOUTME: HTTP server assembly combining all route groups and middleware layers
// ABOUTME: Builds the axum router and runs it on the configured port
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Flock Contributors

//! HTTP server assembly

use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::auth_routes::AuthApiRoutes;
use crate::errors::{AppError, AppResult};
use crate::health::HealthRoutes;
use crate::middleware::cors::cors_layer;
use crate::resources::ServerResources;

/// Build the full application router
#[must_use]
pub fn build_router(resources: &Arc<ServerResources>) -> Router {
    Router::new()
        .merge(AuthApiRoutes::routes(Arc::clone(resources)))
        .merge(HealthRoutes::routes(Arc::clone(resources)))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
}

/// Bind the configured port and serve until shutdown
///
/// # Errors
/// Returns an error if the port cannot be bound or the server fails
pub async fn run(resources: Arc<ServerResources>) -> AppResult<()> {
    let addr = format!("0.0.0.0:{}", resources.config.http_port);
    let router = build_router(&resources);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    info!("listening on {addr}");

    axum::serve(listener, router)
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))
}
