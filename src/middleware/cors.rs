// ABOUTME: CORS layer configuration for browser clients
// ABOUTME: Permissive in development, origin-restricted when FLOCK_CORS_ORIGIN is set
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Flock Contributors

//! CORS layer shared by all routers

use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};

/// Build the CORS layer from the environment.
///
/// With `FLOCK_CORS_ORIGIN` set, only that origin is allowed; otherwise the
/// layer is permissive for development.
#[must_use]
pub fn cors_layer() -> CorsLayer {
    let methods = [Method::GET, Method::POST, Method::PUT, Method::DELETE];

    match std::env::var("FLOCK_CORS_ORIGIN")
        .ok()
        .and_then(|origin| origin.parse::<HeaderValue>().ok())
    {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(methods)
            .allow_headers(Any),
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any),
    }
}
