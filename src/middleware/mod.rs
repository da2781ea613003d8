// ABOUTME: HTTP middleware module root
// ABOUTME: Exposes request authentication and CORS layers
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Flock Contributors

//! Request middleware

/// Bearer token authentication and permission guard
pub mod auth;
/// CORS layer shared by all routers
pub mod cors;

pub use auth::{AuthMiddleware, AuthResult};
