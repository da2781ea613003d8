// ABOUTME: Main library entry point for the Flock church-management backend
// ABOUTME: Exposes the auth core consumed by every protected route
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Flock Contributors

#![deny(unsafe_code)]

//! # Flock Server
//!
//! REST backend for a church-management application. The heart of the crate
//! is the authentication and authorization core that every domain route
//! (members, families, budgets, events, ...) consumes:
//!
//! - **Token codec** ([`auth`]): signs and verifies short-lived HS256 access
//!   tokens; stateless and pure.
//! - **Refresh token ledger** ([`refresh_tokens`]): persisted rotation chain
//!   with atomic single-use redemption and reuse detection.
//! - **Permission resolver** ([`permissions`]): one role table, Admin bypass,
//!   fail-closed on unknown roles.
//! - **Auth service** ([`routes`], [`middleware`]): login/refresh/logout
//!   orchestration plus the per-request bearer guard.
//!
//! ## Example
//!
//! ```rust,no_run
//! use flock_server::config::environment::ServerConfig;
//! use flock_server::errors::AppResult;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("Flock server configured with port: {}", config.http_port);
//!     Ok(())
//! }
//! ```

/// Access token codec: signing, verification, claims
pub mod auth;

/// HTTP route handlers for the authentication endpoints
pub mod auth_routes;

/// Configuration management
pub mod config;

/// Application-wide constants
pub mod constants;

/// Database abstraction with pluggable backends
pub mod database_plugins;

/// Unified error handling system
pub mod errors;

/// Health check route
pub mod health;

/// Logging configuration
pub mod logging;

/// Request middleware: bearer authentication and CORS
pub mod middleware;

/// Core data models
pub mod models;

/// Role-based permission system
pub mod permissions;

/// Refresh token ledger: issuance, rotation, revocation
pub mod refresh_tokens;

/// Shared resource container for dependency injection
pub mod resources;

/// Authentication service layer
pub mod routes;

/// HTTP server assembly
pub mod server;
