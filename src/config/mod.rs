// ABOUTME: Configuration module root
// ABOUTME: Environment-driven server configuration lives in environment.rs
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Flock Contributors

//! Server configuration

pub mod environment;
