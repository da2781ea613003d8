// ABOUTME: Centralized constants for token lifetimes, limits, and canonical messages
// ABOUTME: Single place to adjust defaults shared by config, auth, and tests
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Flock Contributors

//! Application-wide constants

/// Token lifetime and sizing defaults
pub mod limits {
    /// Default access token lifetime in minutes (short-lived by design)
    pub const ACCESS_TOKEN_EXPIRY_MINUTES: i64 = 30;

    /// Default refresh token lifetime in days
    pub const REFRESH_TOKEN_EXPIRY_DAYS: i64 = 30;

    /// Random alphanumeric characters in an opaque refresh token.
    /// 32 chars of [A-Za-z0-9] carry ~190 bits of entropy.
    pub const REFRESH_TOKEN_RANDOM_CHARS: usize = 32;

    /// Length in bytes of a generated signing secret
    pub const JWT_SECRET_BYTES: usize = 64;
}

/// Canonical user-facing error messages
pub mod error_messages {
    /// Login failure; deliberately identical for unknown user and bad password
    pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

    /// Refresh token rejected as unknown, revoked, or replayed
    pub const INVALID_OR_REUSED_REFRESH_TOKEN: &str =
        "Refresh token is invalid or has already been used";

    /// Account exists but may not log in
    pub const ACCOUNT_DISABLED: &str = "Account is disabled";
}

/// Token and service identity strings
pub mod service_names {
    /// Service name used in logs and the health endpoint
    pub const FLOCK_SERVER: &str = "flock-server";

    /// Issuer claim embedded in access tokens
    pub const TOKEN_ISSUER: &str = "flock-server";
}

/// Key and token prefixes
pub mod key_prefixes {
    /// Prefix for opaque refresh tokens
    pub const REFRESH_TOKEN: &str = "frt_";
}
