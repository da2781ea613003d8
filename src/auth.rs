// ABOUTME: Access token codec for signing and verifying short-lived JWTs
// ABOUTME: Handles claim construction, HS256 signatures, and expiry validation
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Flock Contributors

//! # Access Token Codec
//!
//! Turns a claim set into a tamper-evident token string and back. Tokens are
//! HS256 JWTs signed with a server-held secret that is constructed once at
//! startup and injected here; validity is determined purely by signature and
//! expiry, with no storage lookup. The signature is verified before expiry,
//! so `Expired` is only ever reported for authentically signed tokens.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::service_names;
use crate::errors::{AppError, AppResult};
use crate::models::User;

/// Token validation error with the exact failure kind
#[derive(Debug, Clone, thiserror::Error)]
pub enum TokenError {
    /// Token is not structurally a valid JWT
    #[error("access token is malformed: {details}")]
    Malformed {
        /// What failed to parse
        details: String,
    },
    /// Signature did not verify against the server secret
    #[error("access token signature is invalid: {reason}")]
    InvalidSignature {
        /// Why verification failed
        reason: String,
    },
    /// Token is authentic but past its expiry
    #[error("access token expired at {expired_at}")]
    Expired {
        /// When the token expired
        expired_at: DateTime<Utc>,
    },
}

/// Claims carried by an access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Issuer
    pub iss: String,
    /// Subject: user id
    pub sub: String,
    /// Role name at issuance
    pub role: String,
    /// Issued-at timestamp (seconds)
    pub iat: i64,
    /// Expiry timestamp (seconds)
    pub exp: i64,
}

impl Claims {
    /// Parse the subject as a user id
    ///
    /// # Errors
    /// Returns an error if the subject is not a valid UUID
    pub fn user_id(&self) -> AppResult<Uuid> {
        Uuid::parse_str(&self.sub)
            .map_err(|_| AppError::auth_invalid("Invalid user id in token subject"))
    }
}

/// Stateless access token codec.
///
/// Cheap to share behind an `Arc`; every operation is pure computation over
/// the injected secret.
pub struct AuthManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_expiry_minutes: i64,
}

impl AuthManager {
    /// Create a codec over an injected signing secret
    #[must_use]
    pub fn new(secret: &[u8], access_token_expiry_minutes: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            access_token_expiry_minutes,
        }
    }

    /// Access token lifetime
    #[must_use]
    pub fn access_token_expiry(&self) -> Duration {
        Duration::minutes(self.access_token_expiry_minutes)
    }

    /// Sign an access token for a user
    ///
    /// # Errors
    /// Returns an error if JWT encoding fails
    pub fn generate_token(&self, user: &User) -> AppResult<String> {
        let now = Utc::now();
        let expiry = now + self.access_token_expiry();

        let claims = Claims {
            iss: service_names::TOKEN_ISSUER.into(),
            sub: user.id.to_string(),
            role: user.role.to_string(),
            iat: now.timestamp(),
            exp: expiry.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to sign access token: {e}")))
    }

    /// Validate a token and return its claims, with the exact failure kind
    ///
    /// # Errors
    /// Returns a [`TokenError`] if the token is malformed, the signature does
    /// not verify, or the token has expired
    pub fn validate_token_detailed(&self, token: &str) -> Result<Claims, TokenError> {
        let claims = self.decode_token_claims(token)?;
        Self::validate_claims_expiry(&claims)?;
        Ok(claims)
    }

    /// Decode and signature-check a token without expiry validation
    fn decode_token_claims(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| Self::convert_jwt_error(&e))
    }

    /// Check claim expiry against wall-clock time
    fn validate_claims_expiry(claims: &Claims) -> Result<(), TokenError> {
        let now = Utc::now();
        if now.timestamp() > claims.exp {
            let expired_at = DateTime::from_timestamp(claims.exp, 0).unwrap_or_else(Utc::now);
            tracing::warn!(user = %claims.sub, %expired_at, "expired access token presented");
            return Err(TokenError::Expired { expired_at });
        }
        Ok(())
    }

    /// Map JWT library errors onto the codec's failure kinds
    fn convert_jwt_error(e: &jsonwebtoken::errors::Error) -> TokenError {
        use jsonwebtoken::errors::ErrorKind;

        match e.kind() {
            ErrorKind::InvalidSignature => TokenError::InvalidSignature {
                reason: "Token signature verification failed".into(),
            },
            ErrorKind::InvalidToken => TokenError::Malformed {
                details: "Token format is invalid".into(),
            },
            ErrorKind::Base64(base64_err) => TokenError::Malformed {
                details: format!("Token contains invalid base64: {base64_err}"),
            },
            ErrorKind::Json(json_err) => TokenError::Malformed {
                details: format!("Token contains invalid JSON: {json_err}"),
            },
            ErrorKind::Utf8(utf8_err) => TokenError::Malformed {
                details: format!("Token contains invalid UTF-8: {utf8_err}"),
            },
            _ => TokenError::InvalidSignature {
                reason: format!("Token validation failed: {e}"),
            },
        }
    }
}

impl From<TokenError> for AppError {
    fn from(e: TokenError) -> Self {
        match &e {
            TokenError::Malformed { .. } => Self::auth_malformed(e.to_string()),
            TokenError::InvalidSignature { .. } => Self::auth_invalid(e.to_string()),
            TokenError::Expired { .. } => Self::auth_expired(),
        }
    }
}

/// Generate a random signing secret
///
/// # Errors
/// Returns an error if the system RNG fails; the server cannot operate
/// securely without working RNG
pub fn generate_jwt_secret() -> AppResult<[u8; crate::constants::limits::JWT_SECRET_BYTES]> {
    use ring::rand::{SecureRandom, SystemRandom};

    let rng = SystemRandom::new();
    let mut secret = [0u8; crate::constants::limits::JWT_SECRET_BYTES];

    rng.fill(&mut secret).map_err(|e| {
        tracing::error!("CRITICAL: failed to generate signing secret: {e}");
        AppError::config("System RNG failure - cannot generate signing secret")
    })?;

    Ok(secret)
}
