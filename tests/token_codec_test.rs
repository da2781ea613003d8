// ABOUTME: Tests the access token codec: round trips, tampering, and expiry
// ABOUTME: Validates that decode failures carry the exact failure kind
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Flock Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use flock_server::auth::{generate_jwt_secret, AuthManager, TokenError};
use flock_server::models::User;
use flock_server::permissions::Role;

fn test_user(role: Role) -> User {
    User::new(
        "codec@flock.church".into(),
        "unused-hash".into(),
        Some("Codec Tester".into()),
        role,
    )
}

#[test]
fn test_round_trip_preserves_claims() {
    let secret = generate_jwt_secret().unwrap();
    let manager = AuthManager::new(&secret, 30);
    let user = test_user(Role::Pastor);

    let token = manager.generate_token(&user).unwrap();
    let claims = manager.validate_token_detailed(&token).unwrap();

    assert_eq!(claims.sub, user.id.to_string());
    assert_eq!(claims.role, "Pastor");
    assert_eq!(claims.user_id().unwrap(), user.id);
    assert!(claims.exp > claims.iat);
    // 30 minute lifetime
    assert_eq!(claims.exp - claims.iat, 30 * 60);
}

#[test]
fn test_tampered_signature_is_rejected() {
    let secret = generate_jwt_secret().unwrap();
    let manager = AuthManager::new(&secret, 30);
    let token = manager.generate_token(&test_user(Role::Member)).unwrap();

    // Flip one character in the middle of the signature segment
    let (payload, signature) = token.rsplit_once('.').unwrap();
    let mut sig_chars: Vec<char> = signature.chars().collect();
    let mid = sig_chars.len() / 2;
    sig_chars[mid] = if sig_chars[mid] == 'A' { 'B' } else { 'A' };
    let tampered: String = sig_chars.into_iter().collect();
    let tampered_token = format!("{payload}.{tampered}");
    assert_ne!(token, tampered_token);

    let err = manager.validate_token_detailed(&tampered_token).unwrap_err();
    assert!(
        matches!(err, TokenError::InvalidSignature { .. }),
        "expected InvalidSignature, got {err:?}"
    );
}

#[test]
fn test_tampered_payload_is_rejected() {
    let secret = generate_jwt_secret().unwrap();
    let manager = AuthManager::new(&secret, 30);
    let token = manager.generate_token(&test_user(Role::Member)).unwrap();

    // Swap in a payload signed by nobody
    let mut segments: Vec<&str> = token.split('.').collect();
    assert_eq!(segments.len(), 3);
    let forged_payload = "eyJyb2xlIjoiQWRtaW4ifQ";
    segments[1] = forged_payload;
    let forged = segments.join(".");

    assert!(manager.validate_token_detailed(&forged).is_err());
}

#[test]
fn test_wrong_secret_is_rejected() {
    let manager_a = AuthManager::new(&generate_jwt_secret().unwrap(), 30);
    let manager_b = AuthManager::new(&generate_jwt_secret().unwrap(), 30);

    let token = manager_a.generate_token(&test_user(Role::Admin)).unwrap();
    let err = manager_b.validate_token_detailed(&token).unwrap_err();

    assert!(matches!(err, TokenError::InvalidSignature { .. }));
}

#[test]
fn test_expired_token_is_rejected_as_expired() {
    let secret = generate_jwt_secret().unwrap();
    // Negative lifetime: the token is already expired when issued
    let expired_issuer = AuthManager::new(&secret, -5);
    let verifier = AuthManager::new(&secret, 30);

    let token = expired_issuer
        .generate_token(&test_user(Role::Treasurer))
        .unwrap();
    let err = verifier.validate_token_detailed(&token).unwrap_err();

    assert!(
        matches!(err, TokenError::Expired { .. }),
        "expected Expired, got {err:?}"
    );
}

#[test]
fn test_garbage_tokens_are_malformed() {
    let manager = AuthManager::new(&generate_jwt_secret().unwrap(), 30);

    for garbage in ["", "not-a-jwt", "a.b", "a.b.c", "....."] {
        let err = manager.validate_token_detailed(garbage).unwrap_err();
        assert!(
            matches!(err, TokenError::Malformed { .. }),
            "expected Malformed for {garbage:?}, got {err:?}"
        );
    }
}
