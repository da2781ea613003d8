// ABOUTME: End-to-end auth service tests: login, refresh, logout, permission checks
// ABOUTME: Exercises the orchestration layer over a real SQLite ledger
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Flock Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use anyhow::Result;
use axum::http::HeaderMap;
use flock_server::database_plugins::DatabaseProvider;
use flock_server::errors::ErrorCode;
use flock_server::models::User;
use flock_server::permissions::{Permission, Role};
use flock_server::routes::{AuthRoutes, LoginRequest, LogoutRequest, RefreshRequest};
use std::sync::Arc;

mod common;

fn bearer_headers(token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("authorization", format!("Bearer {token}").parse().unwrap());
    headers
}

fn login_request(email: &str, password: &str) -> LoginRequest {
    LoginRequest {
        email: email.into(),
        password: password.into(),
    }
}

#[tokio::test]
async fn test_login_rejects_bad_credentials_uniformly() -> Result<()> {
    let ctx = common::create_test_resources().await?;
    common::create_test_user(ctx.database(), "known@flock.church", Role::Member, "right").await?;

    let service = AuthRoutes::new(Arc::clone(&ctx.resources));

    let wrong_password = service
        .login(login_request("known@flock.church", "wrong"))
        .await
        .unwrap_err();
    let unknown_user = service
        .login(login_request("nobody@flock.church", "whatever"))
        .await
        .unwrap_err();

    // Same code and message whether the user exists or not
    assert_eq!(wrong_password.code, ErrorCode::AuthInvalid);
    assert_eq!(unknown_user.code, ErrorCode::AuthInvalid);
    assert_eq!(wrong_password.message, unknown_user.message);

    Ok(())
}

#[tokio::test]
async fn test_login_rejects_disabled_accounts() -> Result<()> {
    let ctx = common::create_test_resources().await?;

    let password_hash = bcrypt::hash("pw", common::TEST_BCRYPT_COST)?;
    let mut user = User::new(
        "gone@flock.church".into(),
        password_hash,
        None,
        Role::Member,
    );
    user.is_active = false;
    ctx.database().create_user(&user).await?;

    let service = AuthRoutes::new(Arc::clone(&ctx.resources));
    let err = service
        .login(login_request("gone@flock.church", "pw"))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::AuthInvalid);

    Ok(())
}

#[tokio::test]
async fn test_login_rejects_empty_fields() -> Result<()> {
    let ctx = common::create_test_resources().await?;
    let service = AuthRoutes::new(Arc::clone(&ctx.resources));

    let err = service.login(login_request("", "")).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);

    Ok(())
}

#[tokio::test]
async fn test_pastor_end_to_end_flow() -> Result<()> {
    let ctx = common::create_test_resources().await?;
    common::create_test_user(
        ctx.database(),
        "pastor1@flock.church",
        Role::Pastor,
        "correct",
    )
    .await?;

    let service = AuthRoutes::new(Arc::clone(&ctx.resources));

    // Login returns both tokens and the resolved summary
    let login = service
        .login(login_request("pastor1@flock.church", "correct"))
        .await?;
    assert_eq!(login.user.role, "Pastor");
    assert!(login
        .user
        .permissions
        .contains(&"view_financial_reports".to_owned()));

    // The access token decodes to the Pastor role
    let claims = ctx
        .resources
        .auth_manager
        .validate_token_detailed(&login.access_token)
        .unwrap();
    assert_eq!(claims.role, "Pastor");

    // Rotate the refresh token
    let refreshed = service
        .refresh(RefreshRequest {
            refresh_token: login.refresh_token.clone(),
        })
        .await?;
    assert_ne!(refreshed.refresh_token, login.refresh_token);

    // The old refresh token is now dead
    let err = service
        .refresh(RefreshRequest {
            refresh_token: login.refresh_token,
        })
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::AuthInvalid);

    // Permission checks against the new access token
    let middleware = &ctx.resources.auth_middleware;
    let headers = bearer_headers(&refreshed.access_token);

    let auth = middleware
        .check_permission(&headers, Permission::ViewFinancialReports)
        .unwrap();
    assert_eq!(auth.role, "Pastor");

    let denied = middleware
        .check_permission(&headers, Permission::ManageRoles)
        .unwrap_err();
    assert_eq!(denied.code, ErrorCode::PermissionDenied);
    assert_eq!(denied.http_status(), 403);

    Ok(())
}

#[tokio::test]
async fn test_logout_kills_refresh_but_not_access_tokens() -> Result<()> {
    let ctx = common::create_test_resources().await?;
    common::create_test_user(ctx.database(), "out@flock.church", Role::Member, "pw").await?;

    let service = AuthRoutes::new(Arc::clone(&ctx.resources));
    let login = service.login(login_request("out@flock.church", "pw")).await?;

    let goodbye = service
        .logout(LogoutRequest {
            refresh_token: login.refresh_token.clone(),
        })
        .await;
    assert!(!goodbye.message.is_empty());

    // Refresh is dead
    let err = service
        .refresh(RefreshRequest {
            refresh_token: login.refresh_token.clone(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::AuthInvalid);

    // Logout is idempotent
    service
        .logout(LogoutRequest {
            refresh_token: login.refresh_token,
        })
        .await;

    // The issued access token still verifies until its own expiry
    let claims = ctx
        .resources
        .auth_manager
        .validate_token_detailed(&login.access_token);
    assert!(claims.is_ok());

    Ok(())
}

#[tokio::test]
async fn test_refresh_is_refused_for_disabled_accounts() -> Result<()> {
    let ctx = common::create_test_resources().await?;

    // Account was suspended after its session began
    let password_hash = bcrypt::hash("pw", common::TEST_BCRYPT_COST)?;
    let mut user = User::new(
        "suspended@flock.church".into(),
        password_hash,
        None,
        Role::Member,
    );
    user.is_active = false;
    ctx.database().create_user(&user).await?;

    let refresh_token = ctx.resources.refresh_tokens.issue(user.id).await?;

    let service = AuthRoutes::new(Arc::clone(&ctx.resources));
    let err = service
        .refresh(RefreshRequest { refresh_token })
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::AuthInvalid);

    Ok(())
}

#[tokio::test]
async fn test_login_records_last_login() -> Result<()> {
    let ctx = common::create_test_resources().await?;
    let user = common::create_test_user(ctx.database(), "seen@flock.church", Role::Member, "pw")
        .await?;
    assert!(user.last_login.is_none());

    let service = AuthRoutes::new(Arc::clone(&ctx.resources));
    service.login(login_request("seen@flock.church", "pw")).await?;

    // Bookkeeping runs off the response path; give it a moment
    tokio::time::sleep(std::time::Duration::from_millis(250)).await;

    let reloaded = ctx.database().get_user(user.id).await?.unwrap();
    assert!(reloaded.last_login.is_some());

    Ok(())
}
