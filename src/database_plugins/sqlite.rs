// ABOUTME: SQLite implementation of the DatabaseProvider trait using sqlx
// ABOUTME: Owns the schema for users and the append-only refresh token ledger
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Flock Contributors

//! SQLite database implementation

use super::DatabaseProvider;
use crate::models::{RefreshTokenRecord, User};
use crate::permissions::Role;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use uuid::Uuid;

/// SQLite database implementation
#[derive(Clone)]
pub struct SqliteDatabase {
    pool: SqlitePool,
}

impl SqliteDatabase {
    fn row_to_user(row: &SqliteRow) -> Result<User> {
        let id_str: String = row.try_get("id")?;
        let id = Uuid::parse_str(&id_str)?;

        let email: String = row.try_get("email")?;
        let display_name: Option<String> = row.try_get("display_name")?;
        let password_hash: String = row.try_get("password_hash")?;

        let role_str: String = row.try_get("role")?;
        let role: Role = role_str
            .parse()
            .map_err(|e: String| anyhow!("Corrupt role column: {e}"))?;

        let is_active: bool = row.try_get("is_active")?;

        let created_at_str: String = row.try_get("created_at")?;
        let created_at = DateTime::parse_from_rfc3339(&created_at_str)?.with_timezone(&Utc);

        let last_login_str: Option<String> = row.try_get("last_login")?;
        let last_login = match last_login_str {
            Some(s) => Some(DateTime::parse_from_rfc3339(&s)?.with_timezone(&Utc)),
            None => None,
        };

        Ok(User {
            id,
            email,
            display_name,
            password_hash,
            role,
            is_active,
            created_at,
            last_login,
        })
    }

    fn row_to_refresh_token(row: &SqliteRow) -> Result<RefreshTokenRecord> {
        let id_str: String = row.try_get("id")?;
        let user_id_str: String = row.try_get("user_id")?;
        let token_hash: String = row.try_get("token_hash")?;

        let issued_at_str: String = row.try_get("issued_at")?;
        let issued_at = DateTime::parse_from_rfc3339(&issued_at_str)?.with_timezone(&Utc);

        let expires_at_str: String = row.try_get("expires_at")?;
        let expires_at = DateTime::parse_from_rfc3339(&expires_at_str)?.with_timezone(&Utc);

        let revoked: bool = row.try_get("revoked")?;

        let replaces_str: Option<String> = row.try_get("replaces")?;
        let replaces = match replaces_str {
            Some(s) => Some(Uuid::parse_str(&s)?),
            None => None,
        };

        Ok(RefreshTokenRecord {
            id: Uuid::parse_str(&id_str)?,
            user_id: Uuid::parse_str(&user_id_str)?,
            token_hash,
            issued_at,
            expires_at,
            revoked,
            replaces,
        })
    }
}

#[async_trait]
impl DatabaseProvider for SqliteDatabase {
    async fn new(database_url: &str) -> Result<Self> {
        // In-memory databases are per-connection; a single pooled connection
        // keeps every handle on the same database.
        let pool = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .connect(database_url)
                .await?
        } else {
            let connection_options = format!("{database_url}?mode=rwc");
            SqlitePoolOptions::new().connect(&connection_options).await?
        };

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                email TEXT UNIQUE NOT NULL,
                display_name TEXT,
                password_hash TEXT NOT NULL,
                role TEXT NOT NULL DEFAULT 'Member',
                is_active BOOLEAN NOT NULL DEFAULT 1,
                created_at TEXT NOT NULL,
                last_login TEXT
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_users_email ON users(email)")
            .execute(&self.pool)
            .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS refresh_tokens (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                token_hash TEXT UNIQUE NOT NULL,
                issued_at TEXT NOT NULL,
                expires_at TEXT NOT NULL,
                revoked BOOLEAN NOT NULL DEFAULT 0,
                replaces TEXT,
                FOREIGN KEY (user_id) REFERENCES users (id) ON DELETE CASCADE
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_refresh_tokens_user_id ON refresh_tokens(user_id)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn create_user(&self, user: &User) -> Result<Uuid> {
        sqlx::query(
            r"
            INSERT INTO users (id, email, display_name, password_hash, role, is_active, created_at, last_login)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ",
        )
        .bind(user.id.to_string())
        .bind(&user.email)
        .bind(&user.display_name)
        .bind(&user.password_hash)
        .bind(user.role.to_string())
        .bind(user.is_active)
        .bind(user.created_at.to_rfc3339())
        .bind(user.last_login.map(|t| t.to_rfc3339()))
        .execute(&self.pool)
        .await
        .context("Failed to insert user")?;

        Ok(user.id)
    }

    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE id = ?1")
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(Self::row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE email = ?1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(Self::row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    async fn update_last_login(&self, user_id: Uuid) -> Result<()> {
        sqlx::query("UPDATE users SET last_login = ?1 WHERE id = ?2")
            .bind(Utc::now().to_rfc3339())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn get_user_count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get("count")?)
    }

    async fn create_refresh_token(&self, record: &RefreshTokenRecord) -> Result<()> {
        sqlx::query(
            r"
            INSERT INTO refresh_tokens (id, user_id, token_hash, issued_at, expires_at, revoked, replaces)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ",
        )
        .bind(record.id.to_string())
        .bind(record.user_id.to_string())
        .bind(&record.token_hash)
        .bind(record.issued_at.to_rfc3339())
        .bind(record.expires_at.to_rfc3339())
        .bind(record.revoked)
        .bind(record.replaces.map(|id| id.to_string()))
        .execute(&self.pool)
        .await
        .context("Failed to insert refresh token")?;

        Ok(())
    }

    async fn get_refresh_token(&self, token_hash: &str) -> Result<Option<RefreshTokenRecord>> {
        let row = sqlx::query("SELECT * FROM refresh_tokens WHERE token_hash = ?1")
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(Self::row_to_refresh_token(&row)?)),
            None => Ok(None),
        }
    }

    async fn claim_refresh_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<RefreshTokenRecord>> {
        // Single conditional mutation: the WHERE clause makes revocation and
        // the active-state check one indivisible step, so concurrent callers
        // cannot both claim the row (no read-then-write window).
        let row = sqlx::query(
            r"
            UPDATE refresh_tokens SET revoked = 1
            WHERE token_hash = ?1 AND revoked = 0 AND expires_at > ?2
            RETURNING id, user_id, token_hash, issued_at, expires_at, revoked, replaces
            ",
        )
        .bind(token_hash)
        .bind(now.to_rfc3339())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(Self::row_to_refresh_token(&row)?)),
            None => Ok(None),
        }
    }

    async fn revoke_user_refresh_tokens(&self, user_id: Uuid) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE refresh_tokens SET revoked = 1 WHERE user_id = ?1 AND revoked = 0",
        )
        .bind(user_id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
