//! Refresh token repository
//!
//! Server-side storage for refresh tokens. Deleting a row invalidates the
//! token, which is how logout works.

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::RefreshToken;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

/// Refresh token repository trait
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    /// Store a new refresh token
    async fn create(&self, token: &RefreshToken) -> Result<RefreshToken>;

    /// Get a refresh token by its value
    async fn get_by_id(&self, id: &str) -> Result<Option<RefreshToken>>;

    /// Delete a refresh token (invalidates it)
    async fn delete(&self, id: &str) -> Result<()>;

    /// Delete all expired refresh tokens; returns the number deleted
    async fn delete_expired(&self) -> Result<i64>;
}

/// SQLx-based refresh token repository implementation
pub struct SqlxRefreshTokenRepository {
    pool: DynDatabasePool,
}

impl SqlxRefreshTokenRepository {
    /// Create a new SQLx refresh token repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn RefreshTokenRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl RefreshTokenRepository for SqlxRefreshTokenRepository {
    async fn create(&self, token: &RefreshToken) -> Result<RefreshToken> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                create_token_sqlite(self.pool.as_sqlite().unwrap(), token).await
            }
            DatabaseDriver::Mysql => {
                create_token_mysql(self.pool.as_mysql().unwrap(), token).await
            }
        }
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<RefreshToken>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                get_token_by_id_sqlite(self.pool.as_sqlite().unwrap(), id).await
            }
            DatabaseDriver::Mysql => {
                get_token_by_id_mysql(self.pool.as_mysql().unwrap(), id).await
            }
        }
    }

    async fn delete(&self, id: &str) -> Result<()> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => delete_token_sqlite(self.pool.as_sqlite().unwrap(), id).await,
            DatabaseDriver::Mysql => delete_token_mysql(self.pool.as_mysql().unwrap(), id).await,
        }
    }

    async fn delete_expired(&self) -> Result<i64> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => delete_expired_sqlite(self.pool.as_sqlite().unwrap()).await,
            DatabaseDriver::Mysql => delete_expired_mysql(self.pool.as_mysql().unwrap()).await,
        }
    }
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn create_token_sqlite(pool: &SqlitePool, token: &RefreshToken) -> Result<RefreshToken> {
    sqlx::query(
        r#"
        INSERT INTO refresh_tokens (id, user_id, expires_at, created_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(&token.id)
    .bind(token.user_id)
    .bind(token.expires_at)
    .bind(token.created_at)
    .execute(pool)
    .await
    .context("Failed to create refresh token")?;

    Ok(token.clone())
}

async fn get_token_by_id_sqlite(pool: &SqlitePool, id: &str) -> Result<Option<RefreshToken>> {
    let row = sqlx::query(
        "SELECT id, user_id, expires_at, created_at FROM refresh_tokens WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to get refresh token")?;

    match row {
        Some(row) => Ok(Some(row_to_token_sqlite(&row))),
        None => Ok(None),
    }
}

async fn delete_token_sqlite(pool: &SqlitePool, id: &str) -> Result<()> {
    sqlx::query("DELETE FROM refresh_tokens WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete refresh token")?;

    Ok(())
}

async fn delete_expired_sqlite(pool: &SqlitePool) -> Result<i64> {
    let result = sqlx::query("DELETE FROM refresh_tokens WHERE expires_at < ?")
        .bind(Utc::now())
        .execute(pool)
        .await
        .context("Failed to delete expired refresh tokens")?;

    Ok(result.rows_affected() as i64)
}

fn row_to_token_sqlite(row: &sqlx::sqlite::SqliteRow) -> RefreshToken {
    RefreshToken {
        id: row.get("id"),
        user_id: row.get("user_id"),
        expires_at: row.get("expires_at"),
        created_at: row.get("created_at"),
    }
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn create_token_mysql(pool: &MySqlPool, token: &RefreshToken) -> Result<RefreshToken> {
    sqlx::query(
        r#"
        INSERT INTO refresh_tokens (id, user_id, expires_at, created_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(&token.id)
    .bind(token.user_id)
    .bind(token.expires_at)
    .bind(token.created_at)
    .execute(pool)
    .await
    .context("Failed to create refresh token")?;

    Ok(token.clone())
}

async fn get_token_by_id_mysql(pool: &MySqlPool, id: &str) -> Result<Option<RefreshToken>> {
    let row = sqlx::query(
        "SELECT id, user_id, expires_at, created_at FROM refresh_tokens WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to get refresh token")?;

    match row {
        Some(row) => Ok(Some(row_to_token_mysql(&row))),
        None => Ok(None),
    }
}

async fn delete_token_mysql(pool: &MySqlPool, id: &str) -> Result<()> {
    sqlx::query("DELETE FROM refresh_tokens WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete refresh token")?;

    Ok(())
}

async fn delete_expired_mysql(pool: &MySqlPool) -> Result<i64> {
    let result = sqlx::query("DELETE FROM refresh_tokens WHERE expires_at < ?")
        .bind(Utc::now())
        .execute(pool)
        .await
        .context("Failed to delete expired refresh tokens")?;

    Ok(result.rows_affected() as i64)
}

fn row_to_token_mysql(row: &sqlx::mysql::MySqlRow) -> RefreshToken {
    RefreshToken {
        id: row.get("id"),
        user_id: row.get("user_id"),
        expires_at: row.get("expires_at"),
        created_at: row.get("created_at"),
    }
}
