//! Tag repository
//!
//! Database operations for tags and the article_tags junction.

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::Tag;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

/// Tag repository trait
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// Create a new tag
    async fn create(&self, tag: &Tag) -> Result<Tag>;

    /// Get tag by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Tag>>;

    /// Get tag by slug
    async fn get_by_slug(&self, slug: &str) -> Result<Option<Tag>>;

    /// List all tags ordered by name
    async fn list(&self) -> Result<Vec<Tag>>;

    /// Update a tag
    async fn update(&self, tag: &Tag) -> Result<Tag>;

    /// Delete a tag
    async fn delete(&self, id: i64) -> Result<()>;

    /// Associate tag with article
    async fn add_to_article(&self, tag_id: i64, article_id: i64) -> Result<()>;

    /// Remove every tag association from an article
    async fn clear_article_tags(&self, article_id: i64) -> Result<()>;

    /// Get tags for an article
    async fn get_by_article_id(&self, article_id: i64) -> Result<Vec<Tag>>;
}

/// SQLx-based tag repository implementation
///
/// Supports both SQLite and MySQL databases.
pub struct SqlxTagRepository {
    pool: DynDatabasePool,
}

impl SqlxTagRepository {
    /// Create a new SQLx tag repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn TagRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl TagRepository for SqlxTagRepository {
    async fn create(&self, tag: &Tag) -> Result<Tag> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => create_tag_sqlite(self.pool.as_sqlite().unwrap(), tag).await,
            DatabaseDriver::Mysql => create_tag_mysql(self.pool.as_mysql().unwrap(), tag).await,
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Tag>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                get_tag_by_id_sqlite(self.pool.as_sqlite().unwrap(), id).await
            }
            DatabaseDriver::Mysql => get_tag_by_id_mysql(self.pool.as_mysql().unwrap(), id).await,
        }
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<Tag>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                get_tag_by_slug_sqlite(self.pool.as_sqlite().unwrap(), slug).await
            }
            DatabaseDriver::Mysql => {
                get_tag_by_slug_mysql(self.pool.as_mysql().unwrap(), slug).await
            }
        }
    }

    async fn list(&self) -> Result<Vec<Tag>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => list_tags_sqlite(self.pool.as_sqlite().unwrap()).await,
            DatabaseDriver::Mysql => list_tags_mysql(self.pool.as_mysql().unwrap()).await,
        }
    }

    async fn update(&self, tag: &Tag) -> Result<Tag> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => update_tag_sqlite(self.pool.as_sqlite().unwrap(), tag).await,
            DatabaseDriver::Mysql => update_tag_mysql(self.pool.as_mysql().unwrap(), tag).await,
        }
    }

    async fn delete(&self, id: i64) -> Result<()> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => delete_tag_sqlite(self.pool.as_sqlite().unwrap(), id).await,
            DatabaseDriver::Mysql => delete_tag_mysql(self.pool.as_mysql().unwrap(), id).await,
        }
    }

    async fn add_to_article(&self, tag_id: i64, article_id: i64) -> Result<()> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                add_tag_to_article_sqlite(self.pool.as_sqlite().unwrap(), tag_id, article_id).await
            }
            DatabaseDriver::Mysql => {
                add_tag_to_article_mysql(self.pool.as_mysql().unwrap(), tag_id, article_id).await
            }
        }
    }

    async fn clear_article_tags(&self, article_id: i64) -> Result<()> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                clear_article_tags_sqlite(self.pool.as_sqlite().unwrap(), article_id).await
            }
            DatabaseDriver::Mysql => {
                clear_article_tags_mysql(self.pool.as_mysql().unwrap(), article_id).await
            }
        }
    }

    async fn get_by_article_id(&self, article_id: i64) -> Result<Vec<Tag>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                get_tags_by_article_sqlite(self.pool.as_sqlite().unwrap(), article_id).await
            }
            DatabaseDriver::Mysql => {
                get_tags_by_article_mysql(self.pool.as_mysql().unwrap(), article_id).await
            }
        }
    }
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn create_tag_sqlite(pool: &SqlitePool, tag: &Tag) -> Result<Tag> {
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO tags (slug, name, created_at)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(&tag.slug)
    .bind(&tag.name)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create tag")?;

    let id = result.last_insert_rowid();

    Ok(Tag {
        id,
        slug: tag.slug.clone(),
        name: tag.name.clone(),
        created_at: now,
    })
}

async fn get_tag_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<Tag>> {
    let row = sqlx::query("SELECT id, slug, name, created_at FROM tags WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get tag by ID")?;

    match row {
        Some(row) => Ok(Some(row_to_tag_sqlite(&row)?)),
        None => Ok(None),
    }
}

async fn get_tag_by_slug_sqlite(pool: &SqlitePool, slug: &str) -> Result<Option<Tag>> {
    let row = sqlx::query("SELECT id, slug, name, created_at FROM tags WHERE slug = ?")
        .bind(slug)
        .fetch_optional(pool)
        .await
        .context("Failed to get tag by slug")?;

    match row {
        Some(row) => Ok(Some(row_to_tag_sqlite(&row)?)),
        None => Ok(None),
    }
}

async fn list_tags_sqlite(pool: &SqlitePool) -> Result<Vec<Tag>> {
    let rows = sqlx::query("SELECT id, slug, name, created_at FROM tags ORDER BY name")
        .fetch_all(pool)
        .await
        .context("Failed to list tags")?;

    rows.iter().map(row_to_tag_sqlite).collect()
}

async fn update_tag_sqlite(pool: &SqlitePool, tag: &Tag) -> Result<Tag> {
    sqlx::query("UPDATE tags SET slug = ?, name = ? WHERE id = ?")
        .bind(&tag.slug)
        .bind(&tag.name)
        .bind(tag.id)
        .execute(pool)
        .await
        .context("Failed to update tag")?;

    get_tag_by_id_sqlite(pool, tag.id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Tag not found after update"))
}

async fn delete_tag_sqlite(pool: &SqlitePool, id: i64) -> Result<()> {
    // article_tags entries are removed by ON DELETE CASCADE
    sqlx::query("DELETE FROM tags WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete tag")?;

    Ok(())
}

async fn add_tag_to_article_sqlite(pool: &SqlitePool, tag_id: i64, article_id: i64) -> Result<()> {
    sqlx::query(
        r#"
        INSERT OR IGNORE INTO article_tags (article_id, tag_id)
        VALUES (?, ?)
        "#,
    )
    .bind(article_id)
    .bind(tag_id)
    .execute(pool)
    .await
    .context("Failed to add tag to article")?;

    Ok(())
}

async fn clear_article_tags_sqlite(pool: &SqlitePool, article_id: i64) -> Result<()> {
    sqlx::query("DELETE FROM article_tags WHERE article_id = ?")
        .bind(article_id)
        .execute(pool)
        .await
        .context("Failed to clear article tags")?;

    Ok(())
}

async fn get_tags_by_article_sqlite(pool: &SqlitePool, article_id: i64) -> Result<Vec<Tag>> {
    let rows = sqlx::query(
        r#"
        SELECT t.id, t.slug, t.name, t.created_at
        FROM tags t
        INNER JOIN article_tags at ON t.id = at.tag_id
        WHERE at.article_id = ?
        ORDER BY t.name
        "#,
    )
    .bind(article_id)
    .fetch_all(pool)
    .await
    .context("Failed to get tags for article")?;

    rows.iter().map(row_to_tag_sqlite).collect()
}

fn row_to_tag_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<Tag> {
    Ok(Tag {
        id: row.get("id"),
        slug: row.get("slug"),
        name: row.get("name"),
        created_at: row.get("created_at"),
    })
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn create_tag_mysql(pool: &MySqlPool, tag: &Tag) -> Result<Tag> {
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO tags (slug, name, created_at)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(&tag.slug)
    .bind(&tag.name)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create tag")?;

    let id = result.last_insert_id() as i64;

    Ok(Tag {
        id,
        slug: tag.slug.clone(),
        name: tag.name.clone(),
        created_at: now,
    })
}

async fn get_tag_by_id_mysql(pool: &MySqlPool, id: i64) -> Result<Option<Tag>> {
    let row = sqlx::query("SELECT id, slug, name, created_at FROM tags WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get tag by ID")?;

    match row {
        Some(row) => Ok(Some(row_to_tag_mysql(&row)?)),
        None => Ok(None),
    }
}

async fn get_tag_by_slug_mysql(pool: &MySqlPool, slug: &str) -> Result<Option<Tag>> {
    let row = sqlx::query("SELECT id, slug, name, created_at FROM tags WHERE slug = ?")
        .bind(slug)
        .fetch_optional(pool)
        .await
        .context("Failed to get tag by slug")?;

    match row {
        Some(row) => Ok(Some(row_to_tag_mysql(&row)?)),
        None => Ok(None),
    }
}

async fn list_tags_mysql(pool: &MySqlPool) -> Result<Vec<Tag>> {
    let rows = sqlx::query("SELECT id, slug, name, created_at FROM tags ORDER BY name")
        .fetch_all(pool)
        .await
        .context("Failed to list tags")?;

    rows.iter().map(row_to_tag_mysql).collect()
}

async fn update_tag_mysql(pool: &MySqlPool, tag: &Tag) -> Result<Tag> {
    sqlx::query("UPDATE tags SET slug = ?, name = ? WHERE id = ?")
        .bind(&tag.slug)
        .bind(&tag.name)
        .bind(tag.id)
        .execute(pool)
        .await
        .context("Failed to update tag")?;

    get_tag_by_id_mysql(pool, tag.id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Tag not found after update"))
}

async fn delete_tag_mysql(pool: &MySqlPool, id: i64) -> Result<()> {
    sqlx::query("DELETE FROM tags WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete tag")?;

    Ok(())
}

async fn add_tag_to_article_mysql(pool: &MySqlPool, tag_id: i64, article_id: i64) -> Result<()> {
    sqlx::query(
        r#"
        INSERT IGNORE INTO article_tags (article_id, tag_id)
        VALUES (?, ?)
        "#,
    )
    .bind(article_id)
    .bind(tag_id)
    .execute(pool)
    .await
    .context("Failed to add tag to article")?;

    Ok(())
}

async fn clear_article_tags_mysql(pool: &MySqlPool, article_id: i64) -> Result<()> {
    sqlx::query("DELETE FROM article_tags WHERE article_id = ?")
        .bind(article_id)
        .execute(pool)
        .await
        .context("Failed to clear article tags")?;

    Ok(())
}

async fn get_tags_by_article_mysql(pool: &MySqlPool, article_id: i64) -> Result<Vec<Tag>> {
    let rows = sqlx::query(
        r#"
        SELECT t.id, t.slug, t.name, t.created_at
        FROM tags t
        INNER JOIN article_tags at ON t.id = at.tag_id
        WHERE at.article_id = ?
        ORDER BY t.name
        "#,
    )
    .bind(article_id)
    .fetch_all(pool)
    .await
    .context("Failed to get tags for article")?;

    rows.iter().map(row_to_tag_mysql).collect()
}

fn row_to_tag_mysql(row: &sqlx::mysql::MySqlRow) -> Result<Tag> {
    Ok(Tag {
        id: row.get("id"),
        slug: row.get("slug"),
        name: row.get("name"),
        created_at: row.get("created_at"),
    })
}
