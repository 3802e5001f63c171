//! Article repository
//!
//! Database operations for articles.
//!
//! This module provides:
//! - `ArticleRepository` trait defining the interface for article data access
//! - `SqlxArticleRepository` implementing the trait for SQLite and MySQL
//!
//! Public listing queries only return `published` articles, ordered by
//! `publish_date DESC`.

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::{Article, ArticleStatus, CreateArticleInput, UpdateArticleInput};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

const ARTICLE_COLUMNS: &str = "id, slug, title, excerpt, lead_image, content, author_id, category_id, status, publish_date, view_count, created_at, updated_at";

/// Article repository trait
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// Create a new article
    async fn create(&self, input: &CreateArticleInput) -> Result<Article>;

    /// Get article by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Article>>;

    /// Get article by slug
    async fn get_by_slug(&self, slug: &str) -> Result<Option<Article>>;

    /// List published articles ordered by publish_date DESC
    async fn list_published(&self, offset: i64, limit: i64) -> Result<Vec<Article>>;

    /// Count published articles
    async fn count_published(&self) -> Result<i64>;

    /// List published articles in a category, ordered by publish_date DESC
    async fn list_published_by_category(
        &self,
        category_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Article>>;

    /// Count published articles in a category
    async fn count_published_by_category(&self, category_id: i64) -> Result<i64>;

    /// List published articles carrying a tag, ordered by publish_date DESC
    async fn list_published_by_tag(
        &self,
        tag_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Article>>;

    /// Count published articles carrying a tag
    async fn count_published_by_tag(&self, tag_id: i64) -> Result<i64>;

    /// Update an article
    async fn update(&self, id: i64, input: &UpdateArticleInput) -> Result<Article>;

    /// Delete an article
    async fn delete(&self, id: i64) -> Result<()>;

    /// Increment the view counter
    async fn increment_view_count(&self, id: i64) -> Result<()>;

    /// Check if a slug already exists
    async fn exists_by_slug(&self, slug: &str) -> Result<bool>;

    /// Check if a slug exists for a different article (for updates)
    async fn exists_by_slug_excluding(&self, slug: &str, exclude_id: i64) -> Result<bool>;
}

/// SQLx-based article repository implementation
///
/// Supports both SQLite and MySQL databases.
pub struct SqlxArticleRepository {
    pool: DynDatabasePool,
}

impl SqlxArticleRepository {
    /// Create a new SQLx article repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn ArticleRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl ArticleRepository for SqlxArticleRepository {
    async fn create(&self, input: &CreateArticleInput) -> Result<Article> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                create_article_sqlite(self.pool.as_sqlite().unwrap(), input).await
            }
            DatabaseDriver::Mysql => {
                create_article_mysql(self.pool.as_mysql().unwrap(), input).await
            }
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Article>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                get_article_by_id_sqlite(self.pool.as_sqlite().unwrap(), id).await
            }
            DatabaseDriver::Mysql => {
                get_article_by_id_mysql(self.pool.as_mysql().unwrap(), id).await
            }
        }
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<Article>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                get_article_by_slug_sqlite(self.pool.as_sqlite().unwrap(), slug).await
            }
            DatabaseDriver::Mysql => {
                get_article_by_slug_mysql(self.pool.as_mysql().unwrap(), slug).await
            }
        }
    }

    async fn list_published(&self, offset: i64, limit: i64) -> Result<Vec<Article>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                list_published_sqlite(self.pool.as_sqlite().unwrap(), offset, limit).await
            }
            DatabaseDriver::Mysql => {
                list_published_mysql(self.pool.as_mysql().unwrap(), offset, limit).await
            }
        }
    }

    async fn count_published(&self) -> Result<i64> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => count_published_sqlite(self.pool.as_sqlite().unwrap()).await,
            DatabaseDriver::Mysql => count_published_mysql(self.pool.as_mysql().unwrap()).await,
        }
    }

    async fn list_published_by_category(
        &self,
        category_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Article>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                list_published_by_category_sqlite(
                    self.pool.as_sqlite().unwrap(),
                    category_id,
                    offset,
                    limit,
                )
                .await
            }
            DatabaseDriver::Mysql => {
                list_published_by_category_mysql(
                    self.pool.as_mysql().unwrap(),
                    category_id,
                    offset,
                    limit,
                )
                .await
            }
        }
    }

    async fn count_published_by_category(&self, category_id: i64) -> Result<i64> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                count_published_by_category_sqlite(self.pool.as_sqlite().unwrap(), category_id)
                    .await
            }
            DatabaseDriver::Mysql => {
                count_published_by_category_mysql(self.pool.as_mysql().unwrap(), category_id).await
            }
        }
    }

    async fn list_published_by_tag(
        &self,
        tag_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Article>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                list_published_by_tag_sqlite(self.pool.as_sqlite().unwrap(), tag_id, offset, limit)
                    .await
            }
            DatabaseDriver::Mysql => {
                list_published_by_tag_mysql(self.pool.as_mysql().unwrap(), tag_id, offset, limit)
                    .await
            }
        }
    }

    async fn count_published_by_tag(&self, tag_id: i64) -> Result<i64> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                count_published_by_tag_sqlite(self.pool.as_sqlite().unwrap(), tag_id).await
            }
            DatabaseDriver::Mysql => {
                count_published_by_tag_mysql(self.pool.as_mysql().unwrap(), tag_id).await
            }
        }
    }

    async fn update(&self, id: i64, input: &UpdateArticleInput) -> Result<Article> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                update_article_sqlite(self.pool.as_sqlite().unwrap(), id, input).await
            }
            DatabaseDriver::Mysql => {
                update_article_mysql(self.pool.as_mysql().unwrap(), id, input).await
            }
        }
    }

    async fn delete(&self, id: i64) -> Result<()> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                delete_article_sqlite(self.pool.as_sqlite().unwrap(), id).await
            }
            DatabaseDriver::Mysql => delete_article_mysql(self.pool.as_mysql().unwrap(), id).await,
        }
    }

    async fn increment_view_count(&self, id: i64) -> Result<()> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                increment_view_count_sqlite(self.pool.as_sqlite().unwrap(), id).await
            }
            DatabaseDriver::Mysql => {
                increment_view_count_mysql(self.pool.as_mysql().unwrap(), id).await
            }
        }
    }

    async fn exists_by_slug(&self, slug: &str) -> Result<bool> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                exists_by_slug_sqlite(self.pool.as_sqlite().unwrap(), slug).await
            }
            DatabaseDriver::Mysql => {
                exists_by_slug_mysql(self.pool.as_mysql().unwrap(), slug).await
            }
        }
    }

    async fn exists_by_slug_excluding(&self, slug: &str, exclude_id: i64) -> Result<bool> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                exists_by_slug_excluding_sqlite(self.pool.as_sqlite().unwrap(), slug, exclude_id)
                    .await
            }
            DatabaseDriver::Mysql => {
                exists_by_slug_excluding_mysql(self.pool.as_mysql().unwrap(), slug, exclude_id)
                    .await
            }
        }
    }
}

/// Resolve the publish_date to store for a new article.
///
/// Published articles get an explicit value or now; other statuses keep
/// whatever the caller supplied (usually nothing).
fn initial_publish_date(input: &CreateArticleInput, status: ArticleStatus) -> Option<chrono::DateTime<Utc>> {
    if status == ArticleStatus::Published {
        Some(input.publish_date.unwrap_or_else(Utc::now))
    } else {
        input.publish_date
    }
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn create_article_sqlite(pool: &SqlitePool, input: &CreateArticleInput) -> Result<Article> {
    let now = Utc::now();
    let status = input.status.unwrap_or_default();
    let publish_date = initial_publish_date(input, status);

    let result = sqlx::query(
        r#"
        INSERT INTO articles (slug, title, excerpt, lead_image, content, author_id, category_id, status, publish_date, view_count, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 0, ?, ?)
        "#,
    )
    .bind(&input.slug)
    .bind(&input.title)
    .bind(&input.excerpt)
    .bind(&input.lead_image)
    .bind(&input.content)
    .bind(input.author_id)
    .bind(input.category_id)
    .bind(status.as_str())
    .bind(publish_date)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create article")?;

    let id = result.last_insert_rowid();

    Ok(Article {
        id,
        slug: input.slug.clone(),
        title: input.title.clone(),
        excerpt: input.excerpt.clone(),
        lead_image: input.lead_image.clone(),
        content: input.content.clone(),
        author_id: input.author_id,
        category_id: input.category_id,
        status,
        publish_date,
        view_count: 0,
        created_at: now,
        updated_at: now,
    })
}

async fn get_article_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<Article>> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM articles WHERE id = ?",
        ARTICLE_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to get article by ID")?;

    match row {
        Some(row) => Ok(Some(row_to_article_sqlite(&row)?)),
        None => Ok(None),
    }
}

async fn get_article_by_slug_sqlite(pool: &SqlitePool, slug: &str) -> Result<Option<Article>> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM articles WHERE slug = ?",
        ARTICLE_COLUMNS
    ))
    .bind(slug)
    .fetch_optional(pool)
    .await
    .context("Failed to get article by slug")?;

    match row {
        Some(row) => Ok(Some(row_to_article_sqlite(&row)?)),
        None => Ok(None),
    }
}

async fn list_published_sqlite(pool: &SqlitePool, offset: i64, limit: i64) -> Result<Vec<Article>> {
    let rows = sqlx::query(&format!(
        r#"
        SELECT {}
        FROM articles
        WHERE status = 'published'
        ORDER BY publish_date DESC
        LIMIT ? OFFSET ?
        "#,
        ARTICLE_COLUMNS
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
    .context("Failed to list published articles")?;

    rows.iter().map(row_to_article_sqlite).collect()
}

async fn count_published_sqlite(pool: &SqlitePool) -> Result<i64> {
    let row = sqlx::query("SELECT COUNT(*) as count FROM articles WHERE status = 'published'")
        .fetch_one(pool)
        .await
        .context("Failed to count published articles")?;

    Ok(row.get("count"))
}

async fn list_published_by_category_sqlite(
    pool: &SqlitePool,
    category_id: i64,
    offset: i64,
    limit: i64,
) -> Result<Vec<Article>> {
    let rows = sqlx::query(&format!(
        r#"
        SELECT {}
        FROM articles
        WHERE category_id = ? AND status = 'published'
        ORDER BY publish_date DESC
        LIMIT ? OFFSET ?
        "#,
        ARTICLE_COLUMNS
    ))
    .bind(category_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
    .context("Failed to list articles by category")?;

    rows.iter().map(row_to_article_sqlite).collect()
}

async fn count_published_by_category_sqlite(pool: &SqlitePool, category_id: i64) -> Result<i64> {
    let row = sqlx::query(
        "SELECT COUNT(*) as count FROM articles WHERE category_id = ? AND status = 'published'",
    )
    .bind(category_id)
    .fetch_one(pool)
    .await
    .context("Failed to count articles by category")?;

    Ok(row.get("count"))
}

async fn list_published_by_tag_sqlite(
    pool: &SqlitePool,
    tag_id: i64,
    offset: i64,
    limit: i64,
) -> Result<Vec<Article>> {
    let rows = sqlx::query(
        r#"
        SELECT a.id, a.slug, a.title, a.excerpt, a.lead_image, a.content, a.author_id, a.category_id, a.status, a.publish_date, a.view_count, a.created_at, a.updated_at
        FROM articles a
        INNER JOIN article_tags at ON a.id = at.article_id
        WHERE at.tag_id = ? AND a.status = 'published'
        ORDER BY a.publish_date DESC
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(tag_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
    .context("Failed to list articles by tag")?;

    rows.iter().map(row_to_article_sqlite).collect()
}

async fn count_published_by_tag_sqlite(pool: &SqlitePool, tag_id: i64) -> Result<i64> {
    let row = sqlx::query(
        r#"
        SELECT COUNT(*) as count
        FROM articles a
        INNER JOIN article_tags at ON a.id = at.article_id
        WHERE at.tag_id = ? AND a.status = 'published'
        "#,
    )
    .bind(tag_id)
    .fetch_one(pool)
    .await
    .context("Failed to count articles by tag")?;

    Ok(row.get("count"))
}

async fn update_article_sqlite(
    pool: &SqlitePool,
    id: i64,
    input: &UpdateArticleInput,
) -> Result<Article> {
    let existing = get_article_by_id_sqlite(pool, id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Article not found"))?;

    let now = Utc::now();
    let new_slug = input.slug.as_ref().unwrap_or(&existing.slug);
    let new_title = input.title.as_ref().unwrap_or(&existing.title);
    let new_excerpt = input.excerpt.clone().or(existing.excerpt.clone());
    let new_lead_image = input.lead_image.clone().or(existing.lead_image.clone());
    let new_content = input.content.as_ref().unwrap_or(&existing.content);
    let new_category_id = input.category_id.unwrap_or(existing.category_id);
    let new_status = input.status.unwrap_or(existing.status);
    let new_publish_date = next_publish_date(&existing, input, new_status, now);

    sqlx::query(
        r#"
        UPDATE articles
        SET slug = ?, title = ?, excerpt = ?, lead_image = ?, content = ?, category_id = ?, status = ?, publish_date = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(new_slug)
    .bind(new_title)
    .bind(&new_excerpt)
    .bind(&new_lead_image)
    .bind(new_content)
    .bind(new_category_id)
    .bind(new_status.as_str())
    .bind(new_publish_date)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await
    .context("Failed to update article")?;

    get_article_by_id_sqlite(pool, id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Article not found after update"))
}

async fn delete_article_sqlite(pool: &SqlitePool, id: i64) -> Result<()> {
    // article_tags entries are removed by ON DELETE CASCADE
    sqlx::query("DELETE FROM articles WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete article")?;

    Ok(())
}

async fn increment_view_count_sqlite(pool: &SqlitePool, id: i64) -> Result<()> {
    sqlx::query("UPDATE articles SET view_count = view_count + 1 WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to increment view count")?;

    Ok(())
}

async fn exists_by_slug_sqlite(pool: &SqlitePool, slug: &str) -> Result<bool> {
    let row = sqlx::query("SELECT COUNT(*) as count FROM articles WHERE slug = ?")
        .bind(slug)
        .fetch_one(pool)
        .await
        .context("Failed to check slug existence")?;

    let count: i64 = row.get("count");
    Ok(count > 0)
}

async fn exists_by_slug_excluding_sqlite(
    pool: &SqlitePool,
    slug: &str,
    exclude_id: i64,
) -> Result<bool> {
    let row = sqlx::query("SELECT COUNT(*) as count FROM articles WHERE slug = ? AND id != ?")
        .bind(slug)
        .bind(exclude_id)
        .fetch_one(pool)
        .await
        .context("Failed to check slug existence")?;

    let count: i64 = row.get("count");
    Ok(count > 0)
}

fn row_to_article_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<Article> {
    let status_str: String = row.get("status");
    let status = ArticleStatus::from_str(&status_str)
        .ok_or_else(|| anyhow::anyhow!("Invalid article status: {}", status_str))?;

    Ok(Article {
        id: row.get("id"),
        slug: row.get("slug"),
        title: row.get("title"),
        excerpt: row.get("excerpt"),
        lead_image: row.get("lead_image"),
        content: row.get("content"),
        author_id: row.get("author_id"),
        category_id: row.get("category_id"),
        status,
        publish_date: row.get("publish_date"),
        view_count: row.get("view_count"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

/// Compute the publish_date after an update.
///
/// Entering `published` stamps the supplied date or now; leaving it clears
/// the date; staying published keeps the existing date unless the caller
/// supplies a new one.
fn next_publish_date(
    existing: &Article,
    input: &UpdateArticleInput,
    new_status: ArticleStatus,
    now: chrono::DateTime<Utc>,
) -> Option<chrono::DateTime<Utc>> {
    if new_status == ArticleStatus::Published && existing.status != ArticleStatus::Published {
        Some(input.publish_date.unwrap_or(now))
    } else if new_status != ArticleStatus::Published {
        None
    } else {
        input.publish_date.or(existing.publish_date)
    }
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn create_article_mysql(pool: &MySqlPool, input: &CreateArticleInput) -> Result<Article> {
    let now = Utc::now();
    let status = input.status.unwrap_or_default();
    let publish_date = initial_publish_date(input, status);

    let result = sqlx::query(
        r#"
        INSERT INTO articles (slug, title, excerpt, lead_image, content, author_id, category_id, status, publish_date, view_count, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 0, ?, ?)
        "#,
    )
    .bind(&input.slug)
    .bind(&input.title)
    .bind(&input.excerpt)
    .bind(&input.lead_image)
    .bind(&input.content)
    .bind(input.author_id)
    .bind(input.category_id)
    .bind(status.as_str())
    .bind(publish_date)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create article")?;

    let id = result.last_insert_id() as i64;

    Ok(Article {
        id,
        slug: input.slug.clone(),
        title: input.title.clone(),
        excerpt: input.excerpt.clone(),
        lead_image: input.lead_image.clone(),
        content: input.content.clone(),
        author_id: input.author_id,
        category_id: input.category_id,
        status,
        publish_date,
        view_count: 0,
        created_at: now,
        updated_at: now,
    })
}

async fn get_article_by_id_mysql(pool: &MySqlPool, id: i64) -> Result<Option<Article>> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM articles WHERE id = ?",
        ARTICLE_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to get article by ID")?;

    match row {
        Some(row) => Ok(Some(row_to_article_mysql(&row)?)),
        None => Ok(None),
    }
}

async fn get_article_by_slug_mysql(pool: &MySqlPool, slug: &str) -> Result<Option<Article>> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM articles WHERE slug = ?",
        ARTICLE_COLUMNS
    ))
    .bind(slug)
    .fetch_optional(pool)
    .await
    .context("Failed to get article by slug")?;

    match row {
        Some(row) => Ok(Some(row_to_article_mysql(&row)?)),
        None => Ok(None),
    }
}

async fn list_published_mysql(pool: &MySqlPool, offset: i64, limit: i64) -> Result<Vec<Article>> {
    let rows = sqlx::query(&format!(
        r#"
        SELECT {}
        FROM articles
        WHERE status = 'published'
        ORDER BY publish_date DESC
        LIMIT ? OFFSET ?
        "#,
        ARTICLE_COLUMNS
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
    .context("Failed to list published articles")?;

    rows.iter().map(row_to_article_mysql).collect()
}

async fn count_published_mysql(pool: &MySqlPool) -> Result<i64> {
    let row = sqlx::query("SELECT COUNT(*) as count FROM articles WHERE status = 'published'")
        .fetch_one(pool)
        .await
        .context("Failed to count published articles")?;

    Ok(row.get("count"))
}

async fn list_published_by_category_mysql(
    pool: &MySqlPool,
    category_id: i64,
    offset: i64,
    limit: i64,
) -> Result<Vec<Article>> {
    let rows = sqlx::query(&format!(
        r#"
        SELECT {}
        FROM articles
        WHERE category_id = ? AND status = 'published'
        ORDER BY publish_date DESC
        LIMIT ? OFFSET ?
        "#,
        ARTICLE_COLUMNS
    ))
    .bind(category_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
    .context("Failed to list articles by category")?;

    rows.iter().map(row_to_article_mysql).collect()
}

async fn count_published_by_category_mysql(pool: &MySqlPool, category_id: i64) -> Result<i64> {
    let row = sqlx::query(
        "SELECT COUNT(*) as count FROM articles WHERE category_id = ? AND status = 'published'",
    )
    .bind(category_id)
    .fetch_one(pool)
    .await
    .context("Failed to count articles by category")?;

    Ok(row.get("count"))
}

async fn list_published_by_tag_mysql(
    pool: &MySqlPool,
    tag_id: i64,
    offset: i64,
    limit: i64,
) -> Result<Vec<Article>> {
    let rows = sqlx::query(
        r#"
        SELECT a.id, a.slug, a.title, a.excerpt, a.lead_image, a.content, a.author_id, a.category_id, a.status, a.publish_date, a.view_count, a.created_at, a.updated_at
        FROM articles a
        INNER JOIN article_tags at ON a.id = at.article_id
        WHERE at.tag_id = ? AND a.status = 'published'
        ORDER BY a.publish_date DESC
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(tag_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
    .context("Failed to list articles by tag")?;

    rows.iter().map(row_to_article_mysql).collect()
}

async fn count_published_by_tag_mysql(pool: &MySqlPool, tag_id: i64) -> Result<i64> {
    let row = sqlx::query(
        r#"
        SELECT COUNT(*) as count
        FROM articles a
        INNER JOIN article_tags at ON a.id = at.article_id
        WHERE at.tag_id = ? AND a.status = 'published'
        "#,
    )
    .bind(tag_id)
    .fetch_one(pool)
    .await
    .context("Failed to count articles by tag")?;

    Ok(row.get("count"))
}

async fn update_article_mysql(
    pool: &MySqlPool,
    id: i64,
    input: &UpdateArticleInput,
) -> Result<Article> {
    let existing = get_article_by_id_mysql(pool, id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Article not found"))?;

    let now = Utc::now();
    let new_slug = input.slug.as_ref().unwrap_or(&existing.slug);
    let new_title = input.title.as_ref().unwrap_or(&existing.title);
    let new_excerpt = input.excerpt.clone().or(existing.excerpt.clone());
    let new_lead_image = input.lead_image.clone().or(existing.lead_image.clone());
    let new_content = input.content.as_ref().unwrap_or(&existing.content);
    let new_category_id = input.category_id.unwrap_or(existing.category_id);
    let new_status = input.status.unwrap_or(existing.status);
    let new_publish_date = next_publish_date(&existing, input, new_status, now);

    sqlx::query(
        r#"
        UPDATE articles
        SET slug = ?, title = ?, excerpt = ?, lead_image = ?, content = ?, category_id = ?, status = ?, publish_date = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(new_slug)
    .bind(new_title)
    .bind(&new_excerpt)
    .bind(&new_lead_image)
    .bind(new_content)
    .bind(new_category_id)
    .bind(new_status.as_str())
    .bind(new_publish_date)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await
    .context("Failed to update article")?;

    get_article_by_id_mysql(pool, id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Article not found after update"))
}

async fn delete_article_mysql(pool: &MySqlPool, id: i64) -> Result<()> {
    sqlx::query("DELETE FROM articles WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete article")?;

    Ok(())
}

async fn increment_view_count_mysql(pool: &MySqlPool, id: i64) -> Result<()> {
    sqlx::query("UPDATE articles SET view_count = view_count + 1 WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to increment view count")?;

    Ok(())
}

async fn exists_by_slug_mysql(pool: &MySqlPool, slug: &str) -> Result<bool> {
    let row = sqlx::query("SELECT COUNT(*) as count FROM articles WHERE slug = ?")
        .bind(slug)
        .fetch_one(pool)
        .await
        .context("Failed to check slug existence")?;

    let count: i64 = row.get("count");
    Ok(count > 0)
}

async fn exists_by_slug_excluding_mysql(
    pool: &MySqlPool,
    slug: &str,
    exclude_id: i64,
) -> Result<bool> {
    let row = sqlx::query("SELECT COUNT(*) as count FROM articles WHERE slug = ? AND id != ?")
        .bind(slug)
        .bind(exclude_id)
        .fetch_one(pool)
        .await
        .context("Failed to check slug existence")?;

    let count: i64 = row.get("count");
    Ok(count > 0)
}

fn row_to_article_mysql(row: &sqlx::mysql::MySqlRow) -> Result<Article> {
    let status_str: String = row.get("status");
    let status = ArticleStatus::from_str(&status_str)
        .ok_or_else(|| anyhow::anyhow!("Invalid article status: {}", status_str))?;

    Ok(Article {
        id: row.get("id"),
        slug: row.get("slug"),
        title: row.get("title"),
        excerpt: row.get("excerpt"),
        lead_image: row.get("lead_image"),
        content: row.get("content"),
        author_id: row.get("author_id"),
        category_id: row.get("category_id"),
        status,
        publish_date: row.get("publish_date"),
        view_count: row.get("view_count"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}
