//! Category repository
//!
//! Database operations for categories.

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::Category;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

/// Category repository trait
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Create a new category
    async fn create(&self, category: &Category) -> Result<Category>;

    /// Get category by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Category>>;

    /// Get category by slug
    async fn get_by_slug(&self, slug: &str) -> Result<Option<Category>>;

    /// List all categories ordered by name
    async fn list(&self) -> Result<Vec<Category>>;

    /// Update a category
    async fn update(&self, category: &Category) -> Result<Category>;

    /// Delete a category
    async fn delete(&self, id: i64) -> Result<()>;
}

/// SQLx-based category repository implementation
pub struct SqlxCategoryRepository {
    pool: DynDatabasePool,
}

impl SqlxCategoryRepository {
    /// Create a new SQLx category repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn CategoryRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl CategoryRepository for SqlxCategoryRepository {
    async fn create(&self, category: &Category) -> Result<Category> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                create_category_sqlite(self.pool.as_sqlite().unwrap(), category).await
            }
            DatabaseDriver::Mysql => {
                create_category_mysql(self.pool.as_mysql().unwrap(), category).await
            }
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Category>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                get_category_by_id_sqlite(self.pool.as_sqlite().unwrap(), id).await
            }
            DatabaseDriver::Mysql => {
                get_category_by_id_mysql(self.pool.as_mysql().unwrap(), id).await
            }
        }
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<Category>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                get_category_by_slug_sqlite(self.pool.as_sqlite().unwrap(), slug).await
            }
            DatabaseDriver::Mysql => {
                get_category_by_slug_mysql(self.pool.as_mysql().unwrap(), slug).await
            }
        }
    }

    async fn list(&self) -> Result<Vec<Category>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => list_categories_sqlite(self.pool.as_sqlite().unwrap()).await,
            DatabaseDriver::Mysql => list_categories_mysql(self.pool.as_mysql().unwrap()).await,
        }
    }

    async fn update(&self, category: &Category) -> Result<Category> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                update_category_sqlite(self.pool.as_sqlite().unwrap(), category).await
            }
            DatabaseDriver::Mysql => {
                update_category_mysql(self.pool.as_mysql().unwrap(), category).await
            }
        }
    }

    async fn delete(&self, id: i64) -> Result<()> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                delete_category_sqlite(self.pool.as_sqlite().unwrap(), id).await
            }
            DatabaseDriver::Mysql => delete_category_mysql(self.pool.as_mysql().unwrap(), id).await,
        }
    }
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn create_category_sqlite(pool: &SqlitePool, category: &Category) -> Result<Category> {
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO categories (slug, name, description, created_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(&category.slug)
    .bind(&category.name)
    .bind(&category.description)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create category")?;

    let id = result.last_insert_rowid();

    Ok(Category {
        id,
        slug: category.slug.clone(),
        name: category.name.clone(),
        description: category.description.clone(),
        created_at: now,
    })
}

async fn get_category_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<Category>> {
    let row = sqlx::query("SELECT id, slug, name, description, created_at FROM categories WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get category by ID")?;

    match row {
        Some(row) => Ok(Some(row_to_category_sqlite(&row)?)),
        None => Ok(None),
    }
}

async fn get_category_by_slug_sqlite(pool: &SqlitePool, slug: &str) -> Result<Option<Category>> {
    let row = sqlx::query("SELECT id, slug, name, description, created_at FROM categories WHERE slug = ?")
        .bind(slug)
        .fetch_optional(pool)
        .await
        .context("Failed to get category by slug")?;

    match row {
        Some(row) => Ok(Some(row_to_category_sqlite(&row)?)),
        None => Ok(None),
    }
}

async fn list_categories_sqlite(pool: &SqlitePool) -> Result<Vec<Category>> {
    let rows = sqlx::query("SELECT id, slug, name, description, created_at FROM categories ORDER BY name")
        .fetch_all(pool)
        .await
        .context("Failed to list categories")?;

    rows.iter().map(row_to_category_sqlite).collect()
}

async fn update_category_sqlite(pool: &SqlitePool, category: &Category) -> Result<Category> {
    sqlx::query(
        r#"
        UPDATE categories
        SET slug = ?, name = ?, description = ?
        WHERE id = ?
        "#,
    )
    .bind(&category.slug)
    .bind(&category.name)
    .bind(&category.description)
    .bind(category.id)
    .execute(pool)
    .await
    .context("Failed to update category")?;

    get_category_by_id_sqlite(pool, category.id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Category not found after update"))
}

async fn delete_category_sqlite(pool: &SqlitePool, id: i64) -> Result<()> {
    sqlx::query("DELETE FROM categories WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete category")?;

    Ok(())
}

fn row_to_category_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<Category> {
    Ok(Category {
        id: row.get("id"),
        slug: row.get("slug"),
        name: row.get("name"),
        description: row.get("description"),
        created_at: row.get("created_at"),
    })
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn create_category_mysql(pool: &MySqlPool, category: &Category) -> Result<Category> {
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO categories (slug, name, description, created_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(&category.slug)
    .bind(&category.name)
    .bind(&category.description)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create category")?;

    let id = result.last_insert_id() as i64;

    Ok(Category {
        id,
        slug: category.slug.clone(),
        name: category.name.clone(),
        description: category.description.clone(),
        created_at: now,
    })
}

async fn get_category_by_id_mysql(pool: &MySqlPool, id: i64) -> Result<Option<Category>> {
    let row = sqlx::query("SELECT id, slug, name, description, created_at FROM categories WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get category by ID")?;

    match row {
        Some(row) => Ok(Some(row_to_category_mysql(&row)?)),
        None => Ok(None),
    }
}

async fn get_category_by_slug_mysql(pool: &MySqlPool, slug: &str) -> Result<Option<Category>> {
    let row = sqlx::query("SELECT id, slug, name, description, created_at FROM categories WHERE slug = ?")
        .bind(slug)
        .fetch_optional(pool)
        .await
        .context("Failed to get category by slug")?;

    match row {
        Some(row) => Ok(Some(row_to_category_mysql(&row)?)),
        None => Ok(None),
    }
}

async fn list_categories_mysql(pool: &MySqlPool) -> Result<Vec<Category>> {
    let rows = sqlx::query("SELECT id, slug, name, description, created_at FROM categories ORDER BY name")
        .fetch_all(pool)
        .await
        .context("Failed to list categories")?;

    rows.iter().map(row_to_category_mysql).collect()
}

async fn update_category_mysql(pool: &MySqlPool, category: &Category) -> Result<Category> {
    sqlx::query(
        r#"
        UPDATE categories
        SET slug = ?, name = ?, description = ?
        WHERE id = ?
        "#,
    )
    .bind(&category.slug)
    .bind(&category.name)
    .bind(&category.description)
    .bind(category.id)
    .execute(pool)
    .await
    .context("Failed to update category")?;

    get_category_by_id_mysql(pool, category.id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Category not found after update"))
}

async fn delete_category_mysql(pool: &MySqlPool, id: i64) -> Result<()> {
    sqlx::query("DELETE FROM categories WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete category")?;

    Ok(())
}

fn row_to_category_mysql(row: &sqlx::mysql::MySqlRow) -> Result<Category> {
    Ok(Category {
        id: row.get("id"),
        slug: row.get("slug"),
        name: row.get("name"),
        description: row.get("description"),
        created_at: row.get("created_at"),
    })
}
