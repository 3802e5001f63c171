//! Category model
//!
//! Categories are flat, slug-identified groupings. Each article belongs to
//! exactly one category.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    /// Unique identifier
    pub id: i64,
    /// URL-friendly slug (unique)
    pub slug: String,
    /// Display name
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Category {
    /// Create a new Category.
    ///
    /// The ID will be set to 0 and should be assigned by the database.
    pub fn new(slug: String, name: String, description: Option<String>) -> Self {
        Self {
            id: 0,
            slug,
            name,
            description,
            created_at: Utc::now(),
        }
    }
}

/// Input for creating a category
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCategoryInput {
    /// URL-friendly slug (generated from the name when empty)
    #[serde(default)]
    pub slug: String,
    /// Display name
    pub name: String,
    /// Optional description
    pub description: Option<String>,
}

/// Input for updating a category; `None` fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCategoryInput {
    pub slug: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
}
