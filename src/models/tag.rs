//! Tag model
//!
//! Tags are slug-identified labels with a many-to-many relation to articles,
//! enabling cross-category content discovery.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tag entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tag {
    /// Unique identifier
    pub id: i64,
    /// URL-friendly slug (unique)
    pub slug: String,
    /// Tag name
    pub name: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Tag {
    /// Create a new Tag.
    ///
    /// The ID will be set to 0 and should be assigned by the database.
    pub fn new(slug: String, name: String) -> Self {
        Self {
            id: 0,
            slug,
            name,
            created_at: Utc::now(),
        }
    }
}

/// Input for creating a tag
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTagInput {
    /// URL-friendly slug (generated from the name when empty)
    #[serde(default)]
    pub slug: String,
    /// Tag name
    pub name: String,
}

/// Input for updating a tag; `None` fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTagInput {
    pub slug: Option<String>,
    pub name: Option<String>,
}
