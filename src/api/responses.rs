//! Shared API response types
//!
//! Common response structures used across endpoints. Listings use the flat
//! `ArticleSummary`; detail responses nest category and tag info.

use serde::{Deserialize, Serialize};

use crate::models::{Article, Category, Tag, User};

// ============================================================================
// Article response types
// ============================================================================

/// Full article response with nested category and tags.
/// Used in article detail endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct ArticleResponse {
    pub id: i64,
    pub slug: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_image: Option<String>,
    pub content: String,
    pub author_id: i64,
    pub status: String,
    pub publish_date: Option<String>,
    pub view_count: i64,
    pub created_at: String,
    pub updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<TagInfo>>,
}

/// Flat article response for list views and create responses
#[derive(Debug, Serialize, Deserialize)]
pub struct ArticleSummary {
    pub id: i64,
    pub slug: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_image: Option<String>,
    pub author_id: i64,
    pub category_id: i64,
    pub status: String,
    pub publish_date: Option<String>,
    pub view_count: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// Category info embedded in article responses
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CategoryInfo {
    pub id: i64,
    pub slug: String,
    pub name: String,
}

/// Tag info embedded in article responses
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TagInfo {
    pub id: i64,
    pub slug: String,
    pub name: String,
}

/// Paginated article list response
#[derive(Debug, Serialize, Deserialize)]
pub struct PaginatedArticlesResponse {
    pub articles: Vec<ArticleSummary>,
    pub total: i64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
}

// ============================================================================
// Category / tag / user response types
// ============================================================================

/// Response for a single category
#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryResponse {
    pub id: i64,
    pub slug: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: String,
}

/// Response for a single tag
#[derive(Debug, Serialize, Deserialize)]
pub struct TagResponse {
    pub id: i64,
    pub slug: String,
    pub name: String,
    pub created_at: String,
}

/// Response for user info
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: String,
    pub created_at: String,
}

// ============================================================================
// Conversions
// ============================================================================

impl From<Article> for ArticleResponse {
    fn from(article: Article) -> Self {
        Self {
            id: article.id,
            slug: article.slug,
            title: article.title,
            excerpt: article.excerpt,
            lead_image: article.lead_image,
            content: article.content,
            author_id: article.author_id,
            status: article.status.to_string(),
            publish_date: article.publish_date.map(|dt| dt.to_rfc3339()),
            view_count: article.view_count,
            created_at: article.created_at.to_rfc3339(),
            updated_at: article.updated_at.to_rfc3339(),
            category: None,
            tags: None,
        }
    }
}

impl From<Article> for ArticleSummary {
    fn from(article: Article) -> Self {
        Self {
            id: article.id,
            slug: article.slug,
            title: article.title,
            excerpt: article.excerpt,
            lead_image: article.lead_image,
            author_id: article.author_id,
            category_id: article.category_id,
            status: article.status.to_string(),
            publish_date: article.publish_date.map(|dt| dt.to_rfc3339()),
            view_count: article.view_count,
            created_at: article.created_at.to_rfc3339(),
            updated_at: article.updated_at.to_rfc3339(),
        }
    }
}

impl ArticleResponse {
    /// Add category info to response
    pub fn with_category(mut self, category: Option<Category>) -> Self {
        self.category = category.map(|c| CategoryInfo {
            id: c.id,
            slug: c.slug,
            name: c.name,
        });
        self
    }

    /// Add tags info to response
    pub fn with_tags(mut self, tags: Vec<Tag>) -> Self {
        self.tags = Some(
            tags.into_iter()
                .map(|t| TagInfo {
                    id: t.id,
                    slug: t.slug,
                    name: t.name,
                })
                .collect(),
        );
        self
    }
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            slug: category.slug,
            name: category.name,
            description: category.description,
            created_at: category.created_at.to_rfc3339(),
        }
    }
}

impl From<Tag> for TagResponse {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id,
            slug: tag.slug,
            name: tag.name,
            created_at: tag.created_at.to_rfc3339(),
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role.to_string(),
            created_at: user.created_at.to_rfc3339(),
        }
    }
}
