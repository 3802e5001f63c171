//! Article model
//!
//! This module provides:
//! - `Article` entity representing a blog article
//! - `ArticleStatus` enum for publication states
//! - Input types for creating and updating articles
//! - Pagination types for list queries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Article entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    /// Unique identifier
    pub id: i64,
    /// URL-friendly slug (unique)
    pub slug: String,
    /// Article title
    pub title: String,
    /// Short summary shown in listings
    pub excerpt: Option<String>,
    /// URL of the lead image
    pub lead_image: Option<String>,
    /// Article body
    pub content: String,
    /// Author user ID
    pub author_id: i64,
    /// Category ID
    pub category_id: i64,
    /// Publication status
    pub status: ArticleStatus,
    /// Publication timestamp (set when the article is published)
    pub publish_date: Option<DateTime<Utc>>,
    /// View count
    #[serde(default)]
    pub view_count: i64,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Article publication status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
    /// Draft - not visible in public listings
    #[default]
    Draft,
    /// Published - visible to public
    Published,
    /// Archived - hidden from listings but not deleted
    Archived,
}

impl ArticleStatus {
    /// Convert status to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ArticleStatus::Draft => "draft",
            ArticleStatus::Published => "published",
            ArticleStatus::Archived => "archived",
        }
    }

    /// Parse status from database string representation
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(ArticleStatus::Draft),
            "published" => Some(ArticleStatus::Published),
            "archived" => Some(ArticleStatus::Archived),
            _ => None,
        }
    }
}

impl std::fmt::Display for ArticleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Input for creating a new article
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateArticleInput {
    /// URL-friendly slug (generated from the title when empty)
    pub slug: String,
    /// Article title
    pub title: String,
    /// Short summary
    pub excerpt: Option<String>,
    /// Lead image URL
    pub lead_image: Option<String>,
    /// Article body
    pub content: String,
    /// Author user ID
    pub author_id: i64,
    /// Category ID
    pub category_id: i64,
    /// Publication status (defaults to Draft)
    pub status: Option<ArticleStatus>,
    /// Explicit publication timestamp (defaults to now when publishing)
    pub publish_date: Option<DateTime<Utc>>,
}

/// Input for updating an existing article
///
/// `None` fields are left unchanged. `view_count`, `created_at`, and
/// `updated_at` are deliberately absent: they cannot be set through updates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateArticleInput {
    pub slug: Option<String>,
    pub title: Option<String>,
    pub excerpt: Option<String>,
    pub lead_image: Option<String>,
    pub content: Option<String>,
    pub category_id: Option<i64>,
    pub status: Option<ArticleStatus>,
    pub publish_date: Option<DateTime<Utc>>,
}

impl UpdateArticleInput {
    /// Check if any field is set
    pub fn has_changes(&self) -> bool {
        self.slug.is_some()
            || self.title.is_some()
            || self.excerpt.is_some()
            || self.lead_image.is_some()
            || self.content.is_some()
            || self.category_id.is_some()
            || self.status.is_some()
            || self.publish_date.is_some()
    }
}

/// Pagination parameters for list queries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListParams {
    /// Page number (1-indexed)
    pub page: u32,
    /// Number of items per page
    pub per_page: u32,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 10,
        }
    }
}

impl ListParams {
    /// Create new pagination parameters
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, 100),
        }
    }

    /// Calculate the offset for database queries
    pub fn offset(&self) -> i64 {
        ((self.page.saturating_sub(1)) * self.per_page) as i64
    }

    /// Get the limit for database queries
    pub fn limit(&self) -> i64 {
        self.per_page as i64
    }
}

/// Paginated result container
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagedResult<T> {
    /// Items in the current page
    pub items: Vec<T>,
    /// Total number of items across all pages
    pub total: i64,
    /// Current page number (1-indexed)
    pub page: u32,
    /// Number of items per page
    pub per_page: u32,
}

impl<T> PagedResult<T> {
    /// Create a new paginated result
    pub fn new(items: Vec<T>, total: i64, params: &ListParams) -> Self {
        Self {
            items,
            total,
            page: params.page,
            per_page: params.per_page,
        }
    }

    /// Create an empty result for the given page
    pub fn empty(params: &ListParams) -> Self {
        Self::new(Vec::new(), 0, params)
    }

    /// Calculate the total number of pages
    pub fn total_pages(&self) -> u32 {
        if self.per_page == 0 {
            return 0;
        }
        ((self.total as u32) + self.per_page - 1) / self.per_page
    }

    /// Check if the result is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the number of items in the current page
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip() {
        for status in [
            ArticleStatus::Draft,
            ArticleStatus::Published,
            ArticleStatus::Archived,
        ] {
            assert_eq!(ArticleStatus::from_str(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_status_from_str_case_insensitive() {
        assert_eq!(
            ArticleStatus::from_str("PUBLISHED"),
            Some(ArticleStatus::Published)
        );
        assert_eq!(ArticleStatus::from_str("Draft"), Some(ArticleStatus::Draft));
        assert_eq!(ArticleStatus::from_str("bogus"), None);
    }

    #[test]
    fn test_status_default_is_draft() {
        assert_eq!(ArticleStatus::default(), ArticleStatus::Draft);
    }

    #[test]
    fn test_list_params_clamps() {
        let params = ListParams::new(0, 0);
        assert_eq!(params.page, 1);
        assert_eq!(params.per_page, 1);

        let params = ListParams::new(3, 1000);
        assert_eq!(params.page, 3);
        assert_eq!(params.per_page, 100);
    }

    #[test]
    fn test_list_params_offset() {
        let params = ListParams::new(1, 10);
        assert_eq!(params.offset(), 0);
        assert_eq!(params.limit(), 10);

        let params = ListParams::new(3, 20);
        assert_eq!(params.offset(), 40);
    }

    #[test]
    fn test_paged_result_total_pages() {
        let params = ListParams::new(1, 10);
        let result: PagedResult<i32> = PagedResult::new(vec![], 25, &params);
        assert_eq!(result.total_pages(), 3);

        let result: PagedResult<i32> = PagedResult::new(vec![], 30, &params);
        assert_eq!(result.total_pages(), 3);

        let result: PagedResult<i32> = PagedResult::new(vec![], 0, &params);
        assert_eq!(result.total_pages(), 0);
    }

    #[test]
    fn test_update_input_has_changes() {
        let input = UpdateArticleInput::default();
        assert!(!input.has_changes());

        let input = UpdateArticleInput {
            title: Some("New title".to_string()),
            ..Default::default()
        };
        assert!(input.has_changes());
    }
}
