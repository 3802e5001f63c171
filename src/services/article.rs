//! Article service
//!
//! Implements business logic for article management:
//! - Create, read, update, delete articles
//! - Slug generation and uniqueness
//! - Tag associations
//! - Published-only listings ordered by publish date
//! - View counting

use crate::db::repositories::{ArticleRepository, TagRepository};
use crate::models::{
    Article, CreateArticleInput, ListParams, PagedResult, Tag, UpdateArticleInput,
};
use anyhow::Context;
use std::sync::Arc;

/// Error types for article service operations
#[derive(Debug, thiserror::Error)]
pub enum ArticleServiceError {
    /// Article not found
    #[error("Article not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Duplicate slug
    #[error("Article slug already exists: {0}")]
    DuplicateSlug(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Article service for managing blog articles
pub struct ArticleService {
    repo: Arc<dyn ArticleRepository>,
    tag_repo: Arc<dyn TagRepository>,
}

impl ArticleService {
    /// Create a new article service
    pub fn new(repo: Arc<dyn ArticleRepository>, tag_repo: Arc<dyn TagRepository>) -> Self {
        Self { repo, tag_repo }
    }

    /// Create a new article.
    ///
    /// # Errors
    /// - `ValidationError` if title or content is empty
    /// - `DuplicateSlug` if the slug already exists
    pub async fn create(
        &self,
        mut input: CreateArticleInput,
        tag_ids: Option<Vec<i64>>,
    ) -> Result<Article, ArticleServiceError> {
        self.validate_create_input(&input)?;

        if input.slug.trim().is_empty() {
            input.slug = generate_slug(&input.title);
        }

        if self
            .repo
            .exists_by_slug(&input.slug)
            .await
            .context("Failed to check slug uniqueness")?
        {
            return Err(ArticleServiceError::DuplicateSlug(input.slug));
        }

        let article = self
            .repo
            .create(&input)
            .await
            .context("Failed to create article")?;

        if let Some(ids) = tag_ids {
            for tag_id in ids {
                self.tag_repo
                    .add_to_article(tag_id, article.id)
                    .await
                    .context("Failed to associate tag")?;
            }
        }

        Ok(article)
    }

    /// Get article by ID
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Article>, ArticleServiceError> {
        let article = self
            .repo
            .get_by_id(id)
            .await
            .context("Failed to get article by ID")?;

        Ok(article)
    }

    /// Get article by slug
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Article>, ArticleServiceError> {
        let article = self
            .repo
            .get_by_slug(slug)
            .await
            .context("Failed to get article by slug")?;

        Ok(article)
    }

    /// Get article by slug and record the view.
    ///
    /// The returned article reflects the incremented counter.
    pub async fn view_by_slug(&self, slug: &str) -> Result<Option<Article>, ArticleServiceError> {
        let article = self
            .repo
            .get_by_slug(slug)
            .await
            .context("Failed to get article by slug")?;

        match article {
            Some(mut article) => {
                self.repo
                    .increment_view_count(article.id)
                    .await
                    .context("Failed to record view")?;
                article.view_count += 1;
                Ok(Some(article))
            }
            None => Ok(None),
        }
    }

    /// List published articles ordered by publish date descending
    pub async fn list_published(
        &self,
        params: &ListParams,
    ) -> Result<PagedResult<Article>, ArticleServiceError> {
        let items = self
            .repo
            .list_published(params.offset(), params.limit())
            .await
            .context("Failed to list published articles")?;
        let total = self
            .repo
            .count_published()
            .await
            .context("Failed to count published articles")?;

        Ok(PagedResult::new(items, total, params))
    }

    /// List published articles in a category, ordered by publish date descending
    pub async fn list_published_by_category(
        &self,
        category_id: i64,
        params: &ListParams,
    ) -> Result<PagedResult<Article>, ArticleServiceError> {
        let items = self
            .repo
            .list_published_by_category(category_id, params.offset(), params.limit())
            .await
            .context("Failed to list articles by category")?;
        let total = self
            .repo
            .count_published_by_category(category_id)
            .await
            .context("Failed to count articles by category")?;

        Ok(PagedResult::new(items, total, params))
    }

    /// List published articles carrying a tag, ordered by publish date descending
    pub async fn list_published_by_tag(
        &self,
        tag_id: i64,
        params: &ListParams,
    ) -> Result<PagedResult<Article>, ArticleServiceError> {
        let items = self
            .repo
            .list_published_by_tag(tag_id, params.offset(), params.limit())
            .await
            .context("Failed to list articles by tag")?;
        let total = self
            .repo
            .count_published_by_tag(tag_id)
            .await
            .context("Failed to count articles by tag")?;

        Ok(PagedResult::new(items, total, params))
    }

    /// Update an article.
    ///
    /// When `tag_ids` is `Some`, the article's tag set is replaced.
    ///
    /// # Errors
    /// - `NotFound` if the article doesn't exist
    /// - `ValidationError` if the update would leave title or content empty
    /// - `DuplicateSlug` if the new slug collides with another article
    pub async fn update(
        &self,
        id: i64,
        input: UpdateArticleInput,
        tag_ids: Option<Vec<i64>>,
    ) -> Result<Article, ArticleServiceError> {
        let existing = self
            .repo
            .get_by_id(id)
            .await
            .context("Failed to get article")?
            .ok_or_else(|| ArticleServiceError::NotFound(id.to_string()))?;

        self.validate_update_input(&input, &existing)?;

        if let Some(ref slug) = input.slug {
            if self
                .repo
                .exists_by_slug_excluding(slug, id)
                .await
                .context("Failed to check slug uniqueness")?
            {
                return Err(ArticleServiceError::DuplicateSlug(slug.clone()));
            }
        }

        let article = self
            .repo
            .update(id, &input)
            .await
            .context("Failed to update article")?;

        if let Some(ids) = tag_ids {
            self.tag_repo
                .clear_article_tags(id)
                .await
                .context("Failed to clear article tags")?;
            for tag_id in ids {
                self.tag_repo
                    .add_to_article(tag_id, id)
                    .await
                    .context("Failed to associate tag")?;
            }
        }

        Ok(article)
    }

    /// Delete an article
    pub async fn delete(&self, id: i64) -> Result<(), ArticleServiceError> {
        self.repo
            .delete(id)
            .await
            .context("Failed to delete article")?;

        Ok(())
    }

    /// Get the tags associated with an article
    pub async fn tags_for(&self, article_id: i64) -> Result<Vec<Tag>, ArticleServiceError> {
        let tags = self
            .tag_repo
            .get_by_article_id(article_id)
            .await
            .context("Failed to get article tags")?;

        Ok(tags)
    }

    // ========================================================================
    // Private helper methods
    // ========================================================================

    fn validate_create_input(&self, input: &CreateArticleInput) -> Result<(), ArticleServiceError> {
        if input.title.trim().is_empty() {
            return Err(ArticleServiceError::ValidationError(
                "Article title cannot be empty".to_string(),
            ));
        }

        if input.content.trim().is_empty() {
            return Err(ArticleServiceError::ValidationError(
                "Article content cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    fn validate_update_input(
        &self,
        input: &UpdateArticleInput,
        existing: &Article,
    ) -> Result<(), ArticleServiceError> {
        let final_title = input.title.as_ref().unwrap_or(&existing.title);
        let final_content = input.content.as_ref().unwrap_or(&existing.content);

        if final_title.trim().is_empty() {
            return Err(ArticleServiceError::ValidationError(
                "Article title cannot be empty".to_string(),
            ));
        }

        if final_content.trim().is_empty() {
            return Err(ArticleServiceError::ValidationError(
                "Article content cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// Generate a URL-friendly slug from a title.
///
/// Lowercases, replaces ASCII punctuation and whitespace with hyphens,
/// collapses runs of hyphens, and keeps non-ASCII characters as-is.
pub fn generate_slug(title: &str) -> String {
    let slug: String = title
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c
            } else if !c.is_ascii() {
                c
            } else {
                '-'
            }
        })
        .collect();

    let mut result = String::new();
    let mut prev_hyphen = false;

    for c in slug.chars() {
        if c == '-' {
            if !prev_hyphen && !result.is_empty() {
                result.push(c);
                prev_hyphen = true;
            }
        } else {
            result.push(c);
            prev_hyphen = false;
        }
    }

    result.trim_end_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{SqlxArticleRepository, SqlxTagRepository};
    use crate::db::{create_test_pool, migrations, DynDatabasePool};
    use crate::models::ArticleStatus;
    use chrono::{Duration, Utc};

    async fn setup_test_service() -> (DynDatabasePool, ArticleService) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let article_repo = SqlxArticleRepository::boxed(pool.clone());
        let tag_repo = SqlxTagRepository::boxed(pool.clone());
        let service = ArticleService::new(article_repo, tag_repo);

        (pool, service)
    }

    /// Helper to create a test user
    async fn create_test_user(pool: &DynDatabasePool) -> i64 {
        let result = sqlx::query(
            "INSERT INTO users (username, email, password_hash, role) VALUES (?, ?, ?, ?)",
        )
        .bind("testuser")
        .bind("test@example.com")
        .bind("hash123")
        .bind("author")
        .execute(pool.as_sqlite().unwrap())
        .await
        .expect("Failed to create test user");
        result.last_insert_rowid()
    }

    /// Helper to create a test tag, returning its id
    async fn create_test_tag(pool: &DynDatabasePool, slug: &str) -> i64 {
        let result = sqlx::query("INSERT INTO tags (slug, name) VALUES (?, ?)")
            .bind(slug)
            .bind(slug)
            .execute(pool.as_sqlite().unwrap())
            .await
            .expect("Failed to create test tag");
        result.last_insert_rowid()
    }

    fn input(author_id: i64, title: &str, status: ArticleStatus) -> CreateArticleInput {
        CreateArticleInput {
            slug: String::new(),
            title: title.to_string(),
            excerpt: None,
            lead_image: None,
            content: "Some body text".to_string(),
            author_id,
            category_id: 1,
            status: Some(status),
            publish_date: None,
        }
    }

    // ========================================================================
    // Slug generation tests
    // ========================================================================

    #[test]
    fn test_generate_slug_simple() {
        assert_eq!(generate_slug("Hello World"), "hello-world");
    }

    #[test]
    fn test_generate_slug_special_characters() {
        assert_eq!(generate_slug("Hello, World!"), "hello-world");
        assert_eq!(generate_slug("Rust & Axum: a guide"), "rust-axum-a-guide");
    }

    #[test]
    fn test_generate_slug_collapses_hyphens() {
        assert_eq!(generate_slug("a --- b"), "a-b");
    }

    #[test]
    fn test_generate_slug_trims_edges() {
        assert_eq!(generate_slug("  padded title  "), "padded-title");
    }

    // ========================================================================
    // Create tests
    // ========================================================================

    #[tokio::test]
    async fn test_create_article() {
        let (pool, service) = setup_test_service().await;
        let author_id = create_test_user(&pool).await;

        let article = service
            .create(input(author_id, "My First Post", ArticleStatus::Published), None)
            .await
            .expect("Failed to create article");

        assert!(article.id > 0);
        assert_eq!(article.slug, "my-first-post");
        assert_eq!(article.author_id, author_id);
        assert_eq!(article.status, ArticleStatus::Published);
        assert!(article.publish_date.is_some());
        assert_eq!(article.view_count, 0);
    }

    #[tokio::test]
    async fn test_create_draft_has_no_publish_date() {
        let (pool, service) = setup_test_service().await;
        let author_id = create_test_user(&pool).await;

        let article = service
            .create(input(author_id, "Unfinished", ArticleStatus::Draft), None)
            .await
            .expect("Failed to create article");

        assert_eq!(article.status, ArticleStatus::Draft);
        assert!(article.publish_date.is_none());
    }

    #[tokio::test]
    async fn test_create_empty_title_fails() {
        let (pool, service) = setup_test_service().await;
        let author_id = create_test_user(&pool).await;

        let result = service
            .create(input(author_id, "   ", ArticleStatus::Draft), None)
            .await;

        assert!(matches!(
            result,
            Err(ArticleServiceError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_create_empty_content_fails() {
        let (pool, service) = setup_test_service().await;
        let author_id = create_test_user(&pool).await;

        let mut bad = input(author_id, "Title", ArticleStatus::Draft);
        bad.content = "  ".to_string();

        let result = service.create(bad, None).await;
        assert!(matches!(
            result,
            Err(ArticleServiceError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_create_duplicate_slug_fails() {
        let (pool, service) = setup_test_service().await;
        let author_id = create_test_user(&pool).await;

        service
            .create(input(author_id, "Same Title", ArticleStatus::Draft), None)
            .await
            .expect("First create should succeed");

        let result = service
            .create(input(author_id, "Same Title", ArticleStatus::Draft), None)
            .await;

        assert!(matches!(result, Err(ArticleServiceError::DuplicateSlug(_))));
    }

    #[tokio::test]
    async fn test_create_associates_tags() {
        let (pool, service) = setup_test_service().await;
        let author_id = create_test_user(&pool).await;
        let tag_id = create_test_tag(&pool, "rust").await;

        let article = service
            .create(
                input(author_id, "Tagged", ArticleStatus::Published),
                Some(vec![tag_id]),
            )
            .await
            .expect("Failed to create article");

        let tags = service.tags_for(article.id).await.expect("Failed to get tags");
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].slug, "rust");
    }

    // ========================================================================
    // Listing tests
    // ========================================================================

    #[tokio::test]
    async fn test_list_published_excludes_drafts() {
        let (pool, service) = setup_test_service().await;
        let author_id = create_test_user(&pool).await;

        service
            .create(input(author_id, "Published One", ArticleStatus::Published), None)
            .await
            .expect("create failed");
        service
            .create(input(author_id, "Draft One", ArticleStatus::Draft), None)
            .await
            .expect("create failed");
        service
            .create(input(author_id, "Archived One", ArticleStatus::Archived), None)
            .await
            .expect("create failed");

        let result = service
            .list_published(&ListParams::default())
            .await
            .expect("list failed");

        assert_eq!(result.total, 1);
        assert_eq!(result.items.len(), 1);
        assert_eq!(result.items[0].slug, "published-one");
    }

    #[tokio::test]
    async fn test_list_published_ordered_by_publish_date_desc() {
        let (pool, service) = setup_test_service().await;
        let author_id = create_test_user(&pool).await;

        let base = Utc::now();
        for (title, offset_days) in [("Oldest", 3), ("Newest", 1), ("Middle", 2)] {
            let mut i = input(author_id, title, ArticleStatus::Published);
            i.publish_date = Some(base - Duration::days(offset_days));
            service.create(i, None).await.expect("create failed");
        }

        let result = service
            .list_published(&ListParams::default())
            .await
            .expect("list failed");

        let slugs: Vec<&str> = result.items.iter().map(|a| a.slug.as_str()).collect();
        assert_eq!(slugs, vec!["newest", "middle", "oldest"]);
    }

    #[tokio::test]
    async fn test_list_published_by_category() {
        let (pool, service) = setup_test_service().await;
        let author_id = create_test_user(&pool).await;

        // Second category alongside the seeded default
        let other = sqlx::query("INSERT INTO categories (slug, name) VALUES ('news', 'News')")
            .execute(pool.as_sqlite().unwrap())
            .await
            .expect("Failed to create category")
            .last_insert_rowid();

        let mut in_news = input(author_id, "In News", ArticleStatus::Published);
        in_news.category_id = other;
        service.create(in_news, None).await.expect("create failed");
        service
            .create(input(author_id, "In Default", ArticleStatus::Published), None)
            .await
            .expect("create failed");

        let result = service
            .list_published_by_category(other, &ListParams::default())
            .await
            .expect("list failed");

        assert_eq!(result.total, 1);
        assert_eq!(result.items[0].slug, "in-news");
    }

    #[tokio::test]
    async fn test_list_published_by_tag() {
        let (pool, service) = setup_test_service().await;
        let author_id = create_test_user(&pool).await;
        let tag_id = create_test_tag(&pool, "databases").await;

        service
            .create(
                input(author_id, "Tagged Post", ArticleStatus::Published),
                Some(vec![tag_id]),
            )
            .await
            .expect("create failed");
        service
            .create(
                input(author_id, "Tagged Draft", ArticleStatus::Draft),
                Some(vec![tag_id]),
            )
            .await
            .expect("create failed");
        service
            .create(input(author_id, "Untagged Post", ArticleStatus::Published), None)
            .await
            .expect("create failed");

        let result = service
            .list_published_by_tag(tag_id, &ListParams::default())
            .await
            .expect("list failed");

        // Only the published, tagged article shows up
        assert_eq!(result.total, 1);
        assert_eq!(result.items[0].slug, "tagged-post");
    }

    #[tokio::test]
    async fn test_list_published_pagination() {
        let (pool, service) = setup_test_service().await;
        let author_id = create_test_user(&pool).await;

        let base = Utc::now();
        for i in 0..5 {
            let mut item = input(author_id, &format!("Post {}", i), ArticleStatus::Published);
            item.publish_date = Some(base - Duration::days(i));
            service.create(item, None).await.expect("create failed");
        }

        let page = service
            .list_published(&ListParams::new(2, 2))
            .await
            .expect("list failed");

        assert_eq!(page.total, 5);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total_pages(), 3);
        assert_eq!(page.items[0].slug, "post-2");
    }

    // ========================================================================
    // Update / delete tests
    // ========================================================================

    #[tokio::test]
    async fn test_update_article() {
        let (pool, service) = setup_test_service().await;
        let author_id = create_test_user(&pool).await;

        let article = service
            .create(input(author_id, "Before", ArticleStatus::Draft), None)
            .await
            .expect("create failed");

        let updated = service
            .update(
                article.id,
                UpdateArticleInput {
                    title: Some("After".to_string()),
                    excerpt: Some("A summary".to_string()),
                    ..Default::default()
                },
                None,
            )
            .await
            .expect("update failed");

        assert_eq!(updated.title, "After");
        assert_eq!(updated.excerpt.as_deref(), Some("A summary"));
        // Unchanged fields are preserved
        assert_eq!(updated.slug, "before");
    }

    #[tokio::test]
    async fn test_update_publishing_sets_publish_date() {
        let (pool, service) = setup_test_service().await;
        let author_id = create_test_user(&pool).await;

        let article = service
            .create(input(author_id, "Draft First", ArticleStatus::Draft), None)
            .await
            .expect("create failed");
        assert!(article.publish_date.is_none());

        let updated = service
            .update(
                article.id,
                UpdateArticleInput {
                    status: Some(ArticleStatus::Published),
                    ..Default::default()
                },
                None,
            )
            .await
            .expect("update failed");

        assert_eq!(updated.status, ArticleStatus::Published);
        assert!(updated.publish_date.is_some());
    }

    #[tokio::test]
    async fn test_update_does_not_touch_view_count() {
        let (pool, service) = setup_test_service().await;
        let author_id = create_test_user(&pool).await;

        let article = service
            .create(input(author_id, "Viewed", ArticleStatus::Published), None)
            .await
            .expect("create failed");

        service.view_by_slug("viewed").await.expect("view failed");
        service.view_by_slug("viewed").await.expect("view failed");

        let updated = service
            .update(
                article.id,
                UpdateArticleInput {
                    title: Some("Viewed (edited)".to_string()),
                    ..Default::default()
                },
                None,
            )
            .await
            .expect("update failed");

        assert_eq!(updated.view_count, 2);
    }

    #[tokio::test]
    async fn test_update_nonexistent_fails() {
        let (_pool, service) = setup_test_service().await;

        let result = service
            .update(9999, UpdateArticleInput::default(), None)
            .await;

        assert!(matches!(result, Err(ArticleServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_duplicate_slug_fails() {
        let (pool, service) = setup_test_service().await;
        let author_id = create_test_user(&pool).await;

        service
            .create(input(author_id, "First", ArticleStatus::Draft), None)
            .await
            .expect("create failed");
        let second = service
            .create(input(author_id, "Second", ArticleStatus::Draft), None)
            .await
            .expect("create failed");

        let result = service
            .update(
                second.id,
                UpdateArticleInput {
                    slug: Some("first".to_string()),
                    ..Default::default()
                },
                None,
            )
            .await;

        assert!(matches!(result, Err(ArticleServiceError::DuplicateSlug(_))));
    }

    #[tokio::test]
    async fn test_update_replaces_tags() {
        let (pool, service) = setup_test_service().await;
        let author_id = create_test_user(&pool).await;
        let first_tag = create_test_tag(&pool, "first").await;
        let second_tag = create_test_tag(&pool, "second").await;

        let article = service
            .create(
                input(author_id, "Retagged", ArticleStatus::Draft),
                Some(vec![first_tag]),
            )
            .await
            .expect("create failed");

        service
            .update(
                article.id,
                UpdateArticleInput::default(),
                Some(vec![second_tag]),
            )
            .await
            .expect("update failed");

        let tags = service.tags_for(article.id).await.expect("tags failed");
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].slug, "second");
    }

    #[tokio::test]
    async fn test_delete_article() {
        let (pool, service) = setup_test_service().await;
        let author_id = create_test_user(&pool).await;

        let article = service
            .create(input(author_id, "Doomed", ArticleStatus::Draft), None)
            .await
            .expect("create failed");

        service.delete(article.id).await.expect("delete failed");

        let found = service.get_by_id(article.id).await.expect("get failed");
        assert!(found.is_none());
    }

    // ========================================================================
    // View counting tests
    // ========================================================================

    #[tokio::test]
    async fn test_view_by_slug_increments() {
        let (pool, service) = setup_test_service().await;
        let author_id = create_test_user(&pool).await;

        service
            .create(input(author_id, "Counted", ArticleStatus::Published), None)
            .await
            .expect("create failed");

        let first = service
            .view_by_slug("counted")
            .await
            .expect("view failed")
            .expect("article should exist");
        assert_eq!(first.view_count, 1);

        let second = service
            .view_by_slug("counted")
            .await
            .expect("view failed")
            .expect("article should exist");
        assert_eq!(second.view_count, 2);
    }

    #[tokio::test]
    async fn test_view_by_slug_missing_returns_none() {
        let (_pool, service) = setup_test_service().await;

        let result = service.view_by_slug("nope").await.expect("view failed");
        assert!(result.is_none());
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(20))]

        #[test]
        fn slug_is_lowercase_ascii(title in "[ -~]{1,64}") {
            let slug = generate_slug(&title);
            for c in slug.chars() {
                prop_assert!(c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
            }
        }

        #[test]
        fn slug_has_no_consecutive_hyphens(title in "[ -~]{1,64}") {
            let slug = generate_slug(&title);
            prop_assert!(!slug.contains("--"));
        }

        #[test]
        fn slug_never_starts_or_ends_with_hyphen(title in "[ -~]{1,64}") {
            let slug = generate_slug(&title);
            prop_assert!(!slug.starts_with('-'));
            prop_assert!(!slug.ends_with('-'));
        }

        #[test]
        fn slug_is_idempotent(title in "[ -~]{1,64}") {
            let once = generate_slug(&title);
            prop_assert_eq!(generate_slug(&once), once.clone());
        }
    }
}
