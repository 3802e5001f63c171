//! Category service
//!
//! Business logic for category management: browsing plus editor-level
//! create/update/delete.

use crate::db::repositories::CategoryRepository;
use crate::models::{Category, CreateCategoryInput, UpdateCategoryInput};
use crate::services::article::generate_slug;
use anyhow::Context;
use std::sync::Arc;

/// Error types for category service operations
#[derive(Debug, thiserror::Error)]
pub enum CategoryServiceError {
    /// Category not found
    #[error("Category not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Duplicate slug
    #[error("Category slug already exists: {0}")]
    DuplicateSlug(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Category service
pub struct CategoryService {
    repo: Arc<dyn CategoryRepository>,
}

impl CategoryService {
    /// Create a new category service
    pub fn new(repo: Arc<dyn CategoryRepository>) -> Self {
        Self { repo }
    }

    /// List all categories
    pub async fn list(&self) -> Result<Vec<Category>, CategoryServiceError> {
        let categories = self
            .repo
            .list()
            .await
            .context("Failed to list categories")?;

        Ok(categories)
    }

    /// Get category by slug
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Category>, CategoryServiceError> {
        let category = self
            .repo
            .get_by_slug(slug)
            .await
            .context("Failed to get category by slug")?;

        Ok(category)
    }

    /// Get category by ID
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Category>, CategoryServiceError> {
        let category = self
            .repo
            .get_by_id(id)
            .await
            .context("Failed to get category by ID")?;

        Ok(category)
    }

    /// Create a new category
    pub async fn create(
        &self,
        mut input: CreateCategoryInput,
    ) -> Result<Category, CategoryServiceError> {
        if input.name.trim().is_empty() {
            return Err(CategoryServiceError::ValidationError(
                "Category name cannot be empty".to_string(),
            ));
        }

        if input.slug.trim().is_empty() {
            input.slug = generate_slug(&input.name);
        }

        if self
            .repo
            .get_by_slug(&input.slug)
            .await
            .context("Failed to check slug uniqueness")?
            .is_some()
        {
            return Err(CategoryServiceError::DuplicateSlug(input.slug));
        }

        let category = Category::new(input.slug, input.name, input.description);
        let created = self
            .repo
            .create(&category)
            .await
            .context("Failed to create category")?;

        Ok(created)
    }

    /// Update the category with the given slug
    pub async fn update(
        &self,
        slug: &str,
        input: UpdateCategoryInput,
    ) -> Result<Category, CategoryServiceError> {
        let mut category = self
            .repo
            .get_by_slug(slug)
            .await
            .context("Failed to get category")?
            .ok_or_else(|| CategoryServiceError::NotFound(slug.to_string()))?;

        if let Some(new_slug) = input.slug {
            if new_slug != category.slug {
                if self
                    .repo
                    .get_by_slug(&new_slug)
                    .await
                    .context("Failed to check slug uniqueness")?
                    .is_some()
                {
                    return Err(CategoryServiceError::DuplicateSlug(new_slug));
                }
                category.slug = new_slug;
            }
        }
        if let Some(name) = input.name {
            if name.trim().is_empty() {
                return Err(CategoryServiceError::ValidationError(
                    "Category name cannot be empty".to_string(),
                ));
            }
            category.name = name;
        }
        if let Some(description) = input.description {
            category.description = Some(description);
        }

        let updated = self
            .repo
            .update(&category)
            .await
            .context("Failed to update category")?;

        Ok(updated)
    }

    /// Delete the category with the given slug
    pub async fn delete(&self, slug: &str) -> Result<(), CategoryServiceError> {
        let category = self
            .repo
            .get_by_slug(slug)
            .await
            .context("Failed to get category")?
            .ok_or_else(|| CategoryServiceError::NotFound(slug.to_string()))?;

        self.repo
            .delete(category.id)
            .await
            .context("Failed to delete category")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::SqlxCategoryRepository;
    use crate::db::{create_test_pool, migrations};

    async fn setup_test_service() -> CategoryService {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        CategoryService::new(SqlxCategoryRepository::boxed(pool))
    }

    fn input(name: &str) -> CreateCategoryInput {
        CreateCategoryInput {
            slug: String::new(),
            name: name.to_string(),
            description: None,
        }
    }

    #[tokio::test]
    async fn test_list_includes_seeded_default() {
        let service = setup_test_service().await;

        let categories = service.list().await.expect("list failed");
        assert!(categories.iter().any(|c| c.slug == "uncategorized"));
    }

    #[tokio::test]
    async fn test_create_category() {
        let service = setup_test_service().await;

        let category = service
            .create(input("Site News"))
            .await
            .expect("create failed");

        assert!(category.id > 0);
        assert_eq!(category.slug, "site-news");
        assert_eq!(category.name, "Site News");
    }

    #[tokio::test]
    async fn test_create_duplicate_slug_fails() {
        let service = setup_test_service().await;

        service.create(input("News")).await.expect("create failed");
        let result = service.create(input("News")).await;

        assert!(matches!(
            result,
            Err(CategoryServiceError::DuplicateSlug(_))
        ));
    }

    #[tokio::test]
    async fn test_create_empty_name_fails() {
        let service = setup_test_service().await;

        let result = service.create(input("  ")).await;
        assert!(matches!(
            result,
            Err(CategoryServiceError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_get_by_slug() {
        let service = setup_test_service().await;

        service.create(input("Guides")).await.expect("create failed");

        let found = service
            .get_by_slug("guides")
            .await
            .expect("get failed")
            .expect("category should exist");
        assert_eq!(found.name, "Guides");

        let missing = service.get_by_slug("nope").await.expect("get failed");
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_update_category() {
        let service = setup_test_service().await;

        service.create(input("Old Name")).await.expect("create failed");

        let updated = service
            .update(
                "old-name",
                UpdateCategoryInput {
                    name: Some("New Name".to_string()),
                    description: Some("Renamed".to_string()),
                    ..Default::default()
                },
            )
            .await
            .expect("update failed");

        assert_eq!(updated.name, "New Name");
        assert_eq!(updated.description.as_deref(), Some("Renamed"));
        assert_eq!(updated.slug, "old-name");
    }

    #[tokio::test]
    async fn test_update_missing_fails() {
        let service = setup_test_service().await;

        let result = service
            .update("ghost", UpdateCategoryInput::default())
            .await;
        assert!(matches!(result, Err(CategoryServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_category() {
        let service = setup_test_service().await;

        service.create(input("Doomed")).await.expect("create failed");
        service.delete("doomed").await.expect("delete failed");

        let missing = service.get_by_slug("doomed").await.expect("get failed");
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_delete_missing_fails() {
        let service = setup_test_service().await;

        let result = service.delete("ghost").await;
        assert!(matches!(result, Err(CategoryServiceError::NotFound(_))));
    }
}
