//! Tag service
//!
//! Business logic for tag management: browsing plus editor-level
//! create/update/delete.

use crate::db::repositories::TagRepository;
use crate::models::{CreateTagInput, Tag, UpdateTagInput};
use crate::services::article::generate_slug;
use anyhow::Context;
use std::sync::Arc;

/// Error types for tag service operations
#[derive(Debug, thiserror::Error)]
pub enum TagServiceError {
    /// Tag not found
    #[error("Tag not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Duplicate slug
    #[error("Tag slug already exists: {0}")]
    DuplicateSlug(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Tag service
pub struct TagService {
    repo: Arc<dyn TagRepository>,
}

impl TagService {
    /// Create a new tag service
    pub fn new(repo: Arc<dyn TagRepository>) -> Self {
        Self { repo }
    }

    /// List all tags
    pub async fn list(&self) -> Result<Vec<Tag>, TagServiceError> {
        let tags = self.repo.list().await.context("Failed to list tags")?;

        Ok(tags)
    }

    /// Get tag by slug
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Tag>, TagServiceError> {
        let tag = self
            .repo
            .get_by_slug(slug)
            .await
            .context("Failed to get tag by slug")?;

        Ok(tag)
    }

    /// Create a new tag
    pub async fn create(&self, mut input: CreateTagInput) -> Result<Tag, TagServiceError> {
        if input.name.trim().is_empty() {
            return Err(TagServiceError::ValidationError(
                "Tag name cannot be empty".to_string(),
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
            return Err(TagServiceError::DuplicateSlug(input.slug));
        }

        let tag = Tag::new(input.slug, input.name);
        let created = self.repo.create(&tag).await.context("Failed to create tag")?;

        Ok(created)
    }

    /// Update the tag with the given slug
    pub async fn update(&self, slug: &str, input: UpdateTagInput) -> Result<Tag, TagServiceError> {
        let mut tag = self
            .repo
            .get_by_slug(slug)
            .await
            .context("Failed to get tag")?
            .ok_or_else(|| TagServiceError::NotFound(slug.to_string()))?;

        if let Some(new_slug) = input.slug {
            if new_slug != tag.slug {
                if self
                    .repo
                    .get_by_slug(&new_slug)
                    .await
                    .context("Failed to check slug uniqueness")?
                    .is_some()
                {
                    return Err(TagServiceError::DuplicateSlug(new_slug));
                }
                tag.slug = new_slug;
            }
        }
        if let Some(name) = input.name {
            if name.trim().is_empty() {
                return Err(TagServiceError::ValidationError(
                    "Tag name cannot be empty".to_string(),
                ));
            }
            tag.name = name;
        }

        let updated = self.repo.update(&tag).await.context("Failed to update tag")?;

        Ok(updated)
    }

    /// Delete the tag with the given slug
    pub async fn delete(&self, slug: &str) -> Result<(), TagServiceError> {
        let tag = self
            .repo
            .get_by_slug(slug)
            .await
            .context("Failed to get tag")?
            .ok_or_else(|| TagServiceError::NotFound(slug.to_string()))?;

        self.repo
            .delete(tag.id)
            .await
            .context("Failed to delete tag")?;

        Ok(())
    }
}
