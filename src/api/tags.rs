//! Tag API endpoints
//!
//! Handles HTTP requests for tag browsing and management:
//! - GET /tags - List all tags
//! - GET /tags/{slug} - Published articles carrying the tag
//! - POST /tags, PUT/DELETE /tags/{slug} - Editor management
//!
//! Tag slugs resolve against the tag table and articles are matched through
//! the article_tags junction.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::api::articles::paginate;
use crate::api::middleware::{ApiError, AppState, AuthenticatedUser};
use crate::api::responses::{PaginatedArticlesResponse, TagResponse};
use crate::models::{CreateTagInput, ListParams, UpdateTagInput};
use crate::services::tag::TagServiceError;

/// Query parameters for listing articles
#[derive(Debug, Deserialize)]
pub struct ListArticlesQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_page() -> u32 {
    1
}
fn default_page_size() -> u32 {
    10
}

/// GET /tags - List all tags
pub async fn list_tags(State(state): State<AppState>) -> Result<Json<Vec<TagResponse>>, ApiError> {
    let tags = state
        .tag_service
        .list()
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;

    Ok(Json(tags.into_iter().map(Into::into).collect()))
}

/// GET /tags/{slug} - Published articles carrying the tag
///
/// 404 when the slug does not resolve to a tag.
pub async fn get_tag_articles(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<ListArticlesQuery>,
) -> Result<Json<PaginatedArticlesResponse>, ApiError> {
    let tag = state
        .tag_service
        .get_by_slug(&slug)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?
        .ok_or_else(|| ApiError::not_found(format!("Tag not found: {}", slug)))?;

    let params = ListParams::new(query.page, query.page_size);

    let result = state
        .article_service
        .list_published_by_tag(tag.id, &params)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;

    Ok(Json(paginate(result)))
}

/// POST /tags - Create a tag (editor only)
pub async fn create_tag(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<CreateTagInput>,
) -> Result<(StatusCode, Json<TagResponse>), ApiError> {
    require_editor(&user)?;

    let tag = state.tag_service.create(body).await.map_err(tag_error)?;

    Ok((StatusCode::CREATED, Json(tag.into())))
}

/// PUT /tags/{slug} - Update a tag (editor only)
pub async fn update_tag(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(slug): Path<String>,
    Json(body): Json<UpdateTagInput>,
) -> Result<Json<TagResponse>, ApiError> {
    require_editor(&user)?;

    let tag = state
        .tag_service
        .update(&slug, body)
        .await
        .map_err(tag_error)?;

    Ok(Json(tag.into()))
}

/// DELETE /tags/{slug} - Delete a tag (editor only)
pub async fn delete_tag(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(slug): Path<String>,
) -> Result<StatusCode, ApiError> {
    require_editor(&user)?;

    state.tag_service.delete(&slug).await.map_err(tag_error)?;

    Ok(StatusCode::NO_CONTENT)
}

fn require_editor(user: &AuthenticatedUser) -> Result<(), ApiError> {
    if !user.0.is_editor() {
        return Err(ApiError::forbidden("Editor privileges required"));
    }
    Ok(())
}

fn tag_error(e: TagServiceError) -> ApiError {
    match e {
        TagServiceError::NotFound(slug) => ApiError::not_found(format!("Tag not found: {}", slug)),
        TagServiceError::ValidationError(msg) => ApiError::validation_error(msg),
        TagServiceError::DuplicateSlug(slug) => {
            ApiError::conflict(format!("Tag slug already exists: {}", slug))
        }
        _ => ApiError::internal_error(e.to_string()),
    }
}
