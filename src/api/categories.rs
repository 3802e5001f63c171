//! Category API endpoints
//!
//! Handles HTTP requests for category browsing and management:
//! - GET /categories - List all categories
//! - GET /categories/{slug} - Published articles in the category
//! - POST /categories, PUT/DELETE /categories/{slug} - Editor management

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::api::articles::paginate;
use crate::api::middleware::{ApiError, AppState, AuthenticatedUser};
use crate::api::responses::{CategoryResponse, PaginatedArticlesResponse};
use crate::models::{CreateCategoryInput, ListParams, UpdateCategoryInput};
use crate::services::category::CategoryServiceError;

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

/// GET /categories - List all categories
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryResponse>>, ApiError> {
    let categories = state
        .category_service
        .list()
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;

    Ok(Json(categories.into_iter().map(Into::into).collect()))
}

/// GET /categories/{slug} - Published articles in the category
///
/// 404 when the slug does not resolve to a category.
pub async fn get_category_articles(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<ListArticlesQuery>,
) -> Result<Json<PaginatedArticlesResponse>, ApiError> {
    let category = state
        .category_service
        .get_by_slug(&slug)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?
        .ok_or_else(|| ApiError::not_found(format!("Category not found: {}", slug)))?;

    let params = ListParams::new(query.page, query.page_size);

    let result = state
        .article_service
        .list_published_by_category(category.id, &params)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;

    Ok(Json(paginate(result)))
}

/// POST /categories - Create a category (editor only)
pub async fn create_category(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<CreateCategoryInput>,
) -> Result<(StatusCode, Json<CategoryResponse>), ApiError> {
    require_editor(&user)?;

    let category = state
        .category_service
        .create(body)
        .await
        .map_err(category_error)?;

    Ok((StatusCode::CREATED, Json(category.into())))
}

/// PUT /categories/{slug} - Update a category (editor only)
pub async fn update_category(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(slug): Path<String>,
    Json(body): Json<UpdateCategoryInput>,
) -> Result<Json<CategoryResponse>, ApiError> {
    require_editor(&user)?;

    let category = state
        .category_service
        .update(&slug, body)
        .await
        .map_err(category_error)?;

    Ok(Json(category.into()))
}

/// DELETE /categories/{slug} - Delete a category (editor only)
pub async fn delete_category(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(slug): Path<String>,
) -> Result<StatusCode, ApiError> {
    require_editor(&user)?;

    state
        .category_service
        .delete(&slug)
        .await
        .map_err(category_error)?;

    Ok(StatusCode::NO_CONTENT)
}

fn require_editor(user: &AuthenticatedUser) -> Result<(), ApiError> {
    if !user.0.is_editor() {
        return Err(ApiError::forbidden("Editor privileges required"));
    }
    Ok(())
}

fn category_error(e: CategoryServiceError) -> ApiError {
    match e {
        CategoryServiceError::NotFound(slug) => {
            ApiError::not_found(format!("Category not found: {}", slug))
        }
        CategoryServiceError::ValidationError(msg) => ApiError::validation_error(msg),
        CategoryServiceError::DuplicateSlug(slug) => {
            ApiError::conflict(format!("Category slug already exists: {}", slug))
        }
        _ => ApiError::internal_error(e.to_string()),
    }
}
