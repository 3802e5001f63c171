//! Article API endpoints
//!
//! Handles HTTP requests for article management:
//! - GET /articles - List published articles (filterable by category slug)
//! - POST /articles - Create new article (authenticated)
//! - GET /articles/{slug} - Get article by slug
//! - PUT/PATCH /articles/{slug} - Update article (authenticated)
//! - DELETE /articles/{slug} - Delete article (authenticated)

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::api::middleware::{ApiError, AppState, AuthenticatedUser};
use crate::api::responses::{ArticleResponse, ArticleSummary, PaginatedArticlesResponse};
use crate::models::{ArticleStatus, CreateArticleInput, ListParams, PagedResult, UpdateArticleInput};
use crate::services::article::ArticleServiceError;

/// Query parameters for listing articles
#[derive(Debug, Deserialize)]
pub struct ListArticlesQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Filter by category slug
    pub category: Option<String>,
}

fn default_page() -> u32 {
    1
}
fn default_page_size() -> u32 {
    10
}

/// Request body for creating an article
#[derive(Debug, Deserialize)]
pub struct CreateArticleRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub slug: String,
    pub excerpt: Option<String>,
    pub lead_image: Option<String>,
    pub category_id: Option<i64>,
    pub status: Option<String>,
    pub publish_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tag_ids: Option<Vec<i64>>,
}

/// Request body for updating an article.
///
/// view_count, created_at, and updated_at are read-only; values sent for
/// them are ignored.
#[derive(Debug, Deserialize)]
pub struct UpdateArticleRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub lead_image: Option<String>,
    pub category_id: Option<i64>,
    pub status: Option<String>,
    pub publish_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tag_ids: Option<Vec<i64>>,
}

/// GET /articles - List published articles
///
/// Ordered by publish date descending. An unknown category slug yields an
/// empty page, matching filter (not lookup) semantics.
pub async fn list_articles(
    State(state): State<AppState>,
    Query(query): Query<ListArticlesQuery>,
) -> Result<Json<PaginatedArticlesResponse>, ApiError> {
    let params = ListParams::new(query.page, query.page_size);

    let result = match query.category {
        Some(ref category_slug) => {
            let category = state
                .category_service
                .get_by_slug(category_slug)
                .await
                .map_err(|e| ApiError::internal_error(e.to_string()))?;

            match category {
                Some(category) => state
                    .article_service
                    .list_published_by_category(category.id, &params)
                    .await
                    .map_err(|e| ApiError::internal_error(e.to_string()))?,
                None => PagedResult::empty(&params),
            }
        }
        None => state
            .article_service
            .list_published(&params)
            .await
            .map_err(|e| ApiError::internal_error(e.to_string()))?,
    };

    Ok(Json(paginate(result)))
}

/// GET /articles/{slug} - Get article by slug
///
/// Returns the article regardless of status and records the view.
pub async fn get_article(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ArticleResponse>, ApiError> {
    let article = state
        .article_service
        .view_by_slug(&slug)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?
        .ok_or_else(|| ApiError::not_found(format!("Article not found: {}", slug)))?;

    let category = state
        .category_service
        .get_by_id(article.category_id)
        .await
        .ok()
        .flatten();
    let tags = state
        .article_service
        .tags_for(article.id)
        .await
        .unwrap_or_default();

    let response: ArticleResponse = article.into();
    Ok(Json(response.with_category(category).with_tags(tags)))
}

/// POST /articles - Create new article
///
/// Requires authentication; the authenticated user becomes the author.
pub async fn create_article(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<CreateArticleRequest>,
) -> Result<(StatusCode, Json<ArticleSummary>), ApiError> {
    let status = body.status.as_ref().and_then(|s| ArticleStatus::from_str(s));

    let input = CreateArticleInput {
        slug: body.slug,
        title: body.title,
        excerpt: body.excerpt,
        lead_image: body.lead_image,
        content: body.content,
        author_id: user.0.id,
        category_id: body.category_id.unwrap_or(1), // Default category
        status,
        publish_date: body.publish_date,
    };

    let article = state
        .article_service
        .create(input, body.tag_ids)
        .await
        .map_err(article_error)?;

    Ok((StatusCode::CREATED, Json(article.into())))
}

/// PUT/PATCH /articles/{slug} - Update article
///
/// Requires authentication and edit permission on the article.
pub async fn update_article(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(slug): Path<String>,
    Json(body): Json<UpdateArticleRequest>,
) -> Result<Json<ArticleResponse>, ApiError> {
    let existing = state
        .article_service
        .get_by_slug(&slug)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?
        .ok_or_else(|| ApiError::not_found(format!("Article not found: {}", slug)))?;

    if !user.0.can_edit(existing.author_id) {
        return Err(ApiError::forbidden(
            "You don't have permission to edit this article",
        ));
    }

    let status = body.status.as_ref().and_then(|s| ArticleStatus::from_str(s));

    let input = UpdateArticleInput {
        slug: body.slug,
        title: body.title,
        excerpt: body.excerpt,
        lead_image: body.lead_image,
        content: body.content,
        category_id: body.category_id,
        status,
        publish_date: body.publish_date,
    };

    let article = state
        .article_service
        .update(existing.id, input, body.tag_ids)
        .await
        .map_err(article_error)?;

    let category = state
        .category_service
        .get_by_id(article.category_id)
        .await
        .ok()
        .flatten();
    let tags = state
        .article_service
        .tags_for(article.id)
        .await
        .unwrap_or_default();

    let response: ArticleResponse = article.into();
    Ok(Json(response.with_category(category).with_tags(tags)))
}

/// DELETE /articles/{slug} - Delete article
///
/// Requires authentication and edit permission on the article.
pub async fn delete_article(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(slug): Path<String>,
) -> Result<StatusCode, ApiError> {
    let existing = state
        .article_service
        .get_by_slug(&slug)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?
        .ok_or_else(|| ApiError::not_found(format!("Article not found: {}", slug)))?;

    if !user.0.can_edit(existing.author_id) {
        return Err(ApiError::forbidden(
            "You don't have permission to delete this article",
        ));
    }

    state
        .article_service
        .delete(existing.id)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;

    Ok(StatusCode::NO_CONTENT)
}

/// Convert a paged service result into the list response shape
pub(crate) fn paginate(result: PagedResult<crate::models::Article>) -> PaginatedArticlesResponse {
    let total = result.total;
    let page = result.page;
    let page_size = result.per_page;
    let total_pages = result.total_pages();
    let articles: Vec<ArticleSummary> = result.items.into_iter().map(Into::into).collect();

    PaginatedArticlesResponse {
        articles,
        total,
        page,
        page_size,
        total_pages,
    }
}

/// Map article service errors to API errors
fn article_error(e: ArticleServiceError) -> ApiError {
    match e {
        ArticleServiceError::NotFound(id) => {
            ApiError::not_found(format!("Article not found: {}", id))
        }
        ArticleServiceError::ValidationError(msg) => ApiError::validation_error(msg),
        ArticleServiceError::DuplicateSlug(slug) => ApiError::with_details(
            "CONFLICT",
            format!("Article slug already exists: {}", slug),
            serde_json::json!({"field": "slug", "value": slug}),
        ),
        _ => ApiError::internal_error(e.to_string()),
    }
}
