//! API layer - HTTP handlers and routing
//!
//! All endpoints of the Gazette content API:
//! - Article endpoints (public listing/detail, authenticated mutation)
//! - Category and tag browsing plus editor management
//! - Registration, login, token refresh, profile, logout

pub mod articles;
pub mod auth;
pub mod categories;
pub mod middleware;
pub mod responses;
pub mod tags;

use axum::{
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use middleware::{ApiError, AppState, AuthenticatedUser};

/// Build the API router.
///
/// Mutating routes are wrapped with the auth middleware; everything else is
/// public.
pub fn build_api_router(state: AppState) -> Router<AppState> {
    // Protected routes (need a valid access token)
    let protected_routes = Router::new()
        .route("/articles", post(articles::create_article))
        .route(
            "/articles/{slug}",
            put(articles::update_article)
                .patch(articles::update_article)
                .delete(articles::delete_article),
        )
        .route("/categories", post(categories::create_category))
        .route(
            "/categories/{slug}",
            put(categories::update_category).delete(categories::delete_category),
        )
        .route("/tags", post(tags::create_tag))
        .route(
            "/tags/{slug}",
            put(tags::update_tag).delete(tags::delete_tag),
        )
        .route("/profile", get(auth::profile))
        .route("/logout", post(auth::logout))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ));

    // Public routes
    Router::new()
        .route("/articles", get(articles::list_articles))
        .route("/articles/{slug}", get(articles::get_article))
        .route("/categories", get(categories::list_categories))
        .route("/categories/{slug}", get(categories::get_category_articles))
        .route("/tags", get(tags::list_tags))
        .route("/tags/{slug}", get(tags::get_tag_articles))
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/token/refresh", post(auth::refresh_token))
        .merge(protected_routes)
}

/// Build the complete router with middleware
pub fn build_router(state: AppState, cors_origin: &str) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(cors_origin.parse::<HeaderValue>().unwrap())
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .merge(build_api_router(state.clone()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod testing {
    //! Shared helpers for endpoint tests: an in-memory server plus
    //! register/auth conveniences.

    use std::sync::Arc;

    use axum::http::{header, HeaderValue};
    use axum_test::{TestRequest, TestServer};
    use serde_json::{json, Value};

    use super::{build_router, AppState};
    use crate::db::repositories::{
        SqlxArticleRepository, SqlxCategoryRepository, SqlxRefreshTokenRepository,
        SqlxTagRepository, SqlxUserRepository,
    };
    use crate::db::{create_test_pool, migrations};
    use crate::services::{
        ArticleService, CategoryService, TagService, TokenSigner, UserService,
    };

    /// Build an AppState over a fresh in-memory database
    pub async fn test_state() -> AppState {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let user_repo = SqlxUserRepository::boxed(pool.clone());
        let token_repo = SqlxRefreshTokenRepository::boxed(pool.clone());
        let article_repo = SqlxArticleRepository::boxed(pool.clone());
        let category_repo = SqlxCategoryRepository::boxed(pool.clone());
        let tag_repo = SqlxTagRepository::boxed(pool.clone());

        let signer = TokenSigner::new("test-secret", 60);

        AppState {
            pool: pool.clone(),
            user_service: Arc::new(UserService::new(user_repo, token_repo, signer, 7)),
            article_service: Arc::new(ArticleService::new(article_repo, tag_repo.clone())),
            category_service: Arc::new(CategoryService::new(category_repo)),
            tag_service: Arc::new(TagService::new(tag_repo)),
        }
    }

    /// Spin up a test server over a fresh state
    pub async fn test_server() -> TestServer {
        let state = test_state().await;
        let app = build_router(state, "http://localhost:3000");
        TestServer::new(app).expect("Failed to start test server")
    }

    /// Register a user and return their access token
    pub async fn register_user(server: &TestServer, username: &str) -> String {
        let res = server
            .post("/register")
            .json(&json!({
                "username": username,
                "email": format!("{}@example.com", username),
                "password": "password123",
            }))
            .await;

        let body: Value = res.json();
        body["access"]
            .as_str()
            .expect("register should return an access token")
            .to_string()
    }

    /// Attach a bearer token to a request
    pub fn authed(request: TestRequest, token: &str) -> TestRequest {
        request.add_header(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token)).expect("valid header"),
        )
    }
}
