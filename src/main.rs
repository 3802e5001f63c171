//! Gazette - a blog-style content API

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gazette::{
    api::{self, AppState},
    config::Config,
    db::{
        self,
        repositories::{
            SqlxArticleRepository, SqlxCategoryRepository, SqlxRefreshTokenRepository,
            SqlxTagRepository, SqlxUserRepository,
        },
    },
    services::{ArticleService, CategoryService, TagService, TokenSigner, UserService},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gazette=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Gazette content API...");

    // Load configuration
    let config = Config::load_with_env(Path::new("config.yml"))?;
    tracing::info!("Configuration loaded");

    // Initialize database
    let pool = db::create_pool(&config.database).await?;
    tracing::info!("Database connected: {:?}", config.database.driver);

    // Run migrations
    db::migrations::run_migrations(&pool).await?;
    tracing::info!("Database migrations completed");

    // Create repositories
    let user_repo = SqlxUserRepository::boxed(pool.clone());
    let token_repo = SqlxRefreshTokenRepository::boxed(pool.clone());
    let article_repo = SqlxArticleRepository::boxed(pool.clone());
    let category_repo = SqlxCategoryRepository::boxed(pool.clone());
    let tag_repo = SqlxTagRepository::boxed(pool.clone());

    // Initialize services
    let signer = TokenSigner::new(&config.auth.jwt_secret, config.auth.access_token_ttl_minutes);
    let user_service = Arc::new(UserService::new(
        user_repo,
        token_repo,
        signer,
        config.auth.refresh_token_ttl_days,
    ));
    let article_service = Arc::new(ArticleService::new(article_repo, tag_repo.clone()));
    let category_service = Arc::new(CategoryService::new(category_repo));
    let tag_service = Arc::new(TagService::new(tag_repo));

    // Build application state
    let state = AppState {
        pool: pool.clone(),
        user_service: user_service.clone(),
        article_service,
        category_service,
        tag_service,
    };

    // Expired refresh tokens pile up otherwise; sweep hourly
    {
        let user_service = user_service.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(tokio::time::Duration::from_secs(3600));
            loop {
                interval.tick().await;
                match user_service.cleanup_expired_tokens().await {
                    Ok(0) => {}
                    Ok(n) => tracing::debug!("Removed {} expired refresh token(s)", n),
                    Err(e) => tracing::warn!("Refresh token cleanup failed: {}", e),
                }
            }
        });
    }

    // Build router
    let app = api::build_router(state, &config.server.cors_origin);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
