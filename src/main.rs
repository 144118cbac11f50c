//! Minipress - a small article publishing service

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use minipress::{
    api::{self, AppState},
    config::Config,
    db::{
        self,
        repositories::{
            SqlxArticleRepository, SqlxColumnRepository, SqlxCommentRepository,
            SqlxTagRepository, SqlxUserRepository,
        },
    },
    services::{article::ArticleService, markdown::MarkdownRenderer},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "minipress=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting minipress...");

    // Load configuration
    let config = Config::load_with_env(Path::new("config.yml"))?;
    tracing::info!("Configuration loaded");

    // Initialize database
    let pool = db::create_pool(&config.database).await?;
    tracing::info!("Database connected: {}", config.database.url);

    // Run migrations
    db::migrations::run_migrations(&pool).await?;
    tracing::info!("Database migrations completed");

    // Wire up services
    let column_repo = SqlxColumnRepository::boxed(pool.clone());
    let user_repo = SqlxUserRepository::boxed(pool.clone());
    let article_service = Arc::new(ArticleService::new(
        SqlxArticleRepository::boxed(pool.clone()),
        column_repo.clone(),
        SqlxTagRepository::boxed(pool.clone()),
        SqlxCommentRepository::boxed(pool.clone()),
        MarkdownRenderer::new(),
    ));

    let state = AppState {
        article_service,
        columns: column_repo,
        users: user_repo,
    };

    let app = api::build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
