//! API layer - HTTP handlers and routing
//!
//! Article endpoints with JSON responses, session-gated mutations, and a
//! POST-only delete route.

pub mod articles;
pub mod middleware;
pub mod responses;

#[cfg(test)]
mod tests;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub use middleware::{ApiError, AppState, RequireLogin};

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/articles", get(articles::list_articles))
        .route(
            "/articles/create",
            get(articles::create_form).post(articles::create_article),
        )
        .route("/articles/{id}", get(articles::article_detail))
        .route(
            "/articles/{id}/update",
            get(articles::update_form).post(articles::update_article),
        )
        .route(
            "/articles/{id}/delete",
            post(articles::delete_article).fallback(articles::delete_method_not_allowed),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
