//! Article HTTP handlers
//!
//! Route semantics:
//! - `GET /articles`: filtered, ordered, paginated list
//! - `GET /articles/{id}`: detail with rendered body; counts the view
//! - `GET|POST /articles/create`: login required; GET serves the form
//! - `GET|POST /articles/{id}/update`: login plus ownership required
//! - `POST /articles/{id}/delete`: POST-only, otherwise 405

use axum::{
    extract::{Path, Query, State},
    response::Redirect,
    Json,
};
use tracing::info;

use crate::api::middleware::{ApiError, AppState, RequireLogin};
use crate::api::responses::{
    ArticleDetailResponse, ArticleFormResponse, ArticleListResponse, ColumnOption, FormValues,
};
use crate::models::ArticleListQuery;
use crate::services::article::{ArticleForm, ArticleUpdateForm};

/// GET /articles
pub async fn list_articles(
    State(state): State<AppState>,
    Query(query): Query<ArticleListQuery>,
) -> Result<Json<ArticleListResponse>, ApiError> {
    let page = state.article_service.list(&query).await?;
    Ok(Json(ArticleListResponse::new(page, &query)))
}

/// GET /articles/{id}
pub async fn article_detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ArticleDetailResponse>, ApiError> {
    let detail = state.article_service.detail(id).await?;
    Ok(Json(detail.into()))
}

/// GET /articles/create
pub async fn create_form(
    RequireLogin(_user): RequireLogin,
    State(state): State<AppState>,
) -> Result<Json<ArticleFormResponse>, ApiError> {
    let columns = state
        .columns
        .list()
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to list columns: {}", e)))?;

    Ok(Json(ArticleFormResponse {
        form: FormValues::default(),
        columns: columns.into_iter().map(ColumnOption::from).collect(),
    }))
}

/// POST /articles/create
pub async fn create_article(
    RequireLogin(user): RequireLogin,
    State(state): State<AppState>,
    Json(form): Json<ArticleForm>,
) -> Result<Redirect, ApiError> {
    let article = state.article_service.create(&user, form).await?;
    info!(article_id = article.id, author = %user.username, "article created");
    Ok(Redirect::to("/articles"))
}

/// GET /articles/{id}/update
pub async fn update_form(
    RequireLogin(user): RequireLogin,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ArticleFormResponse>, ApiError> {
    let (article, tags) = state.article_service.editable(&user, id).await?;
    let columns = state
        .columns
        .list()
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to list columns: {}", e)))?;

    Ok(Json(ArticleFormResponse {
        form: FormValues::from_article(article, tags),
        columns: columns.into_iter().map(ColumnOption::from).collect(),
    }))
}

/// POST /articles/{id}/update
pub async fn update_article(
    RequireLogin(user): RequireLogin,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(form): Json<ArticleUpdateForm>,
) -> Result<Redirect, ApiError> {
    state.article_service.update(&user, id, form).await?;
    info!(article_id = id, author = %user.username, "article updated");
    Ok(Redirect::to(&format!("/articles/{}", id)))
}

/// POST /articles/{id}/delete
pub async fn delete_article(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Redirect, ApiError> {
    state.article_service.delete(id).await?;
    info!(article_id = id, "article deleted");
    Ok(Redirect::to("/articles"))
}

/// Fallback for the delete route when the method is not POST.
pub async fn delete_method_not_allowed() -> ApiError {
    ApiError::method_not_allowed("Articles can only be deleted with POST")
}
