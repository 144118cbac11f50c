//! HTTP-level tests for the article endpoints

use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::api::middleware::AppState;
use crate::api::build_router;
use crate::db::repositories::{
    SqlxArticleRepository, SqlxColumnRepository, SqlxCommentRepository, SqlxTagRepository,
    SqlxUserRepository,
};
use crate::db::{create_test_pool, migrations};
use crate::services::article::ArticleService;
use crate::services::markdown::MarkdownRenderer;

const ALICE_TOKEN: &str = "alice-session";
const BOB_TOKEN: &str = "bob-session";
const EXPIRED_TOKEN: &str = "expired-session";

async fn setup() -> (SqlitePool, TestServer) {
    let pool = create_test_pool().await.unwrap();
    migrations::run_migrations(&pool).await.unwrap();

    let now = Utc::now();
    for (id, name) in [(1, "alice"), (2, "bob")] {
        sqlx::query("INSERT INTO users (id, username, created_at) VALUES (?, ?, ?)")
            .bind(id)
            .bind(name)
            .bind(now)
            .execute(&pool)
            .await
            .unwrap();
    }
    for (token, user_id, hours) in [(ALICE_TOKEN, 1, 2), (BOB_TOKEN, 2, 2), (EXPIRED_TOKEN, 1, -2)]
    {
        sqlx::query(
            "INSERT INTO sessions (token, user_id, expires_at, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(token)
        .bind(user_id)
        .bind(now + Duration::hours(hours))
        .bind(now)
        .execute(&pool)
        .await
        .unwrap();
    }
    sqlx::query("INSERT INTO columns (id, name, created_at) VALUES (10, 'tools', ?)")
        .bind(now)
        .execute(&pool)
        .await
        .unwrap();

    let article_service = Arc::new(ArticleService::new(
        SqlxArticleRepository::boxed(pool.clone()),
        SqlxColumnRepository::boxed(pool.clone()),
        SqlxTagRepository::boxed(pool.clone()),
        SqlxCommentRepository::boxed(pool.clone()),
        MarkdownRenderer::new(),
    ));
    let state = AppState {
        article_service,
        columns: SqlxColumnRepository::boxed(pool.clone()),
        users: SqlxUserRepository::boxed(pool.clone()),
    };

    let server = TestServer::new(build_router(state)).unwrap();
    (pool, server)
}

async fn post_article(server: &TestServer, token: &str, payload: Value) -> axum_test::TestResponse {
    server
        .post("/articles/create")
        .authorization_bearer(token)
        .json(&payload)
        .await
}

fn article_payload(title: &str) -> Value {
    json!({
        "title": title,
        "body": "# Intro\n\nSome text.",
        "column": "none",
        "tags": ["rust", "web"],
    })
}

async fn article_count(pool: &SqlitePool) -> i64 {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM articles")
        .fetch_one(pool)
        .await
        .unwrap();
    row.0
}

#[tokio::test]
async fn test_list_empty() {
    let (_pool, server) = setup().await;
    let response = server.get("/articles").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["total"], 0);
    assert_eq!(body["page"], 1);
    assert_eq!(body["articles"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_list_paginates_and_echoes_filters() {
    let (_pool, server) = setup().await;
    for i in 1..=5 {
        post_article(&server, ALICE_TOKEN, article_payload(&format!("Post {}", i)))
            .await
            .assert_status(StatusCode::SEE_OTHER);
    }

    let response = server
        .get("/articles")
        .add_query_param("page", "2")
        .add_query_param("search", "Post")
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["total"], 5);
    assert_eq!(body["page"], 2);
    assert_eq!(body["per_page"], 3);
    assert_eq!(body["total_pages"], 2);
    assert_eq!(body["search"], "Post");
    assert_eq!(body["articles"].as_array().unwrap().len(), 2);
    // Summaries carry no body field
    assert!(body["articles"][0].get("body").is_none());
}

#[tokio::test]
async fn test_detail_renders_and_counts_views() {
    let (_pool, server) = setup().await;
    post_article(&server, ALICE_TOKEN, article_payload("Rendered"))
        .await
        .assert_status(StatusCode::SEE_OTHER);

    let first: Value = server.get("/articles/1").await.json();
    assert_eq!(first["total_views"], 1);
    assert!(first["body"].as_str().unwrap().contains("<h1 id=\"intro\">"));
    assert_eq!(first["toc"][0]["title"], "Intro");
    assert_eq!(first["tags"], json!(["rust", "web"]));

    let second: Value = server.get("/articles/1").await.json();
    assert_eq!(second["total_views"], 2);
}

#[tokio::test]
async fn test_detail_unknown_id_is_404() {
    let (_pool, server) = setup().await;
    let response = server.get("/articles/999").await;
    response.assert_status_not_found();

    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_create_without_session_redirects_to_login() {
    let (pool, server) = setup().await;

    let get = server.get("/articles/create").await;
    get.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(get.header("location"), "/account/login");

    let post = server
        .post("/articles/create")
        .json(&article_payload("Nope"))
        .await;
    post.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(post.header("location"), "/account/login");
    assert_eq!(article_count(&pool).await, 0);
}

#[tokio::test]
async fn test_create_with_expired_session_redirects() {
    let (pool, server) = setup().await;
    let response = post_article(&server, EXPIRED_TOKEN, article_payload("Stale")).await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "/account/login");
    assert_eq!(article_count(&pool).await, 0);
}

#[tokio::test]
async fn test_create_form_lists_columns() {
    let (_pool, server) = setup().await;
    let response = server
        .get("/articles/create")
        .authorization_bearer(ALICE_TOKEN)
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["form"]["title"], "");
    assert_eq!(body["columns"][0]["name"], "tools");
}

#[tokio::test]
async fn test_create_success_redirects_to_list() {
    let (pool, server) = setup().await;
    let response = post_article(&server, ALICE_TOKEN, article_payload("Mine")).await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "/articles");
    assert_eq!(article_count(&pool).await, 1);

    let detail: Value = server.get("/articles/1").await.json();
    assert_eq!(detail["author_id"], 1);
}

#[tokio::test]
async fn test_create_invalid_echoes_submitted_values() {
    let (pool, server) = setup().await;
    let response = post_article(
        &server,
        ALICE_TOKEN,
        json!({"title": "", "body": "text", "tags": ["rust"]}),
    )
    .await;
    response.assert_status_bad_request();

    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["details"]["body"], "text");
    assert_eq!(body["error"]["details"]["tags"], json!(["rust"]));
    assert_eq!(article_count(&pool).await, 0);
}

#[tokio::test]
async fn test_create_unknown_column_is_validation_error() {
    let (_pool, server) = setup().await;
    let response = post_article(
        &server,
        ALICE_TOKEN,
        json!({"title": "T", "body": "b", "column": "999"}),
    )
    .await;
    response.assert_status_bad_request();

    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_update_form_is_prepopulated() {
    let (_pool, server) = setup().await;
    post_article(&server, ALICE_TOKEN, article_payload("Before"))
        .await
        .assert_status(StatusCode::SEE_OTHER);

    let response = server
        .get("/articles/1/update")
        .authorization_bearer(ALICE_TOKEN)
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["form"]["title"], "Before");
    assert_eq!(body["form"]["tags"], "rust,web");
    // Raw markdown, not HTML
    assert!(body["form"]["body"].as_str().unwrap().starts_with("# Intro"));
}

#[tokio::test]
async fn test_update_replaces_tags_and_redirects() {
    let (_pool, server) = setup().await;
    post_article(&server, ALICE_TOKEN, article_payload("Before")).await;

    let response = server
        .post("/articles/1/update")
        .authorization_bearer(ALICE_TOKEN)
        .json(&json!({
            "title": "After",
            "body": "New body",
            "column": "10",
            "tags": "web, fresh",
        }))
        .await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "/articles/1");

    let detail: Value = server.get("/articles/1").await.json();
    assert_eq!(detail["title"], "After");
    assert_eq!(detail["column_id"], 10);
    assert_eq!(detail["tags"], json!(["fresh", "web"]));
}

#[tokio::test]
async fn test_update_by_non_author_is_forbidden() {
    let (_pool, server) = setup().await;
    post_article(&server, ALICE_TOKEN, article_payload("Hers")).await;

    let response = server
        .post("/articles/1/update")
        .authorization_bearer(BOB_TOKEN)
        .json(&json!({"title": "Stolen", "body": "x", "tags": ""}))
        .await;
    response.assert_status_forbidden();

    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "FORBIDDEN");

    // Article untouched
    let detail: Value = server.get("/articles/1").await.json();
    assert_eq!(detail["title"], "Hers");
}

#[tokio::test]
async fn test_update_without_session_redirects() {
    let (_pool, server) = setup().await;
    post_article(&server, ALICE_TOKEN, article_payload("Kept")).await;

    let response = server
        .post("/articles/1/update")
        .json(&json!({"title": "X", "body": "y", "tags": ""}))
        .await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "/account/login");
}

#[tokio::test]
async fn test_delete_rejects_non_post() {
    let (pool, server) = setup().await;
    post_article(&server, ALICE_TOKEN, article_payload("Sturdy")).await;

    let response = server.get("/articles/1/delete").await;
    response.assert_status(StatusCode::METHOD_NOT_ALLOWED);

    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "METHOD_NOT_ALLOWED");
    assert_eq!(article_count(&pool).await, 1);
}

#[tokio::test]
async fn test_delete_with_post_needs_no_session() {
    let (pool, server) = setup().await;
    post_article(&server, ALICE_TOKEN, article_payload("Doomed")).await;

    // No Authorization header at all
    let response = server.post("/articles/1/delete").await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "/articles");
    assert_eq!(article_count(&pool).await, 0);
}

#[tokio::test]
async fn test_delete_unknown_id_is_404() {
    let (_pool, server) = setup().await;
    let response = server.post("/articles/999/delete").await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn test_order_by_views_ignores_search_filter() {
    let (_pool, server) = setup().await;
    post_article(&server, ALICE_TOKEN, article_payload("Hot")).await;
    post_article(
        &server,
        ALICE_TOKEN,
        json!({"title": "Cold match", "body": "searchable", "tags": []}),
    )
    .await;

    // Two views for "Hot"
    server.get("/articles/1").await.assert_status_ok();
    server.get("/articles/1").await.assert_status_ok();

    let body: Value = server
        .get("/articles")
        .add_query_param("search", "searchable")
        .add_query_param("order", "total_views")
        .await
        .json();
    assert_eq!(body["total"], 2);
    assert_eq!(body["articles"][0]["title"], "Hot");
}
