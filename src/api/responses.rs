//! API response types
//!
//! JSON payloads returned by the article endpoints, with conversions from
//! the domain models.

use crate::models::{Article, ArticleColumn, ArticleListQuery, Comment, Page, Tag};
use crate::services::article::ArticleDetail;
use crate::services::markdown::TocEntry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One article in the list view. The body is not included; clients fetch
/// the detail view for content.
#[derive(Debug, Serialize, Deserialize)]
pub struct ArticleSummary {
    pub id: i64,
    pub title: String,
    pub author_id: i64,
    pub column_id: Option<i64>,
    pub avatar: Option<String>,
    pub total_views: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Article> for ArticleSummary {
    fn from(article: Article) -> Self {
        Self {
            id: article.id,
            title: article.title,
            author_id: article.author_id,
            column_id: article.column_id,
            avatar: article.avatar,
            total_views: article.total_views,
            created_at: article.created_at,
            updated_at: article.updated_at,
        }
    }
}

/// List view response: the page of articles plus the raw query context so
/// clients can round-trip filters into pagination links.
#[derive(Debug, Serialize, Deserialize)]
pub struct ArticleListResponse {
    pub articles: Vec<ArticleSummary>,
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_prev: bool,
    pub search: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl ArticleListResponse {
    pub fn new(page: Page<Article>, query: &ArticleListQuery) -> Self {
        Self {
            total: page.total,
            page: page.page,
            per_page: page.per_page,
            total_pages: page.total_pages(),
            has_next: page.has_next(),
            has_prev: page.has_prev(),
            articles: page.items.into_iter().map(ArticleSummary::from).collect(),
            search: query.search_for_display().to_string(),
            order: query.order.clone(),
            column: query.column.clone(),
            tag: query.tag.clone(),
        }
    }
}

/// Detail view response. `body` holds rendered HTML; the raw Markdown is
/// not echoed.
#[derive(Debug, Serialize, Deserialize)]
pub struct ArticleDetailResponse {
    pub id: i64,
    pub title: String,
    /// Rendered HTML
    pub body: String,
    pub author_id: i64,
    pub column_id: Option<i64>,
    pub avatar: Option<String>,
    /// Includes the increment caused by this request
    pub total_views: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub toc: Vec<TocEntry>,
    pub tags: Vec<String>,
    pub comments: Vec<CommentResponse>,
}

impl From<ArticleDetail> for ArticleDetailResponse {
    fn from(detail: ArticleDetail) -> Self {
        Self {
            id: detail.article.id,
            title: detail.article.title,
            body: detail.html,
            author_id: detail.article.author_id,
            column_id: detail.article.column_id,
            avatar: detail.article.avatar,
            total_views: detail.article.total_views,
            created_at: detail.article.created_at,
            updated_at: detail.article.updated_at,
            toc: detail.toc,
            tags: detail.tags.into_iter().map(|t| t.name).collect(),
            comments: detail.comments.into_iter().map(CommentResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: i64,
    pub user_id: Option<i64>,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            user_id: comment.user_id,
            body: comment.body,
            created_at: comment.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ColumnOption {
    pub id: i64,
    pub name: String,
}

impl From<ArticleColumn> for ColumnOption {
    fn from(column: ArticleColumn) -> Self {
        Self {
            id: column.id,
            name: column.name,
        }
    }
}

/// GET response for the create and update forms.
#[derive(Debug, Serialize, Deserialize)]
pub struct ArticleFormResponse {
    pub form: FormValues,
    pub columns: Vec<ColumnOption>,
}

/// Current form field values: empty for create, pre-populated for update.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct FormValues {
    pub title: String,
    /// Raw Markdown
    pub body: String,
    pub column_id: Option<i64>,
    /// Comma-separated tag names
    pub tags: String,
    pub avatar: Option<String>,
}

impl FormValues {
    pub fn from_article(article: Article, tags: Vec<Tag>) -> Self {
        Self {
            title: article.title,
            body: article.body,
            column_id: article.column_id,
            tags: tags
                .into_iter()
                .map(|t| t.name)
                .collect::<Vec<_>>()
                .join(","),
            avatar: article.avatar,
        }
    }
}
