//! Article service
//!
//! Core business logic for the article views: the filtered/ordered/paginated
//! list, the detail view with its view-count increment and Markdown render,
//! and the authenticated create/update/delete flows.

use crate::db::repositories::{
    ArticleRepository, ColumnRepository, CommentRepository, TagRepository,
};
use crate::models::{
    Article, ArticleFilter, ArticleListQuery, ArticleOrdering, Comment, CreateArticleInput, Page,
    Tag, UpdateArticleInput, User, PAGE_SIZE,
};
use crate::models::tag::split_tag_names;
use crate::services::markdown::{MarkdownRenderer, TocEntry};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Maximum accepted title length, in characters.
const MAX_TITLE_CHARS: usize = 200;

/// Errors that can occur in article operations
#[derive(Debug, Error)]
pub enum ArticleServiceError {
    #[error("Article not found: {0}")]
    NotFound(i64),

    #[error("{reason}")]
    Validation {
        reason: String,
        /// The submitted form, echoed back so clients can re-render it
        submitted: serde_json::Value,
    },

    #[error("Only the author may modify this article")]
    Forbidden,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Form payload for creating an article
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleForm {
    pub title: String,
    pub body: String,
    /// Column id as a digit string, or the sentinel `"none"`
    #[serde(default)]
    pub column: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

/// Form payload for updating an article
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleUpdateForm {
    pub title: String,
    pub body: String,
    /// Column id as a digit string, or the sentinel `"none"`
    #[serde(default)]
    pub column: Option<String>,
    /// Single comma-separated string; empty clears every tag
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

/// A paginated article list
pub type ArticleListing = Page<Article>;

/// Everything the detail view shows for one article
#[derive(Debug, Clone)]
pub struct ArticleDetail {
    /// The article, with `total_views` reflecting this view's increment
    pub article: Article,
    /// Body rendered from Markdown
    pub html: String,
    pub toc: Vec<TocEntry>,
    pub tags: Vec<Tag>,
    pub comments: Vec<Comment>,
}

/// Article service handling list, detail, and mutation flows
pub struct ArticleService {
    articles: Arc<dyn ArticleRepository>,
    columns: Arc<dyn ColumnRepository>,
    tags: Arc<dyn TagRepository>,
    comments: Arc<dyn CommentRepository>,
    renderer: MarkdownRenderer,
}

impl ArticleService {
    pub fn new(
        articles: Arc<dyn ArticleRepository>,
        columns: Arc<dyn ColumnRepository>,
        tags: Arc<dyn TagRepository>,
        comments: Arc<dyn CommentRepository>,
        renderer: MarkdownRenderer,
    ) -> Self {
        Self {
            articles,
            columns,
            tags,
            comments,
            renderer,
        }
    }

    /// List articles for the given query parameters.
    ///
    /// View-count ordering applies to the whole collection: selecting
    /// `order=total_views` discards any search/column/tag filters.
    pub async fn list(
        &self,
        query: &ArticleListQuery,
    ) -> Result<ArticleListing, ArticleServiceError> {
        let ordering = query.ordering();
        let filter = if ordering == ArticleOrdering::TotalViews {
            ArticleFilter::default()
        } else {
            query.filter()
        };

        let total = self.articles.count(&filter).await?;
        let page = query.resolve_page(total);
        let offset = Page::<Article>::offset_for(page, PAGE_SIZE);

        let items = self
            .articles
            .list(&filter, ordering, offset, PAGE_SIZE as i64)
            .await?;

        debug!(total, page, "listed articles");
        Ok(Page::new(items, total, page, PAGE_SIZE))
    }

    /// Fetch one article for display, counting the view.
    ///
    /// The increment happens on every successful fetch, with no
    /// deduplication by viewer.
    pub async fn detail(&self, id: i64) -> Result<ArticleDetail, ArticleServiceError> {
        let mut article = self
            .articles
            .get_by_id(id)
            .await?
            .ok_or(ArticleServiceError::NotFound(id))?;

        let comments = self.comments.list_by_article(id).await?;
        let tags = self.tags.list_for_article(id).await?;

        self.articles.increment_views(id).await?;
        // Mirror the store-side increment without a second fetch
        article.total_views += 1;

        let rendered = self.renderer.render_with_toc(&article.body);

        Ok(ArticleDetail {
            article,
            html: rendered.html,
            toc: rendered.toc,
            tags,
            comments,
        })
    }

    /// Create an article owned by `user`.
    pub async fn create(
        &self,
        user: &User,
        form: ArticleForm,
    ) -> Result<Article, ArticleServiceError> {
        let submitted = || serde_json::to_value(&form).unwrap_or_default();

        if let Err(reason) = validate_text(&form.title, &form.body) {
            return Err(ArticleServiceError::Validation {
                reason,
                submitted: submitted(),
            });
        }

        let column_id = match self.resolve_column(form.column.as_deref()).await? {
            Ok(column_id) => column_id,
            Err(reason) => {
                return Err(ArticleServiceError::Validation {
                    reason,
                    submitted: submitted(),
                });
            }
        };

        let names: Vec<String> = form
            .tags
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();

        let article = self
            .articles
            .create(&CreateArticleInput {
                title: form.title,
                body: form.body,
                author_id: user.id,
                column_id,
                avatar: form.avatar,
            })
            .await?;

        self.tags.set_for_article(article.id, &names).await?;

        debug!(article_id = article.id, author_id = user.id, "created article");
        Ok(article)
    }

    /// Fetch an article for the pre-populated edit form.
    ///
    /// Enforces the same ownership rule as the update itself.
    pub async fn editable(
        &self,
        user: &User,
        id: i64,
    ) -> Result<(Article, Vec<Tag>), ArticleServiceError> {
        let article = self
            .articles
            .get_by_id(id)
            .await?
            .ok_or(ArticleServiceError::NotFound(id))?;

        if !user.owns(article.author_id) {
            return Err(ArticleServiceError::Forbidden);
        }

        let tags = self.tags.list_for_article(id).await?;
        Ok((article, tags))
    }

    /// Update an article. Only the author may do this.
    ///
    /// Title and body are overwritten with the validated values; the tag set
    /// is fully replaced (an empty tags string clears all); `author_id` and
    /// `total_views` are never touched.
    pub async fn update(
        &self,
        user: &User,
        id: i64,
        form: ArticleUpdateForm,
    ) -> Result<Article, ArticleServiceError> {
        let article = self
            .articles
            .get_by_id(id)
            .await?
            .ok_or(ArticleServiceError::NotFound(id))?;

        if !user.owns(article.author_id) {
            return Err(ArticleServiceError::Forbidden);
        }

        let submitted = || serde_json::to_value(&form).unwrap_or_default();

        if let Err(reason) = validate_text(&form.title, &form.body) {
            return Err(ArticleServiceError::Validation {
                reason,
                submitted: submitted(),
            });
        }

        let column_id = match self.resolve_column(form.column.as_deref()).await? {
            Ok(column_id) => column_id,
            Err(reason) => {
                return Err(ArticleServiceError::Validation {
                    reason,
                    submitted: submitted(),
                });
            }
        };

        let names = split_tag_names(&form.tags);

        let updated = self
            .articles
            .update(
                id,
                &UpdateArticleInput {
                    title: form.title,
                    body: form.body,
                    column_id,
                    avatar: form.avatar,
                },
            )
            .await?;

        self.tags.set_for_article(id, &names).await?;

        debug!(article_id = id, "updated article");
        Ok(updated)
    }

    /// Delete an article by id.
    ///
    /// There is deliberately no ownership or authentication check here; the
    /// only gate is the POST-only routing at the HTTP layer.
    pub async fn delete(&self, id: i64) -> Result<(), ArticleServiceError> {
        if self.articles.get_by_id(id).await?.is_none() {
            return Err(ArticleServiceError::NotFound(id));
        }

        self.articles.delete(id).await?;
        debug!(article_id = id, "deleted article");
        Ok(())
    }

    /// Resolve a raw column form value into an optional column id.
    ///
    /// `None`, the empty string, and the sentinel `"none"` mean "no column".
    /// The inner `Result` carries the validation failure reason.
    async fn resolve_column(
        &self,
        raw: Option<&str>,
    ) -> Result<Result<Option<i64>, String>, ArticleServiceError> {
        let raw = match raw {
            None | Some("") | Some("none") => return Ok(Ok(None)),
            Some(raw) => raw,
        };

        let id = match raw.parse::<i64>() {
            Ok(id) if raw.bytes().all(|b| b.is_ascii_digit()) => id,
            _ => {
                return Ok(Err(format!(
                    "column must be a column id or \"none\", got {:?}",
                    raw
                )))
            }
        };

        match self.columns.get_by_id(id).await? {
            Some(_) => Ok(Ok(Some(id))),
            None => Ok(Err(format!("unknown column id {}", id))),
        }
    }
}

/// Shared title/body validation for create and update.
fn validate_text(title: &str, body: &str) -> Result<(), String> {
    if title.trim().is_empty() {
        return Err("title must not be empty".to_string());
    }
    if title.chars().count() > MAX_TITLE_CHARS {
        return Err(format!(
            "title must be at most {} characters",
            MAX_TITLE_CHARS
        ));
    }
    if body.trim().is_empty() {
        return Err("body must not be empty".to_string());
    }
    Ok(())
}
