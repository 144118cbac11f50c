//! Article repository
//!
//! Database operations for articles, including the filtered/ordered list
//! query behind the article list view and the field-scoped view-count
//! increment.

use crate::models::{Article, ArticleFilter, ArticleOrdering, CreateArticleInput, UpdateArticleInput};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{sqlite::SqliteRow, QueryBuilder, Row, Sqlite, SqlitePool};
use std::sync::Arc;

/// Article repository trait
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// Create a new article
    async fn create(&self, input: &CreateArticleInput) -> Result<Article>;

    /// Get article by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Article>>;

    /// List articles matching `filter`, in `ordering`, with pagination
    async fn list(
        &self,
        filter: &ArticleFilter,
        ordering: ArticleOrdering,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Article>>;

    /// Count articles matching `filter`
    async fn count(&self, filter: &ArticleFilter) -> Result<i64>;

    /// Overwrite title/body/column/avatar and refresh `updated_at`.
    /// `author_id` and `total_views` are never touched by updates.
    async fn update(&self, id: i64, input: &UpdateArticleInput) -> Result<Article>;

    /// Delete an article (comments and tag links cascade)
    async fn delete(&self, id: i64) -> Result<()>;

    /// Increment `total_views` by one, touching no other field
    async fn increment_views(&self, id: i64) -> Result<()>;
}

/// SQLx-based article repository implementation
pub struct SqlxArticleRepository {
    pool: SqlitePool,
}

impl SqlxArticleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn ArticleRepository> {
        Arc::new(Self::new(pool))
    }
}

const ARTICLE_COLUMNS: &str =
    "id, title, body, author_id, column_id, avatar, total_views, created_at, updated_at";

/// Escape LIKE wildcards so user search text matches literally.
fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Append the WHERE clauses for `filter` to a query.
///
/// SQLite's `LIKE` is case-insensitive for ASCII, matching the
/// case-insensitive substring contract of the search filter; the tag match
/// via `=` stays case-sensitive.
fn push_filter(qb: &mut QueryBuilder<'_, Sqlite>, filter: &ArticleFilter) {
    qb.push(" WHERE 1 = 1");

    if let Some(ref search) = filter.search {
        let pattern = format!("%{}%", escape_like(search));
        qb.push(" AND (title LIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" ESCAPE '\\' OR body LIKE ");
        qb.push_bind(pattern);
        qb.push(" ESCAPE '\\')");
    }

    if let Some(column_id) = filter.column_id {
        qb.push(" AND column_id = ");
        qb.push_bind(column_id);
    }

    if let Some(ref tag) = filter.tag {
        qb.push(
            " AND EXISTS (SELECT 1 FROM article_tags at \
             JOIN tags t ON t.id = at.tag_id \
             WHERE at.article_id = articles.id AND t.name = ",
        );
        qb.push_bind(tag.clone());
        qb.push(")");
    }
}

fn row_to_article(row: &SqliteRow) -> Result<Article> {
    Ok(Article {
        id: row.get("id"),
        title: row.get("title"),
        body: row.get("body"),
        author_id: row.get("author_id"),
        column_id: row.get("column_id"),
        avatar: row.get("avatar"),
        total_views: row.get("total_views"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

#[async_trait]
impl ArticleRepository for SqlxArticleRepository {
    async fn create(&self, input: &CreateArticleInput) -> Result<Article> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO articles (title, body, author_id, column_id, avatar, total_views, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, 0, ?, ?)
            "#,
        )
        .bind(&input.title)
        .bind(&input.body)
        .bind(input.author_id)
        .bind(input.column_id)
        .bind(&input.avatar)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to create article")?;

        Ok(Article {
            id: result.last_insert_rowid(),
            title: input.title.clone(),
            body: input.body.clone(),
            author_id: input.author_id,
            column_id: input.column_id,
            avatar: input.avatar.clone(),
            total_views: 0,
            created_at: now,
            updated_at: now,
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Article>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM articles WHERE id = ?",
            ARTICLE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get article by ID")?;

        match row {
            Some(row) => Ok(Some(row_to_article(&row)?)),
            None => Ok(None),
        }
    }

    async fn list(
        &self,
        filter: &ArticleFilter,
        ordering: ArticleOrdering,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Article>> {
        let mut qb = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {} FROM articles",
            ARTICLE_COLUMNS
        ));
        push_filter(&mut qb, filter);

        match ordering {
            ArticleOrdering::Default => qb.push(" ORDER BY id"),
            ArticleOrdering::TotalViews => qb.push(" ORDER BY total_views DESC, id"),
        };

        qb.push(" LIMIT ");
        qb.push_bind(limit);
        qb.push(" OFFSET ");
        qb.push_bind(offset);

        let rows = qb
            .build()
            .fetch_all(&self.pool)
            .await
            .context("Failed to list articles")?;

        let mut articles = Vec::with_capacity(rows.len());
        for row in rows {
            articles.push(row_to_article(&row)?);
        }
        Ok(articles)
    }

    async fn count(&self, filter: &ArticleFilter) -> Result<i64> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) AS count FROM articles");
        push_filter(&mut qb, filter);

        let row = qb
            .build()
            .fetch_one(&self.pool)
            .await
            .context("Failed to count articles")?;

        Ok(row.get("count"))
    }

    async fn update(&self, id: i64, input: &UpdateArticleInput) -> Result<Article> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE articles
            SET title = ?, body = ?, column_id = ?,
                avatar = COALESCE(?, avatar),
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&input.title)
        .bind(&input.body)
        .bind(input.column_id)
        .bind(&input.avatar)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await
        .context("Failed to update article")?;

        if result.rows_affected() == 0 {
            anyhow::bail!("Article not found: {}", id);
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Article disappeared after update: {}", id))
    }

    async fn delete(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM articles WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete article")?;
        Ok(())
    }

    async fn increment_views(&self, id: i64) -> Result<()> {
        sqlx::query("UPDATE articles SET total_views = total_views + 1 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to increment view count")?;
        Ok(())
    }
}
