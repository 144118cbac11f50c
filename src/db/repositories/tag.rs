//! Tag repository
//!
//! Tags are shared rows linked to articles through `article_tags`;
//! `set_for_article` replaces an article's whole tag set in one call.

use crate::models::Tag;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::SqlitePool;
use std::sync::Arc;

/// Tag repository trait
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// Get an existing tag by name or create it
    async fn get_or_create(&self, name: &str) -> Result<Tag>;

    /// List tags linked to an article, by name
    async fn list_for_article(&self, article_id: i64) -> Result<Vec<Tag>>;

    /// Replace an article's tag links with exactly `names`.
    /// An empty slice clears every link.
    async fn set_for_article(&self, article_id: i64, names: &[String]) -> Result<()>;
}

/// SQLx-based tag repository implementation
pub struct SqlxTagRepository {
    pool: SqlitePool,
}

impl SqlxTagRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn TagRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl TagRepository for SqlxTagRepository {
    async fn get_or_create(&self, name: &str) -> Result<Tag> {
        sqlx::query("INSERT OR IGNORE INTO tags (name) VALUES (?)")
            .bind(name)
            .execute(&self.pool)
            .await
            .context("Failed to insert tag")?;

        sqlx::query_as::<_, Tag>("SELECT id, name FROM tags WHERE name = ?")
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .context("Failed to fetch tag after insert")
    }

    async fn list_for_article(&self, article_id: i64) -> Result<Vec<Tag>> {
        sqlx::query_as::<_, Tag>(
            r#"
            SELECT t.id, t.name
            FROM tags t
            JOIN article_tags at ON at.tag_id = t.id
            WHERE at.article_id = ?
            ORDER BY t.name
            "#,
        )
        .bind(article_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list tags for article")
    }

    async fn set_for_article(&self, article_id: i64, names: &[String]) -> Result<()> {
        sqlx::query("DELETE FROM article_tags WHERE article_id = ?")
            .bind(article_id)
            .execute(&self.pool)
            .await
            .context("Failed to clear article tags")?;

        for name in names {
            let tag = self.get_or_create(name).await?;
            sqlx::query(
                "INSERT OR IGNORE INTO article_tags (article_id, tag_id) VALUES (?, ?)",
            )
            .bind(article_id)
            .bind(tag.id)
            .execute(&self.pool)
            .await
            .context("Failed to link tag to article")?;
        }

        Ok(())
    }
}
