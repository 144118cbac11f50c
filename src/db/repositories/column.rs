//! Column repository

use crate::models::ArticleColumn;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::SqlitePool;
use std::sync::Arc;

/// Column repository trait
#[async_trait]
pub trait ColumnRepository: Send + Sync {
    /// Get column by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<ArticleColumn>>;

    /// List all columns by name
    async fn list(&self) -> Result<Vec<ArticleColumn>>;
}

/// SQLx-based column repository implementation
pub struct SqlxColumnRepository {
    pool: SqlitePool,
}

impl SqlxColumnRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn ColumnRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl ColumnRepository for SqlxColumnRepository {
    async fn get_by_id(&self, id: i64) -> Result<Option<ArticleColumn>> {
        sqlx::query_as::<_, ArticleColumn>(
            "SELECT id, name, created_at FROM columns WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get column by ID")
    }

    async fn list(&self) -> Result<Vec<ArticleColumn>> {
        sqlx::query_as::<_, ArticleColumn>(
            "SELECT id, name, created_at FROM columns ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list columns")
    }
}
