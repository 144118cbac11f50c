//! Article column model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named bucket articles may optionally belong to.
///
/// Columns are managed outside this core; here they are read for form
/// display and resolved by id on create/update.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ArticleColumn {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}
