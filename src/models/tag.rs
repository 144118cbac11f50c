//! Tag model

use serde::{Deserialize, Serialize};

/// A free-form label, many-to-many with articles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

/// Split a comma-separated tags string into cleaned tag names.
///
/// Entries are trimmed and empties dropped, so an empty or all-comma input
/// yields no tags ("clear all"), never "no change".
pub fn split_tag_names(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
