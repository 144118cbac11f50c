//! Article model
//!
//! This module provides:
//! - `Article` entity representing a blog article
//! - Input types for creating and updating articles
//! - `ArticleListQuery` translating raw request parameters into a filter,
//!   an ordering, and a resolved page number
//! - `Page` container for paginated results

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fixed number of articles per list page.
pub const PAGE_SIZE: u32 = 3;

/// Article entity
///
/// `body` always holds raw Markdown; rendered HTML exists only in responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    /// Unique identifier
    pub id: i64,
    /// Article title
    pub title: String,
    /// Markdown content
    pub body: String,
    /// Author user ID, set at creation and never changed
    pub author_id: i64,
    /// Optional column (category bucket) ID
    pub column_id: Option<i64>,
    /// Optional avatar/cover image reference
    pub avatar: Option<String>,
    /// View counter, incremented once per detail view
    pub total_views: i64,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new article
#[derive(Debug, Clone)]
pub struct CreateArticleInput {
    pub title: String,
    pub body: String,
    pub author_id: i64,
    pub column_id: Option<i64>,
    pub avatar: Option<String>,
}

/// Input for updating an existing article
///
/// Title and body are overwritten unconditionally; `column_id` is set or
/// cleared; `avatar` is replaced only when present.
#[derive(Debug, Clone)]
pub struct UpdateArticleInput {
    pub title: String,
    pub body: String,
    pub column_id: Option<i64>,
    pub avatar: Option<String>,
}

/// Raw list-view request parameters, exactly as received.
///
/// Interpretation (digit checks, sentinel values, page fallback) happens in
/// the accessors below so the raw values can be echoed back to the client.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArticleListQuery {
    pub search: Option<String>,
    pub order: Option<String>,
    pub column: Option<String>,
    pub tag: Option<String>,
    pub page: Option<String>,
}

impl ArticleListQuery {
    /// Derive the store filter from the raw parameters.
    ///
    /// - `search`: applied when non-empty
    /// - `column`: applied only when the value is all ASCII digits
    /// - `tag`: applied when non-empty and not the literal `"None"`
    pub fn filter(&self) -> ArticleFilter {
        let search = self
            .search
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let column_id = self
            .column
            .as_deref()
            .filter(|c| !c.is_empty() && c.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|c| c.parse::<i64>().ok());

        let tag = self
            .tag
            .as_deref()
            .filter(|t| !t.is_empty() && *t != "None")
            .map(str::to_string);

        ArticleFilter {
            search,
            column_id,
            tag,
        }
    }

    /// Derive the ordering from the raw `order` parameter.
    pub fn ordering(&self) -> ArticleOrdering {
        match self.order.as_deref() {
            Some("total_views") => ArticleOrdering::TotalViews,
            _ => ArticleOrdering::Default,
        }
    }

    /// Resolve the requested page against the total item count.
    ///
    /// Fallback policy: a missing, non-numeric, or below-range page falls to
    /// the first page; an above-range page falls to the last page. An empty
    /// collection still has one (empty) page.
    pub fn resolve_page(&self, total: i64) -> u32 {
        let last_page = total_pages(total, PAGE_SIZE);
        match self.page.as_deref().and_then(|p| p.parse::<u32>().ok()) {
            None => 1,
            Some(0) => 1,
            Some(n) if n > last_page => last_page,
            Some(n) => n,
        }
    }

    /// Search text for display, with absence normalized to empty.
    pub fn search_for_display(&self) -> &str {
        self.search.as_deref().unwrap_or("")
    }
}

/// Store-level filter derived from list parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleFilter {
    /// Case-insensitive substring over title OR body
    pub search: Option<String>,
    /// Exact column id
    pub column_id: Option<i64>,
    /// Exact, case-sensitive tag name
    pub tag: Option<String>,
}

impl ArticleFilter {
    pub fn is_empty(&self) -> bool {
        self.search.is_none() && self.column_id.is_none() && self.tag.is_none()
    }
}

/// List ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArticleOrdering {
    /// Store default: insertion (id) order
    Default,
    /// Descending view count
    TotalViews,
}

/// Number of pages needed for `total` items, never less than 1.
pub fn total_pages(total: i64, per_page: u32) -> u32 {
    if total <= 0 {
        return 1;
    }
    ((total as u64 + per_page as u64 - 1) / per_page as u64) as u32
}

/// Paginated result container
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items in the current page
    pub items: Vec<T>,
    /// Total number of items across all pages
    pub total: i64,
    /// Current page number (1-indexed)
    pub page: u32,
    /// Number of items per page
    pub per_page: u32,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, page: u32, per_page: u32) -> Self {
        Self {
            items,
            total,
            page,
            per_page,
        }
    }

    /// Offset of the first item on `page`.
    pub fn offset_for(page: u32, per_page: u32) -> i64 {
        (page.saturating_sub(1) as i64) * per_page as i64
    }

    pub fn total_pages(&self) -> u32 {
        total_pages(self.total, self.per_page)
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
