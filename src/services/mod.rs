//! Business logic services

pub mod article;
pub mod markdown;

pub use article::{ArticleService, ArticleServiceError};
pub use markdown::{MarkdownRenderer, RenderedMarkdown, TocEntry};
