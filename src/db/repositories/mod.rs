//! Database repositories
//!
//! One trait per entity; services depend on `Arc<dyn ...Repository>`.

pub mod article;
pub mod column;
pub mod comment;
pub mod tag;
pub mod user;

pub use article::{ArticleRepository, SqlxArticleRepository};
pub use column::{ColumnRepository, SqlxColumnRepository};
pub use comment::{CommentRepository, SqlxCommentRepository};
pub use tag::{SqlxTagRepository, TagRepository};
pub use user::{SqlxUserRepository, UserRepository};
