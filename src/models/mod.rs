//! Domain models

pub mod article;
pub mod column;
pub mod comment;
pub mod tag;
pub mod user;

pub use article::{
    Article, ArticleFilter, ArticleListQuery, ArticleOrdering, CreateArticleInput, Page,
    UpdateArticleInput, PAGE_SIZE,
};
pub use column::ArticleColumn;
pub use comment::Comment;
pub use tag::Tag;
pub use user::User;
