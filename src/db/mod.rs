//! Database layer
//!
//! SQLite-backed persistence for the blog. Repositories are trait-based so
//! services depend on `Arc<dyn ...Repository>` rather than a concrete pool.

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{create_pool, create_test_pool};
