//! Minipress - article backend for a lightweight blog
//!
//! This library provides the article feature set: listing with
//! search/filter/pagination, Markdown rendering with view counting, and
//! authenticated create/update/delete flows.

pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod services;
