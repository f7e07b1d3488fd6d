//! Stockroom Database Layer
//!
//! This crate provides the persistence layer for Stockroom,
//! using SQLite via sqlx for the product catalog and the
//! administrator credential store.

pub mod error;
pub mod models;
pub mod repository;
pub mod utils;

pub use error::DbError;
pub use models::*;
pub use repository::{CatalogStats, CategoryCount, Database};

/// Re-export sqlx types for convenience
pub use sqlx::SqlitePool;
pub use sqlx::sqlite::SqlitePoolOptions;
