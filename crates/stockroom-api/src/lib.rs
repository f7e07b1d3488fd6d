//! Stockroom REST API
//!
//! This crate provides the Axum-based HTTP surface for Stockroom:
//! authentication endpoints, administrator management, the product
//! catalog, and the signed image-upload handshake.

pub mod error;
pub mod routes;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use error::ApiError;
pub use routes::create_router;
pub use state::{AppState, UploadsConfig};
