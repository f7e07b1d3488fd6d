//! Stockroom Authentication
//!
//! This crate provides the signed session-token codec and password
//! hashing for Stockroom. It has no HTTP knowledge; the API layer
//! decides how tokens travel and how failures map to responses.

pub mod error;
pub mod jwt;
pub mod password;
pub mod user;

pub use error::AuthError;
pub use jwt::{Claims, JwtManager};
pub use password::{hash_password, verify_password};
pub use user::AuthUser;
