//! Authenticated identity derived from token claims

use serde::{Deserialize, Serialize};
use stockroom_db::Role;

use crate::jwt::Claims;

/// Authenticated administrator information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: i64,
    pub email: String,
    pub role: Role,
}

impl AuthUser {
    /// Create from validated token claims
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            id: claims.sub.parse().unwrap_or(0),
            email: claims.email.clone(),
            role: claims.role.parse().unwrap_or(Role::Admin),
        }
    }
}
