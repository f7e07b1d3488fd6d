//! Request/Response DTOs for the REST surface

use serde::{Deserialize, Serialize};
use stockroom_db::{Admin, ProductImage};

// ==================== Auth Types ====================

/// Login request
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Registration request
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(rename = "confirmPassword", default)]
    pub confirm_password: Option<String>,
}

/// Public administrator projection (no credential material)
#[derive(Serialize)]
pub struct AdminResponse {
    pub id: i64,
    pub email: String,
    pub role: String,
}

impl From<&Admin> for AdminResponse {
    fn from(admin: &Admin) -> Self {
        Self {
            id: admin.id,
            email: admin.email.clone(),
            role: admin.role.as_str().to_string(),
        }
    }
}

/// Successful login/registration: a session token plus the public
/// projection of the authenticated administrator
#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: AdminResponse,
}

// ==================== Administrator Management Types ====================

/// Create administrator request (role is always `admin`)
#[derive(Deserialize)]
pub struct CreateAdminRequest {
    pub email: String,
    pub password: String,
}

/// Administrator listing entry (password hash excluded)
#[derive(Serialize)]
pub struct AdminRecordResponse {
    pub id: i64,
    pub email: String,
    pub role: String,
    pub created_at: String,
}

impl From<&Admin> for AdminRecordResponse {
    fn from(admin: &Admin) -> Self {
        Self {
            id: admin.id,
            email: admin.email.clone(),
            role: admin.role.as_str().to_string(),
            created_at: admin.created_at.to_rfc3339(),
        }
    }
}

// ==================== Product Types ====================

/// Create product request
#[derive(Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock: i64,
    pub category: String,
    #[serde(default)]
    pub images: Vec<ProductImage>,
}

/// Partial product update request
#[derive(Deserialize, Default)]
pub struct UpdateProductRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub stock: Option<i64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub images: Option<Vec<ProductImage>>,
}

// ==================== Upload Types ====================

/// Signed direct-upload parameters for the image host.
/// Field names follow the provider's browser SDK conventions.
#[derive(Serialize)]
pub struct SignatureResponse {
    pub timestamp: i64,
    pub signature: String,
    #[serde(rename = "cloudName")]
    pub cloud_name: String,
    #[serde(rename = "apiKey")]
    pub api_key: String,
}

// ==================== Envelopes ====================

/// Collection/statistics envelope
#[derive(Serialize)]
pub struct DataResponse<T> {
    pub data: T,
}

/// Plain confirmation message
#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}
