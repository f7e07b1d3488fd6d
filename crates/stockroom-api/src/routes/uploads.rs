//! Signed direct-upload handshake
//!
//! The dashboard uploads product images straight from the browser to the
//! image host; the server only hands out a short signature proving the
//! upload was authorized. The exchange itself is the provider's concern.

use axum::{Json, Router, extract::State, routing::get};
use chrono::Utc;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

use super::auth::RequireAuth;
use super::types::SignatureResponse;

/// Target folder on the image host for product images
const UPLOAD_FOLDER: &str = "products";

/// Sign an upload request the way the provider expects: parameters in
/// alphabetical order joined with `&`, the API secret appended, and the
/// whole string digested with SHA-256.
fn sign_upload_request(folder: &str, timestamp: i64, api_secret: &str) -> String {
    let to_sign = format!("folder={}&timestamp={}{}", folder, timestamp, api_secret);
    hex::encode(Sha256::digest(to_sign.as_bytes()))
}

/// GET /upload/signature
async fn upload_signature(
    _auth: RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<SignatureResponse>, ApiError> {
    let Some(uploads) = state.uploads.clone() else {
        return Err(ApiError::Internal(
            "Image host credentials are not configured".to_string(),
        ));
    };

    let timestamp = Utc::now().timestamp();
    let signature = sign_upload_request(UPLOAD_FOLDER, timestamp, &uploads.api_secret);

    debug!("Issued upload signature for timestamp {}", timestamp);

    Ok(Json(SignatureResponse {
        timestamp,
        signature,
        cloud_name: uploads.cloud_name,
        api_key: uploads.api_key,
    }))
}

/// Create upload routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/upload/signature", get(upload_signature))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::sign_upload_request;
    use crate::testing::{register_admin, send_json, test_app};

    #[test]
    fn signature_matches_known_vector() {
        let signature = sign_upload_request("products", 1_700_000_000, "test-api-secret");
        assert_eq!(
            signature,
            "1f22fd2f80af6b50afac5f8f88f123b11280483dfee9b6941aca733e79c6927a"
        );
    }

    #[tokio::test]
    async fn endpoint_requires_a_token() {
        let (app, _state) = test_app().await;

        let (status, _body) = send_json(&app, "GET", "/upload/signature", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn endpoint_returns_verifiable_parameters() {
        let (app, _state) = test_app().await;
        let token = register_admin(&app, "admin@x.com", "secret1").await;

        let (status, body) = send_json(&app, "GET", "/upload/signature", Some(&token), None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["cloudName"], "demo");
        assert_eq!(body["apiKey"], "123456");

        // The signature must be reproducible from the returned timestamp
        let timestamp = body["timestamp"].as_i64().unwrap();
        let expected = sign_upload_request("products", timestamp, "test-api-secret");
        assert_eq!(body["signature"], expected);
    }
}
