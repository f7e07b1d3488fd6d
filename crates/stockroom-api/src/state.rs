//! Application state

use std::sync::Arc;
use stockroom_auth::JwtManager;
use stockroom_db::Database;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub jwt: Arc<JwtManager>,
    /// Image-host credentials; `None` disables the upload-signature endpoint
    pub uploads: Option<UploadsConfig>,
}

/// Image-host account used to sign direct browser uploads
#[derive(Clone)]
pub struct UploadsConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

impl AppState {
    pub fn new(db: Database, jwt: Arc<JwtManager>, uploads: Option<UploadsConfig>) -> Self {
        Self { db, jwt, uploads }
    }
}
