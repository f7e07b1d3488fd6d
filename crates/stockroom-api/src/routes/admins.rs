//! Administrator management routes

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::AppState;

use super::auth::{RequireAuth, create_admin, validate_email, validate_password};
use super::types::{AdminRecordResponse, AdminResponse, CreateAdminRequest, DataResponse, MessageResponse};

// ==================== Administrator Routes ====================

/// GET /admin/users
async fn list_admins(
    _auth: RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<DataResponse<Vec<AdminRecordResponse>>>, ApiError> {
    let admins = state.db.list_admins().await?;

    Ok(Json(DataResponse {
        data: admins.iter().map(AdminRecordResponse::from).collect(),
    }))
}

/// POST /admin/users
///
/// Same creation contract as registration, but the caller is already
/// authenticated as someone else, so no token is returned.
async fn create_admin_account(
    _auth: RequireAuth,
    State(state): State<AppState>,
    Json(request): Json<CreateAdminRequest>,
) -> Result<(StatusCode, Json<AdminResponse>), ApiError> {
    validate_email(&request.email)?;
    validate_password(&request.password)?;

    debug!("Creating administrator: {}", request.email);

    let admin = create_admin(&state, &request.email, &request.password).await?;

    info!("Created administrator: {}", admin.email);

    Ok((StatusCode::CREATED, Json(AdminResponse::from(&admin))))
}

/// DELETE /admin/users/{id}
async fn delete_admin_account(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    // An administrator cannot remove the account they are acting as
    if user.id == id {
        return Err(ApiError::SelfDeletion);
    }

    debug!("Deleting administrator: {}", id);

    let deleted = state.db.delete_admin(id).await?;

    if deleted {
        info!("Deleted administrator: {}", id);
        Ok(Json(MessageResponse {
            message: "Administrator deleted".to_string(),
        }))
    } else {
        Err(ApiError::NotFound(format!("Administrator: {}", id)))
    }
}

/// Create administrator management routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/users", get(list_admins))
        .route("/admin/users", post(create_admin_account))
        .route("/admin/users/{id}", delete(delete_admin_account))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::testing::{register_admin, send_json, test_app};

    #[tokio::test]
    async fn listing_requires_a_token() {
        let (app, _state) = test_app().await;

        let (status, _body) = send_json(&app, "GET", "/admin/users", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn registered_admin_appears_in_listing_without_credentials() {
        let (app, _state) = test_app().await;
        let token = register_admin(&app, "admin@x.com", "secret1").await;

        let (status, body) = send_json(&app, "GET", "/admin/users", Some(&token), None).await;

        assert_eq!(status, StatusCode::OK);
        let entries = body["data"].as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["email"], "admin@x.com");
        assert_eq!(entries[0]["role"], "admin");
        assert!(entries[0].get("password").is_none());
        assert!(entries[0].get("password_hash").is_none());
    }

    #[tokio::test]
    async fn create_returns_projection_without_a_token() {
        let (app, _state) = test_app().await;
        let token = register_admin(&app, "admin@x.com", "secret1").await;

        let (status, body) = send_json(
            &app,
            "POST",
            "/admin/users",
            Some(&token),
            Some(json!({"email": "second@x.com", "password": "secret2"})),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["email"], "second@x.com");
        assert_eq!(body["role"], "admin");
        assert!(body.get("token").is_none());
        assert!(body.get("password_hash").is_none());
    }

    #[tokio::test]
    async fn self_deletion_is_forbidden() {
        let (app, state) = test_app().await;
        let token = register_admin(&app, "admin@x.com", "secret1").await;

        let own_id = state
            .db
            .get_admin_by_email("admin@x.com")
            .await
            .unwrap()
            .unwrap()
            .id;

        let (status, body) = send_json(
            &app,
            "DELETE",
            &format!("/admin/users/{}", own_id),
            Some(&token),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "You cannot delete your own account");
        assert!(state.db.get_admin_by_id(own_id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn deleting_another_admin_succeeds() {
        let (app, state) = test_app().await;
        let token = register_admin(&app, "admin@x.com", "secret1").await;
        register_admin(&app, "second@x.com", "secret2").await;

        let other_id = state
            .db
            .get_admin_by_email("second@x.com")
            .await
            .unwrap()
            .unwrap()
            .id;

        let (status, _body) = send_json(
            &app,
            "DELETE",
            &format!("/admin/users/{}", other_id),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _body) = send_json(
            &app,
            "DELETE",
            &format!("/admin/users/{}", other_id),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
