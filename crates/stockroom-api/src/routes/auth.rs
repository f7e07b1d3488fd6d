//! Authentication gate and auth routes

use axum::{
    Json, Router,
    extract::{FromRef, FromRequestParts, State},
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    routing::post,
};
use stockroom_auth::{AuthUser, hash_password, verify_password};
use stockroom_db::{Admin, DbError, NewAdmin, Role};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::AppState;

use super::types::{AdminResponse, AuthResponse, LoginRequest, RegisterRequest};

// ==================== Auth Extractor ====================

/// Extractor for an authenticated administrator (required)
///
/// This is the single choke point for protected routes: it pulls the
/// bearer token from the Authorization header, validates it, and hands
/// the decoded identity to the handler. Every failure mode collapses
/// into the same unauthorized rejection.
pub struct RequireAuth(pub AuthUser);

impl<S> FromRequestParts<S> for RequireAuth
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::Unauthorized)?;

        let claims = app_state
            .jwt
            .validate_token(token)
            .map_err(|_| ApiError::Unauthorized)?;
        let user = AuthUser::from_claims(&claims);

        debug!("Authenticated administrator: {}", user.email);
        Ok(RequireAuth(user))
    }
}

// ==================== Input Validation ====================

/// Minimum allowed password length
const MIN_PASSWORD_LENGTH: usize = 6;
/// Maximum allowed password length (prevent DoS with very large passwords)
const MAX_PASSWORD_LENGTH: usize = 256;

/// Validate email shape: one `@` with a non-empty local part and a
/// dotted, non-empty domain. Stored and compared exactly as supplied.
pub(crate) fn validate_email(email: &str) -> Result<(), ApiError> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && domain.contains('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(ApiError::Validation("Invalid email address".to_string()));
    }
    Ok(())
}

/// Validate password length for account creation
pub(crate) fn validate_password(password: &str) -> Result<(), ApiError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(ApiError::Validation(
            "Password must be at least 6 characters".to_string(),
        ));
    }
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(ApiError::Validation(format!(
            "Password exceeds maximum length of {} characters",
            MAX_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

// ==================== Administrator Creation ====================

/// The single creation contract behind both registration and the
/// admin-management panel: hash the password, insert with the fixed
/// `admin` role, surface duplicates as a conflict. Validation happens
/// before this, at each endpoint's boundary.
pub(crate) async fn create_admin(
    state: &AppState,
    email: &str,
    password: &str,
) -> Result<Admin, ApiError> {
    let password_hash = hash_password(password)?;

    let admin = state
        .db
        .insert_admin(NewAdmin {
            email: email.to_string(),
            password_hash,
            role: Role::Admin,
        })
        .await
        .map_err(|e| match e {
            DbError::Duplicate(_) => {
                ApiError::Conflict("User with this email already exists".to_string())
            }
            other => ApiError::Database(other),
        })?;

    Ok(admin)
}

// ==================== Auth Routes ====================

/// POST /auth/login
async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    if request.password.len() > MAX_PASSWORD_LENGTH {
        return Err(ApiError::Validation(format!(
            "Password exceeds maximum length of {} characters",
            MAX_PASSWORD_LENGTH
        )));
    }

    debug!("Login attempt for: {}", request.email);

    // Find administrator - but don't return early to prevent timing attacks
    let admin_result = state.db.get_admin_by_email(&request.email).await?;

    // Verify password - always perform verification to prevent timing attacks
    // Use a dummy hash when the email is unknown so the work factor and the
    // response are identical to a wrong-password attempt
    const DUMMY_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$bG9naW4tdGltaW5nLWVxdWFsaXphdGlvbi1wYWQ$c3RvY2tyb29tMGR1bW15MA";

    let (hash_to_verify, admin) = match admin_result {
        Some(a) => (a.password_hash.clone(), Some(a)),
        None => (DUMMY_HASH.to_string(), None),
    };

    let password_valid = verify_password(&request.password, &hash_to_verify)?;

    let admin = match (admin, password_valid) {
        (Some(a), true) => a,
        _ => return Err(ApiError::InvalidCredentials),
    };

    let token = state
        .jwt
        .generate_token(admin.id, &admin.email, admin.role.as_str())?;

    info!("Administrator {} logged in", admin.email);

    Ok(Json(AuthResponse {
        token,
        user: AdminResponse::from(&admin),
    }))
}

/// POST /auth/register
async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    // First violated rule wins: email shape, then password length,
    // then confirmation match
    validate_email(&request.email)?;
    validate_password(&request.password)?;
    if let Some(confirm) = &request.confirm_password {
        if confirm != &request.password {
            return Err(ApiError::Validation("Passwords don't match".to_string()));
        }
    }

    let admin = create_admin(&state, &request.email, &request.password).await?;

    let token = state
        .jwt
        .generate_token(admin.id, &admin.email, admin.role.as_str())?;

    info!("Registered administrator: {}", admin.email);

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: AdminResponse::from(&admin),
        }),
    ))
}

/// Create auth routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::testing::{register_admin, send_json, test_app};

    #[tokio::test]
    async fn register_returns_token_and_public_projection() {
        let (app, _state) = test_app().await;

        let (status, body) = send_json(
            &app,
            "POST",
            "/auth/register",
            None,
            Some(json!({
                "email": "admin@x.com",
                "password": "secret1",
                "confirmPassword": "secret1"
            })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert!(!body["token"].as_str().unwrap().is_empty());
        assert_eq!(body["user"]["email"], "admin@x.com");
        assert_eq!(body["user"]["role"], "admin");
        assert!(body["user"].get("password").is_none());
        assert!(body["user"].get("password_hash").is_none());
    }

    #[tokio::test]
    async fn login_round_trip() {
        let (app, _state) = test_app().await;
        register_admin(&app, "admin@x.com", "secret1").await;

        let (status, body) = send_json(
            &app,
            "POST",
            "/auth/login",
            None,
            Some(json!({"email": "admin@x.com", "password": "secret1"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(!body["token"].as_str().unwrap().is_empty());
        assert_eq!(body["user"]["email"], "admin@x.com");
    }

    #[tokio::test]
    async fn login_failures_are_indistinguishable() {
        let (app, _state) = test_app().await;
        register_admin(&app, "admin@x.com", "secret1").await;

        let (wrong_status, wrong_body) = send_json(
            &app,
            "POST",
            "/auth/login",
            None,
            Some(json!({"email": "admin@x.com", "password": "wrong-password"})),
        )
        .await;

        let (unknown_status, unknown_body) = send_json(
            &app,
            "POST",
            "/auth/login",
            None,
            Some(json!({"email": "nobody@x.com", "password": "whatever"})),
        )
        .await;

        assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
        assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
        assert_eq!(wrong_body, unknown_body);
    }

    #[tokio::test]
    async fn register_reports_first_violated_rule() {
        let (app, _state) = test_app().await;

        let (status, body) = send_json(
            &app,
            "POST",
            "/auth/register",
            None,
            Some(json!({"email": "not-an-email", "password": "secret1"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid email address");

        let (status, body) = send_json(
            &app,
            "POST",
            "/auth/register",
            None,
            Some(json!({"email": "admin@x.com", "password": "short"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Password must be at least 6 characters");

        let (status, body) = send_json(
            &app,
            "POST",
            "/auth/register",
            None,
            Some(json!({
                "email": "admin@x.com",
                "password": "secret1",
                "confirmPassword": "secret2"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Passwords don't match");
    }

    #[tokio::test]
    async fn register_duplicate_email_is_a_conflict() {
        let (app, _state) = test_app().await;
        register_admin(&app, "admin@x.com", "secret1").await;

        let (status, body) = send_json(
            &app,
            "POST",
            "/auth/register",
            None,
            Some(json!({"email": "admin@x.com", "password": "secret2"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "User with this email already exists");
    }

    #[tokio::test]
    async fn gate_rejections_do_not_leak_the_cause() {
        let (app, _state) = test_app().await;

        let (missing_status, missing_body) =
            send_json(&app, "GET", "/admin/users", None, None).await;
        let (garbage_status, garbage_body) =
            send_json(&app, "GET", "/admin/users", Some("not-a-token"), None).await;

        assert_eq!(missing_status, StatusCode::UNAUTHORIZED);
        assert_eq!(garbage_status, StatusCode::UNAUTHORIZED);
        assert_eq!(missing_body, garbage_body);
    }
}
