//! Authentication API endpoints
//!
//! Handles HTTP requests for user authentication:
//! - POST /register - User registration
//! - POST /login - Login, issues an access/refresh token pair
//! - POST /token/refresh - Exchange a refresh token for a new access token
//! - GET /profile - Current user
//! - POST /logout - Invalidate a refresh token

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::api::middleware::{ApiError, AppState, AuthenticatedUser};
use crate::api::responses::UserResponse;
use crate::services::user::{LoginInput, RegisterInput, UserServiceError};

/// Request body for user registration
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Request body for user login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Username or email
    pub username: String,
    pub password: String,
}

/// Request body carrying a refresh token (refresh and logout)
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

/// Response for successful authentication
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub access: String,
    pub refresh: String,
}

/// Response for a token refresh
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub access: String,
}

/// POST /register - User registration
///
/// The first registered user becomes admin. Responds with the user and a
/// token pair so clients don't need a follow-up login.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let password = body.password.clone();
    let input = RegisterInput::new(body.username, body.email, body.password);

    let user = state.user_service.register(input).await.map_err(|e| match e {
        UserServiceError::ValidationError(msg) => ApiError::validation_error(msg),
        UserServiceError::UserExists(msg) => ApiError::conflict(msg),
        _ => ApiError::internal_error(e.to_string()),
    })?;

    let (user, pair) = state
        .user_service
        .login(LoginInput::new(user.username, password))
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: user.into(),
            access: pair.access,
            refresh: pair.refresh,
        }),
    ))
}

/// POST /login - User login
///
/// Issues an access/refresh token pair on success.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let input = LoginInput::new(body.username, body.password);

    let (user, pair) = state.user_service.login(input).await.map_err(|e| match e {
        UserServiceError::AuthenticationError(_) => {
            ApiError::unauthorized("Invalid username or password")
        }
        _ => ApiError::internal_error("Login failed"),
    })?;

    Ok(Json(AuthResponse {
        user: user.into(),
        access: pair.access,
        refresh: pair.refresh,
    }))
}

/// POST /token/refresh - Exchange a refresh token for a new access token
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(body): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>, ApiError> {
    let access = state
        .user_service
        .refresh(&body.refresh)
        .await
        .map_err(|e| match e {
            UserServiceError::TokenNotFound => ApiError::unauthorized("Unknown refresh token"),
            UserServiceError::TokenExpired => ApiError::unauthorized("Refresh token expired"),
            _ => ApiError::internal_error(e.to_string()),
        })?;

    Ok(Json(RefreshResponse { access }))
}

/// GET /profile - Current user
///
/// Requires authentication.
pub async fn profile(user: AuthenticatedUser) -> Json<UserResponse> {
    Json(user.0.into())
}

/// POST /logout - Invalidate the presented refresh token
///
/// Requires authentication.
pub async fn logout(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Json(body): Json<RefreshRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .user_service
        .logout(&body.refresh)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use crate::api::testing::{authed, test_server};
    use axum::http::StatusCode;
    use serde_json::{json, Value};

    #[tokio::test]
    async fn test_register_returns_user_and_tokens() {
        let server = test_server().await;

        let res = server
            .post("/register")
            .json(&json!({
                "username": "alice",
                "email": "alice@example.com",
                "password": "password123",
            }))
            .await;
        res.assert_status(StatusCode::CREATED);

        let body: Value = res.json();
        assert_eq!(body["user"]["username"], "alice");
        // First registered user becomes admin
        assert_eq!(body["user"]["role"], "admin");
        assert!(body["access"].as_str().is_some());
        assert!(body["refresh"].as_str().is_some());
        // Password hash never leaves the server
        assert!(body["user"].get("password_hash").is_none());
    }

    #[tokio::test]
    async fn test_register_duplicate_username_conflicts() {
        let server = test_server().await;

        let payload = json!({
            "username": "alice",
            "email": "alice@example.com",
            "password": "password123",
        });
        server
            .post("/register")
            .json(&payload)
            .await
            .assert_status(StatusCode::CREATED);

        let res = server
            .post("/register")
            .json(&json!({
                "username": "alice",
                "email": "other@example.com",
                "password": "password123",
            }))
            .await;
        res.assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_register_invalid_email_rejected() {
        let server = test_server().await;

        let res = server
            .post("/register")
            .json(&json!({
                "username": "alice",
                "email": "not-an-email",
                "password": "password123",
            }))
            .await;
        res.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_login_and_profile() {
        let server = test_server().await;

        server
            .post("/register")
            .json(&json!({
                "username": "alice",
                "email": "alice@example.com",
                "password": "password123",
            }))
            .await
            .assert_status(StatusCode::CREATED);

        let res = server
            .post("/login")
            .json(&json!({"username": "alice", "password": "password123"}))
            .await;
        res.assert_status_ok();
        let body: Value = res.json();
        let access = body["access"].as_str().unwrap().to_string();

        let res = authed(server.get("/profile"), &access).await;
        res.assert_status_ok();
        let profile: Value = res.json();
        assert_eq!(profile["username"], "alice");
    }

    #[tokio::test]
    async fn test_login_wrong_password_unauthorized() {
        let server = test_server().await;

        server
            .post("/register")
            .json(&json!({
                "username": "alice",
                "email": "alice@example.com",
                "password": "password123",
            }))
            .await
            .assert_status(StatusCode::CREATED);

        let res = server
            .post("/login")
            .json(&json!({"username": "alice", "password": "wrong"}))
            .await;
        res.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_profile_requires_token() {
        let server = test_server().await;

        server.get("/profile").await.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_refresh_flow() {
        let server = test_server().await;

        let body: Value = server
            .post("/register")
            .json(&json!({
                "username": "alice",
                "email": "alice@example.com",
                "password": "password123",
            }))
            .await
            .json();
        let refresh = body["refresh"].as_str().unwrap().to_string();

        let res = server
            .post("/token/refresh")
            .json(&json!({"refresh": refresh}))
            .await;
        res.assert_status_ok();
        let refreshed: Value = res.json();
        let new_access = refreshed["access"].as_str().unwrap().to_string();

        authed(server.get("/profile"), &new_access)
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn test_logout_invalidates_refresh_token() {
        let server = test_server().await;

        let body: Value = server
            .post("/register")
            .json(&json!({
                "username": "alice",
                "email": "alice@example.com",
                "password": "password123",
            }))
            .await
            .json();
        let access = body["access"].as_str().unwrap().to_string();
        let refresh = body["refresh"].as_str().unwrap().to_string();

        let res = authed(server.post("/logout"), &access)
            .json(&json!({"refresh": refresh}))
            .await;
        res.assert_status(StatusCode::NO_CONTENT);

        // The refresh token is gone
        let res = server
            .post("/token/refresh")
            .json(&json!({"refresh": refresh}))
            .await;
        res.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_logout_requires_auth() {
        let server = test_server().await;

        let res = server
            .post("/logout")
            .json(&json!({"refresh": "whatever"}))
            .await;
        res.assert_status(StatusCode::UNAUTHORIZED);
    }
}
