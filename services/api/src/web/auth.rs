//! services/api/src/web/auth.rs
//!
//! Authentication endpoints for user signup, login, and token refresh.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use speech_core::password;
use speech_core::ports::PortError;
use speech_core::token;
use std::sync::Arc;
use tracing::error;
use utoipa::ToSchema;

use crate::web::state::AppState;
use crate::web::{port_error_response, ErrorBody};

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
}

#[derive(Deserialize, ToSchema)]
pub struct RefreshRequest {
    pub existing_token: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct RefreshResponse {
    pub new_token: String,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /auth/signup - Create a new user account
#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User created successfully", body = AuthResponse),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn signup_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), (StatusCode, Json<ErrorBody>)> {
    // 1. Hash the password (salt is embedded in the output)
    let password_hash = password::hash_password(&req.password).map_err(|e| {
        error!("Failed to hash password: {:?}", e);
        port_error_response(&e)
    })?;

    // 2. Create the user in the database
    let user = state
        .db
        .create_user(&req.email, &password_hash)
        .await
        .map_err(|e| {
            error!("Failed to create user: {:?}", e);
            port_error_response(&e)
        })?;

    // 3. Issue a short-lived access token for the new account
    let token = state
        .tokens
        .issue(user.id, &user.email, token::access_ttl())
        .map_err(|e| {
            error!("Failed to issue token: {:?}", e);
            port_error_response(&e)
        })?;

    Ok((StatusCode::CREATED, Json(AuthResponse { token })))
}

/// POST /auth/login - Authenticate and receive a bearer token
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, (StatusCode, Json<ErrorBody>)> {
    // 1. Look up the user; a miss is folded into the same rejection as a
    //    wrong password below.
    let creds = match state.db.get_user_by_email(&req.email).await {
        Ok(creds) => Some(creds),
        Err(PortError::NotFound(_)) => None,
        Err(e) => {
            error!("Failed to get user: {:?}", e);
            return Err(port_error_response(&e));
        }
    };

    // 2. Verify the password. Unknown email and wrong password produce an
    //    identical response so a caller cannot tell which check failed.
    let creds = match creds {
        Some(c) if password::verify_password(&req.password, &c.hashed_password) => c,
        _ => return Err(port_error_response(&PortError::InvalidCredentials)),
    };

    // 3. Issue a token with the fixed 30-minute ttl
    let token = state
        .tokens
        .issue(creds.user_id, &creds.email, token::access_ttl())
        .map_err(|e| {
            error!("Failed to issue token: {:?}", e);
            port_error_response(&e)
        })?;

    Ok(Json(AuthResponse { token }))
}

/// POST /auth/refresh - Exchange a valid token for a fresh one
#[utoipa::path(
    post,
    path = "/auth/refresh",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "Token refreshed", body = RefreshResponse),
        (status = 401, description = "Token expired or invalid", body = ErrorBody)
    )
)]
pub async fn refresh_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>, (StatusCode, Json<ErrorBody>)> {
    // Validation and re-issue happen entirely inside the token issuer; no
    // credential store access and no password re-check.
    let new_token = state.tokens.refresh(&req.existing_token).map_err(|e| {
        error!("Failed to refresh token: {:?}", e);
        port_error_response(&e)
    })?;

    Ok(Json(RefreshResponse { new_token }))
}

//=========================================================================================
// Tests
//=========================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::testutil::{state_with_user, test_state};
    use axum::http::StatusCode;
    use chrono::Utc;

    #[tokio::test]
    async fn login_with_correct_credentials_issues_a_token() {
        let state = state_with_user("a@example.com", "secret").await;

        let Json(body) = login_handler(
            State(state.clone()),
            Json(LoginRequest {
                email: "a@example.com".to_string(),
                password: "secret".to_string(),
            }),
        )
        .await
        .unwrap();

        let claims = state.tokens.validate(&body.token).unwrap();
        assert_eq!(claims.email, "a@example.com");

        // Expiry is now + 30 minutes, within a small epsilon.
        let expected_exp = Utc::now().timestamp() + 30 * 60;
        assert!((claims.exp - expected_exp).abs() <= 5);
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_are_indistinguishable() {
        let state = state_with_user("a@example.com", "secret").await;

        let wrong_password = login_handler(
            State(state.clone()),
            Json(LoginRequest {
                email: "a@example.com".to_string(),
                password: "wrong".to_string(),
            }),
        )
        .await
        .err()
        .expect("wrong password must be rejected");

        let unknown_email = login_handler(
            State(state),
            Json(LoginRequest {
                email: "nobody@example.com".to_string(),
                password: "secret".to_string(),
            }),
        )
        .await
        .err()
        .expect("unknown email must be rejected");

        assert_eq!(wrong_password.0, StatusCode::UNAUTHORIZED);
        assert_eq!(unknown_email.0, StatusCode::UNAUTHORIZED);
        // Same message shape: nothing leaks which check failed.
        assert_eq!(wrong_password.1.error, unknown_email.1.error);
    }

    #[tokio::test]
    async fn signup_creates_a_user_and_issues_a_valid_token() {
        let state = test_state();

        let (status, Json(body)) = signup_handler(
            State(state.clone()),
            Json(SignupRequest {
                email: "new@example.com".to_string(),
                password: "hunter2".to_string(),
            }),
        )
        .await
        .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        let claims = state.tokens.validate(&body.token).unwrap();
        assert_eq!(claims.email, "new@example.com");

        // The account is usable for a subsequent login.
        let Json(login) = login_handler(
            State(state),
            Json(LoginRequest {
                email: "new@example.com".to_string(),
                password: "hunter2".to_string(),
            }),
        )
        .await
        .unwrap();
        assert!(!login.token.is_empty());
    }

    #[tokio::test]
    async fn refresh_issues_a_later_expiring_token_for_the_same_identity() {
        let state = state_with_user("a@example.com", "secret").await;
        let Json(login) = login_handler(
            State(state.clone()),
            Json(LoginRequest {
                email: "a@example.com".to_string(),
                password: "secret".to_string(),
            }),
        )
        .await
        .unwrap();
        let original = state.tokens.validate(&login.token).unwrap();

        let Json(refreshed) = refresh_handler(
            State(state.clone()),
            Json(RefreshRequest {
                existing_token: login.token,
            }),
        )
        .await
        .unwrap();

        let claims = state.tokens.validate(&refreshed.new_token).unwrap();
        assert_eq!(claims.sub, original.sub);
        assert!(claims.exp > original.exp);
    }

    #[tokio::test]
    async fn refresh_rejects_garbage_without_issuing_a_token() {
        let state = test_state();
        let (status, Json(body)) = refresh_handler(
            State(state),
            Json(RefreshRequest {
                existing_token: "not-a-token".to_string(),
            }),
        )
        .await
        .err()
        .expect("garbage token must be rejected");

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(!body.error.is_empty());
    }
}
