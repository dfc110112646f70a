//! services/api/src/web/middleware.rs
//!
//! Authentication middleware for protecting routes.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::error;
use uuid::Uuid;

use crate::web::state::AppState;

/// The verified identity of the caller, inserted into request extensions by
/// `require_auth` and consumed by handlers as an explicit parameter.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
}

/// Middleware that validates the bearer token and extracts the caller identity.
///
/// Validation is stateless: signature and expiry only, no credential store
/// lookup. If valid, inserts an `AuthUser` into request extensions for
/// handlers to use. If invalid or missing, returns 401 Unauthorized.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    // 1. Extract the Authorization header
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    // 2. Parse the bearer token
    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(StatusCode::UNAUTHORIZED)?;

    // 3. Validate signature and expiry, get the identity claims
    let claims = state.tokens.validate(token).map_err(|e| {
        error!("Failed to validate bearer token: {:?}", e);
        StatusCode::UNAUTHORIZED
    })?;

    // 4. Insert the verified identity into request extensions
    req.extensions_mut().insert(AuthUser {
        user_id: claims.sub,
        email: claims.email,
    });

    // 5. Continue to the handler
    Ok(next.run(req).await)
}
