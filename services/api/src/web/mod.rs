pub mod auth;
pub mod middleware;
pub mod preferences;
pub mod rest;
pub mod speech;
pub mod state;

#[cfg(test)]
pub(crate) mod testutil;

pub use middleware::require_auth;

use axum::{http::StatusCode, Json};
use serde::Serialize;
use speech_core::ports::PortError;
use utoipa::ToSchema;

/// The uniform JSON error body returned by every endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

/// Maps a port error onto an HTTP status and the uniform error body.
///
/// Credential and token failures are 401, missing records 404, storage
/// failures 500; the body shape is the same everywhere.
pub(crate) fn port_error_response(err: &PortError) -> (StatusCode, Json<ErrorBody>) {
    let status = match err {
        PortError::NotFound(_) => StatusCode::NOT_FOUND,
        PortError::InvalidCredentials | PortError::TokenExpired | PortError::TokenInvalid => {
            StatusCode::UNAUTHORIZED
        }
        PortError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorBody {
            error: err.to_string(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_body_serializes_to_the_uniform_shape() {
        let (status, Json(body)) = port_error_response(&PortError::Storage("boom".to_string()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({ "error": "Storage error: boom" }));
    }

    #[test]
    fn token_failures_map_to_unauthorized() {
        assert_eq!(
            port_error_response(&PortError::TokenExpired).0,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            port_error_response(&PortError::TokenInvalid).0,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            port_error_response(&PortError::InvalidCredentials).0,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            port_error_response(&PortError::NotFound("x".to_string())).0,
            StatusCode::NOT_FOUND
        );
    }
}
