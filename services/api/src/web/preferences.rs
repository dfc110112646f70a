//! services/api/src/web/preferences.rs
//!
//! CRUD endpoints for a user's voice preferences. Every operation acts on
//! the verified identity supplied by the auth middleware; no user id is
//! accepted from the request body.

use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use speech_core::domain::VoiceSettings;
use std::sync::Arc;
use tracing::error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::web::middleware::AuthUser;
use crate::web::state::AppState;
use crate::web::{port_error_response, ErrorBody};

//=========================================================================================
// Request/Response Types
//=========================================================================================

/// The voice settings carried by create and update requests.
#[derive(Deserialize, ToSchema)]
pub struct PreferenceSettingsBody {
    pub voice: String,
    pub speed: f64,
    pub pitch: f64,
    pub language: String,
}

impl PreferenceSettingsBody {
    fn into_settings(self) -> VoiceSettings {
        VoiceSettings {
            voice: self.voice,
            speed: self.speed,
            pitch: self.pitch,
            language: self.language,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct CreatePreferencesResponse {
    #[serde(rename = "preferenceId")]
    pub preference_id: Uuid,
    pub message: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct PreferencesResponse {
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    pub voice: String,
    pub speed: f64,
    pub pitch: f64,
    pub language: String,
}

/// Detailed view of the preferences echoed back after an update.
#[derive(Serialize, Deserialize, ToSchema)]
pub struct UpdatedPreferences {
    pub voice: String,
    pub speed: f64,
    pub pitch: f64,
    pub language: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct UpdatePreferencesResponse {
    pub success: bool,
    pub updated_preferences: UpdatedPreferences,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct DeletePreferencesResponse {
    pub status: String,
    pub message: String,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /user/preferences - Store voice preferences for the caller
#[utoipa::path(
    post,
    path = "/user/preferences",
    request_body = PreferenceSettingsBody,
    responses(
        (status = 201, description = "Preferences created", body = CreatePreferencesResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn create_preferences_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<PreferenceSettingsBody>,
) -> Result<(StatusCode, Json<CreatePreferencesResponse>), (StatusCode, Json<ErrorBody>)> {
    let preference = state
        .db
        .create_preference(user.user_id, &req.into_settings())
        .await
        .map_err(|e| {
            error!("Failed to create preferences: {:?}", e);
            port_error_response(&e)
        })?;

    Ok((
        StatusCode::CREATED,
        Json(CreatePreferencesResponse {
            preference_id: preference.id,
            message: "User preference created successfully.".to_string(),
        }),
    ))
}

/// GET /user/preferences - Retrieve the caller's saved preferences
#[utoipa::path(
    get,
    path = "/user/preferences",
    responses(
        (status = 200, description = "The caller's preferences", body = PreferencesResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 404, description = "No preferences stored", body = ErrorBody)
    )
)]
pub async fn get_preferences_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<PreferencesResponse>, (StatusCode, Json<ErrorBody>)> {
    let preference = state
        .db
        .get_preference_by_user(user.user_id)
        .await
        .map_err(|e| {
            error!("Failed to get preferences: {:?}", e);
            port_error_response(&e)
        })?;

    Ok(Json(PreferencesResponse {
        user_id: preference.user_id,
        voice: preference.settings.voice,
        speed: preference.settings.speed,
        pitch: preference.settings.pitch,
        language: preference.settings.language,
    }))
}

/// PUT /user/preferences - Update the caller's preferences
///
/// A missing record is reported as `success: false` with empty settings
/// rather than an error, so clients can treat the echo uniformly.
#[utoipa::path(
    put,
    path = "/user/preferences",
    request_body = PreferenceSettingsBody,
    responses(
        (status = 200, description = "Update outcome with the stored settings echoed back", body = UpdatePreferencesResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn update_preferences_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<PreferenceSettingsBody>,
) -> Result<Json<UpdatePreferencesResponse>, (StatusCode, Json<ErrorBody>)> {
    use speech_core::ports::PortError;

    match state
        .db
        .update_preference(user.user_id, &req.into_settings())
        .await
    {
        Ok(preference) => Ok(Json(UpdatePreferencesResponse {
            success: true,
            updated_preferences: UpdatedPreferences {
                voice: preference.settings.voice,
                speed: preference.settings.speed,
                pitch: preference.settings.pitch,
                language: preference.settings.language,
            },
        })),
        Err(PortError::NotFound(_)) => Ok(Json(UpdatePreferencesResponse {
            success: false,
            updated_preferences: UpdatedPreferences {
                voice: String::new(),
                speed: 0.0,
                pitch: 0.0,
                language: String::new(),
            },
        })),
        Err(e) => {
            error!("Failed to update preferences: {:?}", e);
            Err(port_error_response(&e))
        }
    }
}

/// DELETE /user/preferences - Delete the caller's preferences
///
/// Deleting when nothing is stored is a soft "not found" message, not an
/// error.
#[utoipa::path(
    delete,
    path = "/user/preferences",
    responses(
        (status = 200, description = "Deletion outcome", body = DeletePreferencesResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn delete_preferences_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<DeletePreferencesResponse>, (StatusCode, Json<ErrorBody>)> {
    let deleted = state
        .db
        .delete_preferences_for_user(user.user_id)
        .await
        .map_err(|e| {
            error!("Failed to delete preferences: {:?}", e);
            port_error_response(&e)
        })?;

    let response = if deleted == 0 {
        DeletePreferencesResponse {
            status: "error".to_string(),
            message: "No preferences found for user.".to_string(),
        }
    } else {
        DeletePreferencesResponse {
            status: "success".to_string(),
            message: "Preferences deleted successfully.".to_string(),
        }
    };
    Ok(Json(response))
}

//=========================================================================================
// Tests
//=========================================================================================
