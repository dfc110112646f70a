//! services/api/src/web/rest.rs
//!
//! The master definition for the OpenAPI specification. The handlers
//! themselves live in the `auth`, `preferences`, and `speech` modules.

use utoipa::OpenApi;

use crate::web::auth::{
    AuthResponse, LoginRequest, RefreshRequest, RefreshResponse, SignupRequest,
};
use crate::web::preferences::{
    CreatePreferencesResponse, DeletePreferencesResponse, PreferenceSettingsBody,
    PreferencesResponse, UpdatePreferencesResponse, UpdatedPreferences,
};
use crate::web::speech::{ConvertRequest, ConvertResponse, SpeechOutputResponse};
use crate::web::ErrorBody;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::web::auth::signup_handler,
        crate::web::auth::login_handler,
        crate::web::auth::refresh_handler,
        crate::web::preferences::create_preferences_handler,
        crate::web::preferences::get_preferences_handler,
        crate::web::preferences::update_preferences_handler,
        crate::web::preferences::delete_preferences_handler,
        crate::web::speech::convert_handler,
        crate::web::speech::speech_output_handler,
    ),
    components(
        schemas(
            SignupRequest,
            LoginRequest,
            AuthResponse,
            RefreshRequest,
            RefreshResponse,
            PreferenceSettingsBody,
            CreatePreferencesResponse,
            PreferencesResponse,
            UpdatedPreferences,
            UpdatePreferencesResponse,
            DeletePreferencesResponse,
            ConvertRequest,
            ConvertResponse,
            SpeechOutputResponse,
            ErrorBody,
        )
    ),
    tags(
        (name = "Text-to-Speech API", description = "Authentication, voice preferences, and speech synthesis endpoints.")
    )
)]
pub struct ApiDoc;
