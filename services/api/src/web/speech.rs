//! services/api/src/web/speech.rs
//!
//! Speech synthesis endpoints: convert text for the authenticated caller and
//! retrieve the stored metadata of a previously synthesized artifact.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use speech_core::domain::{InputFormat, OutputFormat, SynthesisSpec};
use speech_core::ports::PortError;
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

#[derive(Deserialize, ToSchema)]
pub struct ConvertRequest {
    pub text: String,
    pub language: String,
    pub voice_preference: String,
    /// "TEXT" or "SSML"; anything else is treated as plain text.
    pub input_format: String,
    pub speed: Option<f64>,
    pub pitch: Option<f64>,
}

/// Details about the synthesized speech artifact.
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ConvertResponse {
    pub speech_file_path: String,
    pub file_format: String,
    /// Seconds, measured from the artifact when the format permits.
    pub duration: f64,
    pub size: i64,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct SpeechOutputResponse {
    pub url: String,
    #[serde(rename = "fileSize")]
    pub file_size: i64,
    pub format: String,
    #[serde(rename = "contentLength")]
    pub content_length: f64,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /speech/convert - Synthesize speech for the caller
///
/// Synthesizes audio, persists the artifact to the audio directory, and
/// records the request and its result.
#[utoipa::path(
    post,
    path = "/speech/convert",
    request_body = ConvertRequest,
    responses(
        (status = 200, description = "Synthesis complete", body = ConvertResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 500, description = "Synthesis or storage failure", body = ErrorBody)
    )
)]
pub async fn convert_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<ConvertRequest>,
) -> Result<Json<ConvertResponse>, (StatusCode, Json<ErrorBody>)> {
    let input_format = InputFormat::parse_loose(&req.input_format);
    let output_format = state.config.tts_format;

    // 1. Synthesize
    let spec = SynthesisSpec {
        text: req.text.clone(),
        language: req.language,
        voice: req.voice_preference,
        speed: req.speed,
        pitch: req.pitch,
        output: output_format,
    };
    let audio = state.tts.synthesize(&spec).await.map_err(|e| {
        error!("Speech synthesis failed: {:?}", e);
        port_error_response(&e)
    })?;

    // 2. Measure duration from the artifact where the container allows it
    let duration = match output_format {
        OutputFormat::Wav => wav_duration_secs(&audio).unwrap_or(0.0),
        // No MP3 parser in the stack; reported as zero.
        OutputFormat::Mp3 => 0.0,
    };

    // 3. Persist the artifact
    let file_name = format!("{}.{}", Uuid::new_v4(), output_format.extension());
    let file_path = state.config.audio_dir.join(&file_name);
    tokio::fs::write(&file_path, &audio).await.map_err(|e| {
        error!("Failed to write audio artifact: {:?}", e);
        port_error_response(&PortError::Storage(e.to_string()))
    })?;
    let size = audio.len() as i64;
    let path_str = file_path.to_string_lossy().into_owned();

    // 4. Record the request and its result
    let request = state
        .db
        .create_speech_request(user.user_id, &req.text, input_format, output_format)
        .await
        .map_err(|e| {
            error!("Failed to record speech request: {:?}", e);
            port_error_response(&e)
        })?;
    state
        .db
        .attach_speech_result(request.id, &path_str, size, duration)
        .await
        .map_err(|e| {
            error!("Failed to record speech result: {:?}", e);
            port_error_response(&e)
        })?;

    Ok(Json(ConvertResponse {
        speech_file_path: path_str,
        file_format: output_format.as_str().to_string(),
        duration,
        size,
    }))
}

/// GET /speech/output/{file_id} - Retrieve a stored synthesis result
#[utoipa::path(
    get,
    path = "/speech/output/{file_id}",
    params(
        ("file_id" = Uuid, Path, description = "Id of the stored speech result")
    ),
    responses(
        (status = 200, description = "Stored artifact metadata", body = SpeechOutputResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 404, description = "No such speech result", body = ErrorBody)
    )
)]
pub async fn speech_output_handler(
    State(state): State<Arc<AppState>>,
    Path(file_id): Path<Uuid>,
) -> Result<Json<SpeechOutputResponse>, (StatusCode, Json<ErrorBody>)> {
    let result = state.db.get_speech_result(file_id).await.map_err(|e| {
        error!("Failed to look up speech result: {:?}", e);
        port_error_response(&e)
    })?;

    let file_name = std::path::Path::new(&result.audio_file_path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| result.audio_file_path.clone());
    let format = std::path::Path::new(&result.audio_file_path)
        .extension()
        .map(|e| e.to_string_lossy().to_uppercase())
        .unwrap_or_else(|| "MP3".to_string());

    Ok(Json(SpeechOutputResponse {
        url: format!(
            "{}/speech/files/{}",
            state.config.public_base_url, file_name
        ),
        file_size: result.audio_file_size,
        format,
        content_length: result.duration_secs,
    }))
}

/// Reads the duration in seconds from a WAV header.
fn wav_duration_secs(bytes: &[u8]) -> Option<f64> {
    let reader = hound::WavReader::new(std::io::Cursor::new(bytes)).ok()?;
    let sample_rate = reader.spec().sample_rate;
    if sample_rate == 0 {
        return None;
    }
    Some(f64::from(reader.duration()) / f64::from(sample_rate))
}

//=========================================================================================
// Tests
//=========================================================================================
