//! crates/speech_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases or APIs.

use crate::domain::{
    InputFormat, OutputFormat, SpeechRequest, SpeechResult, SynthesisSpec, User, UserCredentials,
    UserPreference, VoiceSettings,
};
use async_trait::async_trait;
use uuid::Uuid;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// The error taxonomy shared by every port operation.
///
/// Handlers map these onto HTTP status codes; the variants themselves stay
/// free of any transport detail.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    /// Unified for both an unknown email and a wrong password so the two
    /// failure paths are indistinguishable to a caller.
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("The provided token has expired, please log in again")]
    TokenExpired,
    #[error("Invalid token")]
    TokenInvalid,
    #[error("Storage error: {0}")]
    Storage(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait DatabaseService: Send + Sync {
    // --- User Management ---
    async fn create_user(&self, email: &str, hashed_password: &str) -> PortResult<User>;

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials>;

    // --- Voice Preferences ---
    async fn create_preference(
        &self,
        user_id: Uuid,
        settings: &VoiceSettings,
    ) -> PortResult<UserPreference>;

    async fn get_preference_by_user(&self, user_id: Uuid) -> PortResult<UserPreference>;

    async fn update_preference(
        &self,
        user_id: Uuid,
        settings: &VoiceSettings,
    ) -> PortResult<UserPreference>;

    /// Deletes all preference rows for the user and returns how many were
    /// removed. Zero is not an error; the caller decides how to report it.
    async fn delete_preferences_for_user(&self, user_id: Uuid) -> PortResult<u64>;

    // --- Speech Records ---
    async fn create_speech_request(
        &self,
        user_id: Uuid,
        input_text: &str,
        input_format: InputFormat,
        output_format: OutputFormat,
    ) -> PortResult<SpeechRequest>;

    /// Stores the produced artifact for a request and marks it completed.
    async fn attach_speech_result(
        &self,
        request_id: Uuid,
        audio_file_path: &str,
        audio_file_size: i64,
        duration_secs: f64,
    ) -> PortResult<SpeechResult>;

    async fn get_speech_result(&self, result_id: Uuid) -> PortResult<SpeechResult>;
}

#[async_trait]
pub trait SpeechSynthesisService: Send + Sync {
    /// Synthesizes audio for the given spec and returns the raw bytes.
    async fn synthesize(&self, spec: &SynthesisSpec) -> PortResult<Vec<u8>>;
}
