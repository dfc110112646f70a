//! crates/speech_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, Utc};
use uuid::Uuid;

// Represents a user - used throughout the app
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
}

// Only used internally for login/signup - contains sensitive data
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user_id: Uuid,
    pub email: String,
    pub hashed_password: String,
}

/// The voice customization settings a user can store.
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceSettings {
    pub voice: String,
    pub speed: f64,
    pub pitch: f64,
    pub language: String,
}

/// A user's stored voice preferences. One record per user.
#[derive(Debug, Clone)]
pub struct UserPreference {
    pub id: Uuid,
    pub user_id: Uuid,
    pub settings: VoiceSettings,
}

/// The format of the text submitted for synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Text,
    Ssml,
}

impl InputFormat {
    /// Parses a user-supplied format string. Anything that is not SSML is
    /// treated as plain text.
    pub fn parse_loose(s: &str) -> Self {
        if s.eq_ignore_ascii_case("ssml") {
            InputFormat::Ssml
        } else {
            InputFormat::Text
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InputFormat::Text => "TEXT",
            InputFormat::Ssml => "SSML",
        }
    }
}

/// The container format of the synthesized audio artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Mp3,
    Wav,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Mp3 => "MP3",
            OutputFormat::Wav => "WAV",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Mp3 => "mp3",
            OutputFormat::Wav => "wav",
        }
    }
}

/// Lifecycle of a synthesis request record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessStatus {
    Pending,
    Completed,
    Failed,
}

impl ProcessStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessStatus::Pending => "PENDING",
            ProcessStatus::Completed => "COMPLETED",
            ProcessStatus::Failed => "FAILED",
        }
    }
}

/// A persisted record of one synthesis request.
#[derive(Debug, Clone)]
pub struct SpeechRequest {
    pub id: Uuid,
    pub user_id: Uuid,
    pub input_text: String,
    pub input_format: InputFormat,
    pub output_format: OutputFormat,
    pub status: ProcessStatus,
    pub created_at: DateTime<Utc>,
}

/// The stored outcome of a completed synthesis request.
#[derive(Debug, Clone)]
pub struct SpeechResult {
    pub id: Uuid,
    pub request_id: Uuid,
    pub audio_file_path: String,
    pub audio_file_size: i64,
    pub duration_secs: f64,
}

/// Everything the synthesis engine needs for one conversion.
#[derive(Debug, Clone)]
pub struct SynthesisSpec {
    pub text: String,
    pub language: String,
    pub voice: String,
    pub speed: Option<f64>,
    pub pitch: Option<f64>,
    pub output: OutputFormat,
}
