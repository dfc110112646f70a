//! services/api/src/adapters/tts.rs
//!
//! This module contains the adapter for OpenAI's Text-to-Speech (TTS) service.
//! It implements the `SpeechSynthesisService` port from the `core` crate.

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{CreateSpeechRequest, SpeechModel, SpeechResponseFormat, Voice},
    Client,
};
use async_trait::async_trait;
use speech_core::domain::{OutputFormat, SynthesisSpec};
use speech_core::ports::{PortError, PortResult, SpeechSynthesisService};
use tracing::warn;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements the `SpeechSynthesisService` port using the
/// OpenAI speech API.
#[derive(Clone)]
pub struct OpenAiTtsAdapter {
    client: Client<OpenAIConfig>,
    model: SpeechModel,
    default_voice: Voice,
}

impl OpenAiTtsAdapter {
    /// Creates a new `OpenAiTtsAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: SpeechModel, default_voice: Voice) -> Self {
        Self {
            client,
            model,
            default_voice,
        }
    }

    /// Maps a user-supplied voice preference onto an engine voice, falling
    /// back to the configured default for names this engine does not have.
    fn resolve_voice(&self, requested: &str) -> Voice {
        match parse_voice(requested) {
            Some(voice) => voice,
            None => {
                warn!(
                    "Unknown voice preference '{}', using the default voice",
                    requested
                );
                self.default_voice.clone()
            }
        }
    }
}

/// Parses a voice name into the engine's voice enum.
pub fn parse_voice(name: &str) -> Option<Voice> {
    match name.to_lowercase().as_str() {
        "alloy" => Some(Voice::Alloy),
        "echo" => Some(Voice::Echo),
        "fable" => Some(Voice::Fable),
        "onyx" => Some(Voice::Onyx),
        "nova" => Some(Voice::Nova),
        "shimmer" => Some(Voice::Shimmer),
        _ => None,
    }
}

//=========================================================================================
// `SpeechSynthesisService` Trait Implementation
//=========================================================================================

#[async_trait]
impl SpeechSynthesisService for OpenAiTtsAdapter {
    /// Synthesizes audio for the given spec and returns the raw bytes.
    ///
    /// Speed maps onto the engine's rate parameter (clamped to its supported
    /// range). Pitch and language have no counterpart on this engine: the
    /// voice itself carries accent and language, so both are accepted and
    /// recorded upstream but not applied here.
    async fn synthesize(&self, spec: &SynthesisSpec) -> PortResult<Vec<u8>> {
        let response_format = match spec.output {
            OutputFormat::Mp3 => SpeechResponseFormat::Mp3,
            OutputFormat::Wav => SpeechResponseFormat::Wav,
        };

        let request = CreateSpeechRequest {
            model: self.model.clone(),
            input: spec.text.clone(),
            voice: self.resolve_voice(&spec.voice),
            response_format: Some(response_format),
            speed: spec.speed.map(|s| s.clamp(0.25, 4.0) as f32),
            ..Default::default()
        };

        // Call the API and manually map the error, which respects the orphan rule.
        let response = self
            .client
            .audio()
            .speech(request)
            .await
            .map_err(|e: OpenAIError| PortError::Storage(e.to_string()))?;

        // The response contains a `bytes` field. We call `.to_vec()` on that field.
        Ok(response.bytes.to_vec())
    }
}
