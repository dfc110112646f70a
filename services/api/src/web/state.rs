//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use speech_core::ports::{DatabaseService, SpeechSynthesisService};
use speech_core::token::TokenIssuer;
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all
/// handlers. Read-only after construction; requests share it without
/// coordination.
pub struct AppState {
    pub db: Arc<dyn DatabaseService>,
    pub tts: Arc<dyn SpeechSynthesisService>,
    pub tokens: TokenIssuer,
    pub config: Arc<Config>,
}
