//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables once at startup
//! and is immutable afterwards. The token secret and algorithm live here and
//! feed both the login and refresh paths, so the process has a single trust
//! root. The `.env` file is used for local development.

use jsonwebtoken::Algorithm;
use speech_core::domain::OutputFormat;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub database_url: String,
    pub log_level: Level,
    pub jwt_secret: String,
    pub jwt_algorithm: Algorithm,
    pub openai_api_key: Option<String>,
    pub tts_model: String,
    pub tts_voice: String,
    pub tts_format: OutputFormat,
    pub audio_dir: PathBuf,
    pub public_base_url: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        // --- Load Server and Database Settings ---
        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| ConfigError::MissingVar("DATABASE_URL".to_string()))?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Load Token Settings ---
        let jwt_secret = std::env::var("JWT_SECRET")
            .map_err(|_| ConfigError::MissingVar("JWT_SECRET".to_string()))?;

        let jwt_algorithm_str =
            std::env::var("JWT_ALGORITHM").unwrap_or_else(|_| "HS256".to_string());
        let jwt_algorithm = jwt_algorithm_str.parse::<Algorithm>().map_err(|_| {
            ConfigError::InvalidValue(
                "JWT_ALGORITHM".to_string(),
                format!("'{}' is not a valid algorithm", jwt_algorithm_str),
            )
        })?;
        // Tokens are signed with a shared secret; only symmetric algorithms
        // are usable with it.
        if !matches!(
            jwt_algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            return Err(ConfigError::InvalidValue(
                "JWT_ALGORITHM".to_string(),
                format!("'{}' is not an HMAC algorithm", jwt_algorithm_str),
            ));
        }

        // --- Load API Keys (as optional) ---
        let openai_api_key = std::env::var("OPENAI_API_KEY").ok();

        // --- Load Synthesis Settings ---
        let tts_model = std::env::var("TTS_MODEL").unwrap_or_else(|_| "tts-1-hd".to_string());
        let tts_voice = std::env::var("TTS_VOICE").unwrap_or_else(|_| "alloy".to_string());

        let tts_format_str = std::env::var("TTS_FORMAT").unwrap_or_else(|_| "wav".to_string());
        let tts_format = match tts_format_str.to_lowercase().as_str() {
            "wav" => OutputFormat::Wav,
            "mp3" => OutputFormat::Mp3,
            other => {
                return Err(ConfigError::InvalidValue(
                    "TTS_FORMAT".to_string(),
                    format!("'{}' is not a supported output format", other),
                ))
            }
        };

        let audio_dir = std::env::var("AUDIO_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./audio"));

        let public_base_url = std::env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| format!("http://{}", bind_address));

        Ok(Self {
            bind_address,
            database_url,
            log_level,
            jwt_secret,
            jwt_algorithm,
            openai_api_key,
            tts_model,
            tts_voice,
            tts_format,
            audio_dir,
            public_base_url,
        })
    }
}
