//! services/api/src/web/testutil.rs
//!
//! In-memory implementations of the port traits plus state builders for
//! handler tests. The hexagonal seams let every handler run without
//! Postgres or a speech engine.

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::Algorithm;
use speech_core::domain::{
    InputFormat, OutputFormat, ProcessStatus, SpeechRequest, SpeechResult, SynthesisSpec, User,
    UserCredentials, UserPreference, VoiceSettings,
};
use speech_core::password;
use speech_core::ports::{DatabaseService, PortError, PortResult, SpeechSynthesisService};
use speech_core::token::TokenIssuer;
use std::sync::{Arc, Mutex};
use tracing::Level;
use uuid::Uuid;

use crate::config::Config;
use crate::web::middleware::AuthUser;
use crate::web::state::AppState;

//=========================================================================================
// Mock Database
//=========================================================================================

#[derive(Default)]
pub struct MockDb {
    users: Mutex<Vec<UserCredentials>>,
    preferences: Mutex<Vec<UserPreference>>,
    requests: Mutex<Vec<SpeechRequest>>,
    results: Mutex<Vec<SpeechResult>>,
}

impl MockDb {
    pub fn last_result_id(&self) -> Option<Uuid> {
        self.results.lock().unwrap().last().map(|r| r.id)
    }
}

#[async_trait]
impl DatabaseService for MockDb {
    async fn create_user(&self, email: &str, hashed_password: &str) -> PortResult<User> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == email) {
            return Err(PortError::Storage(format!(
                "duplicate email: {}",
                email
            )));
        }
        let user_id = Uuid::new_v4();
        users.push(UserCredentials {
            user_id,
            email: email.to_string(),
            hashed_password: hashed_password.to_string(),
        });
        Ok(User {
            id: user_id,
            email: email.to_string(),
        })
    }

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("User {} not found", email)))
    }

    async fn create_preference(
        &self,
        user_id: Uuid,
        settings: &VoiceSettings,
    ) -> PortResult<UserPreference> {
        let mut preferences = self.preferences.lock().unwrap();
        if preferences.iter().any(|p| p.user_id == user_id) {
            return Err(PortError::Storage(format!(
                "duplicate preferences for user {}",
                user_id
            )));
        }
        let preference = UserPreference {
            id: Uuid::new_v4(),
            user_id,
            settings: settings.clone(),
        };
        preferences.push(preference.clone());
        Ok(preference)
    }

    async fn get_preference_by_user(&self, user_id: Uuid) -> PortResult<UserPreference> {
        self.preferences
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.user_id == user_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("No preferences found for user {}", user_id)))
    }

    async fn update_preference(
        &self,
        user_id: Uuid,
        settings: &VoiceSettings,
    ) -> PortResult<UserPreference> {
        let mut preferences = self.preferences.lock().unwrap();
        let preference = preferences
            .iter_mut()
            .find(|p| p.user_id == user_id)
            .ok_or_else(|| {
                PortError::NotFound(format!("No preferences found for user {}", user_id))
            })?;
        preference.settings = settings.clone();
        Ok(preference.clone())
    }

    async fn delete_preferences_for_user(&self, user_id: Uuid) -> PortResult<u64> {
        let mut preferences = self.preferences.lock().unwrap();
        let before = preferences.len();
        preferences.retain(|p| p.user_id != user_id);
        Ok((before - preferences.len()) as u64)
    }

    async fn create_speech_request(
        &self,
        user_id: Uuid,
        input_text: &str,
        input_format: InputFormat,
        output_format: OutputFormat,
    ) -> PortResult<SpeechRequest> {
        let request = SpeechRequest {
            id: Uuid::new_v4(),
            user_id,
            input_text: input_text.to_string(),
            input_format,
            output_format,
            status: ProcessStatus::Pending,
            created_at: Utc::now(),
        };
        self.requests.lock().unwrap().push(request.clone());
        Ok(request)
    }

    async fn attach_speech_result(
        &self,
        request_id: Uuid,
        audio_file_path: &str,
        audio_file_size: i64,
        duration_secs: f64,
    ) -> PortResult<SpeechResult> {
        let mut requests = self.requests.lock().unwrap();
        let request = requests
            .iter_mut()
            .find(|r| r.id == request_id)
            .ok_or_else(|| PortError::NotFound(format!("Request {} not found", request_id)))?;
        request.status = ProcessStatus::Completed;

        let result = SpeechResult {
            id: Uuid::new_v4(),
            request_id,
            audio_file_path: audio_file_path.to_string(),
            audio_file_size,
            duration_secs,
        };
        self.results.lock().unwrap().push(result.clone());
        Ok(result)
    }

    async fn get_speech_result(&self, result_id: Uuid) -> PortResult<SpeechResult> {
        self.results
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == result_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("Speech result {} not found", result_id)))
    }
}

//=========================================================================================
// Mock Synthesis Engine
//=========================================================================================

/// Generates a silent WAV buffer with the given sample count and rate.
pub fn test_wav(samples: u32, sample_rate: u32) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = std::io::Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for _ in 0..samples {
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}

/// A synthesis engine that always returns two seconds of 8 kHz silence.
pub struct MockTts;

#[async_trait]
impl SpeechSynthesisService for MockTts {
    async fn synthesize(&self, _spec: &SynthesisSpec) -> PortResult<Vec<u8>> {
        Ok(test_wav(16_000, 8_000))
    }
}

//=========================================================================================
// State Builders
//=========================================================================================

fn test_config() -> Config {
    let audio_dir = std::env::temp_dir().join("speech-api-tests");
    std::fs::create_dir_all(&audio_dir).unwrap();
    Config {
        bind_address: "127.0.0.1:3000".parse().unwrap(),
        database_url: "postgres://unused".to_string(),
        log_level: Level::INFO,
        jwt_secret: "test-secret".to_string(),
        jwt_algorithm: Algorithm::HS256,
        openai_api_key: None,
        tts_model: "tts-1-hd".to_string(),
        tts_voice: "alloy".to_string(),
        tts_format: OutputFormat::Wav,
        audio_dir,
        public_base_url: "http://localhost:3000".to_string(),
    }
}

pub fn test_state_with_db() -> (Arc<AppState>, Arc<MockDb>) {
    let config = Arc::new(test_config());
    let db = Arc::new(MockDb::default());
    let state = Arc::new(AppState {
        db: db.clone(),
        tts: Arc::new(MockTts),
        tokens: TokenIssuer::new(config.jwt_secret.as_bytes(), config.jwt_algorithm),
        config,
    });
    (state, db)
}

pub fn test_state() -> Arc<AppState> {
    test_state_with_db().0
}

/// A state seeded with one user whose password is stored properly hashed.
pub async fn state_with_user(email: &str, plain_password: &str) -> Arc<AppState> {
    let state = test_state();
    let hash = password::hash_password(plain_password).unwrap();
    state.db.create_user(email, &hash).await.unwrap();
    state
}

pub fn test_user() -> AuthUser {
    AuthUser {
        user_id: Uuid::new_v4(),
        email: "a@example.com".to_string(),
    }
}
