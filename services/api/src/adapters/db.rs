//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `DatabaseService` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use speech_core::domain::{
    InputFormat, OutputFormat, ProcessStatus, SpeechRequest, SpeechResult, User, UserCredentials,
    UserPreference, VoiceSettings,
};
use speech_core::ports::{DatabaseService, PortError, PortResult};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `DatabaseService` port.
#[derive(Clone)]
pub struct PgAdapter {
    pool: PgPool,
}

impl PgAdapter {
    /// Creates a new `PgAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

fn storage_err(e: sqlx::Error) -> PortError {
    PortError::Storage(e.to_string())
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct UserRecord {
    id: Uuid,
    email: String,
}
impl UserRecord {
    fn to_domain(self) -> User {
        User {
            id: self.id,
            email: self.email,
        }
    }
}

#[derive(FromRow)]
struct CredentialsRecord {
    id: Uuid,
    email: String,
    password_hash: String,
}
impl CredentialsRecord {
    fn to_domain(self) -> UserCredentials {
        UserCredentials {
            user_id: self.id,
            email: self.email,
            hashed_password: self.password_hash,
        }
    }
}

#[derive(FromRow)]
struct PreferenceRecord {
    id: Uuid,
    user_id: Uuid,
    voice: String,
    speed: f64,
    pitch: f64,
    language: String,
}
impl PreferenceRecord {
    fn to_domain(self) -> UserPreference {
        UserPreference {
            id: self.id,
            user_id: self.user_id,
            settings: VoiceSettings {
                voice: self.voice,
                speed: self.speed,
                pitch: self.pitch,
                language: self.language,
            },
        }
    }
}

#[derive(FromRow)]
struct SpeechRequestRecord {
    id: Uuid,
    user_id: Uuid,
    input_text: String,
    input_format: String,
    output_format: String,
    status: String,
    created_at: chrono::DateTime<chrono::Utc>,
}
impl SpeechRequestRecord {
    fn to_domain(self) -> SpeechRequest {
        SpeechRequest {
            id: self.id,
            user_id: self.user_id,
            input_text: self.input_text,
            input_format: InputFormat::parse_loose(&self.input_format),
            output_format: if self.output_format.eq_ignore_ascii_case("wav") {
                OutputFormat::Wav
            } else {
                OutputFormat::Mp3
            },
            status: match self.status.as_str() {
                "COMPLETED" => ProcessStatus::Completed,
                "FAILED" => ProcessStatus::Failed,
                _ => ProcessStatus::Pending,
            },
            created_at: self.created_at,
        }
    }
}

#[derive(FromRow)]
struct SpeechResultRecord {
    id: Uuid,
    request_id: Uuid,
    audio_file_path: String,
    audio_file_size: i64,
    duration_secs: f64,
}
impl SpeechResultRecord {
    fn to_domain(self) -> SpeechResult {
        SpeechResult {
            id: self.id,
            request_id: self.request_id,
            audio_file_path: self.audio_file_path,
            audio_file_size: self.audio_file_size,
            duration_secs: self.duration_secs,
        }
    }
}

//=========================================================================================
// `DatabaseService` Trait Implementation
//=========================================================================================

#[async_trait]
impl DatabaseService for PgAdapter {
    async fn create_user(&self, email: &str, hashed_password: &str) -> PortResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(
            "INSERT INTO users (id, email, password_hash) VALUES ($1, $2, $3) RETURNING id, email",
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(hashed_password)
        .fetch_one(&self.pool)
        .await
        .map_err(storage_err)?;
        Ok(record.to_domain())
    }

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        let record = sqlx::query_as::<_, CredentialsRecord>(
            "SELECT id, email, password_hash FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => PortError::NotFound(format!("User {} not found", email)),
            _ => storage_err(e),
        })?;
        Ok(record.to_domain())
    }

    async fn create_preference(
        &self,
        user_id: Uuid,
        settings: &VoiceSettings,
    ) -> PortResult<UserPreference> {
        let record = sqlx::query_as::<_, PreferenceRecord>(
            "INSERT INTO user_preferences (id, user_id, voice, speed, pitch, language) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id, user_id, voice, speed, pitch, language",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(&settings.voice)
        .bind(settings.speed)
        .bind(settings.pitch)
        .bind(&settings.language)
        .fetch_one(&self.pool)
        .await
        .map_err(storage_err)?;
        Ok(record.to_domain())
    }

    async fn get_preference_by_user(&self, user_id: Uuid) -> PortResult<UserPreference> {
        let record = sqlx::query_as::<_, PreferenceRecord>(
            "SELECT id, user_id, voice, speed, pitch, language \
             FROM user_preferences WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => {
                PortError::NotFound(format!("No preferences found for user {}", user_id))
            }
            _ => storage_err(e),
        })?;
        Ok(record.to_domain())
    }

    async fn update_preference(
        &self,
        user_id: Uuid,
        settings: &VoiceSettings,
    ) -> PortResult<UserPreference> {
        let record = sqlx::query_as::<_, PreferenceRecord>(
            "UPDATE user_preferences \
             SET voice = $2, speed = $3, pitch = $4, language = $5, updated_at = now() \
             WHERE user_id = $1 \
             RETURNING id, user_id, voice, speed, pitch, language",
        )
        .bind(user_id)
        .bind(&settings.voice)
        .bind(settings.speed)
        .bind(settings.pitch)
        .bind(&settings.language)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => {
                PortError::NotFound(format!("No preferences found for user {}", user_id))
            }
            _ => storage_err(e),
        })?;
        Ok(record.to_domain())
    }

    async fn delete_preferences_for_user(&self, user_id: Uuid) -> PortResult<u64> {
        let result = sqlx::query("DELETE FROM user_preferences WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(storage_err)?;
        Ok(result.rows_affected())
    }

    async fn create_speech_request(
        &self,
        user_id: Uuid,
        input_text: &str,
        input_format: InputFormat,
        output_format: OutputFormat,
    ) -> PortResult<SpeechRequest> {
        let record = sqlx::query_as::<_, SpeechRequestRecord>(
            "INSERT INTO speech_requests (id, user_id, input_text, input_format, output_format, status) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id, user_id, input_text, input_format, output_format, status, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(input_text)
        .bind(input_format.as_str())
        .bind(output_format.as_str())
        .bind(ProcessStatus::Pending.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(storage_err)?;
        Ok(record.to_domain())
    }

    async fn attach_speech_result(
        &self,
        request_id: Uuid,
        audio_file_path: &str,
        audio_file_size: i64,
        duration_secs: f64,
    ) -> PortResult<SpeechResult> {
        // The result row and the status flip belong together.
        let mut tx = self.pool.begin().await.map_err(storage_err)?;

        let record = sqlx::query_as::<_, SpeechResultRecord>(
            "INSERT INTO speech_results (id, request_id, audio_file_path, audio_file_size, duration_secs) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, request_id, audio_file_path, audio_file_size, duration_secs",
        )
        .bind(Uuid::new_v4())
        .bind(request_id)
        .bind(audio_file_path)
        .bind(audio_file_size)
        .bind(duration_secs)
        .fetch_one(&mut *tx)
        .await
        .map_err(storage_err)?;

        sqlx::query("UPDATE speech_requests SET status = $2 WHERE id = $1")
            .bind(request_id)
            .bind(ProcessStatus::Completed.as_str())
            .execute(&mut *tx)
            .await
            .map_err(storage_err)?;

        tx.commit().await.map_err(storage_err)?;
        Ok(record.to_domain())
    }

    async fn get_speech_result(&self, result_id: Uuid) -> PortResult<SpeechResult> {
        let record = sqlx::query_as::<_, SpeechResultRecord>(
            "SELECT id, request_id, audio_file_path, audio_file_size, duration_secs \
             FROM speech_results WHERE id = $1",
        )
        .bind(result_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => {
                PortError::NotFound(format!("Speech result {} not found", result_id))
            }
            _ => storage_err(e),
        })?;
        Ok(record.to_domain())
    }
}
