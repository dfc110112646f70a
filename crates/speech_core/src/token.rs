//! crates/speech_core/src/token.rs
//!
//! The token issuer/validator: signed, time-limited bearer tokens carrying a
//! user identity claim. Issuing never touches the credential store and
//! refreshing never re-checks the password; trust is carried by the signature
//! alone. There is no revocation list - a token dies only by expiring.

use crate::ports::{PortError, PortResult};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifetime of a token issued at login or signup.
pub fn access_ttl() -> Duration {
    Duration::minutes(30)
}

/// Lifetime of a token issued by a refresh.
pub fn refresh_ttl() -> Duration {
    Duration::days(1)
}

/// The claim set embedded in every issued token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// The authenticated user's id.
    pub sub: Uuid,
    pub email: String,
    /// Issued-at, seconds since the epoch.
    pub iat: i64,
    /// Absolute expiry, seconds since the epoch.
    pub exp: i64,
}

/// Issues and validates signed bearer tokens with a shared symmetric secret.
///
/// Built once at startup from the process configuration and shared read-only
/// across requests.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    header: Header,
    validation: Validation,
}

impl TokenIssuer {
    /// Creates an issuer for the given secret and HMAC algorithm.
    pub fn new(secret: &[u8], algorithm: Algorithm) -> Self {
        let mut validation = Validation::new(algorithm);
        // Expiry is a hard boundary; no grace window.
        validation.leeway = 0;
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            header: Header::new(algorithm),
            validation,
        }
    }

    /// Signs a new token for the identity, expiring `ttl` from now.
    pub fn issue(&self, user_id: Uuid, email: &str, ttl: Duration) -> PortResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };
        jsonwebtoken::encode(&self.header, &claims, &self.encoding_key)
            .map_err(|e| PortError::Storage(format!("Failed to sign token: {e}")))
    }

    /// Verifies signature and expiry, returning the identity claims.
    ///
    /// An expired token fails with `TokenExpired`; a bad signature, malformed
    /// payload, or wrong algorithm fails with `TokenInvalid`. The caller must
    /// never attempt repair.
    pub fn validate(&self, token: &str) -> PortResult<Claims> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => PortError::TokenExpired,
                _ => PortError::TokenInvalid,
            })
    }

    /// Validates an existing token and, on success, issues a fresh one for
    /// the same identity with the fixed refresh ttl. An expired or tampered
    /// token fails with the validate taxonomy; no token is ever issued for
    /// an unverifiable identity.
    pub fn refresh(&self, existing: &str) -> PortResult<String> {
        let claims = self.validate(existing)?;
        self.issue(claims.sub, &claims.email, refresh_ttl())
    }
}
