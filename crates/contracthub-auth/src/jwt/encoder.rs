//! HS256 token minting for development tooling and tests.

use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};

use contracthub_core::config::AuthConfig;
use contracthub_core::error::{AppError, ErrorKind};

use super::claims::Claims;

/// Creates HS256 tokens accepted by a [`super::JwtIdentityVerifier`]
/// configured with the same secret.
#[derive(Clone)]
pub struct JwtEncoder {
    encoding_key: EncodingKey,
    issuer: Option<String>,
    audience: Option<String>,
    ttl_minutes: i64,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("ttl_minutes", &self.ttl_minutes)
            .finish()
    }
}

impl JwtEncoder {
    /// Creates an encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            ttl_minutes: i64::try_from(config.dev_token_ttl_minutes).unwrap_or(i64::MAX / 60),
        }
    }

    /// Mint a token valid for the configured development TTL.
    pub fn issue(
        &self,
        sub: &str,
        email: Option<&str>,
        role: Option<&str>,
    ) -> Result<String, AppError> {
        self.issue_with_ttl(sub, email, role, Duration::minutes(self.ttl_minutes))
    }

    /// Mint a token valid for `ttl` (negative values produce expired tokens).
    pub fn issue_with_ttl(
        &self,
        sub: &str,
        email: Option<&str>,
        role: Option<&str>,
        ttl: Duration,
    ) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: sub.to_string(),
            email: email.map(str::to_string),
            role: role.map(str::to_string),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            iss: self.issuer.clone(),
            aud: self.audience.clone().map(serde_json::Value::String),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::with_source(ErrorKind::Internal, "Failed to sign token", e))
    }
}
