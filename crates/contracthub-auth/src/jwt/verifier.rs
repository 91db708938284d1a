//! Bearer token validation against the identity provider's signing key.

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use tracing::debug;

use contracthub_core::config::AuthConfig;
use contracthub_core::error::{AppError, ErrorKind};
use contracthub_core::result::AppResult;
use contracthub_core::traits::IdentityVerifier;
use contracthub_core::types::Identity;

use super::claims::Claims;

/// Verifies bearer JWTs and yields the caller identity.
#[derive(Clone)]
pub struct JwtIdentityVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtIdentityVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtIdentityVerifier")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtIdentityVerifier {
    /// Creates a verifier from auth configuration.
    ///
    /// Uses RS256 with `public_key_pem` when it is set, HS256 with
    /// `jwt_secret` otherwise.
    pub fn new(config: &AuthConfig) -> AppResult<Self> {
        let (decoding_key, algorithm) = match config.public_key_pem.as_deref() {
            Some(pem) if !pem.trim().is_empty() => {
                let key = DecodingKey::from_rsa_pem(pem.as_bytes()).map_err(|e| {
                    AppError::with_source(ErrorKind::Configuration, "Invalid auth.public_key_pem", e)
                })?;
                (key, Algorithm::RS256)
            }
            _ => {
                if config.jwt_secret.is_empty() {
                    return Err(AppError::configuration(
                        "auth.jwt_secret or auth.public_key_pem must be set",
                    ));
                }
                (
                    DecodingKey::from_secret(config.jwt_secret.as_bytes()),
                    Algorithm::HS256,
                )
            }
        };

        let mut validation = Validation::new(algorithm);
        validation.leeway = config.leeway_seconds;
        let mut required = vec!["exp", "sub"];
        match config.audience.as_deref() {
            Some(aud) => {
                validation.set_audience(&[aud]);
                required.push("aud");
            }
            None => validation.validate_aud = false,
        }
        if let Some(iss) = config.issuer.as_deref() {
            validation.set_issuer(&[iss]);
            required.push("iss");
        }
        // A configured iss/aud is only checked when the claim is required.
        validation.set_required_spec_claims(&required);

        Ok(Self {
            decoding_key,
            validation,
        })
    }

    /// Decode and validate a token, returning its claims.
    pub fn decode(&self, token: &str) -> AppResult<Claims> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            debug!(error = %e, "Token rejected");
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::unauthorized("Token has expired")
                }
                _ => AppError::unauthorized("Invalid or expired token"),
            }
        })?;

        if data.claims.sub.trim().is_empty() {
            return Err(AppError::unauthorized("Token has no subject"));
        }
        Ok(data.claims)
    }
}

#[async_trait]
impl IdentityVerifier for JwtIdentityVerifier {
    async fn verify(&self, token: &str) -> AppResult<Identity> {
        Ok(self.decode(token)?.into_identity())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::jwt::JwtEncoder;

    fn config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "verifier-test-secret".into(),
            leeway_seconds: 0,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_valid_token_yields_identity() {
        let config = config();
        let token = JwtEncoder::new(&config)
            .issue("user-1", Some("a@example.com"), None)
            .unwrap();

        let identity = JwtIdentityVerifier::new(&config).unwrap().verify(&token).await.unwrap();
        assert_eq!(identity.id, "user-1");
        assert_eq!(identity.email.as_deref(), Some("a@example.com"));
        assert_eq!(identity.role, "user");
    }

    #[tokio::test]
    async fn test_expired_token_rejected() {
        let config = config();
        let token = JwtEncoder::new(&config)
            .issue_with_ttl("user-1", None, None, Duration::minutes(-5))
            .unwrap();

        let err = JwtIdentityVerifier::new(&config).unwrap().verify(&token).await.unwrap_err();
        assert!(err.is(ErrorKind::Unauthorized));
        assert_eq!(err.message, "Token has expired");
    }

    #[tokio::test]
    async fn test_wrong_secret_rejected() {
        let token = JwtEncoder::new(&config()).issue("user-1", None, None).unwrap();
        let other = AuthConfig {
            jwt_secret: "another-secret".into(),
            ..config()
        };

        let err = JwtIdentityVerifier::new(&other).unwrap().verify(&token).await.unwrap_err();
        assert!(err.is(ErrorKind::Unauthorized));
    }

    #[tokio::test]
    async fn test_garbage_rejected() {
        let verifier = JwtIdentityVerifier::new(&config()).unwrap();
        let err = verifier.verify("not-a-jwt").await.unwrap_err();
        assert_eq!(err.message, "Invalid or expired token");
    }

    #[tokio::test]
    async fn test_issuer_and_audience_enforced() {
        let strict = AuthConfig {
            issuer: Some("https://idp.example.com".into()),
            audience: Some("contracthub".into()),
            ..config()
        };
        let verifier = JwtIdentityVerifier::new(&strict).unwrap();

        let good = JwtEncoder::new(&strict).issue("u", None, Some("admin")).unwrap();
        assert!(verifier.verify(&good).await.unwrap().is_admin());

        let bare = JwtEncoder::new(&config()).issue("u", None, None).unwrap();
        assert!(verifier.verify(&bare).await.unwrap_err().is(ErrorKind::Unauthorized));

        let issuer_only = AuthConfig {
            audience: None,
            ..strict.clone()
        };
        let no_aud = JwtEncoder::new(&issuer_only).issue("u", None, None).unwrap();
        assert!(verifier.verify(&no_aud).await.is_err());
        assert!(JwtIdentityVerifier::new(&issuer_only).unwrap().verify(&no_aud).await.is_ok());
    }

    #[test]
    fn test_invalid_public_key_is_configuration_error() {
        let bad = AuthConfig {
            public_key_pem: Some("-----BEGIN PUBLIC KEY-----\nnope\n-----END PUBLIC KEY-----".into()),
            ..config()
        };
        let err = JwtIdentityVerifier::new(&bad).unwrap_err();
        assert!(err.is(ErrorKind::Configuration));
    }
}
