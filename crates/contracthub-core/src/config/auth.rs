//! Bearer token verification configuration.

use serde::{Deserialize, Serialize};

/// Authentication configuration.
///
/// Tokens are issued by an external identity provider. When
/// `public_key_pem` is set tokens are verified as RS256, otherwise as
/// HS256 with `jwt_secret`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Shared secret for HS256 verification.
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// PEM-encoded RSA public key for RS256 verification.
    #[serde(default)]
    pub public_key_pem: Option<String>,
    /// Required `iss` claim, if any.
    #[serde(default)]
    pub issuer: Option<String>,
    /// Required `aud` claim, if any.
    #[serde(default)]
    pub audience: Option<String>,
    /// Clock skew tolerance in seconds.
    #[serde(default = "default_leeway")]
    pub leeway_seconds: u64,
    /// Lifetime of development tokens minted by the CLI, in minutes.
    #[serde(default = "default_dev_token_ttl")]
    pub dev_token_ttl_minutes: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            public_key_pem: None,
            issuer: None,
            audience: None,
            leeway_seconds: default_leeway(),
            dev_token_ttl_minutes: default_dev_token_ttl(),
        }
    }
}

fn default_jwt_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_leeway() -> u64 {
    5
}

fn default_dev_token_ttl() -> u64 {
    60
}
