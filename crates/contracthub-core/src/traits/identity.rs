//! Identity verifier trait.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::Identity;

/// Validates a bearer credential and yields the caller identity.
#[async_trait]
pub trait IdentityVerifier: Send + Sync + std::fmt::Debug + 'static {
    /// Verify `token`, failing with an unauthorized error when it is
    /// malformed, expired, or signed by the wrong key.
    async fn verify(&self, token: &str) -> AppResult<Identity>;
}
