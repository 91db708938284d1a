//! # contracthub-auth
//!
//! Identity verification for ContractHub. Bearer tokens are JWTs issued by
//! an external identity provider and checked against a shared secret (HS256)
//! or the provider's public key (RS256).

pub mod jwt;

pub use jwt::{Claims, JwtEncoder, JwtIdentityVerifier};
