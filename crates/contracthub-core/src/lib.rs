//! # contracthub-core
//!
//! Core crate for ContractHub. Contains configuration schemas, the seam
//! traits implemented by the storage, extraction, AI and auth crates,
//! shared value types, and the unified error system.
//!
//! This crate has **no** internal dependencies on other ContractHub crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
