//! Convenience result type alias for ContractHub.

use crate::error::AppError;

/// A specialized `Result` type for ContractHub operations.
pub type AppResult<T> = Result<T, AppError>;
