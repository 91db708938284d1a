//! Shared value types.

pub mod identity;
pub mod response;

pub use identity::{ADMIN_ROLE, DEFAULT_ROLE, Identity};
pub use response::ApiErrorResponse;
