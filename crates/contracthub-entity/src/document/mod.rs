//! Document domain entities.

pub mod model;
pub mod status;

pub use model::{Document, DocumentFilter, NewDocument, UpdateDocument};
pub use status::DocumentStatus;
