//! Contract version entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Name given to the version created together with its contract.
pub const INITIAL_VERSION_NAME: &str = "Initial Version";

/// Name used when a version is added without one.
pub fn default_version_name(version_number: i32) -> String {
    format!("Version {version_number}")
}

/// An immutable snapshot of a contract's file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ContractVersion {
    /// Unique version identifier.
    pub id: Uuid,
    /// The owning contract.
    pub contract_id: Uuid,
    /// File URL of this version.
    pub file_url: String,
    /// Sequential version number, starting at 1.
    pub version_number: i32,
    /// Human-readable name.
    pub version_name: String,
    /// Optional change description.
    pub description: Option<String>,
    /// When this version was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to append a version.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContractVersion {
    /// File URL of the new version.
    pub file_url: String,
    /// Optional name; defaults to `"Version {n}"`.
    pub version_name: Option<String>,
    /// Optional change description.
    pub description: Option<String>,
}

impl NewContractVersion {
    /// Resolve the effective name for `version_number`.
    pub fn name_for(&self, version_number: i32) -> String {
        self.version_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| default_version_name(version_number))
    }
}
