//! Contract entity model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::ContractStatus;
use super::version::ContractVersion;

/// A contract record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    /// Unique contract identifier.
    pub id: Uuid,
    /// Contract title.
    pub title: String,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Identity-provider subject of the owner.
    #[serde(rename = "userId")]
    pub owner_id: String,
    /// File name as uploaded.
    pub original_filename: String,
    /// URL of the current file.
    pub file_url: String,
    /// Declared MIME/type string.
    pub file_type: String,
    /// File size in bytes. Never negative.
    pub file_size: i64,
    /// Business status.
    pub status: ContractStatus,
    /// Optional expiry date.
    pub expiry_date: Option<NaiveDate>,
    /// Full extracted text, once extracted.
    pub extracted_text: Option<String>,
    /// Human or generated summary.
    pub summary: Option<String>,
    /// Highest version number ever assigned to this contract.
    #[serde(skip)]
    pub last_version_number: i32,
    /// When the contract was created.
    pub created_at: DateTime<Utc>,
    /// When the contract was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Contract {
    /// Returns whether `identity_id` owns this contract.
    pub fn is_owned_by(&self, identity_id: &str) -> bool {
        self.owner_id == identity_id
    }
}

/// A contract with its versions in ascending version order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractWithVersions {
    /// The contract record.
    #[serde(flatten)]
    pub contract: Contract,
    /// All versions, oldest first.
    pub versions: Vec<ContractVersion>,
}

/// Data required to create a contract.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContract {
    /// Contract title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// File name as uploaded.
    pub original_filename: String,
    /// URL of the uploaded file.
    pub file_url: String,
    /// Declared MIME/type string.
    pub file_type: String,
    /// File size in bytes.
    pub file_size: i64,
    /// Initial status; `Draft` when absent.
    pub status: Option<ContractStatus>,
    /// Optional expiry date.
    pub expiry_date: Option<NaiveDate>,
    /// Pre-extracted text, if the client already has it.
    pub extracted_text: Option<String>,
    /// Pre-computed summary, if any.
    pub summary: Option<String>,
}

/// A shallow partial update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateContract {
    pub title: Option<String>,
    pub description: Option<String>,
    pub original_filename: Option<String>,
    pub file_url: Option<String>,
    pub file_type: Option<String>,
    pub file_size: Option<i64>,
    pub status: Option<ContractStatus>,
    pub expiry_date: Option<NaiveDate>,
    pub extracted_text: Option<String>,
    pub summary: Option<String>,
}

impl UpdateContract {
    /// An update that only sets the status.
    pub fn status(status: ContractStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    /// An update that only sets the summary.
    pub fn summary(summary: impl Into<String>) -> Self {
        Self {
            summary: Some(summary.into()),
            ..Default::default()
        }
    }

    /// Returns true when no field is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge the provided fields over `contract`.
    pub fn apply(self, contract: &mut Contract) {
        if let Some(v) = self.title {
            contract.title = v;
        }
        if let Some(v) = self.description {
            contract.description = Some(v);
        }
        if let Some(v) = self.original_filename {
            contract.original_filename = v;
        }
        if let Some(v) = self.file_url {
            contract.file_url = v;
        }
        if let Some(v) = self.file_type {
            contract.file_type = v;
        }
        if let Some(v) = self.file_size {
            contract.file_size = v;
        }
        if let Some(v) = self.status {
            contract.status = v;
        }
        if let Some(v) = self.expiry_date {
            contract.expiry_date = Some(v);
        }
        if let Some(v) = self.extracted_text {
            contract.extracted_text = Some(v);
        }
        if let Some(v) = self.summary {
            contract.summary = Some(v);
        }
    }
}
