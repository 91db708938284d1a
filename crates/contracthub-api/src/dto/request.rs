//! Request DTOs with validation.
//!
//! Required string fields default to empty so that a missing field is
//! reported through the same field-level validation error as a blank one.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use contracthub_entity::contract::{ContractStatus, NewContract, NewContractVersion, UpdateContract};
use contracthub_entity::document::{DocumentFilter, DocumentStatus, NewDocument, UpdateDocument};

/// Create contract request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateContractRequest {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    pub description: Option<String>,
    #[validate(length(min = 1, message = "Original filename is required"))]
    pub original_filename: String,
    #[validate(length(min = 1, message = "File URL is required"))]
    pub file_url: String,
    #[validate(length(min = 1, message = "File type is required"))]
    pub file_type: String,
    #[validate(
        required(message = "File size is required"),
        range(min = 0, message = "File size must not be negative")
    )]
    pub file_size: Option<i64>,
    pub status: Option<ContractStatus>,
    pub expiry_date: Option<NaiveDate>,
    pub extracted_text: Option<String>,
    pub summary: Option<String>,
}

impl From<CreateContractRequest> for NewContract {
    fn from(req: CreateContractRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            original_filename: req.original_filename,
            file_url: req.file_url,
            file_type: req.file_type,
            file_size: req.file_size.unwrap_or_default(),
            status: req.status,
            expiry_date: req.expiry_date,
            extracted_text: req.extracted_text,
            summary: req.summary,
        }
    }
}

/// Partial contract update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateContractRequest {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(length(min = 1, message = "Original filename must not be empty"))]
    pub original_filename: Option<String>,
    #[validate(length(min = 1, message = "File URL must not be empty"))]
    pub file_url: Option<String>,
    #[validate(length(min = 1, message = "File type must not be empty"))]
    pub file_type: Option<String>,
    #[validate(range(min = 0, message = "File size must not be negative"))]
    pub file_size: Option<i64>,
    pub status: Option<ContractStatus>,
    pub expiry_date: Option<NaiveDate>,
    pub extracted_text: Option<String>,
    pub summary: Option<String>,
}

impl From<UpdateContractRequest> for UpdateContract {
    fn from(req: UpdateContractRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            original_filename: req.original_filename,
            file_url: req.file_url,
            file_type: req.file_type,
            file_size: req.file_size,
            status: req.status,
            expiry_date: req.expiry_date,
            extracted_text: req.extracted_text,
            summary: req.summary,
        }
    }
}

/// `PATCH /contracts/{id}/status` body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateStatusRequest {
    pub status: ContractStatus,
}

/// `PATCH /contracts/{id}/summary` body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct UpdateSummaryRequest {
    #[validate(length(min = 1, message = "Summary is required"))]
    pub summary: String,
}

/// `POST /contracts/{id}/summarize` and `/metadata` body. Optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TextRequest {
    /// Text to use instead of the contract's stored or extracted text.
    pub text: Option<String>,
}

/// `POST /contracts/{id}/versions` body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct AddVersionRequest {
    #[validate(length(min = 1, message = "File URL is required"))]
    pub file_url: String,
    #[serde(alias = "name")]
    pub version_name: Option<String>,
    pub description: Option<String>,
}

impl From<AddVersionRequest> for NewContractVersion {
    fn from(req: AddVersionRequest) -> Self {
        Self {
            file_url: req.file_url,
            version_name: req.version_name,
            description: req.description,
        }
    }
}

/// `POST /contracts/extract` body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct ExtractRequest {
    #[validate(length(min = 1, message = "File URL is required"))]
    pub file_url: String,
}

/// Create document request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateDocumentRequest {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    pub description: Option<String>,
    #[validate(length(min = 1, message = "File URL is required"))]
    pub file_url: String,
    #[validate(length(min = 1, message = "File type is required"))]
    pub file_type: String,
    #[validate(
        required(message = "File size is required"),
        range(min = 0, message = "File size must not be negative")
    )]
    pub file_size: Option<i64>,
    pub tags: Vec<String>,
}

impl From<CreateDocumentRequest> for NewDocument {
    fn from(req: CreateDocumentRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            file_url: req.file_url,
            file_type: req.file_type,
            file_size: req.file_size.unwrap_or_default(),
            tags: req.tags,
        }
    }
}

/// Document update body. Status and processing outputs are not writable.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct UpdateDocumentRequest {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl From<UpdateDocumentRequest> for UpdateDocument {
    fn from(req: UpdateDocumentRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            tags: req.tags,
        }
    }
}

/// `GET /documents` query parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentQuery {
    pub status: Option<DocumentStatus>,
    pub tag: Option<String>,
    pub search: Option<String>,
}

impl From<DocumentQuery> for DocumentFilter {
    fn from(query: DocumentQuery) -> Self {
        Self {
            status: query.status,
            tag: query.tag.filter(|t| !t.is_empty()),
            search: query.search.filter(|s| !s.is_empty()),
        }
    }
}

/// `POST /auth/verify` body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct VerifyTokenRequest {
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,
}

/// `?fileUrl=` query for storage endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FileUrlQuery {
    pub file_url: String,
}

/// `?token=` query for signed local downloads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadTokenQuery {
    pub token: String,
}
