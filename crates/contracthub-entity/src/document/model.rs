//! Document entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::DocumentStatus;

/// An uploaded document processed by the extraction pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Unique document identifier.
    pub id: Uuid,
    /// Title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// URL of the stored file.
    pub file_url: String,
    /// Declared MIME/type string.
    pub file_type: String,
    /// File size in bytes.
    pub file_size: i64,
    /// Identity-provider subject of the uploader.
    pub uploaded_by: String,
    /// Processing status.
    pub status: DocumentStatus,
    /// Extracted text, after a successful run.
    pub extracted_text: Option<String>,
    /// Summary, after a successful run.
    pub summary: Option<String>,
    /// Free-form tags.
    pub tags: Vec<String>,
    /// When the document was uploaded.
    pub uploaded_at: DateTime<Utc>,
    /// When the document was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Document {
    /// Returns whether `identity_id` uploaded this document.
    pub fn is_owned_by(&self, identity_id: &str) -> bool {
        self.uploaded_by == identity_id
    }

    /// Whether this document passes `filter`.
    pub fn matches(&self, filter: &DocumentFilter) -> bool {
        if filter.status.is_some_and(|s| s != self.status) {
            return false;
        }
        if let Some(tag) = &filter.tag {
            if !self.tags.iter().any(|t| t == tag) {
                return false;
            }
        }
        if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
            let needle = search.to_lowercase();
            let in_title = self.title.to_lowercase().contains(&needle);
            let in_description = self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&needle));
            if !in_title && !in_description {
                return false;
            }
        }
        true
    }
}

/// Data required to create a document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDocument {
    pub title: String,
    pub description: Option<String>,
    pub file_url: String,
    pub file_type: String,
    pub file_size: i64,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Client-editable document fields. Status and processing outputs are
/// owned by the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDocument {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl UpdateDocument {
    /// Merge the provided fields over `document`.
    pub fn apply(self, document: &mut Document) {
        if let Some(v) = self.title {
            document.title = v;
        }
        if let Some(v) = self.description {
            document.description = Some(v);
        }
        if let Some(v) = self.tags {
            document.tags = v;
        }
    }
}

/// List filters. All set filters must match.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentFilter {
    /// Exact status.
    pub status: Option<DocumentStatus>,
    /// Tag membership.
    pub tag: Option<String>,
    /// Case-insensitive substring of title or description.
    pub search: Option<String>,
}
