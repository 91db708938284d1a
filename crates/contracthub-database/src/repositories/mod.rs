//! Repository traits and their implementations.

pub mod contract;
pub mod document;
pub mod memory;

use async_trait::async_trait;
use uuid::Uuid;

use contracthub_core::result::AppResult;
use contracthub_entity::contract::{
    Contract, ContractVersion, ContractWithVersions, NewContract, NewContractVersion,
    UpdateContract,
};
use contracthub_entity::document::{Document, DocumentFilter, NewDocument, UpdateDocument};

pub use contract::PgContractRepository;
pub use document::PgDocumentRepository;
pub use memory::{MemoryContractRepository, MemoryDocumentRepository};

/// Persistence for contracts and their versions.
///
/// Version numbers come from a per-contract counter that is incremented
/// atomically, so concurrent [`ContractRepository::add_version`] calls
/// never receive the same number and numbers are never reused.
#[async_trait]
pub trait ContractRepository: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a contract together with version 1 ("Initial Version").
    async fn create(&self, owner_id: &str, contract: NewContract) -> AppResult<ContractWithVersions>;

    /// All contracts owned by `owner_id`, newest first, with versions.
    async fn find_by_owner(&self, owner_id: &str) -> AppResult<Vec<ContractWithVersions>>;

    /// A contract with its versions.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<ContractWithVersions>>;

    /// Versions of a contract in ascending number order.
    async fn find_versions(&self, contract_id: Uuid) -> AppResult<Vec<ContractVersion>>;

    /// Append a version numbered one past the highest number ever assigned.
    ///
    /// Fails with not-found when the contract does not exist.
    async fn add_version(
        &self,
        contract_id: Uuid,
        version: NewContractVersion,
    ) -> AppResult<ContractVersion>;

    /// Shallow-merge `update` over the stored contract.
    ///
    /// Fails with not-found when the contract does not exist.
    async fn update(&self, id: Uuid, update: UpdateContract) -> AppResult<Contract>;

    /// Delete a contract and, by cascade, its versions.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

/// Persistence for documents.
///
/// The `mark_*` operations are the only way to change a document's
/// status; each is a single conditional write so that two pipelines can
/// never both claim the same document.
#[async_trait]
pub trait DocumentRepository: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a document in `pending` status.
    async fn create(&self, uploaded_by: &str, document: NewDocument) -> AppResult<Document>;

    /// Documents uploaded by `uploaded_by` matching `filter`, newest first.
    async fn find_by_uploader(
        &self,
        uploaded_by: &str,
        filter: &DocumentFilter,
    ) -> AppResult<Vec<Document>>;

    /// A single document.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Document>>;

    /// Shallow-merge client-editable fields.
    async fn update(&self, id: Uuid, update: UpdateDocument) -> AppResult<Document>;

    /// Move to `processing` unless already there. `None` when the
    /// document is missing or already processing.
    async fn mark_processing(&self, id: Uuid) -> AppResult<Option<Document>>;

    /// Move a `processing` document to `failed`, leaving outputs untouched.
    async fn mark_failed(&self, id: Uuid) -> AppResult<Option<Document>>;

    /// Store outputs and move a `processing` document to `completed`.
    async fn mark_completed(
        &self,
        id: Uuid,
        extracted_text: &str,
        summary: &str,
    ) -> AppResult<Option<Document>>;

    /// Delete a document.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}
