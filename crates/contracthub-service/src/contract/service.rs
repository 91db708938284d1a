//! Contract CRUD, versioning, and summarization.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use contracthub_ai::{ContractMetadata, Summarizer};
use contracthub_core::error::AppError;
use contracthub_core::result::AppResult;
use contracthub_core::traits::{ExtractedText, ObjectStore, TextExtractor};
use contracthub_database::ContractRepository;
use contracthub_entity::contract::{
    ContractStatus, ContractVersion, ContractWithVersions, NewContract, NewContractVersion,
    UpdateContract,
};

use crate::context::RequestContext;
use crate::storage::service::delete_owned_file;
use crate::validate::FieldErrors;

/// Manages contracts and their versions.
///
/// Every lookup is scoped to the caller: contracts owned by someone else
/// are reported as not found unless the caller is an administrator.
#[derive(Debug, Clone)]
pub struct ContractService {
    /// Contract repository.
    contracts: Arc<dyn ContractRepository>,
    /// Object store holding contract files.
    store: Arc<dyn ObjectStore>,
    /// Text extractor.
    extractor: Arc<dyn TextExtractor>,
    /// Summarizer.
    summarizer: Arc<Summarizer>,
}

impl ContractService {
    /// Creates a new contract service.
    pub fn new(
        contracts: Arc<dyn ContractRepository>,
        store: Arc<dyn ObjectStore>,
        extractor: Arc<dyn TextExtractor>,
        summarizer: Arc<Summarizer>,
    ) -> Self {
        Self {
            contracts,
            store,
            extractor,
            summarizer,
        }
    }

    /// Creates a contract owned by the caller, with version 1.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        new: NewContract,
    ) -> AppResult<ContractWithVersions> {
        let mut errors = FieldErrors::new();
        errors.required("title", &new.title);
        errors.required("originalFilename", &new.original_filename);
        errors.required("fileUrl", &new.file_url);
        errors.required("fileType", &new.file_type);
        errors.non_negative("fileSize", Some(new.file_size));
        errors.finish()?;

        let created = self.contracts.create(&ctx.user_id, new).await?;
        info!(
            contract_id = %created.contract.id,
            owner = %ctx.user_id,
            "Contract created"
        );
        Ok(created)
    }

    /// Lists the caller's contracts, newest first.
    pub async fn find_all(&self, ctx: &RequestContext) -> AppResult<Vec<ContractWithVersions>> {
        self.contracts.find_by_owner(&ctx.user_id).await
    }

    /// Gets a contract with its versions.
    pub async fn find_one(&self, ctx: &RequestContext, id: Uuid) -> AppResult<ContractWithVersions> {
        self.contracts
            .find_by_id(id)
            .await?
            .filter(|c| ctx.can_access(&c.contract.owner_id))
            .ok_or_else(|| not_found(id))
    }

    /// Applies a partial update.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        update: UpdateContract,
    ) -> AppResult<ContractWithVersions> {
        let mut errors = FieldErrors::new();
        errors.not_blank("title", update.title.as_deref());
        errors.not_blank("originalFilename", update.original_filename.as_deref());
        errors.not_blank("fileUrl", update.file_url.as_deref());
        errors.not_blank("fileType", update.file_type.as_deref());
        errors.non_negative("fileSize", update.file_size);
        errors.finish()?;

        self.find_one(ctx, id).await?;
        if !update.is_empty() {
            self.contracts.update(id, update).await?;
        }
        self.find_one(ctx, id).await
    }

    /// Sets the business status.
    pub async fn update_status(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        status: ContractStatus,
    ) -> AppResult<ContractWithVersions> {
        self.find_one(ctx, id).await?;
        self.contracts.update(id, UpdateContract::status(status)).await?;
        info!(contract_id = %id, status = %status, "Contract status updated");
        self.find_one(ctx, id).await
    }

    /// Replaces the summary.
    pub async fn update_summary(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        summary: String,
    ) -> AppResult<ContractWithVersions> {
        self.find_one(ctx, id).await?;
        self.contracts.update(id, UpdateContract::summary(summary)).await?;
        self.find_one(ctx, id).await
    }

    /// Appends a version. The contract's current file URL is unchanged.
    pub async fn add_version(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        version: NewContractVersion,
    ) -> AppResult<ContractVersion> {
        let mut errors = FieldErrors::new();
        errors.required("fileUrl", &version.file_url);
        errors.finish()?;

        self.find_one(ctx, id).await?;
        let created = self.contracts.add_version(id, version).await?;
        info!(
            contract_id = %id,
            version = created.version_number,
            "Contract version added"
        );
        Ok(created)
    }

    /// Lists versions in ascending number order.
    pub async fn list_versions(
        &self,
        ctx: &RequestContext,
        id: Uuid,
    ) -> AppResult<Vec<ContractVersion>> {
        Ok(self.find_one(ctx, id).await?.versions)
    }

    /// Summarizes the contract and stores the result.
    ///
    /// Uses `text` when given, else the stored extracted text, else extracts
    /// the file first and stores that text too. A degraded summarizer yields
    /// a placeholder summary, never an error.
    pub async fn generate_summary(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        text: Option<String>,
    ) -> AppResult<ContractWithVersions> {
        let contract = self.find_one(ctx, id).await?;
        let text = self.resolve_text(&contract, text, true).await?;

        let summary = self.summarizer.summarize_or_placeholder(&text).await;
        self.contracts.update(id, UpdateContract::summary(summary)).await?;
        info!(contract_id = %id, "Contract summary generated");
        self.find_one(ctx, id).await
    }

    /// Extracts key metadata without modifying the contract.
    pub async fn extract_metadata(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        text: Option<String>,
    ) -> AppResult<ContractMetadata> {
        let contract = self.find_one(ctx, id).await?;
        let text = self.resolve_text(&contract, text, false).await?;
        Ok(self.summarizer.extract_metadata(&text).await)
    }

    /// Extracts the text of an arbitrary file URL.
    pub async fn extract_file(&self, file_url: &str) -> AppResult<ExtractedText> {
        if file_url.trim().is_empty() {
            return Err(AppError::validation("fileUrl is required"));
        }
        let url = self.store.download_url(file_url).await?;
        self.extractor.extract(&url, None).await
    }

    /// Deletes a contract, its versions, and then its current file.
    ///
    /// The file is removed best effort after the record: failures, and
    /// files under another user's upload prefix, are logged and skipped.
    pub async fn remove(&self, ctx: &RequestContext, id: Uuid) -> AppResult<()> {
        let contract = self.find_one(ctx, id).await?.contract;

        if !self.contracts.delete(id).await? {
            return Err(not_found(id));
        }
        info!(contract_id = %id, "Contract deleted");

        if let Err(e) = delete_owned_file(self.store.as_ref(), ctx, &contract.file_url).await {
            warn!(
                contract_id = %id,
                file_url = %contract.file_url,
                error = %e,
                "Contract file left in place"
            );
        }
        Ok(())
    }

    async fn resolve_text(
        &self,
        contract: &ContractWithVersions,
        text: Option<String>,
        persist: bool,
    ) -> AppResult<String> {
        if let Some(text) = text.filter(|t| !t.trim().is_empty()) {
            return Ok(text);
        }
        if let Some(text) = contract
            .contract
            .extracted_text
            .as_ref()
            .filter(|t| !t.trim().is_empty())
        {
            return Ok(text.clone());
        }

        let c = &contract.contract;
        let url = self.store.download_url(&c.file_url).await?;
        let extracted = self.extractor.extract(&url, Some(&c.file_type)).await?;
        if persist {
            self.contracts
                .update(
                    c.id,
                    UpdateContract {
                        extracted_text: Some(extracted.text.clone()),
                        ..Default::default()
                    },
                )
                .await?;
        }
        Ok(extracted.text)
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::not_found(format!("Contract {id} not found"))
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use contracthub_core::error::ErrorKind;
    use contracthub_database::MemoryContractRepository;

    use super::*;
    use crate::testing::{StubExtractor, admin, ctx, local_store, summarizer};

    struct Fixture {
        service: ContractService,
        extractor: Arc<StubExtractor>,
        store: Arc<contracthub_storage::LocalObjectStore>,
        _dir: tempfile::TempDir,
    }

    async fn fixture(extractor: Arc<StubExtractor>, reply: Option<&'static str>) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let store = local_store(&dir).await;
        let service = ContractService::new(
            Arc::new(MemoryContractRepository::new()),
            store.clone(),
            extractor.clone(),
            summarizer(reply),
        );
        Fixture {
            service,
            extractor,
            store,
            _dir: dir,
        }
    }

    fn msa() -> NewContract {
        NewContract {
            title: "MSA".into(),
            original_filename: "f.pdf".into(),
            file_url: "https://x/f.pdf".into(),
            file_type: "application/pdf".into(),
            file_size: 1024,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_defaults() {
        let f = fixture(StubExtractor::ok(""), None).await;
        let created = f.service.create(&ctx("u1"), msa()).await.unwrap();

        assert_eq!(created.contract.status, ContractStatus::Draft);
        assert_eq!(created.versions.len(), 1);
        assert_eq!(created.versions[0].version_number, 1);
        assert_eq!(created.versions[0].file_url, "https://x/f.pdf");
        assert_eq!(created.versions[0].version_name, "Initial Version");

        let found = f.service.find_one(&ctx("u1"), created.contract.id).await.unwrap();
        assert_eq!(found, created);
    }

    #[tokio::test]
    async fn test_create_validates_fields() {
        let f = fixture(StubExtractor::ok(""), None).await;
        let err = f
            .service
            .create(
                &ctx("u1"),
                NewContract {
                    title: " ".into(),
                    file_size: -5,
                    ..msa()
                },
            )
            .await
            .unwrap_err();

        assert!(err.is(ErrorKind::Validation));
        let details = err.details.unwrap();
        assert!(details.get("title").is_some());
        assert!(details.get("fileSize").is_some());
    }

    #[tokio::test]
    async fn test_other_owner_sees_not_found() {
        let f = fixture(StubExtractor::ok(""), None).await;
        let id = f.service.create(&ctx("u1"), msa()).await.unwrap().contract.id;

        let err = f.service.find_one(&ctx("u2"), id).await.unwrap_err();
        assert!(err.is(ErrorKind::NotFound));
        let err = f
            .service
            .update_status(&ctx("u2"), id, ContractStatus::Signed)
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::NotFound));

        assert!(f.service.find_one(&admin(), id).await.is_ok());
        assert!(f.service.find_all(&ctx("u2")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_round_trip() {
        let f = fixture(StubExtractor::ok(""), None).await;
        let before = f.service.create(&ctx("u1"), msa()).await.unwrap();
        let id = before.contract.id;

        let after = f
            .service
            .update(
                &ctx("u1"),
                id,
                UpdateContract {
                    title: Some("X".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(after.contract.title, "X");
        assert_eq!(after.contract.file_url, before.contract.file_url);
        assert_eq!(after.contract.status, before.contract.status);
        assert_eq!(after.contract.file_size, before.contract.file_size);
        assert_eq!(after.versions, before.versions);
    }

    #[tokio::test]
    async fn test_update_rejects_negative_size() {
        let f = fixture(StubExtractor::ok(""), None).await;
        let id = f.service.create(&ctx("u1"), msa()).await.unwrap().contract.id;
        let err = f
            .service
            .update(
                &ctx("u1"),
                id,
                UpdateContract {
                    file_size: Some(-1),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Validation));
    }

    #[tokio::test]
    async fn test_versions_append_in_order() {
        let f = fixture(StubExtractor::ok(""), None).await;
        let id = f.service.create(&ctx("u1"), msa()).await.unwrap().contract.id;

        let v2 = f
            .service
            .add_version(
                &ctx("u1"),
                id,
                NewContractVersion {
                    file_url: "https://x/f-v2.pdf".into(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(v2.version_number, 2);
        assert_eq!(v2.version_name, "Version 2");

        let versions = f.service.list_versions(&ctx("u1"), id).await.unwrap();
        let numbers: Vec<i32> = versions.iter().map(|v| v.version_number).collect();
        assert_eq!(numbers, vec![1, 2]);

        let contract = f.service.find_one(&ctx("u1"), id).await.unwrap().contract;
        assert_eq!(contract.file_url, "https://x/f.pdf");
    }

    #[tokio::test]
    async fn test_summary_from_body_text() {
        let f = fixture(StubExtractor::ok("unused"), Some("- key point")).await;
        let id = f.service.create(&ctx("u1"), msa()).await.unwrap().contract.id;

        let updated = f
            .service
            .generate_summary(&ctx("u1"), id, Some("contract body".into()))
            .await
            .unwrap();
        assert_eq!(updated.contract.summary.as_deref(), Some("- key point"));
        assert_eq!(f.extractor.call_count(), 0);
    }

    #[tokio::test]
    async fn test_summary_extracts_and_stores_text_when_missing() {
        let f = fixture(StubExtractor::ok("This Agreement..."), None).await;
        let id = f.service.create(&ctx("u1"), msa()).await.unwrap().contract.id;

        let updated = f.service.generate_summary(&ctx("u1"), id, None).await.unwrap();
        assert_eq!(
            updated.contract.summary.as_deref(),
            Some("API key not configured. Summary not available.")
        );
        assert_eq!(updated.contract.extracted_text.as_deref(), Some("This Agreement..."));
        assert_eq!(f.extractor.call_count(), 1);

        f.service.generate_summary(&ctx("u1"), id, None).await.unwrap();
        assert_eq!(f.extractor.call_count(), 1);
    }

    #[tokio::test]
    async fn test_summary_extraction_failure_propagates() {
        let f = fixture(
            StubExtractor::failing(AppError::extraction("Failed to download file: 404")),
            Some("unused"),
        )
        .await;
        let id = f.service.create(&ctx("u1"), msa()).await.unwrap().contract.id;

        let err = f.service.generate_summary(&ctx("u1"), id, None).await.unwrap_err();
        assert!(err.is(ErrorKind::Extraction));
        let contract = f.service.find_one(&ctx("u1"), id).await.unwrap().contract;
        assert!(contract.summary.is_none());
    }

    #[tokio::test]
    async fn test_metadata_does_not_mutate() {
        let f = fixture(StubExtractor::ok("text"), Some(r#"{"contractType":"MSA"}"#)).await;
        let id = f.service.create(&ctx("u1"), msa()).await.unwrap().contract.id;

        let metadata = f.service.extract_metadata(&ctx("u1"), id, None).await.unwrap();
        assert_eq!(metadata.contract_type.as_deref(), Some("MSA"));
        let contract = f.service.find_one(&ctx("u1"), id).await.unwrap().contract;
        assert!(contract.extracted_text.is_none());
    }

    #[tokio::test]
    async fn test_remove_deletes_record_and_file() {
        let f = fixture(StubExtractor::ok(""), None).await;
        let url = f
            .store
            .upload("uploads/u1/1-f.pdf", Bytes::from_static(b"%PDF"), None)
            .await
            .unwrap();
        let id = f
            .service
            .create(
                &ctx("u1"),
                NewContract {
                    file_url: url,
                    ..msa()
                },
            )
            .await
            .unwrap()
            .contract
            .id;

        f.service.remove(&ctx("u1"), id).await.unwrap();
        assert!(f.service.find_one(&ctx("u1"), id).await.unwrap_err().is(ErrorKind::NotFound));
        assert!(f.store.read("uploads/u1/1-f.pdf").await.unwrap_err().is(ErrorKind::NotFound));
    }

    #[tokio::test]
    async fn test_remove_keeps_another_users_upload() {
        let f = fixture(StubExtractor::ok(""), None).await;
        let url = f
            .store
            .upload("uploads/u1/secret.pdf", Bytes::from_static(b"%PDF"), None)
            .await
            .unwrap();
        let id = f
            .service
            .create(
                &ctx("u2"),
                NewContract {
                    file_url: url,
                    ..msa()
                },
            )
            .await
            .unwrap()
            .contract
            .id;

        f.service.remove(&ctx("u2"), id).await.unwrap();
        assert!(f.service.find_one(&ctx("u2"), id).await.unwrap_err().is(ErrorKind::NotFound));
        assert_eq!(
            f.store.read("uploads/u1/secret.pdf").await.unwrap(),
            Bytes::from_static(b"%PDF")
        );
    }

    #[tokio::test]
    async fn test_remove_survives_foreign_file_url() {
        let f = fixture(StubExtractor::ok(""), None).await;
        let id = f.service.create(&ctx("u1"), msa()).await.unwrap().contract.id;
        f.service.remove(&ctx("u1"), id).await.unwrap();
        assert!(f.service.find_all(&ctx("u1")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_extract_file_resolves_download_url() {
        let f = fixture(StubExtractor::ok("text"), None).await;
        let url = f.store.file_url("uploads/u1/a.pdf");

        f.service.extract_file(&url).await.unwrap();
        let calls = f.extractor.calls.lock().unwrap();
        assert!(calls[0].starts_with("http://api.test/api/storage/files/uploads/u1/a.pdf?token="));
    }
}
