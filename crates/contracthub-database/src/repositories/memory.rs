//! In-memory repositories using a Tokio mutex for single-process deployments.
//!
//! Used when `database.provider = "memory"` and by tests. Data is lost on
//! restart.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use contracthub_core::error::AppError;
use contracthub_core::result::AppResult;
use contracthub_entity::contract::{
    Contract, ContractVersion, ContractWithVersions, INITIAL_VERSION_NAME, NewContract,
    NewContractVersion, UpdateContract,
};
use contracthub_entity::document::{
    Document, DocumentFilter, DocumentStatus, NewDocument, UpdateDocument,
};

use super::{ContractRepository, DocumentRepository};

#[derive(Debug, Default)]
struct ContractState {
    /// Contracts in insertion order.
    contracts: Vec<Contract>,
    versions: HashMap<Uuid, Vec<ContractVersion>>,
}

impl ContractState {
    fn position(&self, id: Uuid) -> Option<usize> {
        self.contracts.iter().position(|c| c.id == id)
    }

    fn with_versions(&self, contract: &Contract) -> ContractWithVersions {
        ContractWithVersions {
            contract: contract.clone(),
            versions: self.versions.get(&contract.id).cloned().unwrap_or_default(),
        }
    }
}

/// In-memory contract repository.
#[derive(Debug, Clone, Default)]
pub struct MemoryContractRepository {
    state: Arc<Mutex<ContractState>>,
}

impl MemoryContractRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContractRepository for MemoryContractRepository {
    async fn create(&self, owner_id: &str, new: NewContract) -> AppResult<ContractWithVersions> {
        let now = Utc::now();
        let contract = Contract {
            id: Uuid::new_v4(),
            title: new.title,
            description: new.description,
            owner_id: owner_id.to_string(),
            original_filename: new.original_filename,
            file_url: new.file_url,
            file_type: new.file_type,
            file_size: new.file_size,
            status: new.status.unwrap_or_default(),
            expiry_date: new.expiry_date,
            extracted_text: new.extracted_text,
            summary: new.summary,
            last_version_number: 1,
            created_at: now,
            updated_at: now,
        };
        let initial = ContractVersion {
            id: Uuid::new_v4(),
            contract_id: contract.id,
            file_url: contract.file_url.clone(),
            version_number: 1,
            version_name: INITIAL_VERSION_NAME.to_string(),
            description: None,
            created_at: now,
        };

        let mut state = self.state.lock().await;
        state.versions.insert(contract.id, vec![initial]);
        state.contracts.push(contract.clone());
        Ok(state.with_versions(&contract))
    }

    async fn find_by_owner(&self, owner_id: &str) -> AppResult<Vec<ContractWithVersions>> {
        let state = self.state.lock().await;
        let mut owned: Vec<&Contract> = state
            .contracts
            .iter()
            .rev()
            .filter(|c| c.owner_id == owner_id)
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned.into_iter().map(|c| state.with_versions(c)).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<ContractWithVersions>> {
        let state = self.state.lock().await;
        Ok(state
            .position(id)
            .map(|idx| state.with_versions(&state.contracts[idx])))
    }

    async fn find_versions(&self, contract_id: Uuid) -> AppResult<Vec<ContractVersion>> {
        let state = self.state.lock().await;
        Ok(state.versions.get(&contract_id).cloned().unwrap_or_default())
    }

    async fn add_version(
        &self,
        contract_id: Uuid,
        version: NewContractVersion,
    ) -> AppResult<ContractVersion> {
        let mut state = self.state.lock().await;
        let idx = state
            .position(contract_id)
            .ok_or_else(|| AppError::not_found(format!("Contract {contract_id} not found")))?;

        state.contracts[idx].last_version_number += 1;
        let number = state.contracts[idx].last_version_number;

        let created = ContractVersion {
            id: Uuid::new_v4(),
            contract_id,
            file_url: version.file_url.clone(),
            version_number: number,
            version_name: version.name_for(number),
            description: version.description,
            created_at: Utc::now(),
        };
        state
            .versions
            .entry(contract_id)
            .or_default()
            .push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: Uuid, update: UpdateContract) -> AppResult<Contract> {
        let mut state = self.state.lock().await;
        let idx = state
            .position(id)
            .ok_or_else(|| AppError::not_found(format!("Contract {id} not found")))?;

        let contract = &mut state.contracts[idx];
        update.apply(contract);
        contract.updated_at = Utc::now();
        Ok(contract.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        match state.position(id) {
            Some(idx) => {
                state.contracts.remove(idx);
                state.versions.remove(&id);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// In-memory document repository.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentRepository {
    /// Documents in insertion order.
    documents: Arc<Mutex<Vec<Document>>>,
}

impl MemoryDocumentRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    async fn transition(
        &self,
        id: Uuid,
        to: DocumentStatus,
        outputs: Option<(&str, &str)>,
    ) -> AppResult<Option<Document>> {
        let mut documents = self.documents.lock().await;
        let Some(doc) = documents
            .iter_mut()
            .find(|d| d.id == id && d.status.can_transition_to(to))
        else {
            return Ok(None);
        };

        doc.status = to;
        if let Some((text, summary)) = outputs {
            doc.extracted_text = Some(text.to_string());
            doc.summary = Some(summary.to_string());
        }
        doc.updated_at = Utc::now();
        Ok(Some(doc.clone()))
    }
}

#[async_trait]
impl DocumentRepository for MemoryDocumentRepository {
    async fn create(&self, uploaded_by: &str, new: NewDocument) -> AppResult<Document> {
        let now = Utc::now();
        let document = Document {
            id: Uuid::new_v4(),
            title: new.title,
            description: new.description,
            file_url: new.file_url,
            file_type: new.file_type,
            file_size: new.file_size,
            uploaded_by: uploaded_by.to_string(),
            status: DocumentStatus::Pending,
            extracted_text: None,
            summary: None,
            tags: new.tags,
            uploaded_at: now,
            updated_at: now,
        };
        self.documents.lock().await.push(document.clone());
        Ok(document)
    }

    async fn find_by_uploader(
        &self,
        uploaded_by: &str,
        filter: &DocumentFilter,
    ) -> AppResult<Vec<Document>> {
        let documents = self.documents.lock().await;
        let mut found: Vec<Document> = documents
            .iter()
            .rev()
            .filter(|d| d.uploaded_by == uploaded_by && d.matches(filter))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
        Ok(found)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Document>> {
        let documents = self.documents.lock().await;
        Ok(documents.iter().find(|d| d.id == id).cloned())
    }

    async fn update(&self, id: Uuid, update: UpdateDocument) -> AppResult<Document> {
        let mut documents = self.documents.lock().await;
        let doc = documents
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| AppError::not_found(format!("Document {id} not found")))?;
        update.apply(doc);
        doc.updated_at = Utc::now();
        Ok(doc.clone())
    }

    async fn mark_processing(&self, id: Uuid) -> AppResult<Option<Document>> {
        self.transition(id, DocumentStatus::Processing, None).await
    }

    async fn mark_failed(&self, id: Uuid) -> AppResult<Option<Document>> {
        self.transition(id, DocumentStatus::Failed, None).await
    }

    async fn mark_completed(
        &self,
        id: Uuid,
        extracted_text: &str,
        summary: &str,
    ) -> AppResult<Option<Document>> {
        self.transition(id, DocumentStatus::Completed, Some((extracted_text, summary)))
            .await
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut documents = self.documents.lock().await;
        let before = documents.len();
        documents.retain(|d| d.id != id);
        Ok(documents.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use contracthub_core::error::ErrorKind;
    use contracthub_entity::contract::ContractStatus;

    use super::*;

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
    async fn test_create_defaults_to_draft_with_initial_version() {
        let repo = MemoryContractRepository::new();
        let created = repo.create("user-1", msa()).await.unwrap();

        assert_eq!(created.contract.status, ContractStatus::Draft);
        assert_eq!(created.versions.len(), 1);
        assert_eq!(created.versions[0].version_number, 1);
        assert_eq!(created.versions[0].version_name, "Initial Version");
        assert_eq!(created.versions[0].file_url, "https://x/f.pdf");

        let found = repo.find_by_id(created.contract.id).await.unwrap().unwrap();
        assert_eq!(found, created);
    }

    #[tokio::test]
    async fn test_concurrent_add_version_has_no_gaps_or_duplicates() {
        let repo = MemoryContractRepository::new();
        let id = repo.create("user-1", msa()).await.unwrap().contract.id;

        let handles: Vec<_> = (0..25)
            .map(|i| {
                let repo = repo.clone();
                tokio::spawn(async move {
                    repo.add_version(
                        id,
                        NewContractVersion {
                            file_url: format!("https://x/f-{i}.pdf"),
                            ..Default::default()
                        },
                    )
                    .await
                    .unwrap()
                    .version_number
                })
            })
            .collect();

        let mut numbers = BTreeSet::new();
        for handle in handles {
            assert!(numbers.insert(handle.await.unwrap()));
        }
        assert_eq!(numbers, (2..=26).collect::<BTreeSet<i32>>());

        let versions = repo.find_versions(id).await.unwrap();
        let listed: Vec<i32> = versions.iter().map(|v| v.version_number).collect();
        assert_eq!(listed, (1..=26).collect::<Vec<i32>>());
    }

    #[tokio::test]
    async fn test_add_version_to_missing_contract() {
        let repo = MemoryContractRepository::new();
        let err = repo
            .add_version(Uuid::new_v4(), NewContractVersion::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_find_by_owner_is_scoped_and_newest_first() {
        let repo = MemoryContractRepository::new();
        let first = repo.create("user-1", msa()).await.unwrap();
        let second = repo
            .create(
                "user-1",
                NewContract {
                    title: "NDA".into(),
                    ..msa()
                },
            )
            .await
            .unwrap();
        repo.create("user-2", msa()).await.unwrap();

        let listed = repo.find_by_owner("user-1").await.unwrap();
        let ids: Vec<Uuid> = listed.iter().map(|c| c.contract.id).collect();
        assert_eq!(ids, vec![second.contract.id, first.contract.id]);
    }

    #[tokio::test]
    async fn test_delete_removes_versions() {
        let repo = MemoryContractRepository::new();
        let id = repo.create("user-1", msa()).await.unwrap().contract.id;
        assert!(repo.delete(id).await.unwrap());
        assert!(repo.find_versions(id).await.unwrap().is_empty());
        assert!(!repo.delete(id).await.unwrap());
    }

    #[tokio::test]
    async fn test_document_claim_is_exclusive() {
        let repo = MemoryDocumentRepository::new();
        let doc = repo
            .create(
                "user-1",
                NewDocument {
                    title: "Lease".into(),
                    file_url: "https://x/lease.pdf".into(),
                    file_type: "application/pdf".into(),
                    file_size: 10,
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(repo.mark_processing(doc.id).await.unwrap().is_some());
        assert!(repo.mark_processing(doc.id).await.unwrap().is_none());

        let done = repo
            .mark_completed(doc.id, "Hello world", "Hello world")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(done.status, DocumentStatus::Completed);
        assert!(repo.mark_failed(doc.id).await.unwrap().is_none());
    }
}
