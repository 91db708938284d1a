//! PostgreSQL contract repository.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use contracthub_core::error::{AppError, ErrorKind};
use contracthub_core::result::AppResult;
use contracthub_entity::contract::{
    Contract, ContractVersion, ContractWithVersions, INITIAL_VERSION_NAME, NewContract,
    NewContractVersion, UpdateContract,
};

use super::ContractRepository;

/// Repository for contract and version persistence.
#[derive(Debug, Clone)]
pub struct PgContractRepository {
    pool: PgPool,
}

impl PgContractRepository {
    /// Create a new contract repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn versions_for(&self, ids: &[Uuid]) -> AppResult<HashMap<Uuid, Vec<ContractVersion>>> {
        let versions = sqlx::query_as::<_, ContractVersion>(
            "SELECT * FROM contract_versions WHERE contract_id = ANY($1) \
             ORDER BY contract_id, version_number ASC",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load versions", e))?;

        let mut grouped: HashMap<Uuid, Vec<ContractVersion>> = HashMap::new();
        for version in versions {
            grouped.entry(version.contract_id).or_default().push(version);
        }
        Ok(grouped)
    }
}

#[async_trait]
impl ContractRepository for PgContractRepository {
    async fn create(&self, owner_id: &str, new: NewContract) -> AppResult<ContractWithVersions> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let contract = sqlx::query_as::<_, Contract>(
            "INSERT INTO contracts (id, title, description, owner_id, original_filename, \
             file_url, file_type, file_size, status, expiry_date, extracted_text, summary, \
             last_version_number) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, 1) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(&new.title)
        .bind(&new.description)
        .bind(owner_id)
        .bind(&new.original_filename)
        .bind(&new.file_url)
        .bind(&new.file_type)
        .bind(new.file_size)
        .bind(new.status.unwrap_or_default())
        .bind(new.expiry_date)
        .bind(&new.extracted_text)
        .bind(&new.summary)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create contract", e))?;

        let initial = sqlx::query_as::<_, ContractVersion>(
            "INSERT INTO contract_versions (id, contract_id, file_url, version_number, version_name) \
             VALUES ($1, $2, $3, 1, $4) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(contract.id)
        .bind(&contract.file_url)
        .bind(INITIAL_VERSION_NAME)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to create initial version", e)
        })?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit contract", e)
        })?;

        Ok(ContractWithVersions {
            contract,
            versions: vec![initial],
        })
    }

    async fn find_by_owner(&self, owner_id: &str) -> AppResult<Vec<ContractWithVersions>> {
        let contracts = sqlx::query_as::<_, Contract>(
            "SELECT * FROM contracts WHERE owner_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list contracts", e))?;

        let ids: Vec<Uuid> = contracts.iter().map(|c| c.id).collect();
        let mut versions = self.versions_for(&ids).await?;

        Ok(contracts
            .into_iter()
            .map(|contract| ContractWithVersions {
                versions: versions.remove(&contract.id).unwrap_or_default(),
                contract,
            })
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<ContractWithVersions>> {
        let contract = sqlx::query_as::<_, Contract>("SELECT * FROM contracts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find contract", e))?;

        match contract {
            Some(contract) => {
                let versions = self.find_versions(contract.id).await?;
                Ok(Some(ContractWithVersions { contract, versions }))
            }
            None => Ok(None),
        }
    }

    async fn find_versions(&self, contract_id: Uuid) -> AppResult<Vec<ContractVersion>> {
        sqlx::query_as::<_, ContractVersion>(
            "SELECT * FROM contract_versions WHERE contract_id = $1 ORDER BY version_number ASC",
        )
        .bind(contract_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list versions", e))
    }

    async fn add_version(
        &self,
        contract_id: Uuid,
        version: NewContractVersion,
    ) -> AppResult<ContractVersion> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        // The UPDATE takes the contract row lock; concurrent callers queue here
        // until this transaction commits and then see the incremented counter.
        let number: i32 = sqlx::query_scalar(
            "UPDATE contracts SET last_version_number = last_version_number + 1 \
             WHERE id = $1 RETURNING last_version_number",
        )
        .bind(contract_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to allocate version number", e)
        })?
        .ok_or_else(|| AppError::not_found(format!("Contract {contract_id} not found")))?;

        let created = sqlx::query_as::<_, ContractVersion>(
            "INSERT INTO contract_versions (id, contract_id, file_url, version_number, \
             version_name, description) VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(contract_id)
        .bind(&version.file_url)
        .bind(number)
        .bind(version.name_for(number))
        .bind(&version.description)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to add version", e))?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit version", e)
        })?;

        debug!(contract_id = %contract_id, version = number, "Version row inserted");
        Ok(created)
    }

    async fn update(&self, id: Uuid, update: UpdateContract) -> AppResult<Contract> {
        sqlx::query_as::<_, Contract>(
            "UPDATE contracts SET \
             title = COALESCE($2, title), \
             description = COALESCE($3, description), \
             original_filename = COALESCE($4, original_filename), \
             file_url = COALESCE($5, file_url), \
             file_type = COALESCE($6, file_type), \
             file_size = COALESCE($7, file_size), \
             status = COALESCE($8, status), \
             expiry_date = COALESCE($9, expiry_date), \
             extracted_text = COALESCE($10, extracted_text), \
             summary = COALESCE($11, summary), \
             updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&update.title)
        .bind(&update.description)
        .bind(&update.original_filename)
        .bind(&update.file_url)
        .bind(&update.file_type)
        .bind(update.file_size)
        .bind(update.status)
        .bind(update.expiry_date)
        .bind(&update.extracted_text)
        .bind(&update.summary)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update contract", e))?
        .ok_or_else(|| AppError::not_found(format!("Contract {id} not found")))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM contracts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete contract", e)
            })?;
        Ok(result.rows_affected() > 0)
    }
}
