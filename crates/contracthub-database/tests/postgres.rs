//! Repository tests against a live PostgreSQL instance.
//!
//! Run with `DATABASE_URL=postgres://... cargo test -p contracthub-database -- --ignored`.

use std::collections::BTreeSet;

use contracthub_core::config::DatabaseConfig;
use contracthub_database::migration::run_migrations;
use contracthub_database::{
    ContractRepository, DatabasePool, DocumentRepository, PgContractRepository,
    PgDocumentRepository,
};
use contracthub_entity::contract::{ContractStatus, NewContract, NewContractVersion, UpdateContract};
use contracthub_entity::document::{DocumentFilter, DocumentStatus, NewDocument};

async fn pool() -> sqlx::PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for ignored tests");
    let config = DatabaseConfig {
        url,
        ..Default::default()
    };
    let pool = DatabasePool::connect(&config).await.unwrap().into_pool();
    run_migrations(&pool).await.unwrap();
    pool
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
#[ignore]
async fn concurrent_versions_are_gapless() {
    let repo = PgContractRepository::new(pool().await);
    let owner = format!("pg-test-{}", uuid::Uuid::new_v4());
    let id = repo.create(&owner, msa()).await.unwrap().contract.id;

    let calls = (0..20).map(|i| {
        let repo = repo.clone();
        async move {
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
        }
    });
    let numbers: BTreeSet<i32> = futures::future::join_all(calls).await.into_iter().collect();
    assert_eq!(numbers, (2..=21).collect());

    let versions = repo.find_versions(id).await.unwrap();
    assert_eq!(versions.len(), 21);
    assert_eq!(versions[0].version_name, "Initial Version");

    repo.delete(id).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn partial_update_keeps_other_fields() {
    let repo = PgContractRepository::new(pool().await);
    let owner = format!("pg-test-{}", uuid::Uuid::new_v4());
    let created = repo.create(&owner, msa()).await.unwrap().contract;

    let updated = repo
        .update(
            created.id,
            UpdateContract {
                title: Some("X".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.title, "X");
    assert_eq!(updated.file_url, created.file_url);
    assert_eq!(updated.status, ContractStatus::Draft);

    repo.delete(created.id).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn document_filters_and_claims() {
    let repo = PgDocumentRepository::new(pool().await);
    let owner = format!("pg-test-{}", uuid::Uuid::new_v4());
    let doc = repo
        .create(
            &owner,
            NewDocument {
                title: "Office Lease".into(),
                file_url: "https://x/lease.pdf".into(),
                file_type: "application/pdf".into(),
                file_size: 10,
                tags: vec!["lease".into()],
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let hits = repo
        .find_by_uploader(
            &owner,
            &DocumentFilter {
                search: Some("office".into()),
                tag: Some("lease".into()),
                status: Some(DocumentStatus::Pending),
            },
        )
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);

    assert!(repo.mark_processing(doc.id).await.unwrap().is_some());
    assert!(repo.mark_processing(doc.id).await.unwrap().is_none());
    let failed = repo.mark_failed(doc.id).await.unwrap().unwrap();
    assert_eq!(failed.status, DocumentStatus::Failed);
    assert!(failed.extracted_text.is_none());

    repo.delete(doc.id).await.unwrap();
}
