//! # contracthub-database
//!
//! PostgreSQL connection management, embedded migrations, and the
//! contract and document repositories. Each repository is a trait with a
//! PostgreSQL implementation and an in-memory implementation used for
//! development and tests.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
pub use repositories::{
    ContractRepository, DocumentRepository, MemoryContractRepository, MemoryDocumentRepository,
    PgContractRepository, PgDocumentRepository,
};
