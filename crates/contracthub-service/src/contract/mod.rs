//! Contract use cases.

pub mod service;

pub use service::ContractService;
