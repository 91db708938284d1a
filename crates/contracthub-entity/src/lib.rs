//! # contracthub-entity
//!
//! Domain entity models for ContractHub. Every struct in this crate
//! represents a database table row or a create/update payload. Entities
//! serialize with camelCase field names, which is the wire format of the
//! HTTP API.

pub mod contract;
pub mod document;
