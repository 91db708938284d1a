//! HTTP request handlers, one module per resource.

pub mod auth;
pub mod contract;
pub mod document;
pub mod health;
pub mod storage;
