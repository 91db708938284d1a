//! # contracthub-ai
//!
//! Contract summarization over an OpenAI-compatible chat completion API.
//! The [`Summarizer`] never fails outright: when the API key is missing or
//! the call goes wrong it reports a [`Degraded`] outcome with a fixed
//! placeholder text.

pub mod client;
pub mod metadata;
pub mod summarizer;

pub use client::OpenAiClient;
pub use metadata::ContractMetadata;
pub use summarizer::{Degraded, Summarizer, TRUNCATION_MARKER, truncate_text};
