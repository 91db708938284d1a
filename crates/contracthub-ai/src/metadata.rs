//! Structured metadata extracted from contract text.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Instruction sent with metadata extraction requests.
pub const METADATA_PROMPT: &str = "Extract the following information from the contract: \
effective date, expiry date, parties involved, contract type. Return as JSON.";

/// Key facts about a contract as reported by the model.
///
/// Field names from the model vary; common spellings are accepted and any
/// other keys are kept in `extra`. On failure only `error` is set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractMetadata {
    /// Date the contract takes effect.
    #[serde(
        default,
        alias = "effective_date",
        alias = "effective date",
        skip_serializing_if = "Option::is_none"
    )]
    pub effective_date: Option<String>,
    /// Date the contract ends.
    #[serde(
        default,
        alias = "expiry_date",
        alias = "expiry date",
        alias = "expirationDate",
        skip_serializing_if = "Option::is_none"
    )]
    pub expiry_date: Option<String>,
    /// Parties to the contract.
    #[serde(
        default,
        alias = "parties_involved",
        alias = "parties involved",
        alias = "partiesInvolved",
        deserialize_with = "string_or_list"
    )]
    pub parties: Vec<String>,
    /// Kind of contract, e.g. "Non-Disclosure Agreement".
    #[serde(
        default,
        alias = "contract_type",
        alias = "contract type",
        skip_serializing_if = "Option::is_none"
    )]
    pub contract_type: Option<String>,
    /// Failure description when extraction did not run or did not succeed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Any additional keys returned by the model.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ContractMetadata {
    /// Metadata carrying only an error message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Default::default()
        }
    }
}

/// Accept `"A and B"`, `["A", "B"]`, or a list of objects with a `name`.
fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => Vec::new(),
        Value::String(s) => vec![s],
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                Value::Object(mut obj) => match obj.remove("name") {
                    Some(Value::String(name)) => Some(name),
                    _ => None,
                },
                _ => None,
            })
            .collect(),
        other => vec![other.to_string()],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snake_case_response() {
        let parsed: ContractMetadata = serde_json::from_str(
            r#"{"effective_date":"2024-01-01","expiry_date":"2025-01-01",
                "parties_involved":["Acme Corp","Globex"],"contract_type":"MSA"}"#,
        )
        .unwrap();
        assert_eq!(parsed.effective_date.as_deref(), Some("2024-01-01"));
        assert_eq!(parsed.expiry_date.as_deref(), Some("2025-01-01"));
        assert_eq!(parsed.parties, vec!["Acme Corp", "Globex"]);
        assert_eq!(parsed.contract_type.as_deref(), Some("MSA"));
        assert!(parsed.extra.is_empty());
    }

    #[test]
    fn test_loose_shapes() {
        let parsed: ContractMetadata = serde_json::from_str(
            r#"{"parties":[{"name":"Acme"},"Initech"],"governingLaw":"Delaware"}"#,
        )
        .unwrap();
        assert_eq!(parsed.parties, vec!["Acme", "Initech"]);
        assert_eq!(parsed.extra["governingLaw"], "Delaware");
    }

    #[test]
    fn test_failed_serializes_error_only() {
        let value = serde_json::to_value(ContractMetadata::failed("API key not configured.")).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "parties": [], "error": "API key not configured." })
        );
    }
}
