//! Contract lifecycle status.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use contracthub_core::error::AppError;

/// Business status of a contract.
///
/// Driven by explicit calls only; it is independent of text extraction.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "contract_status")]
pub enum ContractStatus {
    /// Being drafted. Initial status.
    #[default]
    Draft,
    /// Under review.
    Review,
    /// Signed by all parties.
    Signed,
    /// Past its expiry date.
    Expired,
}

impl ContractStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [ContractStatus; 4] = [Self::Draft, Self::Review, Self::Signed, Self::Expired];

    /// Return the status as its wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Review => "Review",
            Self::Signed => "Signed",
            Self::Expired => "Expired",
        }
    }
}

impl fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContractStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                AppError::validation(format!(
                    "Invalid contract status '{s}', expected one of Draft, Review, Signed, Expired"
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_draft() {
        assert_eq!(ContractStatus::default(), ContractStatus::Draft);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("signed".parse::<ContractStatus>().unwrap(), ContractStatus::Signed);
        assert_eq!(" Review ".parse::<ContractStatus>().unwrap(), ContractStatus::Review);
        assert!("Archived".parse::<ContractStatus>().is_err());
    }

    #[test]
    fn test_wire_format_is_capitalized() {
        let json = serde_json::to_string(&ContractStatus::Expired).unwrap();
        assert_eq!(json, "\"Expired\"");
    }
}
