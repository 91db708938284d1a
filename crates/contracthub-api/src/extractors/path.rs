//! Path parameter parsing.

use uuid::Uuid;

use contracthub_core::error::AppError;

/// Parse a record id from the `{id}` path segment.
///
/// Ids are UUIDs; anything else is a validation error rather than a
/// not-found, so clients can tell a typo from a missing record.
pub fn parse_uuid(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim()).map_err(|_| {
        AppError::validation(format!("'{raw}' is not a valid id")).with_details(
            serde_json::json!({ "id": ["must be a UUID"] }),
        )
    })
}

#[cfg(test)]
mod tests {
    use contracthub_core::error::ErrorKind;

    use super::*;

    #[test]
    fn test_parse_uuid() {
        let id = Uuid::new_v4();
        assert_eq!(parse_uuid(&id.to_string()).unwrap(), id);

        let err = parse_uuid("42").unwrap_err();
        assert!(err.is(ErrorKind::Validation));
        assert!(err.details.is_some());
    }
}
