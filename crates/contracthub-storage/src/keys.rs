//! Object key construction and URL-to-key resolution shared by providers.

use chrono::{DateTime, Utc};

use contracthub_core::error::AppError;
use contracthub_core::result::AppResult;

/// URL schemes whose first path component is a bucket name.
const BUCKET_SCHEMES: [&str; 2] = ["gs://", "s3://"];

/// Default key for an uploaded file:
/// `uploads/{user_id}/{unix_millis}-{name}` with whitespace in the name
/// replaced by underscores.
pub fn upload_key(user_id: &str, original_name: &str, now: DateTime<Utc>) -> String {
    let base = original_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original_name);
    let name: String = base
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();
    format!("uploads/{user_id}/{}-{name}", now.timestamp_millis())
}

/// Strip the bucket from a `gs://bucket/key` or `s3://bucket/key` URL.
pub fn bucket_key(file_url: &str) -> Option<String> {
    let rest = BUCKET_SCHEMES
        .iter()
        .find_map(|scheme| file_url.strip_prefix(scheme))?;
    let (_bucket, key) = rest.split_once('/')?;
    (!key.is_empty()).then(|| key.to_string())
}

/// Normalize a caller-supplied key and reject ones that could escape the
/// store root or break URL construction.
pub fn validate_key(key: &str) -> AppResult<&str> {
    let key = key.trim_start_matches('/');
    if key.is_empty() {
        return Err(AppError::validation("Object key must not be empty"));
    }
    if key.contains(['\\', '?', '#']) || key.split('/').any(|seg| seg == ".." || seg == ".") {
        return Err(AppError::validation(format!("Invalid object key: {key}")));
    }
    Ok(key)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_upload_key_replaces_whitespace() {
        let now = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        assert_eq!(
            upload_key("u1", "Master Services\tAgreement.pdf", now),
            "uploads/u1/1700000000000-Master_Services_Agreement.pdf"
        );
    }

    #[test]
    fn test_upload_key_drops_client_directories() {
        let now = Utc.timestamp_millis_opt(5).unwrap();
        assert_eq!(upload_key("u1", "C:\\docs\\nda.docx", now), "uploads/u1/5-nda.docx");
    }

    #[test]
    fn test_bucket_key() {
        assert_eq!(bucket_key("gs://bucket/a/b.pdf").as_deref(), Some("a/b.pdf"));
        assert_eq!(bucket_key("s3://bucket/x.docx").as_deref(), Some("x.docx"));
        assert_eq!(bucket_key("s3://bucket/"), None);
        assert_eq!(bucket_key("https://example.com/x.pdf"), None);
    }

    #[test]
    fn test_validate_key() {
        assert_eq!(validate_key("/uploads/a.pdf").unwrap(), "uploads/a.pdf");
        assert!(validate_key("").is_err());
        assert!(validate_key("uploads/../../etc/passwd").is_err());
        assert!(validate_key("a.pdf?x=1").is_err());
    }
}
