//! Effective configuration display.

use contracthub_core::config::AppConfig;
use contracthub_database::connection::mask_password;

use crate::output::{self, KeyValue, OutputFormat};

const MASK: &str = "****";

/// Print the merged configuration with credentials masked.
pub fn execute(config: &AppConfig, format: OutputFormat) {
    let redacted = redact(config);
    match format {
        OutputFormat::Json => output::print_json(&redacted),
        OutputFormat::Table => output::print_list(&rows(&redacted), format),
    }
}

/// Copy of `config` that is safe to print.
fn redact(config: &AppConfig) -> AppConfig {
    let mut config = config.clone();
    config.database.url = mask_password(&config.database.url);
    config.auth.jwt_secret = MASK.to_string();
    if config.auth.public_key_pem.is_some() {
        config.auth.public_key_pem = Some(MASK.to_string());
    }
    if config.ai.api_key.is_some() {
        config.ai.api_key = Some(MASK.to_string());
    }
    config.storage.local.signing_secret = MASK.to_string();
    if !config.storage.s3.access_key.is_empty() {
        config.storage.s3.access_key = MASK.to_string();
    }
    if !config.storage.s3.secret_key.is_empty() {
        config.storage.s3.secret_key = MASK.to_string();
    }
    config
}

fn rows(config: &AppConfig) -> Vec<KeyValue> {
    vec![
        KeyValue::new("server.host", &config.server.host),
        KeyValue::new("server.port", config.server.port),
        KeyValue::new("server.body_limit_bytes", config.server.body_limit_bytes),
        KeyValue::new(
            "server.cors.allowed_origins",
            config.server.cors.allowed_origins.join(", "),
        ),
        KeyValue::new("database.provider", format!("{:?}", config.database.provider)),
        KeyValue::new("database.url", &config.database.url),
        KeyValue::new("database.max_connections", config.database.max_connections),
        KeyValue::new("database.run_migrations", config.database.run_migrations),
        KeyValue::new("storage.provider", format!("{:?}", config.storage.provider)),
        KeyValue::new(
            "storage.max_upload_size_bytes",
            config.storage.max_upload_size_bytes,
        ),
        KeyValue::new(
            "storage.signed_url_ttl_seconds",
            config.storage.signed_url_ttl_seconds,
        ),
        KeyValue::new("storage.local.root_path", &config.storage.local.root_path),
        KeyValue::new(
            "storage.local.public_base_url",
            &config.storage.local.public_base_url,
        ),
        KeyValue::new("storage.s3.bucket", &config.storage.s3.bucket),
        KeyValue::new("storage.s3.access_key", &config.storage.s3.access_key),
        KeyValue::new("auth.jwt_secret", &config.auth.jwt_secret),
        KeyValue::new(
            "auth.public_key_pem",
            config.auth.public_key_pem.as_deref().unwrap_or("-"),
        ),
        KeyValue::new("ai.base_url", &config.ai.base_url),
        KeyValue::new("ai.model", &config.ai.model),
        KeyValue::new("ai.api_key", config.ai.api_key.as_deref().unwrap_or("-")),
        KeyValue::new("ai.max_text_length", config.ai.max_text_length),
        KeyValue::new("extraction.temp_dir", &config.extraction.temp_dir),
        KeyValue::new("logging.level", &config.logging.level),
        KeyValue::new("logging.format", format!("{:?}", config.logging.format)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_masks_credentials() {
        let mut config = AppConfig::default();
        config.database.url = "postgres://app:hunter2@db:5432/contracthub".into();
        config.ai.api_key = Some("sk-live".into());
        config.storage.s3.secret_key = "s3-secret".into();

        let redacted = redact(&config);
        let json = serde_json::to_string(&redacted).unwrap();
        assert!(!json.contains("hunter2"));
        assert!(!json.contains("sk-live"));
        assert!(!json.contains("s3-secret"));
        assert!(!json.contains(&config.auth.jwt_secret));
        assert_eq!(redacted.database.url, "postgres://app:****@db:5432/contracthub");
        assert_eq!(redacted.ai.model, config.ai.model);
    }

    #[test]
    fn test_unset_key_stays_unset() {
        let redacted = redact(&AppConfig::default());
        assert!(redacted.ai.api_key.is_none());
        assert!(rows(&redacted).iter().any(|r| r.key == "ai.api_key" && r.value == "-"));
    }
}
