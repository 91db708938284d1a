//! Text extraction configuration.

use serde::{Deserialize, Serialize};

/// Settings for downloading and parsing contract files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Directory for transient downloads. Empty means the OS temp dir.
    #[serde(default)]
    pub temp_dir: String,
    /// Download timeout in seconds.
    #[serde(default = "default_download_timeout")]
    pub download_timeout_seconds: u64,
    /// Largest file that will be downloaded for extraction.
    #[serde(default = "default_max_download")]
    pub max_download_bytes: u64,
}

impl ExtractionConfig {
    /// Resolve the transient download directory.
    pub fn temp_dir(&self) -> std::path::PathBuf {
        if self.temp_dir.is_empty() {
            std::env::temp_dir()
        } else {
            std::path::PathBuf::from(&self.temp_dir)
        }
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            temp_dir: String::new(),
            download_timeout_seconds: default_download_timeout(),
            max_download_bytes: default_max_download(),
        }
    }
}

fn default_download_timeout() -> u64 {
    120
}

fn default_max_download() -> u64 {
    104_857_600 // 100 MB
}
