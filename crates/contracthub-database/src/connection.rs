//! PostgreSQL pool construction.

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use contracthub_core::config::DatabaseConfig;
use contracthub_core::error::{AppError, ErrorKind};

/// Owns the sqlx pool shared by the PostgreSQL repositories.
#[derive(Debug, Clone)]
pub struct DatabasePool {
    pool: PgPool,
}

impl DatabasePool {
    /// Open a pool sized and timed by `config`.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, AppError> {
        let safe_url = mask_password(&config.url);
        info!(
            url = %safe_url,
            max_connections = config.max_connections,
            "Opening PostgreSQL pool"
        );

        let pool = pool_options(config)
            .connect(&config.url)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    format!("Cannot reach database at {safe_url}"),
                    e,
                )
            })?;

        Ok(Self { pool })
    }

    /// Borrow the pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Take the pool.
    pub fn into_pool(self) -> PgPool {
        self.pool
    }
}

fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections.min(config.max_connections))
        .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
        .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
}

/// Replace the password in a connection URL with `****`.
pub fn mask_password(url: &str) -> String {
    let authority_start = url.find("://").map_or(0, |p| p + 3);
    let Some(at) = url[authority_start..].find('@').map(|p| p + authority_start) else {
        return url.to_string();
    };
    match url[authority_start..at].find(':') {
        Some(colon) => {
            let colon = colon + authority_start;
            format!("{}:****{}", &url[..colon], &url[at..])
        }
        None => url.to_string(),
    }
}
