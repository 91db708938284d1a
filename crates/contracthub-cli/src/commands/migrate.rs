//! Database migration command.

use contracthub_core::config::{AppConfig, DatabaseProvider};
use contracthub_core::error::AppError;
use contracthub_database::DatabasePool;
use contracthub_database::connection::mask_password;
use contracthub_database::migration::run_migrations;

use crate::output;

/// Apply all pending migrations to the configured database.
pub async fn execute(config: &AppConfig) -> Result<(), AppError> {
    if config.database.provider == DatabaseProvider::Memory {
        output::print_warning("Database provider is 'memory'; nothing to migrate.");
        return Ok(());
    }

    eprintln!(
        "Running database migrations against {}...",
        mask_password(&config.database.url)
    );
    let pool = DatabasePool::connect(&config.database).await?;
    run_migrations(pool.pool()).await?;
    output::print_success("All migrations applied successfully.");
    Ok(())
}
