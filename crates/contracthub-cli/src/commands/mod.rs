//! CLI command definitions and dispatch.

pub mod config;
pub mod extract;
pub mod migrate;
pub mod summarize;
pub mod token;

use clap::{Parser, Subcommand};

use contracthub_core::config::AppConfig;
use contracthub_core::error::AppError;

use crate::output::OutputFormat;

/// ContractHub: contract lifecycle management
#[derive(Debug, Parser)]
#[command(name = "contracthub", version, about, long_about = None)]
pub struct Cli {
    /// Directory holding `default.toml` and environment overlays
    #[arg(short, long, default_value = "config", env = "CONTRACTHUB_CONFIG_DIR")]
    pub config: String,

    /// Environment overlay to merge over the defaults
    #[arg(short, long, default_value = "development", env = "CONTRACTHUB_ENV")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Mint a development bearer token
    Token(token::TokenArgs),
    /// Download a contract file and print its text
    Extract(extract::ExtractArgs),
    /// Summarize a plain-text file
    Summarize(summarize::SummarizeArgs),
    /// Show the effective configuration with secrets masked
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let config = self.load_config()?;
        match &self.command {
            Commands::Migrate => migrate::execute(&config).await,
            Commands::Token(args) => token::execute(args, &config, self.format),
            Commands::Extract(args) => extract::execute(args, &config, self.format).await,
            Commands::Summarize(args) => summarize::execute(args, &config, self.format).await,
            Commands::Config => {
                config::execute(&config, self.format);
                Ok(())
            }
        }
    }

    fn load_config(&self) -> Result<AppConfig, AppError> {
        AppConfig::load_from(&self.config, &self.env)
    }
}
