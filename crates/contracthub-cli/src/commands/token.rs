//! Development token minting.
//!
//! Tokens are HS256-signed with `auth.jwt_secret`, so they are only useful
//! against a server that is not configured for RS256.

use clap::Args;
use serde::Serialize;

use contracthub_auth::JwtEncoder;
use contracthub_core::config::AppConfig;
use contracthub_core::error::AppError;

use crate::output::{self, OutputFormat};

/// Arguments for the token command
#[derive(Debug, Args)]
pub struct TokenArgs {
    /// Subject (user id) claim
    #[arg(long)]
    pub sub: String,

    /// Email claim
    #[arg(long)]
    pub email: Option<String>,

    /// Role claim, e.g. `admin`
    #[arg(long)]
    pub role: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct IssuedToken {
    token: String,
    subject: String,
    expires_in_minutes: u64,
}

/// Print a freshly signed token.
pub fn execute(args: &TokenArgs, config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    if config.auth.public_key_pem.is_some() {
        output::print_warning("Server verifies RS256 tokens; this HS256 token will be rejected.");
    }

    let token = JwtEncoder::new(&config.auth).issue(
        &args.sub,
        args.email.as_deref(),
        args.role.as_deref(),
    )?;

    match format {
        OutputFormat::Table => println!("{token}"),
        OutputFormat::Json => output::print_json(&IssuedToken {
            token,
            subject: args.sub.clone(),
            expires_in_minutes: config.auth.dev_token_ttl_minutes,
        }),
    }
    Ok(())
}
