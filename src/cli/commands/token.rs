use anyhow::Context;
use chrono::{TimeZone, Utc};
use clap::Subcommand;
use serde_json::json;

use crate::auth::TokenService;
use crate::cli::utils::{output_error, output_success};
use crate::cli::OutputFormat;
use crate::config::config;

#[derive(Subcommand)]
pub enum TokenCommands {
    #[command(about = "Sign a token for a username")]
    Issue {
        #[arg(help = "Username placed in the token subject")]
        username: String,
    },

    #[command(about = "Show the subject and expiry of a token")]
    Inspect {
        #[arg(help = "Bearer token, without the 'Bearer ' prefix")]
        token: String,
    },
}

pub async fn handle(cmd: TokenCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let tokens = TokenService::from_config(&config().security)
        .context("cannot build token service from configuration")?;

    match cmd {
        TokenCommands::Issue { username } => {
            let token = tokens.issue(&username)?;
            match output_format {
                // Bare token on stdout so it can be captured by scripts
                OutputFormat::Text => println!("{}", token),
                OutputFormat::Json => output_success(
                    &output_format,
                    "Token issued",
                    Some(json!({ "username": username, "token": token })),
                )?,
            }
            Ok(())
        }
        TokenCommands::Inspect { token } => match tokens.claims(&token) {
            Ok(claims) => {
                let expires_at = Utc
                    .timestamp_opt(claims.exp, 0)
                    .single()
                    .map(|t| t.to_rfc3339())
                    .unwrap_or_else(|| claims.exp.to_string());

                output_success(
                    &output_format,
                    "Token is authentic",
                    Some(json!({
                        "subject": claims.sub,
                        "expires_at": expires_at,
                        "expired": claims.is_expired_at(Utc::now()),
                    })),
                )
            }
            Err(e) => {
                output_error(&output_format, &e.to_string(), Some("INVALID_TOKEN"))?;
                anyhow::bail!("token is not valid")
            }
        },
    }
}
