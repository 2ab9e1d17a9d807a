pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "deportes")]
#[command(about = "Deportes CLI - administration for the sports league API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format (default: text)")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Issue and inspect bearer tokens with the configured secret")]
    Token {
        #[command(subcommand)]
        cmd: commands::token::TokenCommands,
    },

    #[command(about = "Manage user accounts in the configured datastore")]
    User {
        #[command(subcommand)]
        cmd: commands::user::UserCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Token { cmd } => commands::token::handle(cmd, output_format).await,
        Commands::User { cmd } => commands::user::handle(cmd, output_format).await,
    }
}
