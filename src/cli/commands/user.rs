use anyhow::Context;
use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config::config;
use crate::database::Datastore;
use crate::services::UserService;

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "Register a new user")]
    Register {
        #[arg(help = "Username")]
        username: String,
        #[arg(long, help = "Password")]
        password: String,
    },
}

pub async fn handle(cmd: UserCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        UserCommands::Register { username, password } => {
            let datastore = Datastore::connect(&config().database)
                .await
                .context("cannot open the configured datastore")?;
            let users = UserService::new(datastore.credentials.clone());

            let result = users.register(&username, &password).await;
            datastore.close().await;
            let credential = result?;

            output_success(
                &output_format,
                &format!("Registered user '{}'", credential.username),
                Some(json!({ "id": credential.id, "username": credential.username })),
            )
        }
    }
}
