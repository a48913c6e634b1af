//! Filebox server - Entry Point

use clap::{Parser, Subcommand};
use log::{error, info};
use std::process::ExitCode;

use filebox_server::auth::hash_password;
use filebox_server::error::ServerError;
use filebox_server::utils::logging::setup_logging;
use filebox_server::{Server, ServerConfig};

#[derive(Parser, Debug)]
#[command(name = "filebox-server", version, about = "Authenticated file storage server")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Print an Argon2 hash of PASSWORD for use as APP_PASSWORD_HASH
    HashPassword { password: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    setup_logging();
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => match serve().await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!("{}", e);
                ExitCode::FAILURE
            }
        },
        Command::HashPassword { password } => match hash_password(&password) {
            Ok(hash) => {
                println!("{hash}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("{e}");
                ExitCode::FAILURE
            }
        },
    }
}

async fn serve() -> Result<(), ServerError> {
    let config = ServerConfig::load()?;
    info!("Launching file server as user {:?}...", config.user);

    let server = Server::new(config).await?;
    server.start().await
}
