//! TokenEx CLI - one-shot access to the token service operations
//!
//! Credentials come from flags or the `TOKENEX_API_BASE_URL`, `TOKENEX_ID` and
//! `TOKENEX_API_KEY` environment variables. Set `RUST_LOG=debug` to trace
//! requests; values and keys are never logged.
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

use tokenex_client::{ClientError, ClientOptions, Credentials, TokenClient};

mod commands;

use commands::Command;

/// Exit status for transport, protocol and usage failures.
const EXIT_FAILURE: u8 = 1;
/// Exit status when the service refused the request.
const EXIT_SERVICE_FAILURE: u8 = 2;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Base URL of the token service, including the trailing slash
    #[arg(long, env = "TOKENEX_API_BASE_URL")]
    base_url: String,

    /// TokenEx account identifier
    #[arg(long, env = "TOKENEX_ID")]
    tokenex_id: String,

    /// API key for authentication
    #[arg(long, env = "TOKENEX_API_KEY", hide_env_values = true)]
    api_key: String,

    #[command(subcommand)]
    command: Command,
}

async fn run(args: Args) -> Result<String> {
    let credentials = Credentials::new(args.base_url, args.tokenex_id, args.api_key);
    let client = TokenClient::new(credentials, ClientOptions::default())
        .context("failed to create token client")?;

    args.command.execute(&client).await
}

/// Service refusals exit with 2 so scripts can tell them from transport failures.
fn exit_status(error: &anyhow::Error) -> u8 {
    let refused = error
        .downcast_ref::<ClientError>()
        .is_some_and(ClientError::is_service_failure);

    if refused {
        EXIT_SERVICE_FAILURE
    } else {
        EXIT_FAILURE
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();

    match run(args).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{} {e:#}", "Error:".bright_red());
            ExitCode::from(exit_status(&e))
        }
    }
}
