//! migratex CLI - applies schema (DDL) and data (DML) migrations in version order

use clap::Parser;
use std::process::ExitCode;

mod cli;
mod commands;

use cli::Cli;
use commands::{status, up};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.global.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let run_id = uuid::Uuid::new_v4();
    log::debug!("Starting migratex run {}", run_id);

    let result = match &cli.command {
        cli::Commands::Up(args) => up::execute(args, &cli.global).await,
        cli::Commands::Status(args) => status::execute(args, &cli.global).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
