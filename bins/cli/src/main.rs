//! Dutch command-line interface.
//!
//! Reads a settlement request as JSON, validates it, and prints either the
//! checklist or the settlement in the chosen format.
//!
//! Usage: dutch settle --input request.json --format summary

mod cli;
mod commands;

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use dutch_shared::AppError;

use crate::cli::Cli;

fn main() -> ExitCode {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Logs go to stderr so stdout stays pasteable
    let default_filter = if cli.verbose { "dutch=debug" } else { "dutch=info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let mut stdout = io::stdout().lock();
    match commands::execute(&cli, &mut stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let app_error = err.downcast_ref::<AppError>();
            let code = app_error.map_or(70, AppError::exit_code);
            error!(
                code = app_error.map_or("INTERNAL_ERROR", AppError::error_code),
                "Command failed"
            );
            eprintln!("{err:#}");
            ExitCode::from(code)
        }
    }
}
