//! Scope CLI - query search clusters of any supported major version.
//!
//! Responsibilities:
//! - Parse command-line arguments and environment variables.
//! - Run gateway operations through the shared client library.
//! - Print results as JSON on stdout.
//!
//! Does NOT handle:
//! - Version detection or query translation (see `crates/client`).
//! - Editing the server registry (owned by the desktop application).
//!
//! Invariants:
//! - `load_dotenv()` is called BEFORE CLI parsing so `.env` values reach the loader.
//! - Logs go to stderr; stdout carries only command output.

mod args;
mod commands;
mod dispatch;
mod error;

use std::time::Duration;

use args::Cli;
use clap::Parser;
use dispatch::run_command;
use error::{ExitCode, ExitCodeExt};
use scope_client::{Gateway, MetricsCollector};
use scope_config::{FileRegistry, SettingsLoader};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() {
    let loader = match SettingsLoader::new().load_dotenv() {
        Ok(loader) => loader,
        Err(e) => {
            eprintln!("Failed to load environment: {}", e);
            std::process::exit(ExitCode::GeneralError.as_i32());
        }
    };

    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut loader = loader;

    // Blank/whitespace-only values are ignored to allow fallback to env var
    if let Some(ref path) = cli.config_path
        && !path.to_string_lossy().trim().is_empty()
    {
        loader = loader.with_config_path(path.clone());
    }
    if let Some(timeout_secs) = cli.timeout {
        loader = loader.with_timeout(Duration::from_secs(timeout_secs));
    }
    if let Some(retries) = cli.max_retries {
        loader = loader.with_max_retries(retries);
    }

    loader = match loader.from_env() {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Failed to load configuration from environment: {:#}", e);
            std::process::exit(ExitCode::GeneralError.as_i32());
        }
    };

    let config_path = match loader.config_path() {
        Ok(path) => path,
        Err(e) => {
            eprintln!("Failed to locate server registry: {:#}", e);
            std::process::exit(ExitCode::GeneralError.as_i32());
        }
    };

    let settings = match loader.build() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to build configuration: {:#}", e);
            std::process::exit(ExitCode::GeneralError.as_i32());
        }
    };

    tracing::debug!(path = %config_path.display(), "Using server registry");
    let gateway = Gateway::new(FileRegistry::new(config_path), &settings)
        .with_metrics(MetricsCollector::new());

    let exit_code = tokio::select! {
        result = run_command(cli.command, &gateway) => match result {
            Ok(()) => ExitCode::Success,
            Err(e) => {
                eprintln!("{:#}", e);
                e.exit_code()
            }
        },
        _ = tokio::signal::ctrl_c() => {
            eprintln!("Operation cancelled by user");
            ExitCode::Interrupted
        }
    };

    std::process::exit(exit_code.as_i32());
}
