//! Command dispatch logic.
//!
//! Responsibilities:
//! - Route parsed CLI arguments to appropriate command handlers.
//!
//! Does NOT handle:
//! - CLI structure definitions (see `args` module).
//! - Settings loading and gateway construction (see `main()`).
//!
//! Invariants:
//! - Every command runs against the single gateway built in `main()`.

use anyhow::Result;
use scope_client::Gateway;

use crate::args::Commands;
use crate::commands;

/// Dispatch a parsed command to its handler.
pub(crate) async fn run_command(command: Commands, gateway: &Gateway) -> Result<()> {
    match command {
        Commands::Verify { server } => commands::verify::run(gateway, &server).await,
        Commands::Indices { server } => commands::indices::run(gateway, &server).await,
        Commands::Fields { server, index } => {
            commands::fields::run(gateway, &server, &index).await
        }
        Commands::Values(args) => {
            let server = args.server.clone();
            commands::values::run(gateway, &server, args.into_request()).await
        }
        Commands::Search(args) => {
            let server = args.server.clone();
            commands::search::run(gateway, &server, args.into_request()).await
        }
    }
}
