//! Indices command implementation.

use anyhow::Result;
use scope_client::Gateway;
use tracing::info;

use crate::commands::print_json;

pub async fn run(gateway: &Gateway, server: &str) -> Result<()> {
    info!(server, "Listing indices");

    let indices = gateway.list_indices(server).await?;
    print_json(&indices)
}
