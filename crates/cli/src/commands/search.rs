//! Search command implementation.

use anyhow::Result;
use scope_client::{Gateway, SearchRequest};
use tracing::info;

use crate::commands::print_json;

pub async fn run(gateway: &Gateway, server: &str, request: SearchRequest) -> Result<()> {
    info!(server, index = %request.index, "Running search");

    let result = gateway.search(server, &request).await?;
    print_json(&result)
}
