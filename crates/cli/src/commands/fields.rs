//! Fields command implementation.

use anyhow::Result;
use scope_client::Gateway;

use crate::commands::print_json;

/// Fields are an autocomplete affordance: failures print an empty list.
pub async fn run(gateway: &Gateway, server: &str, index: &str) -> Result<()> {
    let fields = gateway.get_fields(server, index).await;
    print_json(&fields)
}
