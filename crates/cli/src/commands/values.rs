//! Values command implementation.

use anyhow::Result;
use scope_client::{Gateway, ValuesRequest};

use crate::commands::print_json;

pub async fn run(gateway: &Gateway, server: &str, request: ValuesRequest) -> Result<()> {
    let values = gateway.get_values(server, &request).await;
    print_json(&values)
}
