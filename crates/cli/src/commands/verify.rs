//! Verify command implementation.

use anyhow::Result;
use scope_client::{Gateway, VerifyResult};
use tracing::info;

use crate::commands::print_json;

/// Print the verify report; a failed verification still prints the report
/// before the error decides the exit code.
pub async fn run(gateway: &Gateway, server: &str) -> Result<()> {
    info!(server, "Verifying connection");

    match gateway.verify(server).await {
        Ok(result) => print_json(&result),
        Err(e) => {
            print_json(&VerifyResult::failed(&e))?;
            Err(e.into())
        }
    }
}
