//! Shared test utilities for scope CLI integration tests.
//!
//! Responsibilities:
//! - Provide a hermetic CLI command factory that prevents dotenv loading.
//! - Write throwaway server registry files.
//!
//! Invariants / Assumptions:
//! - All integration tests using this helper will be hermetic by default.
//! - Rate-limit retries are disabled so failing tests never sleep.

use std::path::PathBuf;

use assert_cmd::Command;

/// Returns a hermetic `scope` command for integration testing.
///
/// It ensures:
/// - `DOTENV_DISABLED=1` is set to prevent local `.env` contamination.
/// - Host `SCOPE_*` variables are cleared to ensure no leakage.
pub fn scope_cmd() -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("scope");

    cmd.env("DOTENV_DISABLED", "1");
    cmd.env("SCOPE_MAX_RETRIES", "0");
    cmd.env_remove("SCOPE_CONFIG_PATH")
        .env_remove("SCOPE_TIMEOUT")
        .env_remove("RUST_LOG");

    cmd
}

/// Write a registry holding one server, `prod`, at `url`.
///
/// Returns the temp dir (keep it alive) and the registry file path.
pub fn registry_for(url: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    let registry = serde_json::json!({ "servers": [{ "id": "prod", "url": url }] });
    std::fs::write(&path, serde_json::to_string(&registry).unwrap()).unwrap();
    (dir, path)
}

/// Returns a hermetic `scope` command reading the given registry file.
#[allow(dead_code)]
pub fn scope_cmd_with_registry(path: &std::path::Path) -> Command {
    let mut cmd = scope_cmd();
    cmd.arg("--config-path").arg(path);
    cmd
}
