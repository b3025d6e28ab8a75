//! Environment variable parsing for gateway settings.
//!
//! Invariants:
//! - Empty or whitespace-only environment variables are treated as unset.
//! - Returned values are trimmed (leading/trailing whitespace removed).
//! - Invalid numeric values return `ConfigError::InvalidValue`.

use std::time::Duration;

use super::builder::SettingsLoader;
use super::error::ConfigError;
use crate::constants::{ENV_CONFIG_PATH, ENV_MAX_RETRIES, ENV_TIMEOUT, MAX_MAX_RETRIES};

/// Read an environment variable, returning None if unset, empty, or whitespace-only.
/// Returns the trimmed value (leading/trailing whitespace removed) if present.
pub fn env_var_or_none(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == s.len() {
            Some(s)
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Apply environment variable configuration to the loader.
pub(crate) fn apply_env(loader: &mut SettingsLoader) -> Result<(), ConfigError> {
    if let Some(path) = env_var_or_none(ENV_CONFIG_PATH) {
        loader.set_config_path(Some(path.into()));
    }
    if let Some(timeout) = env_var_or_none(ENV_TIMEOUT) {
        let secs: u64 = timeout.parse().map_err(|_| ConfigError::InvalidValue {
            var: ENV_TIMEOUT.to_string(),
            message: "must be a number of seconds".to_string(),
        })?;
        loader.set_timeout(Some(Duration::from_secs(secs)));
    }
    if let Some(retries) = env_var_or_none(ENV_MAX_RETRIES) {
        let value: usize = retries.parse().map_err(|_| ConfigError::InvalidValue {
            var: ENV_MAX_RETRIES.to_string(),
            message: "must be a non-negative integer".to_string(),
        })?;
        if value > MAX_MAX_RETRIES {
            return Err(ConfigError::InvalidValue {
                var: ENV_MAX_RETRIES.to_string(),
                message: format!("must not exceed {}", MAX_MAX_RETRIES),
            });
        }
        loader.set_max_retries(Some(value));
    }
    Ok(())
}
