//! Settings loader builder implementation.
//!
//! Responsibilities:
//! - Provide a builder-pattern `SettingsLoader` for layered settings.
//! - Build the final `GatewaySettings` and registry path from loaded values.
//!
//! Does NOT handle:
//! - Direct environment variable parsing logic (delegated to env.rs).
//! - Reading the registry file (see `registry` module).
//!
//! Invariants / Assumptions:
//! - Builder methods take precedence over environment variables.
//! - The `DOTENV_DISABLED` variable is checked before `dotenvy::dotenv()` is called.

use std::path::PathBuf;
use std::time::Duration;

use super::env::apply_env;
use super::error::ConfigError;
use crate::constants::{
    DEFAULT_CONNECTION_CACHE_CAPACITY, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT_SECS,
    MAX_MAX_RETRIES, MAX_TIMEOUT_SECS,
};
use crate::paths::default_config_path;
use crate::types::GatewaySettings;

/// Loader that layers defaults, environment variables and explicit overrides.
#[derive(Debug, Default)]
pub struct SettingsLoader {
    config_path: Option<PathBuf>,
    timeout: Option<Duration>,
    max_retries: Option<usize>,
    cache_capacity: Option<u64>,
}

impl SettingsLoader {
    /// Create a new settings loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if dotenv loading is disabled via environment variable.
    fn dotenv_disabled() -> bool {
        matches!(
            std::env::var("DOTENV_DISABLED").ok().as_deref(),
            Some("true") | Some("1")
        )
    }

    /// Load environment variables from .env file if present.
    ///
    /// Missing `.env` files are silently ignored. If `DOTENV_DISABLED` is set
    /// to "true" or "1", the file is not read at all.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::DotenvParse` for invalid syntax and
    /// `ConfigError::DotenvIo` when the file exists but cannot be read.
    pub fn load_dotenv(self) -> Result<Self, ConfigError> {
        if Self::dotenv_disabled() {
            return Ok(self);
        }

        match dotenvy::dotenv() {
            Ok(_) => Ok(self),
            Err(e) if Self::is_not_found(&e) => Ok(self),
            Err(dotenvy::Error::LineParse(_, idx)) => {
                Err(ConfigError::DotenvParse { error_index: idx })
            }
            Err(dotenvy::Error::Io(io_err)) => Err(ConfigError::DotenvIo {
                kind: io_err.kind(),
            }),
            Err(_) => Err(ConfigError::DotenvUnknown),
        }
    }

    fn is_not_found(err: &dotenvy::Error) -> bool {
        matches!(
            err,
            dotenvy::Error::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound
        )
    }

    /// Read settings from environment variables.
    pub fn from_env(mut self) -> Result<Self, ConfigError> {
        apply_env(&mut self)?;
        Ok(self)
    }

    /// Override the server registry file path.
    pub fn with_config_path(mut self, path: PathBuf) -> Self {
        self.config_path = Some(path);
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the maximum number of retries for rate-limited requests.
    pub fn with_max_retries(mut self, retries: usize) -> Self {
        self.max_retries = Some(retries);
        self
    }

    /// Set the number of server ids kept in the connection cache.
    pub fn with_cache_capacity(mut self, capacity: u64) -> Self {
        self.cache_capacity = Some(capacity);
        self
    }

    pub(crate) fn set_config_path(&mut self, path: Option<PathBuf>) {
        if self.config_path.is_none() {
            self.config_path = path;
        }
    }

    pub(crate) fn set_timeout(&mut self, timeout: Option<Duration>) {
        if self.timeout.is_none() {
            self.timeout = timeout;
        }
    }

    pub(crate) fn set_max_retries(&mut self, retries: Option<usize>) {
        if self.max_retries.is_none() {
            self.max_retries = retries;
        }
    }

    /// Registry file path: the explicit override, or the platform default.
    pub fn config_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.config_path {
            Some(path) => Ok(path.clone()),
            None => default_config_path(),
        }
    }

    /// Build the final settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidTimeout` when the timeout is zero or above
    /// the maximum, and `ConfigError::InvalidValue` for an excessive retry count.
    pub fn build(self) -> Result<GatewaySettings, ConfigError> {
        let request_timeout = self
            .timeout
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        let timeout_secs = request_timeout.as_secs();

        if timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout {
                message: "timeout must be greater than 0 seconds".to_string(),
            });
        }
        if timeout_secs > MAX_TIMEOUT_SECS {
            return Err(ConfigError::InvalidTimeout {
                message: format!(
                    "timeout exceeds maximum allowed value of {} seconds",
                    MAX_TIMEOUT_SECS
                ),
            });
        }

        let max_retries = self.max_retries.unwrap_or(DEFAULT_MAX_RETRIES);
        if max_retries > MAX_MAX_RETRIES {
            return Err(ConfigError::InvalidValue {
                var: "max_retries".to_string(),
                message: format!("must not exceed {}", MAX_MAX_RETRIES),
            });
        }

        Ok(GatewaySettings {
            request_timeout,
            max_retries,
            cache_capacity: self
                .cache_capacity
                .filter(|c| *c > 0)
                .unwrap_or(DEFAULT_CONNECTION_CACHE_CAPACITY),
        })
    }
}
