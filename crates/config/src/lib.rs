//! Configuration management for scope.
//!
//! This crate provides the server identity model, the registry through which
//! identities are looked up by id, and the loader for gateway-wide settings.

pub mod constants;
mod loader;
mod paths;
pub mod registry;
pub mod types;

pub use loader::{ConfigError, SettingsLoader, env_var_or_none};
pub use paths::default_config_path;
pub use registry::{FileRegistry, ServerRegistry, ServersFile, StaticRegistry, read_servers_file};
pub use types::{ConfigHash, GatewaySettings, ServerIdentity};
