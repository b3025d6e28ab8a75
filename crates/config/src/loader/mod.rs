//! Settings loader for environment variables and `.env` files.
//!
//! Responsibilities:
//! - Load gateway settings from defaults, environment variables and builder overrides.
//! - Resolve the server registry file location.
//! - Enforce the `DOTENV_DISABLED` gate to prevent accidental dotenv loading in tests.
//!
//! Does NOT handle:
//! - Reading the server registry itself (see `registry` module).
//! - Persisting anything back to disk.
//!
//! Invariants / Assumptions:
//! - Builder methods take precedence over environment variables, which take precedence over defaults.
//! - `load_dotenv()` must be called explicitly to enable `.env` file loading.

mod builder;
mod env;
mod error;

pub use builder::SettingsLoader;
pub use env::env_var_or_none;
pub use error::ConfigError;
