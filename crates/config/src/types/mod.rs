//! Configuration types for scope.
//!
//! This module re-exports the identity and settings types so callers can
//! depend on `scope_config::types::*` without knowing the file layout.

mod identity;
mod settings;

pub use identity::{ConfigHash, ServerIdentity};
pub use settings::GatewaySettings;
