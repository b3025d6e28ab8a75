//! Server registry lookups.
//!
//! Responsibilities:
//! - Define the `ServerRegistry` seam through which the gateway finds a
//!   `ServerIdentity` by id.
//! - Provide an in-memory registry and a file-backed registry that reads the
//!   desktop application's `config.json`.
//!
//! Does NOT handle:
//! - Writing the registry (persistence is owned by the application shell).
//! - Caching connections (see client crate).
//!
//! Invariants:
//! - `FileRegistry` re-reads the file on each lookup so edits take effect
//!   without restarting the host process.
//! - A missing registry file is an empty registry, not an error.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::loader::ConfigError;
use crate::types::ServerIdentity;

/// Source of server identities, keyed by id.
pub trait ServerRegistry: Send + Sync {
    /// Find the identity for `id`, or `None` if it is not registered.
    fn lookup(&self, id: &str) -> Result<Option<ServerIdentity>, ConfigError>;
}

/// On-disk shape of the registry file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServersFile {
    #[serde(default)]
    pub servers: Vec<ServerIdentity>,
}

impl ServersFile {
    pub fn find(&self, id: &str) -> Option<&ServerIdentity> {
        self.servers.iter().find(|s| s.id == id)
    }
}

/// Read and parse a registry file; a missing file yields an empty registry.
pub fn read_servers_file(path: &Path) -> Result<ServersFile, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "Server registry file not found");
            return Ok(ServersFile::default());
        }
        Err(e) => {
            return Err(ConfigError::ConfigFileRead {
                path: path.to_path_buf(),
                kind: e.kind(),
            });
        }
    };

    serde_json::from_str(&content).map_err(|e| ConfigError::ConfigFileParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Registry held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticRegistry {
    servers: Vec<ServerIdentity>,
}

impl StaticRegistry {
    pub fn new(servers: Vec<ServerIdentity>) -> Self {
        Self { servers }
    }
}

impl ServerRegistry for StaticRegistry {
    fn lookup(&self, id: &str) -> Result<Option<ServerIdentity>, ConfigError> {
        Ok(self.servers.iter().find(|s| s.id == id).cloned())
    }
}

/// Registry backed by a JSON file, re-read on every lookup.
#[derive(Debug, Clone)]
pub struct FileRegistry {
    path: PathBuf,
}

impl FileRegistry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ServerRegistry for FileRegistry {
    fn lookup(&self, id: &str) -> Result<Option<ServerIdentity>, ConfigError> {
        let file = read_servers_file(&self.path)?;
        Ok(file.find(id).cloned())
    }
}
