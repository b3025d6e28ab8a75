//! Server identity types for scope.
//!
//! Responsibilities:
//! - Define `ServerIdentity`, the description of one logical cluster connection.
//! - Derive a deterministic `ConfigHash` from the connection-relevant fields.
//! - Validate the connection URL before any client is built from it.
//!
//! Does NOT handle:
//! - Looking identities up by id (see `registry` module).
//! - Building HTTP clients (see client crate).
//!
//! Invariants:
//! - Passwords are held as `SecretString` and never appear in `Debug` output.
//! - `name` and `index_patterns` are display metadata and never affect the hash.
//! - Empty cert/key paths are treated the same as absent ones.

use std::fmt;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::loader::ConfigError;

/// Module for serializing `Option<SecretString>` as an optional plain string.
mod optional_secret {
    use secrecy::{ExposeSecret, SecretString};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(secret: &Option<SecretString>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        secret
            .as_ref()
            .map(|s| s.expose_secret())
            .serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value.map(|s| SecretString::new(s.into())))
    }
}

/// One logical cluster connection, as supplied by the configuration store.
///
/// Serialized in camelCase to match the registry file written by the desktop
/// application (`allowInsecureSSL` and `majorVersion` keep their historical names).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerIdentity {
    /// Stable identifier used as the connection cache key.
    pub id: String,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Cluster base URL, e.g. `https://localhost:9200`.
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(
        default,
        with = "optional_secret",
        skip_serializing_if = "Option::is_none"
    )]
    pub password: Option<SecretString>,
    /// PEM client certificate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cert_path: Option<PathBuf>,
    /// PEM private key for `cert_path`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_path: Option<PathBuf>,
    /// Accept invalid certificates and host names.
    #[serde(default, rename = "allowInsecureSSL")]
    pub allow_insecure_ssl: bool,
    /// Major version the operator believes the cluster runs.
    #[serde(default, rename = "majorVersion", skip_serializing_if = "Option::is_none")]
    pub major_version_hint: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub index_patterns: Vec<String>,
}

impl ServerIdentity {
    /// Create an identity with no credentials and default TLS settings.
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            url: url.into(),
            username: None,
            password: None,
            cert_path: None,
            key_path: None,
            allow_insecure_ssl: false,
            major_version_hint: None,
            index_patterns: Vec::new(),
        }
    }

    /// Set basic-auth credentials.
    pub fn with_credentials(mut self, username: impl Into<String>, password: SecretString) -> Self {
        self.username = Some(username.into());
        self.password = Some(password);
        self
    }

    /// Set the client certificate and key paths.
    pub fn with_client_cert(mut self, cert: impl Into<PathBuf>, key: impl Into<PathBuf>) -> Self {
        self.cert_path = Some(cert.into());
        self.key_path = Some(key.into());
        self
    }

    pub fn with_insecure_ssl(mut self, allow: bool) -> Self {
        self.allow_insecure_ssl = allow;
        self
    }

    pub fn with_major_version_hint(mut self, major: u32) -> Self {
        self.major_version_hint = Some(major);
        self
    }

    /// Basic-auth pair, present only when both halves are set.
    pub fn basic_auth(&self) -> Option<(&str, &SecretString)> {
        match (self.username.as_deref(), self.password.as_ref()) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.expose_secret().is_empty() => {
                Some((user, pass))
            }
            _ => None,
        }
    }

    /// Client certificate path, ignoring empty values.
    pub fn cert_path(&self) -> Option<&Path> {
        non_empty_path(self.cert_path.as_deref())
    }

    /// Client key path, ignoring empty values.
    pub fn key_path(&self) -> Option<&Path> {
        non_empty_path(self.key_path.as_deref())
    }

    /// URL without trailing slashes, ready for endpoint concatenation.
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    /// Check that the identity can be turned into a client.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidServer`] if the id is blank or the URL is
    /// not an absolute `http`/`https` URL with a host.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.id.trim().is_empty() {
            return Err(ConfigError::InvalidServer {
                id: self.id.clone(),
                message: "id must not be empty".to_string(),
            });
        }

        let parsed = url::Url::parse(self.url.trim()).map_err(|e| ConfigError::InvalidServer {
            id: self.id.clone(),
            message: format!("invalid url '{}': {}", self.url, e),
        })?;

        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            return Err(ConfigError::InvalidServer {
                id: self.id.clone(),
                message: format!("url '{}' must be an http or https URL with a host", self.url),
            });
        }

        Ok(())
    }

    /// Digest of every connection-relevant field.
    ///
    /// Two identities with the same hash target the same connection; any change
    /// to url, credentials, certificate paths or the insecure flag changes it.
    pub fn config_hash(&self) -> ConfigHash {
        let mut hasher = Sha256::new();
        hash_field(&mut hasher, Some(self.url.as_bytes()));
        hash_field(&mut hasher, self.username.as_deref().map(str::as_bytes));
        hash_field(
            &mut hasher,
            self.password.as_ref().map(|p| p.expose_secret().as_bytes()),
        );
        hash_field(
            &mut hasher,
            self.cert_path.as_ref().map(|p| p.as_os_str().as_encoded_bytes()),
        );
        hash_field(
            &mut hasher,
            self.key_path.as_ref().map(|p| p.as_os_str().as_encoded_bytes()),
        );
        hasher.update([u8::from(self.allow_insecure_ssl)]);
        ConfigHash(hex::encode(hasher.finalize()))
    }
}

fn non_empty_path(path: Option<&Path>) -> Option<&Path> {
    path.filter(|p| !p.as_os_str().is_empty())
}

// Presence marker plus length prefix keeps `None`, `Some("")` and shifted
// boundaries between adjacent fields distinct.
fn hash_field(hasher: &mut Sha256, value: Option<&[u8]>) {
    match value {
        Some(bytes) => {
            hasher.update([1u8]);
            hasher.update((bytes.len() as u64).to_le_bytes());
            hasher.update(bytes);
        }
        None => hasher.update([0u8]),
    }
}

/// Deterministic digest of a [`ServerIdentity`]'s connection fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfigHash(String);

impl ConfigHash {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
