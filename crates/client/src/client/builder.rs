//! Client builder for constructing [`ClusterClient`] instances.
//!
//! This module is responsible for:
//! - Providing a fluent builder API for client configuration
//! - Translating a `ServerIdentity` into HTTP client settings
//! - Normalizing the base URL (removing trailing slashes)
//! - Configuring the underlying HTTP client (timeouts, redirects, TLS)
//!
//! # What this module does NOT handle:
//! - Actual API calls (handled by [`ClusterClient`] methods in `mod.rs`)
//! - Deciding which generation to build (handled by the resolver)
//!
//! # Invariants
//! - `base_url` is required and always normalized to have no trailing slashes
//! - Insecure TLS only affects HTTPS connections; HTTP connections log a warning
//! - A client certificate is only used together with its key

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Identity;
use scope_config::ServerIdentity;
use scope_config::constants::{DEFAULT_MAX_REDIRECTS, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT_SECS};
use secrecy::SecretString;

use crate::client::ClusterClient;
use crate::endpoints::BasicAuth;
use crate::error::{ConnectionError, Result};
use crate::generation::ApiGeneration;

/// Builder for creating a new [`ClusterClient`].
pub struct ClusterClientBuilder {
    base_url: Option<String>,
    generation: ApiGeneration,
    auth: Option<BasicAuth>,
    cert_path: Option<PathBuf>,
    key_path: Option<PathBuf>,
    allow_insecure_ssl: bool,
    timeout: Duration,
    max_retries: usize,
}

impl Default for ClusterClientBuilder {
    fn default() -> Self {
        Self {
            base_url: None,
            generation: ApiGeneration::PROBE_ORDER[0],
            auth: None,
            cert_path: None,
            key_path: None,
            allow_insecure_ssl: false,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl ClusterClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cluster URL, e.g. `https://localhost:9200`.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn generation(mut self, generation: ApiGeneration) -> Self {
        self.generation = generation;
        self
    }

    pub fn basic_auth(mut self, username: impl Into<String>, password: SecretString) -> Self {
        self.auth = Some(BasicAuth {
            username: username.into(),
            password,
        });
        self
    }

    /// Present a PEM client certificate and key on TLS connections.
    pub fn client_cert(mut self, cert_path: Option<PathBuf>, key_path: Option<PathBuf>) -> Self {
        self.cert_path = cert_path;
        self.key_path = key_path;
        self
    }

    /// Accept invalid certificates and host names.
    ///
    /// # Security Warning
    /// Only use this against development clusters with self-signed certificates.
    pub fn allow_insecure_ssl(mut self, allow: bool) -> Self {
        self.allow_insecure_ssl = allow;
        self
    }

    /// Set the per-request timeout. Default is 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set how often a rate-limited request is retried. Default is 3.
    pub fn max_retries(mut self, retries: usize) -> Self {
        self.max_retries = retries;
        self
    }

    /// Copy every connection setting from a server identity.
    pub fn from_identity(mut self, identity: &ServerIdentity) -> Self {
        self.base_url = Some(identity.url.clone());
        self.auth = identity.basic_auth().map(|(username, password)| BasicAuth {
            username: username.to_string(),
            password: password.clone(),
        });
        self.cert_path = identity.cert_path().map(Path::to_path_buf);
        self.key_path = identity.key_path().map(Path::to_path_buf);
        self.allow_insecure_ssl = identity.allow_insecure_ssl;
        self
    }

    fn normalize_base_url(url: &str) -> String {
        url.trim().trim_end_matches('/').to_string()
    }

    /// Build the [`ClusterClient`] with the configured options.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError::ClientBuild`] if the URL is missing, only one
    /// of certificate and key is given, either file cannot be read or parsed,
    /// or the HTTP client fails to build.
    pub fn build(self) -> Result<ClusterClient> {
        let base_url = self
            .base_url
            .as_deref()
            .map(Self::normalize_base_url)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| build_error("", "base_url is required"))?;

        let mut http_builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .redirect(reqwest::redirect::Policy::limited(DEFAULT_MAX_REDIRECTS));

        if self.allow_insecure_ssl {
            if base_url.starts_with("https://") {
                http_builder = http_builder
                    .danger_accept_invalid_certs(true)
                    .danger_accept_invalid_hostnames(true);
            } else {
                tracing::warn!(
                    url = %base_url,
                    "allowInsecureSSL has no effect on HTTP URLs. TLS verification only applies to HTTPS connections."
                );
            }
        }

        match (&self.cert_path, &self.key_path) {
            (Some(cert), Some(key)) => {
                http_builder = http_builder.identity(load_identity(&base_url, cert, key)?);
            }
            (None, None) => {}
            _ => {
                return Err(build_error(
                    &base_url,
                    "client certificate and key must be configured together",
                )
                .into());
            }
        }

        let http = http_builder
            .build()
            .map_err(|e| build_error(&base_url, &e.to_string()))?;

        Ok(ClusterClient {
            http,
            base_url,
            auth: self.auth,
            generation: self.generation,
            max_retries: self.max_retries,
        })
    }
}

fn build_error(url: &str, message: &str) -> ConnectionError {
    ConnectionError::ClientBuild {
        url: url.to_string(),
        message: message.to_string(),
    }
}

fn load_identity(url: &str, cert: &Path, key: &Path) -> std::result::Result<Identity, ConnectionError> {
    let read = |path: &Path| {
        std::fs::read(path)
            .map_err(|e| build_error(url, &format!("cannot read {}: {}", path.display(), e)))
    };
    let mut pem = read(cert)?;
    pem.push(b'\n');
    pem.extend(read(key)?);
    Identity::from_pem(&pem).map_err(|e| build_error(url, &format!("invalid client certificate: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;

    #[test]
    fn test_builder_normalizes_base_url() {
        let client = ClusterClient::builder()
            .base_url("http://localhost:9200/")
            .build()
            .unwrap();
        assert_eq!(client.base_url(), "http://localhost:9200");
        assert_eq!(client.generation(), ApiGeneration::V8);
    }

    #[test]
    fn test_builder_missing_base_url() {
        let err = ClusterClient::builder().build().unwrap_err();
        assert!(matches!(
            err,
            ClientError::Connection(ConnectionError::ClientBuild { .. })
        ));
    }

    #[test]
    fn test_from_identity_copies_settings() {
        let identity = ServerIdentity::new("dev", "https://es.local:9200")
            .with_credentials("elastic", SecretString::new("changeme".to_string().into()))
            .with_insecure_ssl(true);
        let client = ClusterClient::builder()
            .from_identity(&identity)
            .generation(ApiGeneration::V7)
            .build()
            .unwrap();
        assert_eq!(client.base_url(), "https://es.local:9200");
        assert_eq!(client.generation(), ApiGeneration::V7);
        assert_eq!(client.auth.as_ref().map(|a| a.username.as_str()), Some("elastic"));
    }

    #[test]
    fn test_insecure_with_http_url_still_builds() {
        let client = ClusterClient::builder()
            .base_url("http://localhost:9200")
            .allow_insecure_ssl(true)
            .build();
        assert!(client.is_ok());
    }

    #[test]
    fn test_cert_without_key_is_rejected() {
        let err = ClusterClient::builder()
            .base_url("https://localhost:9200")
            .client_cert(Some(PathBuf::from("/tmp/client.pem")), None)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("must be configured together"));
    }

    #[test]
    fn test_unreadable_cert_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = ClusterClient::builder()
            .base_url("https://localhost:9200")
            .client_cert(
                Some(dir.path().join("missing-cert.pem")),
                Some(dir.path().join("missing-key.pem")),
            )
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("cannot read"));
    }
}
