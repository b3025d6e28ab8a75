//! Connection resolution.
//!
//! Responsibilities:
//! - Return a working [`ClusterClient`] for a server identity, from the
//!   [`ConnectionCache`] when the cached entry still matches the identity.
//! - Otherwise detect the cluster generation by probing: the hinted generation
//!   first, then every generation in [`ApiGeneration::PROBE_ORDER`].
//!
//! Does NOT handle:
//! - Looking identities up by id (see [`crate::gateway`]).
//! - Serializing concurrent resolutions of the same id. Two callers may probe
//!   at once; both publish an entry for the same hash and the last write wins.
//!
//! Invariants:
//! - Only entries whose probe succeeded are ever published.
//! - The cache is read once at the start of a resolution and written at most once.
//! - Probes run strictly one after another, in a fixed order.

mod cache;
mod probe;

pub use cache::{ConnectionCache, ConnectionEntry};
pub use probe::{GenerationProbe, ProbeHandler, ProbeSuccess};

use std::sync::Arc;

use scope_config::{ConfigHash, ServerIdentity};
use tracing::{debug, info, warn};

use crate::client::ClusterClient;
use crate::error::{ClientError, ConnectionError, ProbeFailure, Result};
use crate::generation::ApiGeneration;
use crate::metrics::{MetricsCollector, ProbeOutcome};
use crate::models::ClusterInfo;

/// Resolves and caches one working connection per server id.
#[derive(Debug, Clone)]
pub struct ConnectionResolver<P = GenerationProbe> {
    cache: ConnectionCache,
    probe: P,
    metrics: MetricsCollector,
}

impl<P: ProbeHandler> ConnectionResolver<P> {
    pub fn new(cache: ConnectionCache, probe: P) -> Self {
        Self {
            cache,
            probe,
            metrics: MetricsCollector::disabled(),
        }
    }

    pub fn with_metrics(mut self, metrics: MetricsCollector) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn cache(&self) -> &ConnectionCache {
        &self.cache
    }

    /// Return the cached connection for `identity`, probing when there is none
    /// or it no longer matches.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Config` for an invalid identity and
    /// [`ConnectionError::ProbeFailed`] when no generation could connect.
    pub async fn resolve(&self, identity: &ServerIdentity) -> Result<Arc<ConnectionEntry>> {
        identity.validate()?;
        let hash = identity.config_hash();

        if let Some(entry) = self.cache.get(&identity.id).await {
            // Unsupported hints are never probed, so they cannot stale an entry.
            let hint_matches = identity
                .major_version_hint
                .and_then(ApiGeneration::from_major)
                .is_none_or(|hinted| hinted.major() == entry.major_version);
            if entry.config_hash == hash && hint_matches {
                debug!(
                    server_id = %identity.id,
                    major_version = entry.major_version,
                    "Using cached connection"
                );
                self.metrics.record_cache_hit();
                return Ok(entry);
            }

            info!(
                server_id = %identity.id,
                cached_major_version = entry.major_version,
                hash_changed = entry.config_hash != hash,
                "Evicting stale connection"
            );
            self.cache.invalidate(&identity.id).await;
        }

        self.metrics.record_cache_miss();
        self.probe_and_publish(identity, hash).await
    }

    /// Drop any cached connection for `identity` and resolve it afresh.
    pub async fn reverify(&self, identity: &ServerIdentity) -> Result<Arc<ConnectionEntry>> {
        identity.validate()?;
        info!(server_id = %identity.id, "Re-verifying connection");
        self.cache.invalidate(&identity.id).await;
        self.metrics.record_cache_miss();
        self.probe_and_publish(identity, identity.config_hash()).await
    }

    async fn probe_and_publish(
        &self,
        identity: &ServerIdentity,
        hash: ConfigHash,
    ) -> Result<Arc<ConnectionEntry>> {
        let mut failures = Vec::new();

        if let Some(hint) = identity.major_version_hint {
            match ApiGeneration::from_major(hint) {
                Some(generation) => match self.attempt(identity, generation).await {
                    Ok((client, info)) => {
                        let reported = info.version_number().to_string();
                        return Ok(self
                            .publish(identity, hash, client, info, reported, hint)
                            .await);
                    }
                    Err(error) => failures.push(ProbeFailure {
                        major_version: hint,
                        error: Box::new(error),
                    }),
                },
                None => warn!(
                    server_id = %identity.id,
                    major_version = hint,
                    "Ignoring unsupported major version hint"
                ),
            }
        }

        for generation in ApiGeneration::PROBE_ORDER {
            let outcome = match self.attempt(identity, generation).await {
                Ok((client, info)) => match info.major_version() {
                    Some(major) => Ok((client, info, major)),
                    None => Err(ClientError::InvalidResponse(format!(
                        "unrecognized version string '{}'",
                        info.version_number()
                    ))),
                },
                Err(error) => Err(error),
            };

            match outcome {
                Ok((client, info, major)) => {
                    let reported = info.version_number().to_string();
                    info!(
                        server_id = %identity.id,
                        url = %identity.base_url(),
                        version = %reported,
                        client_generation = %generation,
                        "Detected cluster version"
                    );
                    return Ok(self
                        .publish(identity, hash, client, info, reported, major)
                        .await);
                }
                Err(error) => failures.push(ProbeFailure {
                    major_version: generation.major(),
                    error: Box::new(error),
                }),
            }
        }

        Err(ConnectionError::ProbeFailed {
            url: identity.base_url().to_string(),
            failures,
        }
        .into())
    }

    async fn attempt(
        &self,
        identity: &ServerIdentity,
        generation: ApiGeneration,
    ) -> Result<(ClusterClient, ClusterInfo)> {
        match self.probe.probe(identity, generation).await {
            Ok(success) => {
                self.metrics
                    .record_probe(generation.major(), ProbeOutcome::Success);
                Ok((success.client, success.info))
            }
            Err(error) => {
                self.metrics
                    .record_probe(generation.major(), ProbeOutcome::Failure);
                warn!(
                    server_id = %identity.id,
                    client_generation = %generation,
                    error = %error,
                    "Version probe failed"
                );
                Err(error)
            }
        }
    }

    async fn publish(
        &self,
        identity: &ServerIdentity,
        config_hash: ConfigHash,
        client: ClusterClient,
        info: ClusterInfo,
        reported_version: String,
        major_version: u32,
    ) -> Arc<ConnectionEntry> {
        let entry = Arc::new(ConnectionEntry {
            client,
            config_hash,
            reported_version,
            major_version,
            info,
        });
        self.cache.insert(&identity.id, Arc::clone(&entry)).await;
        entry
    }
}

impl ConnectionResolver<GenerationProbe> {
    /// Resolver probing over HTTP with default settings.
    pub fn with_cache(cache: ConnectionCache) -> Self {
        Self::new(cache, GenerationProbe::default())
    }
}
