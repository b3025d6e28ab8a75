//! Gateway facade over every cluster operation.
//!
//! Responsibilities:
//! - Look server identities up by id through a [`ServerRegistry`].
//! - Resolve a connection for each call and run search, mapping, value,
//!   index-listing and verify operations through it.
//! - Apply the failure policy: primary operations propagate errors, optional
//!   affordances (fields, values) degrade to empty results.
//!
//! Does NOT handle:
//! - Building query DSL (see [`crate::query`] and [`crate::suggest`]).
//! - Probing or caching (see [`crate::resolver`]).
//!
//! Invariants:
//! - Request defects are rejected before the registry or the cluster is touched.
//! - Calls for different servers never wait on each other.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use scope_config::{GatewaySettings, ServerIdentity, ServerRegistry};
use tracing::{debug, warn};

use crate::error::{ConnectionError, QueryError, Result};
use crate::mapping::{MappingField, fields_from_mapping_response};
use crate::metrics::MetricsCollector;
use crate::models::{IndexSummary, SearchResult, VerifyResult};
use crate::query::{SearchRequest, build_search_body};
use crate::resolver::{
    ConnectionCache, ConnectionEntry, ConnectionResolver, GenerationProbe, ProbeHandler,
};
use crate::suggest::{FieldValue, ValuesRequest, build_terms_body, suggestions_from_response};

/// Entry point for hosting processes.
///
/// # Example
///
/// ```rust,ignore
/// use scope_client::Gateway;
/// use scope_config::{FileRegistry, GatewaySettings};
///
/// let gateway = Gateway::new(FileRegistry::new(path), &GatewaySettings::default());
/// let result = gateway.search("prod", &SearchRequest::new("logs-*")).await?;
/// ```
pub struct Gateway<P = GenerationProbe> {
    registry: Arc<dyn ServerRegistry>,
    resolver: ConnectionResolver<P>,
    metrics: MetricsCollector,
}

impl Gateway<GenerationProbe> {
    /// Create a gateway probing over HTTP with the given settings.
    pub fn new(registry: impl ServerRegistry + 'static, settings: &GatewaySettings) -> Self {
        let cache = ConnectionCache::new(settings.cache_capacity);
        Self::with_resolver(
            registry,
            ConnectionResolver::new(cache, GenerationProbe::new(settings)),
        )
    }
}

impl<P: ProbeHandler> Gateway<P> {
    pub fn with_resolver(
        registry: impl ServerRegistry + 'static,
        resolver: ConnectionResolver<P>,
    ) -> Self {
        Self {
            registry: Arc::new(registry),
            resolver,
            metrics: MetricsCollector::disabled(),
        }
    }

    /// Record metrics for every operation and probe.
    pub fn with_metrics(mut self, metrics: MetricsCollector) -> Self {
        self.resolver = self.resolver.with_metrics(metrics.clone());
        self.metrics = metrics;
        self
    }

    pub fn cache(&self) -> &ConnectionCache {
        self.resolver.cache()
    }

    /// Look up the identity registered under `server_id`.
    pub fn identity(&self, server_id: &str) -> Result<ServerIdentity> {
        self.registry
            .lookup(server_id)?
            .ok_or_else(|| {
                ConnectionError::ServerNotFound {
                    id: server_id.to_string(),
                }
                .into()
            })
    }

    /// Resolve a working connection for `server_id`.
    pub async fn resolve(&self, server_id: &str) -> Result<Arc<ConnectionEntry>> {
        let identity = self.identity(server_id)?;
        self.resolver.resolve(&identity).await
    }

    /// Run a search and shape its result.
    ///
    /// # Errors
    ///
    /// Propagates every failure: request defects as `QueryError`, resolution
    /// failures as `ConnectionError`, and cluster replies as `Api` errors.
    pub async fn search(&self, server_id: &str, request: &SearchRequest) -> Result<SearchResult> {
        self.observe("search", async {
            request.validate()?;
            let body = build_search_body(request);
            let entry = self.resolve(server_id).await?;
            debug!(server_id, index = request.index(), "Running search");
            let payload = entry.client.search(request.index(), &body).await?;
            SearchResult::from_payload(&payload)
        })
        .await
    }

    /// Leaf fields of every index matching `index`, or nothing on any failure.
    pub async fn get_fields(&self, server_id: &str, index: &str) -> Vec<MappingField> {
        let result = self
            .observe("get_fields", async {
                if index.trim().is_empty() {
                    return Err(QueryError::MissingField("index").into());
                }
                let entry = self.resolve(server_id).await?;
                let payload = entry.client.get_mapping(index).await?;
                Ok(fields_from_mapping_response(&payload))
            })
            .await;

        result.unwrap_or_else(|error| {
            warn!(server_id, index, error = %error, "Failed to fetch fields");
            Vec::new()
        })
    }

    /// Value suggestions for a field, or nothing on any failure.
    pub async fn get_values(&self, server_id: &str, request: &ValuesRequest) -> Vec<FieldValue> {
        let result = self
            .observe("get_values", async {
                request.validate()?;
                let body = build_terms_body(request);
                let entry = self.resolve(server_id).await?;
                let payload = entry.client.search(&request.index, &body).await?;
                Ok(suggestions_from_response(&payload, request))
            })
            .await;

        result.unwrap_or_else(|error| {
            warn!(
                server_id,
                index = %request.index,
                field = %request.field,
                error = %error,
                "Failed to fetch values"
            );
            Vec::new()
        })
    }

    /// Visible indices, sorted by name.
    pub async fn list_indices(&self, server_id: &str) -> Result<Vec<IndexSummary>> {
        self.observe("list_indices", async {
            let entry = self.resolve(server_id).await?;
            let payload = entry.client.cat_indices().await?;
            Ok(IndexSummary::list_from_payload(payload))
        })
        .await
    }

    /// Drop any cached connection, probe again and report what was found.
    pub async fn verify(&self, server_id: &str) -> Result<VerifyResult> {
        self.observe("verify", async {
            let identity = self.identity(server_id)?;
            let entry = self.resolver.reverify(&identity).await?;
            Ok(VerifyResult::verified(
                entry.reported_version.clone(),
                entry.major_version,
                &entry.info,
            ))
        })
        .await
    }

    /// Like [`Gateway::verify`], with failures folded into the result.
    pub async fn verify_report(&self, server_id: &str) -> VerifyResult {
        match self.verify(server_id).await {
            Ok(result) => result,
            Err(error) => VerifyResult::failed(&error),
        }
    }

    async fn observe<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        let start = Instant::now();
        let result = call.await;
        self.metrics.record_operation(operation, start.elapsed());
        if let Err(error) = &result {
            self.metrics.record_error(operation, error);
        }
        result
    }
}
