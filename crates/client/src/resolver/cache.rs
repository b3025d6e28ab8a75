//! Connection cache shared by every resolution.
//!
//! Purpose: Hold at most one resolved connection per server id.
//! Responsibilities: Publish fully-built entries, hand out shared references, evict on request.
//! Non-scope: Deciding when an entry is stale (the resolver compares hashes and hints).
//! Invariants/Assumptions: Entries are immutable once published; replacement is whole-entry.

use std::sync::Arc;

use moka::future::Cache as MokaCache;
use moka::policy::EvictionPolicy;
use scope_config::ConfigHash;
use scope_config::constants::DEFAULT_CONNECTION_CACHE_CAPACITY;

use crate::client::ClusterClient;
use crate::models::ClusterInfo;

/// A working connection for one server id.
#[derive(Debug)]
pub struct ConnectionEntry {
    pub client: ClusterClient,
    /// Hash of the identity the client was built from.
    pub config_hash: ConfigHash,
    /// Version string the cluster reported, e.g. `8.11.2`.
    pub reported_version: String,
    pub major_version: u32,
    /// Info document returned by the successful probe.
    pub info: ClusterInfo,
}

/// Process-wide cache of resolved connections, keyed by server id.
///
/// Cloning yields another handle to the same cache.
#[derive(Clone)]
pub struct ConnectionCache {
    inner: MokaCache<String, Arc<ConnectionEntry>>,
}

impl std::fmt::Debug for ConnectionCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionCache")
            .field("entry_count", &self.inner.entry_count())
            .finish()
    }
}

impl Default for ConnectionCache {
    fn default() -> Self {
        Self::new(DEFAULT_CONNECTION_CACHE_CAPACITY)
    }
}

impl ConnectionCache {
    /// Create a cache holding at most `capacity` server ids.
    pub fn new(capacity: u64) -> Self {
        let inner = MokaCache::builder()
            .max_capacity(capacity)
            .eviction_policy(EvictionPolicy::lru())
            .build();
        Self { inner }
    }

    pub async fn get(&self, server_id: &str) -> Option<Arc<ConnectionEntry>> {
        self.inner.get(server_id).await
    }

    /// Publish an entry, replacing any previous one for the id.
    pub async fn insert(&self, server_id: &str, entry: Arc<ConnectionEntry>) {
        self.inner.insert(server_id.to_string(), entry).await;
    }

    pub async fn invalidate(&self, server_id: &str) {
        self.inner.invalidate(server_id).await;
    }

    pub fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }

    /// Apply pending writes and evictions so `entry_count` is exact.
    pub async fn run_pending_tasks(&self) {
        self.inner.run_pending_tasks().await;
    }

    /// Approximate number of cached entries.
    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }
}
