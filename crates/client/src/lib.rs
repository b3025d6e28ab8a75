//! Version-adaptive search cluster client.
//!
//! This crate resolves one working connection per logical server, whatever
//! wire-protocol generation the cluster speaks, and exposes search, field
//! mapping, value suggestion, index listing and verify operations through the
//! [`Gateway`] facade.

pub mod client;
pub mod endpoints;
pub mod error;
pub mod gateway;
pub mod generation;
pub mod interval;
pub mod mapping;
pub mod metrics;
pub mod models;
pub mod normalize;
pub mod query;
pub mod resolver;
pub mod suggest;

#[cfg(any(feature = "test-utils", test))]
pub mod testing;

pub use client::ClusterClient;
pub use client::builder::ClusterClientBuilder;
pub use error::{ClientError, ConnectionError, ErrorKind, ProbeFailure, QueryError, Result};
pub use gateway::Gateway;
pub use generation::ApiGeneration;
pub use interval::choose_interval;
pub use mapping::{MappingField, flatten};
pub use metrics::MetricsCollector;
pub use models::{ClusterInfo, IndexSummary, SearchHit, SearchResult, VerifyResult};
pub use normalize::normalize;
pub use query::{SearchRequest, SortOrder, build_search_body};
pub use resolver::{
    ConnectionCache, ConnectionEntry, ConnectionResolver, GenerationProbe, ProbeHandler,
    ProbeSuccess,
};
pub use suggest::{FieldValue, ValuesRequest};
