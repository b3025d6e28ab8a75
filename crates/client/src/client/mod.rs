//! Generation-specific cluster client.
//!
//! This module provides [`ClusterClient`], one HTTP connection to one cluster
//! speaking one [`ApiGeneration`].
//!
//! # Submodules
//! - [`builder`]: Client construction from a `ServerIdentity`
//!
//! # What this module does NOT handle:
//! - Choosing the generation (handled by [`crate::resolver`])
//! - Direct HTTP request implementation (delegated to [`crate::endpoints`])
//!
//! # Invariants
//! - Every payload returned from this type has passed through [`normalize`],
//!   whatever generation produced it.

pub mod builder;

use reqwest::Client;
use serde_json::Value;

use crate::endpoints::{self, BasicAuth, RequestContext};
use crate::error::Result;
use crate::generation::ApiGeneration;
use crate::models::ClusterInfo;
use crate::normalize::normalize;

/// HTTP client bound to one cluster and one wire-protocol generation.
///
/// # Creating a Client
///
/// ```rust,ignore
/// use scope_client::{ApiGeneration, ClusterClient};
///
/// let client = ClusterClient::builder()
///     .from_identity(&identity)
///     .generation(ApiGeneration::V8)
///     .build()?;
/// let info = client.info().await?;
/// ```
#[derive(Debug, Clone)]
pub struct ClusterClient {
    pub(crate) http: Client,
    pub(crate) base_url: String,
    pub(crate) auth: Option<BasicAuth>,
    pub(crate) generation: ApiGeneration,
    pub(crate) max_retries: usize,
}

impl ClusterClient {
    pub fn builder() -> builder::ClusterClientBuilder {
        builder::ClusterClientBuilder::new()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn generation(&self) -> ApiGeneration {
        self.generation
    }

    fn context(&self) -> RequestContext<'_> {
        RequestContext {
            http: &self.http,
            base_url: &self.base_url,
            auth: self.auth.as_ref(),
            generation: self.generation,
            max_retries: self.max_retries,
        }
    }

    /// Fetch and parse the cluster's root info document.
    pub async fn info(&self) -> Result<ClusterInfo> {
        let raw = endpoints::info(&self.context()).await?;
        ClusterInfo::from_payload(normalize(raw))
    }

    /// Run a search with a prepared body and return the normalized payload.
    pub async fn search(&self, index: &str, body: &Value) -> Result<Value> {
        let raw = endpoints::search(&self.context(), index, body).await?;
        Ok(normalize(raw))
    }

    /// Fetch the mappings of every index matching `index`.
    pub async fn get_mapping(&self, index: &str) -> Result<Value> {
        let raw = endpoints::get_mapping(&self.context(), index).await?;
        Ok(normalize(raw))
    }

    /// List indices through the cat API.
    pub async fn cat_indices(&self) -> Result<Value> {
        let raw = endpoints::cat_indices(&self.context()).await?;
        Ok(normalize(raw))
    }
}
