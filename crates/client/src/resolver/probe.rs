//! Version probes.
//!
//! A probe builds a client for one [`ApiGeneration`] and asks the cluster who
//! it is. The resolver walks a fixed list of generations through one
//! [`ProbeHandler`], so tests can substitute the network part.

use std::future::Future;
use std::time::Duration;

use scope_config::{GatewaySettings, ServerIdentity};

use crate::client::ClusterClient;
use crate::error::Result;
use crate::generation::ApiGeneration;
use crate::models::ClusterInfo;

/// A client that answered its info call.
#[derive(Debug)]
pub struct ProbeSuccess {
    pub client: ClusterClient,
    pub info: ClusterInfo,
}

/// Try one generation against one identity.
pub trait ProbeHandler: Send + Sync {
    fn probe(
        &self,
        identity: &ServerIdentity,
        generation: ApiGeneration,
    ) -> impl Future<Output = Result<ProbeSuccess>> + Send;
}

/// Probe over HTTP with [`ClusterClient`].
#[derive(Debug, Clone)]
pub struct GenerationProbe {
    timeout: Duration,
    max_retries: usize,
}

impl GenerationProbe {
    pub fn new(settings: &GatewaySettings) -> Self {
        Self {
            timeout: settings.request_timeout,
            max_retries: settings.max_retries,
        }
    }
}

impl Default for GenerationProbe {
    fn default() -> Self {
        Self::new(&GatewaySettings::default())
    }
}

impl ProbeHandler for GenerationProbe {
    async fn probe(
        &self,
        identity: &ServerIdentity,
        generation: ApiGeneration,
    ) -> Result<ProbeSuccess> {
        let client = ClusterClient::builder()
            .from_identity(identity)
            .generation(generation)
            .timeout(self.timeout)
            .max_retries(self.max_retries)
            .build()?;
        let info = client.info().await?;
        Ok(ProbeSuccess { client, info })
    }
}
