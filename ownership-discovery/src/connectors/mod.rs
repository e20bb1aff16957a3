//! External source connectors
//!
//! Each connector speaks to one provider gateway and turns its payload
//! into ownership edges. The [`ConnectorRunner`] wraps a connector with
//! the protections a flaky upstream needs: request spacing, a circuit
//! breaker, a hard timeout. A runner never returns an error; a failed
//! provider contributes nothing and the run continues.

mod circuit;
mod encyclopedia;
mod filings;
mod knowledge_graph;
mod registry;
mod throttle;

pub use circuit::{BreakerState, ConnectorBreaker};
pub use encyclopedia::EncyclopediaConnector;
pub use filings::FilingsConnector;
pub use knowledge_graph::KnowledgeGraphConnector;
pub use registry::RegistryConnector;
pub use throttle::Throttle;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::time::{timeout, Duration};
use tracing::{debug, warn};

use entity_core::{EdgeSource, OwnershipEdge};

use crate::config::ProviderConfig;
use crate::metrics::DiscoveryMetrics;

/// The four external providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    /// Corporate registry gateway
    Registry,
    /// Knowledge-graph gateway
    KnowledgeGraph,
    /// Encyclopedia infobox gateway
    Encyclopedia,
    /// Regulatory filings gateway
    Filings,
}

impl Provider {
    /// Stable lowercase label for logs and metrics
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Registry => "registry",
            Provider::KnowledgeGraph => "knowledge_graph",
            Provider::Encyclopedia => "encyclopedia",
            Provider::Filings => "filings",
        }
    }

    /// Edge source recorded on edges this provider reports
    pub fn edge_source(&self) -> EdgeSource {
        match self {
            Provider::Registry => EdgeSource::Registry,
            Provider::KnowledgeGraph => EdgeSource::KnowledgeGraph,
            Provider::Encyclopedia => EdgeSource::Encyclopedia,
            Provider::Filings => EdgeSource::Filings,
        }
    }
}

/// Connector-level failures
#[derive(Error, Debug)]
pub enum ConnectorError {
    /// Request exceeded its deadline
    #[error("Request timed out")]
    Timeout,

    /// Provider returned 429
    #[error("Provider rate limited the request")]
    RateLimited,

    /// Transport or non-success status
    #[error("HTTP error: {0}")]
    Http(String),

    /// Payload did not match the provider schema
    #[error("Malformed payload: {0}")]
    Malformed(String),
}

impl ConnectorError {
    /// Short reason label for metrics
    pub fn reason(&self) -> &'static str {
        match self {
            ConnectorError::Timeout => "timeout",
            ConnectorError::RateLimited => "rate_limited",
            ConnectorError::Http(_) => "http",
            ConnectorError::Malformed(_) => "malformed",
        }
    }
}

/// Result type for connector calls
pub type ConnectorResult<T> = std::result::Result<T, ConnectorError>;

/// One external source of ownership edges
#[async_trait]
pub trait SourceConnector: Send + Sync {
    /// Which provider this connector talks to
    fn provider(&self) -> Provider;

    /// Fetch ownership edges for one entity. A payload that does not
    /// match the provider schema is rejected whole; partial parses are
    /// worse than no data.
    async fn fetch(
        &self,
        name: &str,
        country_hint: Option<&str>,
    ) -> ConnectorResult<Vec<OwnershipEdge>>;
}

/// Map transport errors onto connector errors
pub(crate) fn request_error(e: reqwest::Error) -> ConnectorError {
    if e.is_timeout() {
        ConnectorError::Timeout
    } else {
        ConnectorError::Http(e.to_string())
    }
}

/// A connector plus its protections.
///
/// `discover` is infallible by design: every failure mode is recorded,
/// logged, and collapsed to an empty edge list so one dead provider
/// cannot sink a discovery run.
pub struct ConnectorRunner {
    connector: Arc<dyn SourceConnector>,
    throttle: Throttle,
    breaker: ConnectorBreaker,
    timeout: Duration,
    metrics: Arc<DiscoveryMetrics>,
}

impl ConnectorRunner {
    /// Wrap a connector with the protections from its provider config
    pub fn new(
        connector: Arc<dyn SourceConnector>,
        config: &ProviderConfig,
        metrics: Arc<DiscoveryMetrics>,
    ) -> Self {
        let provider = connector.provider();
        Self {
            connector,
            throttle: Throttle::new(Duration::from_millis(config.min_interval_ms)),
            breaker: ConnectorBreaker::new(
                provider,
                config.failure_threshold,
                config.cooldown_seconds,
            ),
            timeout: Duration::from_millis(config.timeout_ms),
            metrics,
        }
    }

    /// Which provider this runner queries
    pub fn provider(&self) -> Provider {
        self.connector.provider()
    }

    /// Fetch edges for one entity, absorbing every failure
    pub async fn discover(&self, name: &str, country_hint: Option<&str>) -> Vec<OwnershipEdge> {
        let provider = self.connector.provider();

        if !self.breaker.allow().await {
            debug!(provider = provider.as_str(), entity = name, "circuit open, skipping");
            self.metrics.record_failure(provider, "circuit_open");
            return Vec::new();
        }

        self.throttle.wait().await;
        self.metrics.record_request(provider);

        match timeout(self.timeout, self.connector.fetch(name, country_hint)).await {
            Ok(Ok(edges)) => {
                self.breaker.record_success().await;
                let edges: Vec<OwnershipEdge> =
                    edges.into_iter().filter(|e| !e.is_self_loop()).collect();
                self.metrics.record_edges(provider.edge_source(), edges.len());
                debug!(
                    provider = provider.as_str(),
                    entity = name,
                    edges = edges.len(),
                    "provider responded"
                );
                edges
            }
            Ok(Err(e)) => {
                self.breaker.record_failure().await;
                self.metrics.record_failure(provider, e.reason());
                warn!(
                    provider = provider.as_str(),
                    entity = name,
                    error = %e,
                    "provider request failed"
                );
                Vec::new()
            }
            Err(_) => {
                self.breaker.record_failure().await;
                self.metrics.record_failure(provider, "timeout");
                warn!(
                    provider = provider.as_str(),
                    entity = name,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "provider timed out"
                );
                Vec::new()
            }
        }
    }
}
