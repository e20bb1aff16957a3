//! Metrics collection for observability
//!
//! # Metrics
//!
//! - `discovery_connector_requests_total` - Requests issued, per provider
//! - `discovery_connector_failures_total` - Failures, per provider and reason
//! - `discovery_edges_total` - Edges discovered, per source
//! - `discovery_pipeline_runs_total` - Completed pipeline runs

use std::sync::Arc;

use prometheus::{IntCounter, IntCounterVec, Opts, Registry};

use entity_core::EdgeSource;

use crate::connectors::Provider;

/// Metrics collector. Counters live on an instance registry so several
/// collectors can coexist in one process.
#[derive(Clone)]
pub struct DiscoveryMetrics {
    /// Requests issued, labeled by provider
    pub connector_requests: IntCounterVec,

    /// Failures, labeled by provider and reason
    pub connector_failures: IntCounterVec,

    /// Edges discovered, labeled by source
    pub edges_discovered: IntCounterVec,

    /// Completed pipeline runs
    pub pipeline_runs: IntCounter,

    /// Prometheus registry
    pub registry: Arc<Registry>,
}

impl DiscoveryMetrics {
    /// Create new metrics collector
    pub fn new() -> prometheus::Result<Self> {
        let registry = Arc::new(Registry::new());

        let connector_requests = IntCounterVec::new(
            Opts::new(
                "discovery_connector_requests_total",
                "Requests issued per provider",
            ),
            &["provider"],
        )?;
        registry.register(Box::new(connector_requests.clone()))?;

        let connector_failures = IntCounterVec::new(
            Opts::new(
                "discovery_connector_failures_total",
                "Failed requests per provider and reason",
            ),
            &["provider", "reason"],
        )?;
        registry.register(Box::new(connector_failures.clone()))?;

        let edges_discovered = IntCounterVec::new(
            Opts::new("discovery_edges_total", "Edges discovered per source"),
            &["source"],
        )?;
        registry.register(Box::new(edges_discovered.clone()))?;

        let pipeline_runs = IntCounter::new(
            "discovery_pipeline_runs_total",
            "Completed discovery pipeline runs",
        )?;
        registry.register(Box::new(pipeline_runs.clone()))?;

        Ok(Self {
            connector_requests,
            connector_failures,
            edges_discovered,
            pipeline_runs,
            registry,
        })
    }

    /// Record a request going out to a provider
    pub fn record_request(&self, provider: Provider) {
        self.connector_requests
            .with_label_values(&[provider.as_str()])
            .inc();
    }

    /// Record a failed or skipped provider request
    pub fn record_failure(&self, provider: Provider, reason: &str) {
        self.connector_failures
            .with_label_values(&[provider.as_str(), reason])
            .inc();
    }

    /// Record edges produced by one source
    pub fn record_edges(&self, source: EdgeSource, count: usize) {
        if count > 0 {
            self.edges_discovered
                .with_label_values(&[source.as_str()])
                .inc_by(count as u64);
        }
    }

    /// Record a completed pipeline run
    pub fn record_pipeline_run(&self) {
        self.pipeline_runs.inc();
    }

    /// Get metrics registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = DiscoveryMetrics::new().unwrap();
        assert_eq!(metrics.pipeline_runs.get(), 0);
    }

    #[test]
    fn test_two_collectors_coexist() {
        let a = DiscoveryMetrics::new().unwrap();
        let b = DiscoveryMetrics::new().unwrap();
        a.record_pipeline_run();
        assert_eq!(a.pipeline_runs.get(), 1);
        assert_eq!(b.pipeline_runs.get(), 0);
    }

    #[test]
    fn test_record_request_and_failure() {
        let metrics = DiscoveryMetrics::new().unwrap();
        metrics.record_request(Provider::Registry);
        metrics.record_request(Provider::Registry);
        metrics.record_failure(Provider::Registry, "timeout");

        assert_eq!(
            metrics
                .connector_requests
                .with_label_values(&["registry"])
                .get(),
            2
        );
        assert_eq!(
            metrics
                .connector_failures
                .with_label_values(&["registry", "timeout"])
                .get(),
            1
        );
    }

    #[test]
    fn test_record_edges() {
        let metrics = DiscoveryMetrics::new().unwrap();
        metrics.record_edges(EdgeSource::Pattern, 3);
        metrics.record_edges(EdgeSource::Pattern, 0);
        assert_eq!(
            metrics
                .edges_discovered
                .with_label_values(&["pattern"])
                .get(),
            3
        );
    }
}
