//! Discovery pipeline
//!
//! One run: heuristics over the known records, a bounded fan-out to
//! every enabled connector, aggregation, then an atomic install into
//! the graph store. Runs are cooperative about cancellation; a flag
//! flipped mid-run stops new work and the run reports itself cancelled.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use tokio::sync::{Mutex, Semaphore};
use tracing::info;

use entity_core::{CompanyRecord, EdgeSource, OwnershipEdge};
use graph_store::{DiscoveryArtifact, GraphService};

use crate::aggregate::aggregate_edges;
use crate::config::{DiscoveryConfig, HeuristicConfig};
use crate::connectors::{
    ConnectorRunner, EncyclopediaConnector, FilingsConnector, KnowledgeGraphConnector,
    RegistryConnector,
};
use crate::error::{Error, Result};
use crate::heuristics;
use crate::metrics::DiscoveryMetrics;

/// Cooperative cancellation handle. Clones share one flag.
#[derive(Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    /// Fresh, uncancelled flag
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. In-flight provider calls finish; no new
    /// work starts.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// True once cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Orchestrates discovery runs against a graph store
pub struct DiscoveryPipeline {
    runners: Vec<Arc<ConnectorRunner>>,
    heuristics: HeuristicConfig,
    graph: Arc<GraphService>,
    workers: Arc<Semaphore>,
    // serializes read-merge-install against the graph
    merge_lock: Mutex<()>,
    metrics: Arc<DiscoveryMetrics>,
    cancel: CancellationFlag,
}

impl DiscoveryPipeline {
    /// Build a pipeline with one runner per enabled provider
    pub fn new(config: &DiscoveryConfig, graph: Arc<GraphService>) -> Result<Self> {
        let metrics =
            Arc::new(DiscoveryMetrics::new().map_err(|e| Error::Metrics(e.to_string()))?);

        let client = reqwest::Client::builder()
            .user_agent(concat!("tradesentry-discovery/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        let connectors = &config.connectors;
        let mut runners: Vec<Arc<ConnectorRunner>> = Vec::new();
        if connectors.registry.enabled {
            runners.push(Arc::new(ConnectorRunner::new(
                Arc::new(RegistryConnector::new(client.clone(), &connectors.registry)),
                &connectors.registry,
                metrics.clone(),
            )));
        }
        if connectors.knowledge_graph.enabled {
            runners.push(Arc::new(ConnectorRunner::new(
                Arc::new(KnowledgeGraphConnector::new(
                    client.clone(),
                    &connectors.knowledge_graph,
                )),
                &connectors.knowledge_graph,
                metrics.clone(),
            )));
        }
        if connectors.encyclopedia.enabled {
            runners.push(Arc::new(ConnectorRunner::new(
                Arc::new(EncyclopediaConnector::new(
                    client.clone(),
                    &connectors.encyclopedia,
                )),
                &connectors.encyclopedia,
                metrics.clone(),
            )));
        }
        if connectors.filings.enabled {
            runners.push(Arc::new(ConnectorRunner::new(
                Arc::new(FilingsConnector::new(client, &connectors.filings)),
                &connectors.filings,
                metrics.clone(),
            )));
        }

        Ok(Self::with_runners(
            runners,
            config.heuristics.clone(),
            graph,
            config.pipeline.worker_pool_size,
            metrics,
        ))
    }

    /// Pipeline over caller-supplied runners. This is the seam tests
    /// and embedders use to avoid real HTTP.
    pub fn with_runners(
        runners: Vec<Arc<ConnectorRunner>>,
        heuristics: HeuristicConfig,
        graph: Arc<GraphService>,
        worker_pool_size: usize,
        metrics: Arc<DiscoveryMetrics>,
    ) -> Self {
        Self {
            runners,
            heuristics,
            graph,
            workers: Arc::new(Semaphore::new(worker_pool_size.max(1))),
            merge_lock: Mutex::new(()),
            metrics,
            cancel: CancellationFlag::new(),
        }
    }

    /// Handle that cancels this pipeline's runs
    pub fn cancellation_flag(&self) -> CancellationFlag {
        self.cancel.clone()
    }

    /// Metrics collector shared with the runners
    pub fn metrics(&self) -> &DiscoveryMetrics {
        &self.metrics
    }

    /// Run a full discovery pass and install the result.
    ///
    /// Heuristics run first and cost nothing upstream; connector
    /// fan-out is bounded by the worker pool so providers see at most
    /// `worker_pool_size` entities in flight.
    pub async fn run(&self, records: &[CompanyRecord]) -> Result<DiscoveryArtifact> {
        if self.cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        let started = Instant::now();

        let mut edges = heuristics::run_all(records, &self.heuristics);
        let mut heuristic_counts: HashMap<EdgeSource, usize> = HashMap::new();
        for edge in &edges {
            *heuristic_counts.entry(edge.source).or_default() += 1;
        }
        for (source, count) in heuristic_counts {
            self.metrics.record_edges(source, count);
        }
        info!(
            records = records.len(),
            heuristic_edges = edges.len(),
            "heuristics complete"
        );

        edges.extend(self.fan_out(records).await);

        if self.cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let _merge = self.merge_lock.lock().await;
        let merged = aggregate_edges(edges);
        let counts = counts_by_source(&merged);
        let artifact = self.graph.install(merged, counts);
        self.metrics.record_pipeline_run();
        info!(
            edges = artifact.metadata.total_relationships,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "discovery run installed"
        );
        Ok(artifact)
    }

    /// Fan out the connectors for one entity and fold what they return
    /// into the current graph.
    ///
    /// Used by screening when a supplier is missing from the snapshot.
    /// Returns the deduplicated edges from this fan-out; an entity no
    /// provider knows yields an empty set and the graph is untouched.
    pub async fn discover_entity(
        &self,
        name: &str,
        country_hint: Option<&str>,
    ) -> Result<Vec<OwnershipEdge>> {
        if self.cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let calls = self.runners.iter().map(|r| r.discover(name, country_hint));
        let fetched: Vec<OwnershipEdge> = join_all(calls).await.into_iter().flatten().collect();

        if fetched.is_empty() {
            return Ok(Vec::new());
        }

        // Two concurrent on-demand discoveries must not both merge off
        // the same snapshot: the later install would drop the earlier
        // call's edges. Read-merge-install holds the merge lock.
        let _merge = self.merge_lock.lock().await;
        let view = self.graph.view();
        let mut combined = view.snapshot.edges().to_vec();
        combined.extend(fetched.clone());
        let merged = aggregate_edges(combined);
        let counts = counts_by_source(&merged);
        self.graph.install(merged, counts);

        Ok(aggregate_edges(fetched))
    }

    async fn fan_out(&self, records: &[CompanyRecord]) -> Vec<OwnershipEdge> {
        if self.runners.is_empty() || records.is_empty() {
            return Vec::new();
        }

        let tasks = records.iter().map(|record| {
            let workers = self.workers.clone();
            async move {
                let _permit = match workers.acquire().await {
                    Ok(permit) => permit,
                    Err(_) => return Vec::new(),
                };
                if self.cancel.is_cancelled() {
                    return Vec::new();
                }

                let calls = self
                    .runners
                    .iter()
                    .map(|runner| runner.discover(&record.name, record.country.as_deref()));
                join_all(calls)
                    .await
                    .into_iter()
                    .flatten()
                    .collect::<Vec<_>>()
            }
        });

        join_all(tasks).await.into_iter().flatten().collect()
    }
}

fn counts_by_source(edges: &[OwnershipEdge]) -> HashMap<String, usize> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for edge in edges {
        *counts.entry(edge.source.as_str().to_string()).or_default() += 1;
    }
    counts
}
