//! TradeSentry Ownership Discovery
//!
//! Builds the corporate ownership graph: offline heuristics over known
//! company records plus live connectors to registries, knowledge graphs,
//! encyclopedias, and filings. Everything funnels through the aggregator
//! into a deduplicated edge set the graph store can install.

pub mod aggregate;
pub mod config;
pub mod connectors;
pub mod error;
pub mod heuristics;
pub mod metrics;
pub mod pipeline;

pub use aggregate::aggregate_edges;
pub use config::{ConnectorsConfig, DiscoveryConfig, HeuristicConfig, PipelineConfig, ProviderConfig};
pub use connectors::{ConnectorError, ConnectorResult, ConnectorRunner, Provider, SourceConnector};
pub use error::{Error, Result};
pub use metrics::DiscoveryMetrics;
pub use pipeline::{CancellationFlag, DiscoveryPipeline};
