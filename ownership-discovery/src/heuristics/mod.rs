//! Offline relationship heuristics
//!
//! Each discoverer scans the known company records and proposes
//! ownership edges with a confidence reflecting how often its signal
//! turns out to be real. Heuristic edges are cheap, so they run before
//! any connector traffic; the aggregator reconciles the overlap.

mod city_code;
mod decomposition;
mod geographic;
mod pattern;

pub use city_code::discover_city_codes;
pub use decomposition::discover_decompositions;
pub use geographic::discover_geo_clusters;
pub use pattern::discover_patterns;

use entity_core::{CompanyRecord, OwnershipEdge};

use crate::config::HeuristicConfig;

/// Run every heuristic over the records and concatenate their edges.
/// No deduplication happens here; that is the aggregator's job.
pub fn run_all(records: &[CompanyRecord], config: &HeuristicConfig) -> Vec<OwnershipEdge> {
    let mut edges = Vec::new();
    edges.extend(discover_patterns(records, config));
    edges.extend(discover_decompositions(records, config));
    edges.extend(discover_geo_clusters(records, config));
    edges.extend(discover_city_codes(records, config));
    edges
}
