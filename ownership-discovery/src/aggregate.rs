//! Edge aggregation
//!
//! Heuristics and connectors overlap on purpose; several weak signals
//! about the same pair are how confidence is earned. The aggregator
//! keeps one edge per (parent, subsidiary) pair, the most confident
//! one, and folds the evidence of the rest into it.

use std::cmp::Ordering;
use std::collections::HashMap;

use entity_core::OwnershipEdge;

/// Deduplicate edges by normalized (parent, subsidiary) pair.
///
/// Self-loops are dropped. A stable sort ranks edges by confidence, so
/// the survivor of each pair is the most confident claim; duplicates
/// donate any evidence lines the survivor lacks. Running the function
/// on its own output changes nothing.
pub fn aggregate_edges(edges: Vec<OwnershipEdge>) -> Vec<OwnershipEdge> {
    let mut edges: Vec<OwnershipEdge> = edges.into_iter().filter(|e| !e.is_self_loop()).collect();
    edges.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(Ordering::Equal)
    });

    let mut index: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<OwnershipEdge> = Vec::with_capacity(edges.len());

    for edge in edges {
        let key = edge.dedup_key();
        match index.get(&key) {
            Some(&i) => {
                let survivor = &mut out[i];
                for line in edge.evidence {
                    if !survivor.evidence.contains(&line) {
                        survivor.evidence.push(line);
                    }
                }
            }
            None => {
                index.insert(key, out.len());
                out.push(edge);
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use entity_core::{EdgeSource, RelationshipType};

    fn edge(parent: &str, subsidiary: &str, confidence: f64, source: EdgeSource) -> OwnershipEdge {
        OwnershipEdge::new(
            parent,
            subsidiary,
            RelationshipType::Subsidiary,
            confidence,
            source,
        )
    }

    #[test]
    fn highest_confidence_claim_survives() {
        let merged = aggregate_edges(vec![
            edge("Huawei", "Shanghai Huawei Device", 0.75, EdgeSource::CityCode),
            edge("Huawei", "Shanghai Huawei Device", 0.90, EdgeSource::Registry),
            edge("Huawei", "Shanghai Huawei Device", 0.85, EdgeSource::Pattern),
        ]);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].confidence, 0.90);
        assert_eq!(merged[0].source, EdgeSource::Registry);
    }

    #[test]
    fn duplicates_donate_their_evidence() {
        let merged = aggregate_edges(vec![
            edge("Huawei", "SH Huawei Trading", 0.85, EdgeSource::Pattern)
                .with_evidence("name contains corporate group root \"Huawei\""),
            edge("Huawei", "SH Huawei Trading", 0.75, EdgeSource::CityCode)
                .with_evidence("city code \"SH\" (Shanghai) prefixes group root \"Huawei\""),
        ]);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].confidence, 0.85);
        assert_eq!(merged[0].evidence.len(), 2);
    }

    #[test]
    fn repeated_evidence_lines_are_not_duplicated() {
        let merged = aggregate_edges(vec![
            edge("A", "B", 0.9, EdgeSource::Registry).with_evidence("same line"),
            edge("A", "B", 0.8, EdgeSource::Filings).with_evidence("same line"),
        ]);
        assert_eq!(merged[0].evidence, vec!["same line".to_string()]);
    }

    #[test]
    fn self_loops_are_dropped() {
        let merged = aggregate_edges(vec![
            edge("Acme", "ACME", 0.9, EdgeSource::Registry),
            edge("Acme", "Acme Europe", 0.8, EdgeSource::Registry),
        ]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].subsidiary, "Acme Europe");
    }

    #[test]
    fn direction_distinguishes_pairs() {
        let merged = aggregate_edges(vec![
            edge("A", "B", 0.9, EdgeSource::Registry),
            edge("B", "A", 0.8, EdgeSource::Filings),
        ]);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn aggregation_is_idempotent() {
        let once = aggregate_edges(vec![
            edge("Huawei", "HiSilicon", 0.9, EdgeSource::Registry).with_evidence("a"),
            edge("Huawei", "HiSilicon", 0.7, EdgeSource::NameDecomposition).with_evidence("b"),
            edge("Dahua", "SZ Dahua Security", 0.75, EdgeSource::CityCode),
        ]);
        let twice = aggregate_edges(once.clone());

        assert_eq!(once.len(), twice.len());
        for (a, b) in once.iter().zip(twice.iter()) {
            assert_eq!(a, b);
        }
    }
}
