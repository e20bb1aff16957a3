//! Property-based tests for snapshot traversal invariants
//!
//! These tests use proptest to verify:
//! - Walks respect the depth bound and never revisit an entity
//! - Path confidence stays in (0.0, 1.0] and via matches depth
//! - The start entity is never reported, even through cycles

use entity_core::{normalize_key, EdgeSource, OwnershipEdge, RelationshipType};
use graph_store::OwnershipGraphSnapshot;
use proptest::prelude::*;
use std::collections::HashSet;

const NAMES: [&str; 8] = [
    "Alpha", "Beta", "Gamma", "Delta", "Epsilon", "Zeta", "Eta", "Theta",
];

/// Strategy for edges over a small closed name pool, dense enough to
/// produce shared nodes and cycles
fn edge_strategy() -> impl Strategy<Value = OwnershipEdge> {
    (0usize..NAMES.len(), 0usize..NAMES.len(), 0.1f64..1.0f64).prop_map(|(p, s, c)| {
        OwnershipEdge::new(
            NAMES[p],
            NAMES[s],
            RelationshipType::Subsidiary,
            c,
            EdgeSource::Registry,
        )
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: every hit respects the depth bound and carries a
    /// consistent path
    #[test]
    fn prop_walk_hits_are_well_formed(
        edges in prop::collection::vec(edge_strategy(), 0..30),
        max_depth in 0usize..5,
    ) {
        let snapshot = OwnershipGraphSnapshot::from_edges(edges);
        for hit in snapshot.walk("Alpha", max_depth) {
            prop_assert!(hit.depth >= 1);
            prop_assert!(hit.depth <= max_depth);
            prop_assert!(hit.path_confidence > 0.0 && hit.path_confidence <= 1.0);
            prop_assert_eq!(hit.via.len(), hit.depth);
            prop_assert_eq!(hit.via.last().map(String::as_str), Some(hit.name.as_str()));
        }
    }

    /// Property: no entity is reported twice, and the start never is
    #[test]
    fn prop_walk_visits_each_entity_once(
        edges in prop::collection::vec(edge_strategy(), 0..30),
        max_depth in 0usize..6,
    ) {
        let snapshot = OwnershipGraphSnapshot::from_edges(edges);
        let hits = snapshot.walk("Alpha", max_depth);

        let mut seen = HashSet::new();
        for hit in &hits {
            let key = normalize_key(&hit.name);
            prop_assert!(key != "alpha", "start entity reported at depth {}", hit.depth);
            prop_assert!(seen.insert(key), "entity {} reported twice", hit.name);
        }
    }

    /// Property: snapshots never retain self-loops
    #[test]
    fn prop_no_self_loops_survive(edges in prop::collection::vec(edge_strategy(), 0..30)) {
        let snapshot = OwnershipGraphSnapshot::from_edges(edges);
        for edge in snapshot.edges() {
            prop_assert!(!edge.is_self_loop());
        }
    }

    /// Property: depth zero walks are always empty
    #[test]
    fn prop_depth_zero_is_empty(edges in prop::collection::vec(edge_strategy(), 0..30)) {
        let snapshot = OwnershipGraphSnapshot::from_edges(edges);
        prop_assert!(snapshot.walk("Alpha", 0).is_empty());
    }
}
