//! Immutable ownership-graph snapshot with bounded traversal

use std::collections::{HashMap, HashSet, VecDeque};

use entity_core::{normalize_key, OwnershipEdge};

/// One entity reached while walking the graph from a start node
#[derive(Debug, Clone)]
pub struct TraversalHit {
    /// Display name as stored on the connecting edge
    pub name: String,

    /// Hops from the start node
    pub depth: usize,

    /// Product of edge confidences along the path taken
    pub path_confidence: f64,

    /// Display names from the first hop to this entity inclusive
    pub via: Vec<String>,
}

/// A fully built, read-only view of the ownership graph.
///
/// Adjacency is indexed both ways so walks can move from parents to
/// subsidiaries and back. Keys are normalized names; a rebuilt snapshot
/// replaces the whole structure rather than mutating it.
#[derive(Debug)]
pub struct OwnershipGraphSnapshot {
    edges: Vec<OwnershipEdge>,
    forward: HashMap<String, Vec<usize>>,
    inverse: HashMap<String, Vec<usize>>,
    node_count: usize,
}

struct Cursor {
    key: String,
    depth: usize,
    confidence: f64,
    via: Vec<String>,
}

impl OwnershipGraphSnapshot {
    /// Build a snapshot from discovered edges. Self-loops are dropped.
    pub fn from_edges(edges: Vec<OwnershipEdge>) -> Self {
        let edges: Vec<OwnershipEdge> = edges.into_iter().filter(|e| !e.is_self_loop()).collect();

        let mut forward: HashMap<String, Vec<usize>> = HashMap::new();
        let mut inverse: HashMap<String, Vec<usize>> = HashMap::new();
        let mut nodes: HashSet<String> = HashSet::new();

        for (idx, edge) in edges.iter().enumerate() {
            let parent_key = normalize_key(&edge.parent);
            let subsidiary_key = normalize_key(&edge.subsidiary);
            forward.entry(parent_key.clone()).or_default().push(idx);
            inverse.entry(subsidiary_key.clone()).or_default().push(idx);
            nodes.insert(parent_key);
            nodes.insert(subsidiary_key);
        }

        Self {
            edges,
            forward,
            inverse,
            node_count: nodes.len(),
        }
    }

    /// Snapshot with no edges
    pub fn empty() -> Self {
        Self::from_edges(Vec::new())
    }

    /// Number of edges
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// True when no edges are present
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Number of distinct entities
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// All edges in insertion order
    pub fn edges(&self) -> &[OwnershipEdge] {
        &self.edges
    }

    /// True when the entity appears on any edge
    pub fn contains(&self, name: &str) -> bool {
        let key = normalize_key(name);
        self.forward.contains_key(&key) || self.inverse.contains_key(&key)
    }

    /// Walk up to `max_depth` hops from `start`, following ownership in
    /// both directions, and report every entity reached.
    ///
    /// A shared visited set bounds the walk on cyclic data: each entity
    /// is reported once, at the depth it was first reached (BFS order,
    /// so the fewest hops). `path_confidence` is the product of edge
    /// confidences along that first path. The start entity itself is
    /// not reported.
    pub fn walk(&self, start: &str, max_depth: usize) -> Vec<TraversalHit> {
        let start_key = normalize_key(start);
        let mut hits = Vec::new();
        if max_depth == 0 {
            return hits;
        }

        let mut visited: HashSet<String> = HashSet::new();
        visited.insert(start_key.clone());

        let mut queue: VecDeque<Cursor> = VecDeque::new();
        queue.push_back(Cursor {
            key: start_key,
            depth: 0,
            confidence: 1.0,
            via: Vec::new(),
        });

        while let Some(current) = queue.pop_front() {
            if current.depth == max_depth {
                continue;
            }

            for (display, edge_confidence) in self.neighbors(&current.key) {
                let key = normalize_key(&display);
                if !visited.insert(key.clone()) {
                    continue;
                }

                let mut via = current.via.clone();
                via.push(display.clone());
                let depth = current.depth + 1;
                let path_confidence = current.confidence * edge_confidence;

                hits.push(TraversalHit {
                    name: display,
                    depth,
                    path_confidence,
                    via: via.clone(),
                });
                queue.push_back(Cursor {
                    key,
                    depth,
                    confidence: path_confidence,
                    via,
                });
            }
        }

        hits
    }

    /// Neighbors of a node in both directions: subsidiaries via forward
    /// edges, parents via inverse edges.
    fn neighbors(&self, key: &str) -> Vec<(String, f64)> {
        let mut out = Vec::new();
        if let Some(indices) = self.forward.get(key) {
            for &idx in indices {
                let edge = &self.edges[idx];
                out.push((edge.subsidiary.clone(), edge.confidence));
            }
        }
        if let Some(indices) = self.inverse.get(key) {
            for &idx in indices {
                let edge = &self.edges[idx];
                out.push((edge.parent.clone(), edge.confidence));
            }
        }
        out
    }
}

impl Default for OwnershipGraphSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use entity_core::{EdgeSource, RelationshipType};

    fn edge(parent: &str, subsidiary: &str, confidence: f64) -> OwnershipEdge {
        OwnershipEdge::new(
            parent,
            subsidiary,
            RelationshipType::Subsidiary,
            confidence,
            EdgeSource::Registry,
        )
    }

    fn edge_default(parent: &str, subsidiary: &str) -> OwnershipEdge {
        edge(parent, subsidiary, 0.9)
    }

    #[test]
    fn builds_adjacency_both_ways() {
        let snapshot = OwnershipGraphSnapshot::from_edges(vec![
            edge("Huawei", "Shanghai Huawei Device", 0.9),
            edge("Huawei", "HiSilicon", 0.95),
        ]);
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.node_count(), 3);
        assert!(snapshot.contains("huawei"));
        assert!(snapshot.contains("HISILICON"));
        assert!(!snapshot.contains("Unrelated"));
    }

    #[test]
    fn self_loops_are_dropped() {
        let snapshot = OwnershipGraphSnapshot::from_edges(vec![
            edge("Acme", "ACME  ", 0.9),
            edge("Acme", "Acme Europe", 0.8),
        ]);
        assert_eq!(snapshot.len(), 1);
    }

    #[test]
    fn walk_reports_depth_and_confidence() {
        let snapshot = OwnershipGraphSnapshot::from_edges(vec![
            edge("Root", "Mid", 0.9),
            edge("Mid", "Leaf", 0.8),
        ]);

        let hits = snapshot.walk("Root", 3);
        assert_eq!(hits.len(), 2);

        let mid = hits.iter().find(|h| h.name == "Mid").unwrap();
        assert_eq!(mid.depth, 1);
        assert!((mid.path_confidence - 0.9).abs() < 1e-12);
        assert_eq!(mid.via, vec!["Mid".to_string()]);

        let leaf = hits.iter().find(|h| h.name == "Leaf").unwrap();
        assert_eq!(leaf.depth, 2);
        assert!((leaf.path_confidence - 0.72).abs() < 1e-12);
        assert_eq!(leaf.via, vec!["Mid".to_string(), "Leaf".to_string()]);
    }

    #[test]
    fn walk_goes_upward_too() {
        let snapshot = OwnershipGraphSnapshot::from_edges(vec![edge("Parent", "Child", 0.9)]);
        let hits = snapshot.walk("Child", 1);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Parent");
    }

    #[test]
    fn walk_reaches_siblings_through_common_parent() {
        let snapshot = OwnershipGraphSnapshot::from_edges(vec![
            edge("Parent", "A", 0.9),
            edge("Parent", "B", 0.8),
        ]);
        let hits = snapshot.walk("A", 2);
        let sibling = hits.iter().find(|h| h.name == "B").unwrap();
        assert_eq!(sibling.depth, 2);
        assert!((sibling.path_confidence - 0.72).abs() < 1e-12);
    }

    #[test]
    fn walk_respects_max_depth() {
        let snapshot = OwnershipGraphSnapshot::from_edges(vec![
            edge_default("A", "B"),
            edge_default("B", "C"),
            edge_default("C", "D"),
        ]);
        let hits = snapshot.walk("A", 2);
        assert!(hits.iter().any(|h| h.name == "C"));
        assert!(!hits.iter().any(|h| h.name == "D"));
    }

    #[test]
    fn walk_terminates_on_cycles() {
        let snapshot = OwnershipGraphSnapshot::from_edges(vec![
            edge_default("A", "B"),
            edge_default("B", "C"),
            edge_default("C", "A"),
        ]);
        let hits = snapshot.walk("A", 10);
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn walk_from_unknown_entity_is_empty() {
        let snapshot = OwnershipGraphSnapshot::from_edges(vec![edge_default("A", "B")]);
        assert!(snapshot.walk("Nobody", 3).is_empty());
    }

    #[test]
    fn start_entity_is_not_reported() {
        let snapshot = OwnershipGraphSnapshot::from_edges(vec![
            edge_default("A", "B"),
            edge_default("B", "A2"),
        ]);
        let hits = snapshot.walk("A", 5);
        assert!(!hits.iter().any(|h| normalize_key(&h.name) == "a"));
    }
}
