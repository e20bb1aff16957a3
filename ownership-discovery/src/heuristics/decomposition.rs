//! Name decomposition discoverer
//!
//! Strips legal suffixes and groups records by the base name that
//! remains. "Acme Ltd.", "Acme Technologies Inc.", and "Acme Holdings"
//! share the base "acme" and are very likely one corporate family.

use std::collections::BTreeMap;

use entity_core::{
    base_name, normalize_key, similarity, CompanyRecord, EdgeSource, OwnershipEdge,
    RelationshipType,
};

use crate::config::HeuristicConfig;

/// Group records by base name and link each group member to the
/// member with the shortest full name, which is taken as the one
/// closest to the group root.
///
/// Members whose full names are near-duplicates of the chosen parent
/// are treated as the same entity and skipped. Groups are visited in
/// base-name order so output is deterministic for a given input.
pub fn discover_decompositions(
    records: &[CompanyRecord],
    config: &HeuristicConfig,
) -> Vec<OwnershipEdge> {
    let mut groups: BTreeMap<String, Vec<&CompanyRecord>> = BTreeMap::new();
    for record in records {
        let base = base_name(&record.name);
        if base.is_empty() {
            continue;
        }
        groups.entry(base).or_default().push(record);
    }

    let mut edges = Vec::new();
    for (base, members) in &groups {
        if members.len() < 2 {
            continue;
        }

        let Some(parent) = members.iter().min_by(|a, b| {
            a.name
                .len()
                .cmp(&b.name.len())
                .then_with(|| a.name.cmp(&b.name))
        }) else {
            continue;
        };

        for member in members {
            if normalize_key(&member.name) == normalize_key(&parent.name) {
                continue;
            }
            if similarity(&parent.name, &member.name) > config.near_duplicate_threshold {
                continue;
            }

            edges.push(
                OwnershipEdge::new(
                    parent.name.clone(),
                    member.name.clone(),
                    RelationshipType::Subsidiary,
                    config.decomposition_confidence,
                    EdgeSource::NameDecomposition,
                )
                .with_evidence(format!("shared base name \"{base}\"")),
            );
        }
    }

    edges
}
