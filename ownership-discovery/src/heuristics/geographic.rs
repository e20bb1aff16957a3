//! Geographic clustering discoverer
//!
//! Companies registered in the same city with noticeably similar names
//! are often related parties hiding behind small name variations. This
//! signal is weak on its own, so confidence scales with similarity and
//! is capped well below the registry-backed sources.

use std::collections::BTreeMap;

use entity_core::{similarity, CompanyRecord, EdgeSource, OwnershipEdge, RelationshipType};

use crate::config::HeuristicConfig;

/// Bucket records by registration city (first comma-separated token of
/// the address) and link name-similar pairs within each bucket.
///
/// Similarity must exceed the floor and stay below 1.0; identical names
/// are one entity, not two affiliates. The shorter name goes on the
/// parent side. Confidence is `base + similarity * scale`, capped.
pub fn discover_geo_clusters(
    records: &[CompanyRecord],
    config: &HeuristicConfig,
) -> Vec<OwnershipEdge> {
    let mut buckets: BTreeMap<String, Vec<&CompanyRecord>> = BTreeMap::new();
    for record in records {
        let Some(address) = &record.address else {
            continue;
        };
        let city = address.split(',').next().unwrap_or("").trim().to_lowercase();
        if city.is_empty() {
            continue;
        }
        buckets.entry(city).or_default().push(record);
    }

    let mut edges = Vec::new();
    for (city, members) in &buckets {
        if members.len() < 2 {
            continue;
        }

        for i in 0..members.len() {
            for j in (i + 1)..members.len() {
                let s = similarity(&members[i].name, &members[j].name);
                if s <= config.geo_similarity_floor || s >= 1.0 {
                    continue;
                }

                let (parent, child) = order_pair(members[i], members[j]);
                let confidence =
                    (config.geo_confidence_base + s * config.geo_confidence_scale)
                        .min(config.geo_confidence_cap);

                let edge = OwnershipEdge::new(
                    parent.name.clone(),
                    child.name.clone(),
                    RelationshipType::Affiliate,
                    confidence,
                    EdgeSource::GeoCluster,
                )
                .with_evidence(format!(
                    "similar names registered in {city} (similarity {s:.2})"
                ));

                if !edge.is_self_loop() {
                    edges.push(edge);
                }
            }
        }
    }

    edges
}

/// Shorter name first; ties break lexicographically
fn order_pair<'a>(
    a: &'a CompanyRecord,
    b: &'a CompanyRecord,
) -> (&'a CompanyRecord, &'a CompanyRecord) {
    if (a.name.len(), &a.name) <= (b.name.len(), &b.name) {
        (a, b)
    } else {
        (b, a)
    }
}
