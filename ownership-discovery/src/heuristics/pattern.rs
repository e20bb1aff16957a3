//! Corporate-group pattern discoverer
//!
//! A company whose name embeds a known group root ("Shanghai Huawei
//! Device Co., Ltd.") is almost always a unit of that group. The root
//! list is curated, not exhaustive; connectors cover the long tail.

use entity_core::{
    base_name, normalize_key, CompanyRecord, EdgeSource, OwnershipEdge, RelationshipType,
};

use crate::config::HeuristicConfig;

/// Well-known corporate group roots matched inside company names.
/// Display casing is what goes on the parent side of emitted edges.
pub(super) const CORPORATE_GROUP_ROOTS: &[&str] = &[
    "Huawei",
    "ZTE",
    "Hikvision",
    "Dahua",
    "SMIC",
    "Inspur",
    "Sugon",
    "Tencent",
    "Alibaba",
    "Xiaomi",
    "Lenovo",
    "Haier",
    "BYD",
    "CATL",
    "Sinopec",
    "CNOOC",
    "COSCO",
    "CRRC",
    "AVIC",
    "CETC",
    "Norinco",
    "Samsung",
    "Hyundai",
    "Mitsubishi",
    "Sumitomo",
    "Hitachi",
    "Toshiba",
    "Siemens",
    "Bosch",
    "Rosatom",
    "Gazprom",
    "Rostec",
    "Kaspersky",
    "Tata",
    "Reliance",
];

/// Emit a subsidiary edge for every record whose name contains a known
/// group root. A record whose base name IS the root is the group
/// itself and produces nothing.
pub fn discover_patterns(
    records: &[CompanyRecord],
    config: &HeuristicConfig,
) -> Vec<OwnershipEdge> {
    let mut edges = Vec::new();

    for record in records {
        let name_lower = record.name.to_lowercase();
        let base = base_name(&record.name);

        for root in CORPORATE_GROUP_ROOTS {
            if !name_lower.contains(&root.to_lowercase()) {
                continue;
            }
            if base == normalize_key(root) {
                continue;
            }

            edges.push(
                OwnershipEdge::new(
                    *root,
                    record.name.clone(),
                    RelationshipType::Subsidiary,
                    config.pattern_confidence,
                    EdgeSource::Pattern,
                )
                .with_evidence(format!("name contains corporate group root \"{root}\"")),
            );
        }
    }

    edges
}
