//! City-code prefix discoverer
//!
//! Regional subsidiaries are frequently registered under a city
//! abbreviation plus the group name: "SZ Dahua Security Equipment" is
//! the Shenzhen arm of Dahua. The code must stand alone as the first
//! word; "Shine Huawei" must not match "SH".

use entity_core::{CompanyRecord, EdgeSource, OwnershipEdge, RelationshipType};

use super::pattern::CORPORATE_GROUP_ROOTS;
use crate::config::HeuristicConfig;

/// City abbreviations seen in registration data, lowercase
const CITY_CODES: &[(&str, &str)] = &[
    ("sh", "Shanghai"),
    ("sz", "Shenzhen"),
    ("bj", "Beijing"),
    ("gz", "Guangzhou"),
    ("cd", "Chengdu"),
    ("hz", "Hangzhou"),
    ("nj", "Nanjing"),
    ("tj", "Tianjin"),
    ("wh", "Wuhan"),
    ("cq", "Chongqing"),
    ("xa", "Xi'an"),
    ("hk", "Hong Kong"),
    ("msk", "Moscow"),
    ("spb", "St Petersburg"),
    ("sg", "Singapore"),
    ("dxb", "Dubai"),
    ("bom", "Mumbai"),
    ("blr", "Bengaluru"),
];

/// Emit a subsidiary edge for every record whose name starts with a
/// city code followed by a known group root.
pub fn discover_city_codes(
    records: &[CompanyRecord],
    config: &HeuristicConfig,
) -> Vec<OwnershipEdge> {
    let mut edges = Vec::new();

    for record in records {
        let name_lower = record.name.to_lowercase();

        for &(code, city) in CITY_CODES {
            let Some(rest) = name_lower.strip_prefix(code) else {
                continue;
            };
            let Some(rest) = rest.strip_prefix(' ') else {
                continue;
            };

            for root in CORPORATE_GROUP_ROOTS {
                if rest.contains(&root.to_lowercase()) {
                    edges.push(
                        OwnershipEdge::new(
                            *root,
                            record.name.clone(),
                            RelationshipType::Subsidiary,
                            config.city_code_confidence,
                            EdgeSource::CityCode,
                        )
                        .with_evidence(format!(
                            "city code \"{}\" ({city}) prefixes group root \"{root}\"",
                            code.to_uppercase()
                        )),
                    );
                }
            }

            // The space requirement means at most one code can match
            break;
        }
    }

    edges
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> CompanyRecord {
        CompanyRecord::new(name)
    }

    #[test]
    fn code_plus_root_yields_subsidiary_edge() {
        let records = vec![record("SZ Dahua Security Equipment")];
        let edges = discover_city_codes(&records, &HeuristicConfig::default());

        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].parent, "Dahua");
        assert_eq!(edges[0].subsidiary, "SZ Dahua Security Equipment");
        assert_eq!(edges[0].confidence, 0.75);
        assert_eq!(edges[0].source, EdgeSource::CityCode);
        assert!(edges[0].evidence[0].contains("Shenzhen"));
    }

    #[test]
    fn code_must_be_a_standalone_word() {
        // "Shine" starts with "sh" but is not a city-code prefix
        let records = vec![record("Shine Huawei Trading")];
        assert!(discover_city_codes(&records, &HeuristicConfig::default()).is_empty());
    }

    #[test]
    fn code_without_known_root_produces_nothing() {
        let records = vec![record("SH Golden Harvest Foods")];
        assert!(discover_city_codes(&records, &HeuristicConfig::default()).is_empty());
    }

    #[test]
    fn prefix_match_is_case_insensitive() {
        let records = vec![record("sh huawei device factory")];
        let edges = discover_city_codes(&records, &HeuristicConfig::default());
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].parent, "Huawei");
    }

    #[test]
    fn root_in_name_without_code_is_left_to_pattern_discoverer() {
        let records = vec![record("Huawei Device Co., Ltd.")];
        assert!(discover_city_codes(&records, &HeuristicConfig::default()).is_empty());
    }
}
