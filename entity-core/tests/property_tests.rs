//! Property-based tests for normalization and similarity invariants
//!
//! These tests use proptest to verify:
//! - Similarity is symmetric, bounded, and 1.0 on identical input
//! - base_name and normalize_key are idempotent
//! - Suffix decoration never changes a base name
//! - Edge confidence is always clamped into [0.0, 1.0]

use entity_core::{
    base_name, normalize_key, similarity, strip_legal_suffixes, EdgeSource, OwnershipEdge,
    RelationshipType,
};
use proptest::prelude::*;

/// Strategy for plausible company-name fragments (ASCII, spaces, light punctuation)
fn name_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9 .,&'-]{0,30}"
}

/// Strategy for a single word that carries no legal-suffix meaning.
/// Probing with a prefix sidesteps the all-suffix fallback path.
fn bare_word_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z]{3,12}".prop_filter("word must not act as a suffix", |w| {
        let probed = format!("probe {w}");
        strip_legal_suffixes(&probed) == probed
    })
}

/// Strategy for one legal-suffix decoration
fn suffix_strategy() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("Ltd."),
        Just("Limited"),
        Just("Inc."),
        Just("Corp"),
        Just("LLC"),
        Just("GmbH"),
        Just("Co., Ltd."),
        Just("Holdings"),
        Just("Technologies"),
        Just("Group"),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: similarity is symmetric
    #[test]
    fn prop_similarity_symmetric(a in name_strategy(), b in name_strategy()) {
        let ab = similarity(&a, &b);
        let ba = similarity(&b, &a);
        prop_assert!((ab - ba).abs() < 1e-12, "similarity({a:?},{b:?}) = {ab} vs {ba}");
    }

    /// Property: similarity stays in [0.0, 1.0]
    #[test]
    fn prop_similarity_bounded(a in name_strategy(), b in name_strategy()) {
        let s = similarity(&a, &b);
        prop_assert!((0.0..=1.0).contains(&s), "similarity({a:?},{b:?}) = {s}");
    }

    /// Property: a name is fully similar to itself, regardless of case
    #[test]
    fn prop_similarity_identity(a in name_strategy()) {
        prop_assert_eq!(similarity(&a, &a), 1.0);
        prop_assert_eq!(similarity(&a.to_uppercase(), &a.to_lowercase()), 1.0);
    }

    /// Property: normalize_key is idempotent
    #[test]
    fn prop_normalize_idempotent(a in name_strategy()) {
        let once = normalize_key(&a);
        prop_assert_eq!(normalize_key(&once), once.clone());
    }

    /// Property: base_name is idempotent
    #[test]
    fn prop_base_name_idempotent(a in name_strategy()) {
        let once = base_name(&a);
        prop_assert_eq!(base_name(&once), once.clone());
    }

    /// Property: decorating a bare name with legal suffixes does not
    /// change its base name
    #[test]
    fn prop_suffixes_do_not_change_base(
        word in bare_word_strategy(),
        suffix in suffix_strategy(),
    ) {
        let decorated = format!("{word} {suffix}");
        prop_assert_eq!(base_name(&decorated), base_name(&word));
    }

    /// Property: edge confidence is always clamped into [0.0, 1.0]
    #[test]
    fn prop_edge_confidence_clamped(c in -10.0f64..10.0f64) {
        let e = OwnershipEdge::new("A", "B", RelationshipType::Parent, c, EdgeSource::Pattern);
        prop_assert!((0.0..=1.0).contains(&e.confidence));
    }

    /// Property: dedup_key is invariant under casing and extra spacing
    #[test]
    fn prop_dedup_key_normalized(a in bare_word_strategy(), b in bare_word_strategy()) {
        let plain = OwnershipEdge::new(
            a.clone(), b.clone(), RelationshipType::Parent, 0.5, EdgeSource::Registry,
        );
        let noisy = OwnershipEdge::new(
            format!("  {}  ", a.to_uppercase()),
            format!("{} ", b.to_lowercase()),
            RelationshipType::Affiliate,
            0.9,
            EdgeSource::Filings,
        );
        prop_assert_eq!(plain.dedup_key(), noisy.dedup_key());
    }
}
