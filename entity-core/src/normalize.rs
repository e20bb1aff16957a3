//! Name normalization
//!
//! Company names arrive with inconsistent casing, spacing, punctuation,
//! and legal decoration ("Co., Ltd.", "GmbH", "Holdings"). Everything
//! that compares names across records goes through these functions.

/// Single-word legal and generic corporate suffixes, lowercase.
/// Stripped from the right of a name until a non-suffix word remains.
const LEGAL_SUFFIXES: &[&str] = &[
    "ltd",
    "limited",
    "inc",
    "incorporated",
    "corp",
    "corporation",
    "llc",
    "gmbh",
    "ag",
    "sa",
    "bv",
    "nv",
    "plc",
    "pte",
    "pty",
    "co",
    "company",
    "kk",
    "technologies",
    "technology",
    "tech",
    "group",
    "holdings",
    "holding",
    "industries",
    "international",
    "enterprises",
    "enterprise",
    "solutions",
    "subsidiary",
    "division",
    "branch",
];

/// Collapse whitespace runs to single spaces and lowercase the result.
///
/// This is the canonical map key for entity names: two names with the
/// same `normalize_key` are treated as the same entity.
pub fn normalize_key(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Remove legal-form and generic corporate suffixes from the right of
/// a name. Casing and interior spacing of the kept words survive.
///
/// "Huawei Technologies Co., Ltd." becomes "Huawei". A name made
/// entirely of suffix words is returned unchanged rather than emptied.
pub fn strip_legal_suffixes(name: &str) -> String {
    let mut words: Vec<&str> = name.split_whitespace().collect();

    while let Some(last) = words.last() {
        let bare = last.trim_end_matches(['.', ',', ';']);
        if bare.is_empty() || LEGAL_SUFFIXES.contains(&bare.to_lowercase().as_str()) {
            words.pop();
        } else {
            break;
        }
    }

    if words.is_empty() {
        return name.trim().to_string();
    }

    words
        .join(" ")
        .trim_end_matches(['.', ','])
        .trim_end()
        .to_string()
}

/// Canonical comparison form: suffixes stripped, then normalized.
///
/// Two companies share a corporate base name exactly when their
/// `base_name`s are equal.
pub fn base_name(name: &str) -> String {
    normalize_key(&strip_legal_suffixes(name))
}
