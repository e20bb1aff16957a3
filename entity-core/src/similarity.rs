//! Fuzzy name similarity
//!
//! Thin wrapper over normalized Levenshtein so callers share one
//! definition of "how alike are these names".

/// Case-insensitive normalized Levenshtein similarity in [0.0, 1.0].
///
/// 1.0 means the lowercased strings are identical (two empty strings
/// included), 0.0 means no character in common at any position.
pub fn similarity(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(&a.to_lowercase(), &b.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_names_score_one() {
        assert_eq!(similarity("Acme", "Acme"), 1.0);
        assert_eq!(similarity("ACME", "acme"), 1.0);
    }

    #[test]
    fn empty_strings_score_one() {
        assert_eq!(similarity("", ""), 1.0);
    }

    #[test]
    fn disjoint_names_score_low() {
        assert!(similarity("Acme", "Zenith") < 0.35);
    }

    #[test]
    fn single_typo_scores_high() {
        // One insertion over six characters
        let s = similarity("Dahua", "Dahuaa");
        assert!(s > 0.8, "got {s}");
    }
}
