use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use entity_core::{base_name, similarity};

use crate::types::{MatchType, RestrictedPartyEntry};

/// A restricted party implicated by name matching
#[derive(Debug, Clone, PartialEq)]
pub struct NameMatch {
    pub entry_index: usize,
    pub matched_entity: String,
    pub match_type: MatchType,
    pub confidence: f64,
}

/// Immutable matching index built once per feed load
pub struct IndexedList {
    entries: Vec<RestrictedPartyEntry>,
    // base-name key -> entries listing it as primary name or alias
    exact: DashMap<String, Vec<usize>>,
    // per-entry keys for fuzzy comparison
    keys: Vec<Vec<String>>,
    loaded_at: DateTime<Utc>,
}

impl IndexedList {
    fn build(entries: Vec<RestrictedPartyEntry>) -> Self {
        let exact: DashMap<String, Vec<usize>> = DashMap::new();
        let mut keys = Vec::with_capacity(entries.len());

        for (idx, entry) in entries.iter().enumerate() {
            let mut entry_keys: Vec<String> = Vec::with_capacity(1 + entry.aliases.len());
            for name in std::iter::once(&entry.name).chain(entry.aliases.iter()) {
                let key = base_name(name);
                if key.is_empty() || entry_keys.contains(&key) {
                    continue;
                }
                exact.entry(key.clone()).or_default().push(idx);
                entry_keys.push(key);
            }
            keys.push(entry_keys);
        }

        Self {
            entries,
            exact,
            keys,
            loaded_at: Utc::now(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn entry(&self, index: usize) -> Option<&RestrictedPartyEntry> {
        self.entries.get(index)
    }

    /// Match a base-name key against the list.
    ///
    /// An exact key hit scores 1.0. Entries without an exact hit are
    /// compared fuzzily against every precomputed key; the best similarity
    /// at or above `fuzzy_threshold` scores as a fuzzy match.
    pub fn match_name(&self, normalized_query: &str, fuzzy_threshold: f64) -> Vec<NameMatch> {
        let mut matches = Vec::new();
        let mut exact_hits = HashSet::new();

        if let Some(indexes) = self.exact.get(normalized_query) {
            for &idx in indexes.iter() {
                if exact_hits.insert(idx) {
                    matches.push(NameMatch {
                        entry_index: idx,
                        matched_entity: self.entries[idx].name.clone(),
                        match_type: MatchType::Exact,
                        confidence: 1.0,
                    });
                }
            }
        }

        for (idx, entry_keys) in self.keys.iter().enumerate() {
            if exact_hits.contains(&idx) {
                continue;
            }
            let best = entry_keys
                .iter()
                .map(|key| similarity(normalized_query, key))
                .fold(0.0_f64, f64::max);
            if best >= fuzzy_threshold {
                debug!(
                    query = normalized_query,
                    entity = %self.entries[idx].name,
                    similarity = best,
                    "fuzzy restricted-party match"
                );
                matches.push(NameMatch {
                    entry_index: idx,
                    matched_entity: self.entries[idx].name.clone(),
                    match_type: MatchType::Fuzzy,
                    confidence: best,
                });
            }
        }

        matches
    }
}

/// Holds the externally supplied restricted-party feed behind an
/// atomically swappable index. The registry never fetches the feed
/// itself; callers load entries they obtained elsewhere.
pub struct RestrictedPartyRegistry {
    index: RwLock<Option<Arc<IndexedList>>>,
}

impl RestrictedPartyRegistry {
    pub fn new() -> Self {
        Self {
            index: RwLock::new(None),
        }
    }

    /// Replace the feed. Matching keys are precomputed here so scans
    /// never pay normalization cost per entry.
    ///
    /// An empty feed is refused: installing it would clear every scan,
    /// which is indistinguishable from a broken upstream export. The
    /// previously loaded list, if any, stays in service.
    pub fn load(&self, entries: Vec<RestrictedPartyEntry>) {
        if entries.is_empty() {
            warn!("refusing empty restricted-party feed, keeping current list");
            return;
        }
        let list = Arc::new(IndexedList::build(entries));
        info!(entries = list.len(), "restricted-party list loaded");
        *self.index.write() = Some(list);
    }

    pub fn is_loaded(&self) -> bool {
        self.index.read().is_some()
    }

    pub fn len(&self) -> usize {
        self.index.read().as_ref().map_or(0, |list| list.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.index.read().as_ref().map(|list| list.loaded_at())
    }

    /// Current index for lock-free matching, `None` before the first load
    pub fn snapshot(&self) -> Option<Arc<IndexedList>> {
        self.index.read().clone()
    }
}

impl Default for RestrictedPartyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entries() -> Vec<RestrictedPartyEntry> {
        vec![
            RestrictedPartyEntry::new("ZTE Corporation", "export control violations", "EL-2018-0113")
                .with_aliases(vec!["Zhongxing Telecom".to_string()])
                .with_country("CN"),
            RestrictedPartyEntry::new("Dahua Technology", "surveillance concerns", "EL-2019-0042"),
        ]
    }

    fn loaded() -> Arc<IndexedList> {
        let registry = RestrictedPartyRegistry::new();
        registry.load(sample_entries());
        registry.snapshot().unwrap()
    }

    #[test]
    fn test_exact_match_on_primary_name() {
        let list = loaded();
        let matches = list.match_name("zte", 0.7);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].match_type, MatchType::Exact);
        assert_eq!(matches[0].confidence, 1.0);
        assert_eq!(matches[0].matched_entity, "ZTE Corporation");
    }

    #[test]
    fn test_exact_match_on_alias() {
        let list = loaded();
        let matches = list.match_name("zhongxing telecom", 0.7);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].match_type, MatchType::Exact);
        assert_eq!(matches[0].matched_entity, "ZTE Corporation");
    }

    #[test]
    fn test_fuzzy_match_scores_similarity() {
        let list = loaded();
        // "dahuaa" vs "dahua": similarity 1 - 1/6
        let matches = list.match_name("dahuaa", 0.7);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].match_type, MatchType::Fuzzy);
        assert!((matches[0].confidence - 5.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_below_threshold_is_no_match() {
        let list = loaded();
        assert!(list.match_name("daxum", 0.7).is_empty());
        assert!(list.match_name("completely unrelated", 0.7).is_empty());
    }

    #[test]
    fn test_entry_matches_at_most_once() {
        let list = loaded();
        // exact on the primary name must not re-report the entry fuzzily
        // through its alias keys
        let matches = list.match_name("zte", 0.1);
        let zte_hits = matches
            .iter()
            .filter(|m| m.matched_entity == "ZTE Corporation")
            .count();
        assert_eq!(zte_hits, 1);
    }

    #[test]
    fn test_registry_lifecycle() {
        let registry = RestrictedPartyRegistry::new();
        assert!(!registry.is_loaded());
        assert!(registry.snapshot().is_none());
        assert_eq!(registry.len(), 0);
        assert!(registry.loaded_at().is_none());

        registry.load(sample_entries());
        assert!(registry.is_loaded());
        assert_eq!(registry.len(), 2);
        assert!(registry.loaded_at().is_some());

        let list = registry.snapshot().unwrap();
        assert_eq!(list.entry(0).unwrap().citation, "EL-2018-0113");
        assert!(list.entry(9).is_none());
    }

    #[test]
    fn test_empty_feed_is_not_loaded() {
        let registry = RestrictedPartyRegistry::new();
        registry.load(Vec::new());
        assert!(!registry.is_loaded());
        assert!(registry.snapshot().is_none());
    }

    #[test]
    fn test_empty_feed_keeps_previous_list() {
        let registry = RestrictedPartyRegistry::new();
        registry.load(sample_entries());
        registry.load(Vec::new());
        assert!(registry.is_loaded());
        assert_eq!(registry.len(), 2);
    }
}
