//! Persistence for discovery artifacts
//!
//! A discovery run is expensive, so its output is cached and reloaded
//! on startup. The cache is best-effort: a missing or unreadable
//! artifact means discovery runs again, never a crash.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use entity_core::OwnershipEdge;

use crate::error::Result;

/// Output of one discovery run: the edges plus bookkeeping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryArtifact {
    /// Deduplicated ownership edges
    pub edges: Vec<OwnershipEdge>,

    /// Bookkeeping about the run that produced them
    pub metadata: ArtifactMetadata,
}

/// Bookkeeping stored alongside discovered edges
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    /// Edge count after deduplication
    pub total_relationships: usize,

    /// When the producing run finished
    pub last_updated: DateTime<Utc>,

    /// Edge counts keyed by source label
    pub counts_by_source: HashMap<String, usize>,
}

/// Where discovery artifacts are kept between runs.
///
/// Implementations must tolerate concurrent readers; the store calls
/// these from whichever task finishes a discovery run.
pub trait GraphCache: Send + Sync {
    /// Load the persisted artifact, `None` when absent or unreadable
    fn load(&self) -> Result<Option<DiscoveryArtifact>>;

    /// Persist an artifact, replacing any previous one
    fn store(&self, artifact: &DiscoveryArtifact) -> Result<()>;

    /// Drop the persisted artifact; absent is not an error
    fn invalidate(&self) -> Result<()>;
}

/// JSON artifact in a single file, written atomically via rename
pub struct FileGraphCache {
    path: PathBuf,
}

impl FileGraphCache {
    /// Cache backed by the given file path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl GraphCache for FileGraphCache {
    fn load(&self) -> Result<Option<DiscoveryArtifact>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_str(&raw) {
            Ok(artifact) => Ok(Some(artifact)),
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "discarding unreadable graph cache"
                );
                Ok(None)
            }
        }
    }

    fn store(&self, artifact: &DiscoveryArtifact) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(artifact)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn invalidate(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory cache for tests and ephemeral deployments
#[derive(Default)]
pub struct MemoryGraphCache {
    inner: parking_lot::Mutex<Option<DiscoveryArtifact>>,
}

impl MemoryGraphCache {
    /// Empty in-memory cache
    pub fn new() -> Self {
        Self::default()
    }
}

impl GraphCache for MemoryGraphCache {
    fn load(&self) -> Result<Option<DiscoveryArtifact>> {
        Ok(self.inner.lock().clone())
    }

    fn store(&self, artifact: &DiscoveryArtifact) -> Result<()> {
        *self.inner.lock() = Some(artifact.clone());
        Ok(())
    }

    fn invalidate(&self) -> Result<()> {
        *self.inner.lock() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use entity_core::{EdgeSource, RelationshipType};

    fn artifact() -> DiscoveryArtifact {
        let edges = vec![OwnershipEdge::new(
            "Parent Co",
            "Child Co",
            RelationshipType::Subsidiary,
            0.85,
            EdgeSource::Pattern,
        )];
        let mut counts = HashMap::new();
        counts.insert("pattern".to_string(), 1);
        DiscoveryArtifact {
            metadata: ArtifactMetadata {
                total_relationships: edges.len(),
                last_updated: Utc::now(),
                counts_by_source: counts,
            },
            edges,
        }
    }

    #[test]
    fn file_cache_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileGraphCache::new(dir.path().join("graph.json"));

        assert!(cache.load().unwrap().is_none());

        cache.store(&artifact()).unwrap();
        let loaded = cache.load().unwrap().unwrap();
        assert_eq!(loaded.edges.len(), 1);
        assert_eq!(loaded.metadata.total_relationships, 1);
        assert_eq!(loaded.metadata.counts_by_source.get("pattern"), Some(&1));
    }

    #[test]
    fn corrupt_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.json");
        fs::write(&path, b"{ not json").unwrap();

        let cache = FileGraphCache::new(&path);
        assert!(cache.load().unwrap().is_none());
    }

    #[test]
    fn invalidate_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileGraphCache::new(dir.path().join("graph.json"));

        cache.invalidate().unwrap();
        cache.store(&artifact()).unwrap();
        cache.invalidate().unwrap();
        assert!(cache.load().unwrap().is_none());
        cache.invalidate().unwrap();
    }

    #[test]
    fn store_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileGraphCache::new(dir.path().join("nested/deep/graph.json"));
        cache.store(&artifact()).unwrap();
        assert!(cache.load().unwrap().is_some());
    }

    #[test]
    fn memory_cache_roundtrip() {
        let cache = MemoryGraphCache::new();
        assert!(cache.load().unwrap().is_none());
        cache.store(&artifact()).unwrap();
        assert!(cache.load().unwrap().is_some());
        cache.invalidate().unwrap();
        assert!(cache.load().unwrap().is_none());
    }
}
