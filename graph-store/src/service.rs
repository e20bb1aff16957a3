//! Snapshot lifecycle: bootstrap from cache, install new runs, serve views

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use tracing::{info, warn};

use entity_core::OwnershipEdge;

use crate::cache::{ArtifactMetadata, DiscoveryArtifact, FileGraphCache, GraphCache};
use crate::config::StoreConfig;
use crate::error::Result;
use crate::snapshot::OwnershipGraphSnapshot;

/// What [`GraphService::bootstrap`] found in the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// A cached artifact within its TTL was installed
    Fresh,
    /// An expired artifact was installed anyway
    Stale,
    /// No usable artifact; the graph starts empty
    Missing,
}

/// Read view over the currently installed snapshot.
///
/// `stale` is true when no run has completed within the TTL; callers
/// decide whether that warrants a refresh, the data is still served.
#[derive(Clone)]
pub struct GraphView {
    /// The snapshot current at the time of the call
    pub snapshot: Arc<OwnershipGraphSnapshot>,

    /// True when the snapshot is missing or past its TTL
    pub stale: bool,

    /// When the installed snapshot was produced, if any
    pub last_updated: Option<DateTime<Utc>>,
}

/// Owns the current ownership-graph snapshot and its persistence.
///
/// Writers install whole artifacts; readers clone an `Arc` and never
/// block a writer for longer than the pointer swap.
pub struct GraphService {
    current: RwLock<Arc<OwnershipGraphSnapshot>>,
    meta: RwLock<Option<ArtifactMetadata>>,
    cache: Arc<dyn GraphCache>,
    ttl: Duration,
}

impl GraphService {
    /// Service over the given cache with a TTL in hours
    pub fn new(cache: Arc<dyn GraphCache>, ttl_hours: u64) -> Self {
        Self {
            current: RwLock::new(Arc::new(OwnershipGraphSnapshot::empty())),
            meta: RwLock::new(None),
            cache,
            ttl: Duration::hours(ttl_hours as i64),
        }
    }

    /// Service with a file cache at the configured path
    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(
            Arc::new(FileGraphCache::new(config.cache_path.clone())),
            config.ttl_hours,
        )
    }

    /// Load whatever the cache holds and install it.
    ///
    /// Cache failures degrade to an empty graph with a warning; startup
    /// never fails because the cache is unreadable.
    pub fn bootstrap(&self) -> BootstrapOutcome {
        match self.cache.load() {
            Ok(Some(artifact)) => {
                let stale = self.is_expired(artifact.metadata.last_updated);
                info!(
                    edges = artifact.edges.len(),
                    stale, "loaded ownership graph from cache"
                );
                self.apply(artifact);
                if stale {
                    BootstrapOutcome::Stale
                } else {
                    BootstrapOutcome::Fresh
                }
            }
            Ok(None) => BootstrapOutcome::Missing,
            Err(e) => {
                warn!(error = %e, "graph cache unreadable, starting with empty graph");
                BootstrapOutcome::Missing
            }
        }
    }

    /// Install the output of a discovery run and persist it.
    ///
    /// The in-memory snapshot always updates; a cache write failure is
    /// logged and swallowed so a full run is never thrown away.
    pub fn install(
        &self,
        edges: Vec<OwnershipEdge>,
        counts_by_source: HashMap<String, usize>,
    ) -> DiscoveryArtifact {
        let artifact = DiscoveryArtifact {
            metadata: ArtifactMetadata {
                total_relationships: edges.len(),
                last_updated: Utc::now(),
                counts_by_source,
            },
            edges,
        };

        self.apply(artifact.clone());
        if let Err(e) = self.cache.store(&artifact) {
            warn!(error = %e, "failed to persist ownership graph, serving from memory only");
        }
        artifact
    }

    /// Current snapshot plus staleness, cheap enough for every scan
    pub fn view(&self) -> GraphView {
        let snapshot = self.current.read().clone();
        let meta = self.meta.read().clone();
        let (stale, last_updated) = match &meta {
            Some(m) => (self.is_expired(m.last_updated), Some(m.last_updated)),
            None => (true, None),
        };
        GraphView {
            snapshot,
            stale,
            last_updated,
        }
    }

    /// Drop the cached artifact and reset to an empty graph
    pub fn invalidate(&self) -> Result<()> {
        self.cache.invalidate()?;
        *self.current.write() = Arc::new(OwnershipGraphSnapshot::empty());
        *self.meta.write() = None;
        Ok(())
    }

    fn apply(&self, artifact: DiscoveryArtifact) {
        let snapshot = Arc::new(OwnershipGraphSnapshot::from_edges(artifact.edges));
        *self.current.write() = snapshot;
        *self.meta.write() = Some(artifact.metadata);
    }

    fn is_expired(&self, last_updated: DateTime<Utc>) -> bool {
        last_updated + self.ttl < Utc::now()
    }
}
