//! TradeSentry Graph Store
//!
//! Holds the assembled corporate ownership graph and its persistence.
//!
//! # Architecture
//!
//! - **Immutable snapshots**: readers hold an `Arc` to a fully built
//!   [`OwnershipGraphSnapshot`]; a new discovery run swaps in a fresh one
//! - **Pluggable cache**: [`GraphCache`] abstracts where artifacts live;
//!   a JSON file in production, memory in tests
//! - **Stale beats empty**: an expired snapshot is still served, flagged
//!   stale, so screening degrades instead of failing

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cache;
pub mod config;
pub mod error;
pub mod service;
pub mod snapshot;

// Re-exports
pub use cache::{ArtifactMetadata, DiscoveryArtifact, FileGraphCache, GraphCache, MemoryGraphCache};
pub use config::StoreConfig;
pub use error::{Error, Result};
pub use service::{BootstrapOutcome, GraphService, GraphView};
pub use snapshot::{OwnershipGraphSnapshot, TraversalHit};
