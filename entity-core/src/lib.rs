//! TradeSentry Entity Core
//!
//! Shared domain types for corporate entities and ownership relationships,
//! plus the name normalization and fuzzy matching primitives every other
//! crate builds on.
//!
//! # Architecture
//!
//! - **Records, not rows**: [`CompanyRecord`] and [`OwnershipEdge`] are plain
//!   immutable values that travel between discovery, storage, and screening
//! - **Normalize once**: all cross-entity comparison goes through
//!   [`normalize::base_name`] so "Acme Ltd." and "ACME Limited" collide
//! - **Confidence is data**: every edge carries the confidence and source
//!   that produced it; downstream layers never re-derive provenance

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod normalize;
pub mod similarity;
pub mod types;

// Re-exports
pub use normalize::{base_name, normalize_key, strip_legal_suffixes};
pub use similarity::similarity;
pub use types::{CompanyRecord, EdgeSource, OwnershipEdge, RelationshipType};
