//! Core types for entities and ownership relationships

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::normalize::normalize_key;

/// A company as seen by discovery or screening
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyRecord {
    /// Legal or trading name as reported by the source
    pub name: String,

    /// Alternate names, trade names, transliterations
    pub aliases: Vec<String>,

    /// ISO-ish country label when known ("CN", "China", ...)
    pub country: Option<String>,

    /// Free-form address line when known
    pub address: Option<String>,

    /// When this record entered the system
    pub discovered_at: DateTime<Utc>,
}

impl CompanyRecord {
    /// Create a record carrying only a name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            country: None,
            address: None,
            discovered_at: Utc::now(),
        }
    }

    /// Attach a country label
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    /// Attach an address line
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Attach alternate names
    pub fn with_aliases(mut self, aliases: Vec<String>) -> Self {
        self.aliases = aliases;
        self
    }
}

/// How the parent relates to the subsidiary in an [`OwnershipEdge`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelationshipType {
    /// Parent holds a controlling stake
    Parent,
    /// Wholly or majority owned unit
    Subsidiary,
    /// Related party without established control
    Affiliate,
}

impl RelationshipType {
    /// Stable lowercase label for logs and payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipType::Parent => "parent",
            RelationshipType::Subsidiary => "subsidiary",
            RelationshipType::Affiliate => "affiliate",
        }
    }
}

/// Which discoverer or external source produced an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeSource {
    /// Known corporate group name embedded in a company name
    Pattern,
    /// Shared base name after stripping legal suffixes
    NameDecomposition,
    /// Similar names registered in the same city
    GeoCluster,
    /// City-code prefix naming convention
    CityCode,
    /// Corporate registry lookup
    Registry,
    /// Knowledge-graph claims
    KnowledgeGraph,
    /// Encyclopedia infobox extraction
    Encyclopedia,
    /// Regulatory filings cross-reference
    Filings,
}

impl EdgeSource {
    /// Stable lowercase label for logs and metrics
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeSource::Pattern => "pattern",
            EdgeSource::NameDecomposition => "name_decomposition",
            EdgeSource::GeoCluster => "geo_cluster",
            EdgeSource::CityCode => "city_code",
            EdgeSource::Registry => "registry",
            EdgeSource::KnowledgeGraph => "knowledge_graph",
            EdgeSource::Encyclopedia => "encyclopedia",
            EdgeSource::Filings => "filings",
        }
    }
}

/// A directed ownership claim between two companies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnershipEdge {
    /// Controlling side of the relationship
    pub parent: String,

    /// Controlled side of the relationship
    pub subsidiary: String,

    /// Nature of the relationship
    pub relationship: RelationshipType,

    /// Confidence in [0.0, 1.0]
    pub confidence: f64,

    /// Discoverer or external source that produced the edge
    pub source: EdgeSource,

    /// Human-readable justification lines
    pub evidence: Vec<String>,

    /// When the edge was produced
    pub discovered_at: DateTime<Utc>,
}

impl OwnershipEdge {
    /// Create an edge, clamping confidence into [0.0, 1.0].
    /// Non-finite confidence collapses to 0.0.
    pub fn new(
        parent: impl Into<String>,
        subsidiary: impl Into<String>,
        relationship: RelationshipType,
        confidence: f64,
        source: EdgeSource,
    ) -> Self {
        let confidence = if confidence.is_finite() {
            confidence.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            parent: parent.into(),
            subsidiary: subsidiary.into(),
            relationship,
            confidence,
            source,
            evidence: Vec::new(),
            discovered_at: Utc::now(),
        }
    }

    /// Append one evidence line
    pub fn with_evidence(mut self, line: impl Into<String>) -> Self {
        self.evidence.push(line.into());
        self
    }

    /// Key identifying the (parent, subsidiary) pair regardless of
    /// casing and spacing. Two edges with the same key describe the
    /// same relationship.
    pub fn dedup_key(&self) -> String {
        format!(
            "{}::{}",
            normalize_key(&self.parent),
            normalize_key(&self.subsidiary)
        )
    }

    /// True when parent and subsidiary normalize to the same entity
    pub fn is_self_loop(&self) -> bool {
        normalize_key(&self.parent) == normalize_key(&self.subsidiary)
    }
}
