use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One entry of the externally supplied restricted-party feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestrictedPartyEntry {
    pub name: String,
    pub aliases: Vec<String>,
    pub country: Option<String>,
    pub listing_reason: String,
    pub citation: String, // list identifier, e.g. "EL-2019-0042"
}

impl RestrictedPartyEntry {
    pub fn new(
        name: impl Into<String>,
        listing_reason: impl Into<String>,
        citation: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            country: None,
            listing_reason: listing_reason.into(),
            citation: citation.into(),
        }
    }

    pub fn with_aliases(mut self, aliases: Vec<String>) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchType {
    Exact,
    Fuzzy,
    Indirect,
}

impl MatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::Exact => "exact",
            MatchType::Fuzzy => "fuzzy",
            MatchType::Indirect => "indirect",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    Clear,
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Classify a 0-10 risk score
    pub fn from_score(score: f64) -> Self {
        if score >= 8.0 {
            RiskLevel::Critical
        } else if score >= 6.0 {
            RiskLevel::High
        } else if score >= 4.0 {
            RiskLevel::Medium
        } else if score >= 2.0 {
            RiskLevel::Low
        } else {
            RiskLevel::Clear
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Clear => "clear",
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }
}

/// One restricted party implicated by a scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanMatch {
    pub matched_entity: String,
    pub match_type: MatchType,
    pub confidence: f64,    // 0.0-1.0, decay already applied
    pub path_length: usize, // 0 for direct matches
    pub via: Vec<String>,   // ownership chain, empty for direct matches
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    pub scan_id: Uuid,
    pub supplier_query: String,
    pub matches: Vec<ScanMatch>,
    pub risk_score: f64, // 0-10
    pub risk_level: RiskLevel,
    pub evidence: Vec<String>,
    pub possibly_incomplete: bool,
    pub completed_at: DateTime<Utc>,
}

/// Stages of the scan state machine, logged as each completes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPhase {
    Received,
    Normalized,
    DirectMatchCheck,
    IndirectMatchWalk,
    Scored,
    Reported,
}

impl ScanPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanPhase::Received => "received",
            ScanPhase::Normalized => "normalized",
            ScanPhase::DirectMatchCheck => "direct_match_check",
            ScanPhase::IndirectMatchWalk => "indirect_match_walk",
            ScanPhase::Scored => "scored",
            ScanPhase::Reported => "reported",
        }
    }
}
