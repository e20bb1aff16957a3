use serde::{Deserialize, Serialize};

/// Screening engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningConfig {
    /// Minimum similarity for a fuzzy name match
    pub fuzzy_threshold: f64,

    /// Per-hop confidence decay applied to indirect matches
    pub hop_decay: f64,

    /// Ownership-graph traversal depth
    pub max_depth: usize,

    /// Budget for on-demand discovery during a scan (milliseconds).
    /// On expiry the scan proceeds with the last known graph.
    pub envelope_timeout_ms: u64,

    /// Age past which a loaded list draws a warning (hours)
    pub list_max_age_hours: u64,

    /// Concurrent scans in a batch
    pub batch_concurrency: usize,
}

impl Default for ScreeningConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: 0.7,
            hop_decay: 0.85,
            max_depth: 3,
            envelope_timeout_ms: 10_000,
            list_max_age_hours: 168, // 7 days
            batch_concurrency: 4,
        }
    }
}

impl ScreeningConfig {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::Error::Config(format!("Failed to read config: {}", e)))?;
        let config: ScreeningConfig = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = ScreeningConfig::default();

        if let Ok(value) = std::env::var("SCREENING_FUZZY_THRESHOLD") {
            config.fuzzy_threshold = value.parse().map_err(|e| {
                crate::Error::Config(format!("Invalid SCREENING_FUZZY_THRESHOLD: {}", e))
            })?;
        }

        if let Ok(value) = std::env::var("SCREENING_HOP_DECAY") {
            config.hop_decay = value
                .parse()
                .map_err(|e| crate::Error::Config(format!("Invalid SCREENING_HOP_DECAY: {}", e)))?;
        }

        if let Ok(value) = std::env::var("SCREENING_MAX_DEPTH") {
            config.max_depth = value
                .parse()
                .map_err(|e| crate::Error::Config(format!("Invalid SCREENING_MAX_DEPTH: {}", e)))?;
        }

        if let Ok(value) = std::env::var("SCREENING_ENVELOPE_TIMEOUT_MS") {
            config.envelope_timeout_ms = value.parse().map_err(|e| {
                crate::Error::Config(format!("Invalid SCREENING_ENVELOPE_TIMEOUT_MS: {}", e))
            })?;
        }

        if let Ok(value) = std::env::var("SCREENING_BATCH_CONCURRENCY") {
            config.batch_concurrency = value.parse().map_err(|e| {
                crate::Error::Config(format!("Invalid SCREENING_BATCH_CONCURRENCY: {}", e))
            })?;
        }

        Ok(config)
    }
}
