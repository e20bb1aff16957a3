//! Configuration for discovery heuristics, connectors, and the pipeline

use serde::{Deserialize, Serialize};

/// Top-level discovery configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Heuristic confidence tuning
    pub heuristics: HeuristicConfig,

    /// External source connectors
    pub connectors: ConnectorsConfig,

    /// Pipeline execution tuning
    pub pipeline: PipelineConfig,
}

/// Confidence and threshold tuning for the offline heuristics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeuristicConfig {
    /// Confidence of a corporate-group pattern match
    pub pattern_confidence: f64,

    /// Confidence of a shared-base-name match
    pub decomposition_confidence: f64,

    /// Similarity above which two names are the same entity, not kin
    pub near_duplicate_threshold: f64,

    /// Similarity floor for geographic clustering (exclusive)
    pub geo_similarity_floor: f64,

    /// Base confidence for geographic cluster edges
    pub geo_confidence_base: f64,

    /// Similarity multiplier for geographic cluster edges
    pub geo_confidence_scale: f64,

    /// Ceiling on geographic cluster confidence
    pub geo_confidence_cap: f64,

    /// Confidence of a city-code prefix match
    pub city_code_confidence: f64,
}

impl Default for HeuristicConfig {
    fn default() -> Self {
        Self {
            pattern_confidence: 0.85,
            decomposition_confidence: 0.70,
            near_duplicate_threshold: 0.95,
            geo_similarity_floor: 0.5,
            geo_confidence_base: 0.5,
            geo_confidence_scale: 0.3,
            geo_confidence_cap: 0.75,
            city_code_confidence: 0.75,
        }
    }
}

/// One external provider endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Query this provider at all
    pub enabled: bool,

    /// Base URL, no trailing slash
    pub base_url: String,

    /// Minimum spacing between requests (milliseconds)
    pub min_interval_ms: u64,

    /// Per-request timeout (milliseconds)
    pub timeout_ms: u64,

    /// Confidence assigned to edges this provider reports
    pub base_confidence: f64,

    /// Consecutive failures before the circuit opens
    pub failure_threshold: u32,

    /// Seconds an open circuit waits before probing again
    pub cooldown_seconds: i64,
}

impl ProviderConfig {
    fn defaults(base_url: &str, min_interval_ms: u64, base_confidence: f64) -> Self {
        Self {
            enabled: true,
            base_url: base_url.to_string(),
            min_interval_ms,
            timeout_ms: 5_000,
            base_confidence,
            failure_threshold: 3,
            cooldown_seconds: 60,
        }
    }
}

/// All four provider endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectorsConfig {
    /// Corporate registry gateway
    pub registry: ProviderConfig,

    /// Knowledge-graph gateway
    pub knowledge_graph: ProviderConfig,

    /// Encyclopedia infobox gateway
    pub encyclopedia: ProviderConfig,

    /// Regulatory filings gateway
    pub filings: ProviderConfig,
}

impl Default for ConnectorsConfig {
    fn default() -> Self {
        Self {
            registry: ProviderConfig::defaults("http://registry-gateway:8170/v1", 1_000, 0.90),
            knowledge_graph: ProviderConfig::defaults("http://kg-gateway:8171/v1", 500, 0.85),
            encyclopedia: ProviderConfig::defaults("http://infobox-gateway:8172/v1", 200, 0.80),
            filings: ProviderConfig::defaults("http://filings-gateway:8173/v1", 750, 0.75),
        }
    }
}

/// Pipeline execution tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Records fanned out to connectors concurrently
    pub worker_pool_size: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            worker_pool_size: 8, // 8 records in flight
        }
    }
}

impl DiscoveryConfig {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::Error::Config(format!("Failed to read config: {}", e)))?;
        let config: DiscoveryConfig = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = DiscoveryConfig::default();

        if let Ok(url) = std::env::var("DISCOVERY_REGISTRY_URL") {
            config.connectors.registry.base_url = url;
        }

        if let Ok(url) = std::env::var("DISCOVERY_KG_URL") {
            config.connectors.knowledge_graph.base_url = url;
        }

        if let Ok(url) = std::env::var("DISCOVERY_INFOBOX_URL") {
            config.connectors.encyclopedia.base_url = url;
        }

        if let Ok(url) = std::env::var("DISCOVERY_FILINGS_URL") {
            config.connectors.filings.base_url = url;
        }

        if let Ok(workers) = std::env::var("DISCOVERY_WORKER_POOL_SIZE") {
            config.pipeline.worker_pool_size = workers.parse().map_err(|e| {
                crate::Error::Config(format!("Invalid DISCOVERY_WORKER_POOL_SIZE: {}", e))
            })?;
        }

        let heuristics = &mut config.heuristics;
        env_f64("DISCOVERY_PATTERN_CONFIDENCE", &mut heuristics.pattern_confidence)?;
        env_f64(
            "DISCOVERY_DECOMPOSITION_CONFIDENCE",
            &mut heuristics.decomposition_confidence,
        )?;
        env_f64(
            "DISCOVERY_NEAR_DUPLICATE_THRESHOLD",
            &mut heuristics.near_duplicate_threshold,
        )?;
        env_f64("DISCOVERY_GEO_SIMILARITY_FLOOR", &mut heuristics.geo_similarity_floor)?;
        env_f64("DISCOVERY_GEO_CONFIDENCE_BASE", &mut heuristics.geo_confidence_base)?;
        env_f64("DISCOVERY_GEO_CONFIDENCE_SCALE", &mut heuristics.geo_confidence_scale)?;
        env_f64("DISCOVERY_GEO_CONFIDENCE_CAP", &mut heuristics.geo_confidence_cap)?;
        env_f64("DISCOVERY_CITY_CODE_CONFIDENCE", &mut heuristics.city_code_confidence)?;

        Ok(config)
    }
}

fn env_f64(name: &str, target: &mut f64) -> crate::Result<()> {
    if let Ok(value) = std::env::var(name) {
        *target = value
            .parse()
            .map_err(|e| crate::Error::Config(format!("Invalid {}: {}", name, e)))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DiscoveryConfig::default();
        assert_eq!(config.heuristics.pattern_confidence, 0.85);
        assert_eq!(config.heuristics.city_code_confidence, 0.75);
        assert_eq!(config.connectors.registry.min_interval_ms, 1_000);
        assert_eq!(config.connectors.encyclopedia.min_interval_ms, 200);
        assert_eq!(config.pipeline.worker_pool_size, 8);
        assert!(config.connectors.filings.enabled);
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("discovery.toml");
        std::fs::write(
            &path,
            r#"
[heuristics]
pattern_confidence = 0.9
decomposition_confidence = 0.6
near_duplicate_threshold = 0.95
geo_similarity_floor = 0.5
geo_confidence_base = 0.5
geo_confidence_scale = 0.3
geo_confidence_cap = 0.75
city_code_confidence = 0.75

[connectors.registry]
enabled = false
base_url = "http://localhost:9000/v1"
min_interval_ms = 100
timeout_ms = 1000
base_confidence = 0.9
failure_threshold = 3
cooldown_seconds = 60

[connectors.knowledge_graph]
enabled = true
base_url = "http://localhost:9001/v1"
min_interval_ms = 100
timeout_ms = 1000
base_confidence = 0.85
failure_threshold = 3
cooldown_seconds = 60

[connectors.encyclopedia]
enabled = true
base_url = "http://localhost:9002/v1"
min_interval_ms = 100
timeout_ms = 1000
base_confidence = 0.8
failure_threshold = 3
cooldown_seconds = 60

[connectors.filings]
enabled = true
base_url = "http://localhost:9003/v1"
min_interval_ms = 100
timeout_ms = 1000
base_confidence = 0.75
failure_threshold = 3
cooldown_seconds = 60

[pipeline]
worker_pool_size = 2
"#,
        )
        .unwrap();

        let config = DiscoveryConfig::from_file(&path).unwrap();
        assert_eq!(config.heuristics.pattern_confidence, 0.9);
        assert!(!config.connectors.registry.enabled);
        assert_eq!(config.pipeline.worker_pool_size, 2);
    }

    #[test]
    fn test_from_env_overrides_heuristics() {
        std::env::set_var("DISCOVERY_PATTERN_CONFIDENCE", "0.6");
        std::env::set_var("DISCOVERY_CITY_CODE_CONFIDENCE", "0.55");
        let config = DiscoveryConfig::from_env().unwrap();
        std::env::remove_var("DISCOVERY_PATTERN_CONFIDENCE");
        std::env::remove_var("DISCOVERY_CITY_CODE_CONFIDENCE");

        assert_eq!(config.heuristics.pattern_confidence, 0.6);
        assert_eq!(config.heuristics.city_code_confidence, 0.55);
        // untouched knobs keep their defaults
        assert_eq!(config.heuristics.decomposition_confidence, 0.70);
    }

    #[test]
    fn test_from_env_rejects_unparseable_override() {
        std::env::set_var("DISCOVERY_GEO_CONFIDENCE_CAP", "not-a-number");
        let result = DiscoveryConfig::from_env();
        std::env::remove_var("DISCOVERY_GEO_CONFIDENCE_CAP");
        assert!(result.is_err());
    }
}
