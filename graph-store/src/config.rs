//! Configuration for the graph store

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Graph store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path of the JSON artifact cache
    pub cache_path: PathBuf,

    /// Snapshot time-to-live (hours)
    pub ttl_hours: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            cache_path: PathBuf::from("./data/ownership_graph.json"),
            ttl_hours: 168, // 7 days
        }
    }
}

impl StoreConfig {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: StoreConfig = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = StoreConfig::default();

        if let Ok(path) = std::env::var("GRAPH_CACHE_PATH") {
            config.cache_path = PathBuf::from(path);
        }

        if let Ok(hours) = std::env::var("GRAPH_TTL_HOURS") {
            config.ttl_hours = hours
                .parse()
                .map_err(|e| crate::Error::Config(format!("Invalid GRAPH_TTL_HOURS: {}", e)))?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StoreConfig::default();
        assert_eq!(config.ttl_hours, 168);
        assert!(config.cache_path.to_string_lossy().ends_with(".json"));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.toml");
        std::fs::write(&path, "cache_path = \"/tmp/graph.json\"\nttl_hours = 24\n").unwrap();

        let config = StoreConfig::from_file(&path).unwrap();
        assert_eq!(config.ttl_hours, 24);
        assert_eq!(config.cache_path, PathBuf::from("/tmp/graph.json"));
    }
}
