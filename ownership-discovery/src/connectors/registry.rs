//! Corporate registry connector
//!
//! The registry gateway is the most authoritative provider: its
//! relations come from incorporation filings. Payload shape:
//!
//! ```json
//! {
//!   "results": [
//!     {"name": "...", "relation": "parent", "jurisdiction": "CN", "filing": "2023-117"}
//!   ]
//! }
//! ```

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;

use entity_core::{EdgeSource, OwnershipEdge, RelationshipType};

use super::{request_error, ConnectorError, ConnectorResult, Provider, SourceConnector};
use crate::config::ProviderConfig;

/// Connector for the corporate registry gateway
pub struct RegistryConnector {
    client: reqwest::Client,
    base_url: String,
    base_confidence: f64,
}

impl RegistryConnector {
    /// Connector using the shared HTTP client and provider config
    pub fn new(client: reqwest::Client, config: &ProviderConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            base_confidence: config.base_confidence,
        }
    }
}

#[async_trait]
impl SourceConnector for RegistryConnector {
    fn provider(&self) -> Provider {
        Provider::Registry
    }

    async fn fetch(
        &self,
        name: &str,
        country_hint: Option<&str>,
    ) -> ConnectorResult<Vec<OwnershipEdge>> {
        let mut query: Vec<(&str, &str)> = vec![("name", name)];
        if let Some(country) = country_hint {
            query.push(("jurisdiction", country));
        }

        let response = self
            .client
            .get(format!("{}/relations", self.base_url))
            .query(&query)
            .send()
            .await
            .map_err(request_error)?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            return Err(ConnectorError::RateLimited);
        }
        let response = response
            .error_for_status()
            .map_err(|e| ConnectorError::Http(e.to_string()))?;

        let payload: Value = response
            .json()
            .await
            .map_err(|e| ConnectorError::Malformed(e.to_string()))?;

        parse_registry_payload(name, self.base_confidence, &payload)
    }
}

/// Turn a registry payload into edges. Any entry that breaks the
/// schema rejects the whole payload.
fn parse_registry_payload(
    name: &str,
    confidence: f64,
    payload: &Value,
) -> ConnectorResult<Vec<OwnershipEdge>> {
    let results = payload
        .get("results")
        .and_then(Value::as_array)
        .ok_or_else(|| ConnectorError::Malformed("missing results array".to_string()))?;

    let mut edges = Vec::with_capacity(results.len());
    for entry in results {
        let related = entry
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| ConnectorError::Malformed("result missing name".to_string()))?;
        let relation = entry
            .get("relation")
            .and_then(Value::as_str)
            .ok_or_else(|| ConnectorError::Malformed("result missing relation".to_string()))?;

        let (parent, subsidiary, relationship) = match relation {
            "parent" => (related, name, RelationshipType::Parent),
            "subsidiary" => (name, related, RelationshipType::Subsidiary),
            "affiliate" => (name, related, RelationshipType::Affiliate),
            other => {
                return Err(ConnectorError::Malformed(format!(
                    "unknown relation \"{other}\""
                )))
            }
        };

        let mut evidence = format!("registry lists \"{related}\" as {relation} of \"{name}\"");
        if let Some(filing) = entry.get("filing").and_then(Value::as_str) {
            evidence.push_str(&format!(", filing {filing}"));
        }

        edges.push(
            OwnershipEdge::new(
                parent,
                subsidiary,
                relationship,
                confidence,
                EdgeSource::Registry,
            )
            .with_evidence(evidence),
        );
    }

    Ok(edges)
}
