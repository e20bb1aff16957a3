//! Knowledge-graph connector
//!
//! Serves structured claims about an entity. Payload shape:
//!
//! ```json
//! {
//!   "entity": "...",
//!   "claims": {
//!     "parent_organization": ["..."],
//!     "subsidiaries": ["...", "..."]
//!   }
//! }
//! ```
//!
//! Both claim lists are optional; a claim entry that is not a string
//! rejects the payload.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;

use entity_core::{EdgeSource, OwnershipEdge, RelationshipType};

use super::{request_error, ConnectorError, ConnectorResult, Provider, SourceConnector};
use crate::config::ProviderConfig;

/// Connector for the knowledge-graph gateway
pub struct KnowledgeGraphConnector {
    client: reqwest::Client,
    base_url: String,
    base_confidence: f64,
}

impl KnowledgeGraphConnector {
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
impl SourceConnector for KnowledgeGraphConnector {
    fn provider(&self) -> Provider {
        Provider::KnowledgeGraph
    }

    async fn fetch(
        &self,
        name: &str,
        country_hint: Option<&str>,
    ) -> ConnectorResult<Vec<OwnershipEdge>> {
        let mut query: Vec<(&str, &str)> = vec![("entity", name)];
        if let Some(country) = country_hint {
            query.push(("country", country));
        }

        let response = self
            .client
            .get(format!("{}/claims", self.base_url))
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

        parse_claims_payload(name, self.base_confidence, &payload)
    }
}

fn parse_claims_payload(
    name: &str,
    confidence: f64,
    payload: &Value,
) -> ConnectorResult<Vec<OwnershipEdge>> {
    let claims = payload
        .get("claims")
        .and_then(Value::as_object)
        .ok_or_else(|| ConnectorError::Malformed("missing claims object".to_string()))?;

    let mut edges = Vec::new();

    for parent in claim_entries(claims.get("parent_organization"))? {
        edges.push(
            OwnershipEdge::new(
                parent,
                name,
                RelationshipType::Parent,
                confidence,
                EdgeSource::KnowledgeGraph,
            )
            .with_evidence(format!(
                "knowledge graph claims \"{parent}\" is the parent organization of \"{name}\""
            )),
        );
    }

    for subsidiary in claim_entries(claims.get("subsidiaries"))? {
        edges.push(
            OwnershipEdge::new(
                name,
                subsidiary,
                RelationshipType::Subsidiary,
                confidence,
                EdgeSource::KnowledgeGraph,
            )
            .with_evidence(format!(
                "knowledge graph claims \"{subsidiary}\" is a subsidiary of \"{name}\""
            )),
        );
    }

    Ok(edges)
}

/// A claim list is absent (fine) or an array of strings (anything else
/// is malformed)
fn claim_entries(value: Option<&Value>) -> ConnectorResult<Vec<&str>> {
    let Some(value) = value else {
        return Ok(Vec::new());
    };
    let entries = value
        .as_array()
        .ok_or_else(|| ConnectorError::Malformed("claim list is not an array".to_string()))?;
    entries
        .iter()
        .map(|v| {
            v.as_str()
                .ok_or_else(|| ConnectorError::Malformed("claim entry is not a string".to_string()))
        })
        .collect()
}
