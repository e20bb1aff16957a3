//! Encyclopedia infobox connector
//!
//! Extracts corporate facts from article infoboxes. Payload shape:
//!
//! ```json
//! {
//!   "title": "...",
//!   "infobox": {"parent": "...", "subsidiaries": ["..."]}
//! }
//! ```
//!
//! Articles without an infobox are common and yield no edges.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;

use entity_core::{EdgeSource, OwnershipEdge, RelationshipType};

use super::{request_error, ConnectorError, ConnectorResult, Provider, SourceConnector};
use crate::config::ProviderConfig;

/// Connector for the encyclopedia infobox gateway
pub struct EncyclopediaConnector {
    client: reqwest::Client,
    base_url: String,
    base_confidence: f64,
}

impl EncyclopediaConnector {
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
impl SourceConnector for EncyclopediaConnector {
    fn provider(&self) -> Provider {
        Provider::Encyclopedia
    }

    async fn fetch(
        &self,
        name: &str,
        _country_hint: Option<&str>,
    ) -> ConnectorResult<Vec<OwnershipEdge>> {
        let response = self
            .client
            .get(format!("{}/articles", self.base_url))
            .query(&[("title", name)])
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

        parse_infobox_payload(name, self.base_confidence, &payload)
    }
}

fn parse_infobox_payload(
    name: &str,
    confidence: f64,
    payload: &Value,
) -> ConnectorResult<Vec<OwnershipEdge>> {
    if payload.get("title").and_then(Value::as_str).is_none() {
        return Err(ConnectorError::Malformed("missing title".to_string()));
    }

    // No infobox on the article, nothing to extract
    let Some(infobox) = payload.get("infobox") else {
        return Ok(Vec::new());
    };
    let infobox = infobox
        .as_object()
        .ok_or_else(|| ConnectorError::Malformed("infobox is not an object".to_string()))?;

    let mut edges = Vec::new();

    if let Some(parent) = infobox.get("parent") {
        let parent = parent
            .as_str()
            .ok_or_else(|| ConnectorError::Malformed("infobox parent is not a string".to_string()))?;
        edges.push(
            OwnershipEdge::new(
                parent,
                name,
                RelationshipType::Parent,
                confidence,
                EdgeSource::Encyclopedia,
            )
            .with_evidence(format!(
                "encyclopedia infobox names \"{parent}\" as parent of \"{name}\""
            )),
        );
    }

    if let Some(subsidiaries) = infobox.get("subsidiaries") {
        let subsidiaries = subsidiaries.as_array().ok_or_else(|| {
            ConnectorError::Malformed("infobox subsidiaries is not an array".to_string())
        })?;
        for entry in subsidiaries {
            let subsidiary = entry.as_str().ok_or_else(|| {
                ConnectorError::Malformed("infobox subsidiary is not a string".to_string())
            })?;
            edges.push(
                OwnershipEdge::new(
                    name,
                    subsidiary,
                    RelationshipType::Subsidiary,
                    confidence,
                    EdgeSource::Encyclopedia,
                )
                .with_evidence(format!(
                    "encyclopedia infobox lists \"{subsidiary}\" under \"{name}\""
                )),
            );
        }
    }

    Ok(edges)
}
