//! Regulatory filings connector
//!
//! Cross-references officer rosters in filings. Companies sharing
//! enough officers are flagged as affiliates. Payload shape:
//!
//! ```json
//! {
//!   "company": "...",
//!   "related_companies": [{"name": "...", "shared_officers": 3}]
//! }
//! ```

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;

use entity_core::{EdgeSource, OwnershipEdge, RelationshipType};

use super::{request_error, ConnectorError, ConnectorResult, Provider, SourceConnector};
use crate::config::ProviderConfig;

/// A single shared officer happens by coincidence; two or more is a
/// relationship worth flagging
const MIN_SHARED_OFFICERS: u64 = 2;

/// Connector for the regulatory filings gateway
pub struct FilingsConnector {
    client: reqwest::Client,
    base_url: String,
    base_confidence: f64,
}

impl FilingsConnector {
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
impl SourceConnector for FilingsConnector {
    fn provider(&self) -> Provider {
        Provider::Filings
    }

    async fn fetch(
        &self,
        name: &str,
        country_hint: Option<&str>,
    ) -> ConnectorResult<Vec<OwnershipEdge>> {
        let mut query: Vec<(&str, &str)> = vec![("company", name)];
        if let Some(country) = country_hint {
            query.push(("country", country));
        }

        let response = self
            .client
            .get(format!("{}/officers", self.base_url))
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

        parse_filings_payload(name, self.base_confidence, &payload)
    }
}

fn parse_filings_payload(
    name: &str,
    confidence: f64,
    payload: &Value,
) -> ConnectorResult<Vec<OwnershipEdge>> {
    let related = payload
        .get("related_companies")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            ConnectorError::Malformed("missing related_companies array".to_string())
        })?;

    let mut edges = Vec::new();
    for entry in related {
        let company = entry
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| ConnectorError::Malformed("related company missing name".to_string()))?;
        let shared = entry
            .get("shared_officers")
            .and_then(Value::as_u64)
            .ok_or_else(|| {
                ConnectorError::Malformed("related company missing shared_officers".to_string())
            })?;

        if shared < MIN_SHARED_OFFICERS {
            continue;
        }

        edges.push(
            OwnershipEdge::new(
                name,
                company,
                RelationshipType::Affiliate,
                confidence,
                EdgeSource::Filings,
            )
            .with_evidence(format!(
                "{shared} shared officers between \"{name}\" and \"{company}\" in filings"
            )),
        );
    }

    Ok(edges)
}
