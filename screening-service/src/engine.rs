use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::future;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};
use uuid::Uuid;

use entity_core::base_name;
use graph_store::GraphService;
use ownership_discovery::DiscoveryPipeline;

use crate::config::ScreeningConfig;
use crate::error::{Error, Result};
use crate::restricted::RestrictedPartyRegistry;
use crate::types::{MatchType, RiskLevel, ScanMatch, ScanPhase, ScanResult};

/// ScreeningEngine runs the scan state machine: normalize, direct match,
/// ownership walk, score, report.
pub struct ScreeningEngine {
    registry: Arc<RestrictedPartyRegistry>,
    graph: Arc<GraphService>,
    discovery: Option<Arc<DiscoveryPipeline>>,
    config: ScreeningConfig,
}

impl ScreeningEngine {
    pub fn new(
        registry: Arc<RestrictedPartyRegistry>,
        graph: Arc<GraphService>,
        config: ScreeningConfig,
    ) -> Self {
        Self {
            registry,
            graph,
            discovery: None,
            config,
        }
    }

    /// Wire an on-demand discovery pipeline, consulted when the graph is
    /// stale or silent about a queried supplier.
    pub fn with_discovery(mut self, discovery: Arc<DiscoveryPipeline>) -> Self {
        self.discovery = Some(discovery);
        self
    }

    /// Screen one supplier name against the restricted-party list.
    ///
    /// Errors only for an unusable query or a missing list. Degraded
    /// discovery or a stale graph lowers recall and flags the result
    /// `possibly_incomplete` instead of failing the scan.
    pub async fn screen(
        &self,
        supplier_name: &str,
        country_hint: Option<&str>,
    ) -> Result<ScanResult> {
        let scan_id = Uuid::new_v4();
        debug!(
            scan_id = %scan_id,
            phase = ScanPhase::Received.as_str(),
            query = supplier_name,
        );

        // 1. A scan without the list would be a fabricated clear
        let query = supplier_name.trim();
        if query.is_empty() {
            return Err(Error::InvalidQuery("empty supplier name".to_string()));
        }
        let Some(list) = self.registry.snapshot() else {
            warn!(scan_id = %scan_id, "scan refused: restricted-party list not loaded");
            return Err(Error::ListUnavailable);
        };
        let list_age = Utc::now() - list.loaded_at();
        if list_age > chrono::Duration::hours(self.config.list_max_age_hours as i64) {
            warn!(
                scan_id = %scan_id,
                age_hours = list_age.num_hours(),
                "restricted-party list exceeds max age"
            );
        }

        // 2. Normalize the query the same way list keys were built
        let normalized = base_name(query);
        debug!(
            scan_id = %scan_id,
            phase = ScanPhase::Normalized.as_str(),
            normalized = %normalized,
        );

        let mut found: Vec<(ScanMatch, String)> = Vec::new();

        // 3. The supplier itself against the list
        for hit in list.match_name(&normalized, self.config.fuzzy_threshold) {
            let Some(entry) = list.entry(hit.entry_index) else {
                continue;
            };
            let evidence = match hit.match_type {
                MatchType::Exact => format!(
                    "\"{}\" exactly matches restricted party \"{}\": {} [{}]",
                    query, entry.name, entry.listing_reason, entry.citation
                ),
                _ => format!(
                    "\"{}\" resembles restricted party \"{}\" (similarity {:.2}): {} [{}]",
                    query, entry.name, hit.confidence, entry.listing_reason, entry.citation
                ),
            };
            found.push((
                ScanMatch {
                    matched_entity: hit.matched_entity,
                    match_type: hit.match_type,
                    confidence: hit.confidence,
                    path_length: 0,
                    via: Vec::new(),
                },
                evidence,
            ));
        }
        debug!(
            scan_id = %scan_id,
            phase = ScanPhase::DirectMatchCheck.as_str(),
            hits = found.len(),
        );

        // 4. Ownership walk, refreshing the graph first when it cannot
        //    speak for this supplier
        let mut possibly_incomplete = false;
        let mut view = self.graph.view();
        if view.stale || !view.snapshot.contains(query) {
            if let Some(discovery) = &self.discovery {
                let envelope = Duration::from_millis(self.config.envelope_timeout_ms);
                match tokio::time::timeout(envelope, discovery.discover_entity(query, country_hint))
                    .await
                {
                    Ok(Ok(edges)) => {
                        debug!(
                            scan_id = %scan_id,
                            discovered = edges.len(),
                            "on-demand discovery complete"
                        );
                        view = self.graph.view();
                    }
                    Ok(Err(e)) => {
                        warn!(
                            scan_id = %scan_id,
                            error = %e,
                            "on-demand discovery failed, serving last known graph"
                        );
                        possibly_incomplete = true;
                    }
                    Err(_) => {
                        warn!(
                            scan_id = %scan_id,
                            timeout_ms = self.config.envelope_timeout_ms,
                            "on-demand discovery timed out, serving last known graph"
                        );
                        possibly_incomplete = true;
                    }
                }
            }
        }
        if view.stale {
            possibly_incomplete = true;
        }

        let hits = view.snapshot.walk(query, self.config.max_depth);
        let mut indirect_hits = 0usize;
        for hit in &hits {
            let node_key = base_name(&hit.name);
            for name_match in list.match_name(&node_key, self.config.fuzzy_threshold) {
                let Some(entry) = list.entry(name_match.entry_index) else {
                    continue;
                };
                let confidence = hit.path_confidence
                    * self.config.hop_decay.powi(hit.depth as i32)
                    * name_match.confidence;
                let chain = format!("{} -> {}", query, hit.via.join(" -> "));
                indirect_hits += 1;
                found.push((
                    ScanMatch {
                        matched_entity: name_match.matched_entity,
                        match_type: MatchType::Indirect,
                        confidence,
                        path_length: hit.depth,
                        via: hit.via.clone(),
                    },
                    format!(
                        "\"{}\" connects to restricted party \"{}\" through {} ({} hops, confidence {:.2}): {} [{}]",
                        query,
                        entry.name,
                        chain,
                        hit.depth,
                        confidence,
                        entry.listing_reason,
                        entry.citation
                    ),
                ));
            }
        }
        debug!(
            scan_id = %scan_id,
            phase = ScanPhase::IndirectMatchWalk.as_str(),
            reachable = hits.len(),
            hits = indirect_hits,
        );

        // 5. Highest single confidence drives the score; decay guarantees
        //    direct matches dominate indirect ones
        found.sort_by(|a, b| {
            b.0.confidence
                .partial_cmp(&a.0.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let best = found.first().map_or(0.0, |(m, _)| m.confidence);
        let risk_score = best * 10.0;
        let risk_level = RiskLevel::from_score(risk_score);
        debug!(
            scan_id = %scan_id,
            phase = ScanPhase::Scored.as_str(),
            risk_score,
            risk_level = risk_level.as_str(),
        );

        // 6. Report every contributing match
        let (matches, evidence): (Vec<ScanMatch>, Vec<String>) = found.into_iter().unzip();
        let result = ScanResult {
            scan_id,
            supplier_query: query.to_string(),
            matches,
            risk_score,
            risk_level,
            evidence,
            possibly_incomplete,
            completed_at: Utc::now(),
        };
        info!(
            scan_id = %scan_id,
            phase = ScanPhase::Reported.as_str(),
            query,
            matches = result.matches.len(),
            risk_score = result.risk_score,
            risk_level = result.risk_level.as_str(),
            possibly_incomplete = result.possibly_incomplete,
            "scan complete"
        );
        Ok(result)
    }

    /// Screen many suppliers with bounded concurrency, preserving input
    /// order in the results.
    pub async fn screen_batch(&self, queries: &[String]) -> Vec<Result<ScanResult>> {
        let limit = Arc::new(Semaphore::new(self.config.batch_concurrency.max(1)));
        let scans = queries.iter().map(|query| {
            let limit = limit.clone();
            async move {
                let _permit = limit.acquire().await.ok();
                self.screen(query, None).await
            }
        });
        future::join_all(scans).await
    }
}
