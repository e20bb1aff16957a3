//! Per-provider circuit breaker
//!
//! Closed passes traffic. Enough consecutive failures opens the
//! circuit; after a cooldown one probe request is let through
//! (half-open) and its outcome decides between closed and open again.

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::Provider;

/// Breaker states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakerState {
    /// Passing traffic
    Closed,
    /// Rejecting traffic until the cooldown elapses
    Open,
    /// Passing probe traffic after a cooldown
    HalfOpen,
}

struct Inner {
    state: BreakerState,
    failure_count: u32,
    last_failure: Option<DateTime<Utc>>,
}

/// Circuit breaker guarding one provider
pub struct ConnectorBreaker {
    provider: Provider,
    failure_threshold: u32,
    cooldown_seconds: i64,
    inner: RwLock<Inner>,
}

impl ConnectorBreaker {
    /// Breaker that opens after `failure_threshold` consecutive
    /// failures and probes again after `cooldown_seconds`
    pub fn new(provider: Provider, failure_threshold: u32, cooldown_seconds: i64) -> Self {
        Self {
            provider,
            failure_threshold,
            cooldown_seconds,
            inner: RwLock::new(Inner {
                state: BreakerState::Closed,
                failure_count: 0,
                last_failure: None,
            }),
        }
    }

    /// True when a request may go out. An open breaker whose cooldown
    /// has elapsed flips to half-open and admits this request as the
    /// probe.
    pub async fn allow(&self) -> bool {
        let mut inner = self.inner.write().await;
        match inner.state {
            BreakerState::Closed | BreakerState::HalfOpen => true,
            BreakerState::Open => {
                if self.cooldown_elapsed(&inner) {
                    info!(
                        provider = self.provider.as_str(),
                        "circuit half-open, probing provider"
                    );
                    inner.state = BreakerState::HalfOpen;
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Record a successful request
    pub async fn record_success(&self) {
        let mut inner = self.inner.write().await;
        match inner.state {
            BreakerState::HalfOpen => {
                info!(provider = self.provider.as_str(), "circuit closed again");
                inner.state = BreakerState::Closed;
                inner.failure_count = 0;
            }
            BreakerState::Closed => {
                inner.failure_count = 0;
            }
            BreakerState::Open => {}
        }
    }

    /// Record a failed request
    pub async fn record_failure(&self) {
        let mut inner = self.inner.write().await;
        inner.last_failure = Some(Utc::now());
        match inner.state {
            BreakerState::Closed => {
                inner.failure_count += 1;
                if inner.failure_count >= self.failure_threshold {
                    warn!(
                        provider = self.provider.as_str(),
                        failures = inner.failure_count,
                        "circuit opened"
                    );
                    inner.state = BreakerState::Open;
                }
            }
            BreakerState::HalfOpen => {
                warn!(
                    provider = self.provider.as_str(),
                    "probe failed, circuit open again"
                );
                inner.state = BreakerState::Open;
                inner.failure_count = 0;
            }
            BreakerState::Open => {}
        }
    }

    /// Current state, for tests and introspection
    pub async fn state(&self) -> BreakerState {
        self.inner.read().await.state
    }

    fn cooldown_elapsed(&self, inner: &Inner) -> bool {
        match inner.last_failure {
            Some(last) => (Utc::now() - last).num_seconds() >= self.cooldown_seconds,
            None => true,
        }
    }
}
