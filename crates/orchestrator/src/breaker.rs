//! Circuit breaker guarding the remote catalog.
//!
//! States:
//! - Closed: normal operation, calls pass through
//! - Open: too many consecutive failures, calls blocked until the cooldown
//!   elapses
//! - HalfOpen: probing recovery; enough successes close the circuit again,
//!   any failure reopens it

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Mutex;

use crate::policy::ResilienceConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

#[derive(Debug)]
struct BreakerInner {
    state: CircuitState,
    failure_count: u32,
    success_count: u32,
    last_failure_at: Option<Instant>,
}

/// Shared breaker state for the catalog dependency.
///
/// One instance is shared by every orchestrator call; cloning is cheap and
/// clones observe the same circuit.
#[derive(Debug, Clone)]
pub struct CircuitBreaker {
    inner: Arc<Mutex<BreakerInner>>,
    failure_threshold: u32,
    open_duration: std::time::Duration,
    success_threshold: u32,
}

impl CircuitBreaker {
    pub fn new(config: &ResilienceConfig) -> Self {
        Self {
            inner: Arc::new(Mutex::new(BreakerInner {
                state: CircuitState::Closed,
                failure_count: 0,
                success_count: 0,
                last_failure_at: None,
            })),
            failure_threshold: config.failure_threshold,
            open_duration: config.open_duration,
            success_threshold: config.success_threshold,
        }
    }

    /// Returns true if a call may be issued right now.
    ///
    /// An open circuit whose cooldown has elapsed transitions to half-open
    /// as a side effect and admits the call as a probe.
    pub async fn allows_request(&self) -> bool {
        let mut inner = self.inner.lock().await;
        match inner.state {
            CircuitState::Closed | CircuitState::HalfOpen => true,
            CircuitState::Open => {
                let cooled_down = inner
                    .last_failure_at
                    .is_some_and(|at| at.elapsed() >= self.open_duration);
                if cooled_down {
                    tracing::info!("circuit breaker transitioning to half-open");
                    inner.state = CircuitState::HalfOpen;
                    inner.success_count = 0;
                    true
                } else {
                    false
                }
            }
        }
    }

    pub async fn record_success(&self) {
        let mut inner = self.inner.lock().await;
        match inner.state {
            CircuitState::HalfOpen => {
                inner.success_count += 1;
                if inner.success_count >= self.success_threshold {
                    tracing::info!(
                        successes = inner.success_count,
                        "circuit breaker closing"
                    );
                    inner.state = CircuitState::Closed;
                    inner.failure_count = 0;
                    inner.success_count = 0;
                    inner.last_failure_at = None;
                }
            }
            CircuitState::Closed => {
                inner.failure_count = 0;
            }
            CircuitState::Open => {}
        }
    }

    pub async fn record_failure(&self) {
        let mut inner = self.inner.lock().await;
        inner.failure_count += 1;
        inner.last_failure_at = Some(Instant::now());

        match inner.state {
            CircuitState::Closed => {
                if inner.failure_count >= self.failure_threshold {
                    tracing::warn!(
                        failures = inner.failure_count,
                        "circuit breaker opening"
                    );
                    inner.state = CircuitState::Open;
                    metrics::counter!("circuit_breaker_opened_total").increment(1);
                }
            }
            CircuitState::HalfOpen => {
                tracing::warn!("failure during half-open, reopening circuit");
                inner.state = CircuitState::Open;
                inner.success_count = 0;
                metrics::counter!("circuit_breaker_opened_total").increment(1);
            }
            CircuitState::Open => {}
        }
    }

    pub async fn state(&self) -> CircuitState {
        self.inner.lock().await.state
    }

    pub async fn failure_count(&self) -> u32 {
        self.inner.lock().await.failure_count
    }

    /// Manually closes the circuit and clears all counters.
    pub async fn reset(&self) {
        let mut inner = self.inner.lock().await;
        tracing::info!("circuit breaker manually reset");
        inner.state = CircuitState::Closed;
        inner.failure_count = 0;
        inner.success_count = 0;
        inner.last_failure_at = None;
    }
}
