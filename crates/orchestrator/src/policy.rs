use std::time::Duration;

/// Resilience settings applied to every remote catalog call.
///
/// Retries and the per-call timeout apply to individual gateway calls;
/// the breaker thresholds govern the shared circuit in
/// [`CircuitBreaker`](crate::breaker::CircuitBreaker).
#[derive(Debug, Clone)]
pub struct ResilienceConfig {
    /// Additional attempts after the first failed call.
    pub max_retries: u32,

    /// Fixed delay between retry attempts.
    pub backoff: Duration,

    /// Per-call timeout; an elapsed timeout counts as a failure.
    pub timeout: Duration,

    /// Outer bound on the remote phase of a single operation; when it
    /// elapses the operation takes its fallback path.
    pub overall_timeout: Duration,

    /// Consecutive failures before the circuit opens.
    pub failure_threshold: u32,

    /// How long the circuit stays open before probing again.
    pub open_duration: Duration,

    /// Successful probes needed to close a half-open circuit.
    pub success_threshold: u32,
}

impl Default for ResilienceConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff: Duration::from_millis(200),
            timeout: Duration::from_secs(5),
            overall_timeout: Duration::from_secs(15),
            failure_threshold: 5,
            open_duration: Duration::from_secs(30),
            success_threshold: 2,
        }
    }
}
