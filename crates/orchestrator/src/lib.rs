//! Order orchestration core.
//!
//! Coordinates order creation and cancellation across the order repository
//! and the remote product catalog, with an explicit resilience policy
//! (circuit breaker, bounded retries, per-call timeouts) and degraded
//! fallback paths when the catalog is unreachable.

pub mod breaker;
pub mod cache;
pub mod error;
pub mod events;
pub mod orchestrator;
pub mod policy;
pub mod statistics;

pub use breaker::{CircuitBreaker, CircuitState};
pub use cache::OrderCache;
pub use error::{OrchestratorError, Result};
pub use events::{InMemorySink, NotificationSink, OrderNotification, TracingSink};
pub use orchestrator::{CreateOrderItem, CreateOrderRequest, OrderOrchestrator};
pub use policy::ResilienceConfig;
pub use statistics::OrderStatistics;
