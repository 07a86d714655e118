//! HTTP API server with observability for the order orchestration core.
//!
//! Provides REST endpoints for order lifecycle management and statistics,
//! with structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use catalog::{CatalogGateway, HttpCatalogGateway};
use metrics_exporter_prometheus::PrometheusHandle;
use order_store::{InMemoryOrderRepository, OrderRepository};
use orchestrator::{NotificationSink, OrderOrchestrator, TracingSink};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use routes::orders::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<R, C, N>(state: Arc<AppState<R, C, N>>, metrics_handle: PrometheusHandle) -> Router
where
    R: OrderRepository + 'static,
    C: CatalogGateway + 'static,
    N: NotificationSink + 'static,
{
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::render))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/orders", post(routes::orders::create::<R, C, N>))
        .route("/orders", get(routes::orders::list::<R, C, N>))
        .route("/orders/statistics", get(routes::orders::statistics::<R, C, N>))
        .route("/orders/{id}", get(routes::orders::get::<R, C, N>))
        .route("/orders/{id}/confirm", post(routes::orders::confirm::<R, C, N>))
        .route("/orders/{id}/cancel", post(routes::orders::cancel::<R, C, N>))
        .route("/orders/{id}/deliver", post(routes::orders::deliver::<R, C, N>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the default application state: in-memory repository, HTTP
/// catalog gateway, and log-based notification sink.
pub fn create_default_state(
    config: &Config,
) -> Result<Arc<AppState<InMemoryOrderRepository, HttpCatalogGateway, TracingSink>>, catalog::CatalogError>
{
    let repository = InMemoryOrderRepository::new();
    let gateway = HttpCatalogGateway::new(config.catalog_url.clone(), config.resilience.timeout)?;
    let orchestrator = OrderOrchestrator::new(
        repository,
        gateway,
        TracingSink::new(),
        config.resilience.clone(),
    );
    Ok(Arc::new(AppState { orchestrator }))
}
