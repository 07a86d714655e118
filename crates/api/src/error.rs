//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::OrderError;
use orchestrator::OrchestratorError;
use order_store::StoreError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from the client.
    BadRequest(String),
    /// Orchestrator operation failure.
    Orchestrator(OrchestratorError),
    /// Internal server error.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Orchestrator(err) => orchestrator_error_to_response(err),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn orchestrator_error_to_response(err: OrchestratorError) -> (StatusCode, String) {
    let status = match &err {
        OrchestratorError::OrderNotFound(_) => StatusCode::NOT_FOUND,
        OrchestratorError::ProductNotAvailable(_) => StatusCode::UNPROCESSABLE_ENTITY,
        OrchestratorError::Order(order_err) => match order_err {
            OrderError::InvalidStateTransition { .. } => StatusCode::CONFLICT,
            OrderError::InvalidQuantity { .. }
            | OrderError::InvalidPrice { .. }
            | OrderError::NoItems
            | OrderError::TotalTooLarge { .. }
            | OrderError::NotesTooLong(_)
            | OrderError::CustomerId(_) => StatusCode::BAD_REQUEST,
        },
        OrchestratorError::Store(StoreError::VersionConflict { .. }) => StatusCode::CONFLICT,
        OrchestratorError::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
        OrchestratorError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        OrchestratorError::Catalog(_) => StatusCode::SERVICE_UNAVAILABLE,
    };
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!(error = %err, "internal server error");
    }
    (status, err.to_string())
}

impl From<OrchestratorError> for ApiError {
    fn from(err: OrchestratorError) -> Self {
        ApiError::Orchestrator(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{OrderId, ProductId};
    use domain::OrderStatus;

    fn status_of(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn not_found_maps_to_404() {
        let err = ApiError::from(OrchestratorError::OrderNotFound(OrderId::new()));
        assert_eq!(status_of(err), StatusCode::NOT_FOUND);
    }

    #[test]
    fn product_not_available_maps_to_422() {
        let err = ApiError::from(OrchestratorError::ProductNotAvailable(ProductId::new(1)));
        assert_eq!(status_of(err), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn invalid_transition_maps_to_409() {
        let err = ApiError::from(OrchestratorError::Order(
            OrderError::InvalidStateTransition {
                from: OrderStatus::Delivered,
                action: "cancel",
            },
        ));
        assert_eq!(status_of(err), StatusCode::CONFLICT);
    }

    #[test]
    fn version_conflict_maps_to_409() {
        let err = ApiError::from(OrchestratorError::Store(StoreError::VersionConflict {
            order_id: OrderId::new(),
            expected: common::Version::new(1),
            actual: common::Version::new(2),
        }));
        assert_eq!(status_of(err), StatusCode::CONFLICT);
    }

    #[test]
    fn validation_errors_map_to_400() {
        let err = ApiError::from(OrchestratorError::Order(OrderError::NoItems));
        assert_eq!(status_of(err), StatusCode::BAD_REQUEST);
    }
}
