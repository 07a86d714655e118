//! Order lifecycle and query endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use catalog::CatalogGateway;
use common::{CustomerId, OrderId, Page, PageRequest};
use domain::{Order, OrderStatus};
use order_store::OrderRepository;
use orchestrator::{
    CreateOrderItem, CreateOrderRequest, NotificationSink, OrderOrchestrator, OrderStatistics,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<R, C, N> {
    pub orchestrator: OrderOrchestrator<R, C, N>,
}

// -- Request types --

#[derive(Deserialize)]
pub struct CreateOrderBody {
    pub customer_id: String,
    pub items: Vec<OrderItemBody>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct OrderItemBody {
    pub product_id: u64,
    pub quantity: u32,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct CancelOrderBody {
    pub reason: String,
}

#[derive(Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub page: Option<usize>,
    #[serde(default)]
    pub size: Option<usize>,
}

// -- Response types --

#[derive(Serialize)]
pub struct OrderResponse {
    pub id: String,
    pub customer_id: String,
    pub status: String,
    pub total_cents: i64,
    pub notes: Option<String>,
    pub cancellation_reason: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub version: i64,
    pub items: Vec<OrderItemResponse>,
}

#[derive(Serialize)]
pub struct OrderItemResponse {
    pub product_id: u64,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price_cents: i64,
    pub total_price_cents: i64,
    pub notes: Option<String>,
}

#[derive(Serialize)]
pub struct PageResponse<T> {
    pub content: Vec<T>,
    pub page: usize,
    pub size: usize,
    pub total_elements: usize,
    pub total_pages: usize,
}

impl From<&Order> for OrderResponse {
    fn from(order: &Order) -> Self {
        let items = order
            .items()
            .iter()
            .map(|item| OrderItemResponse {
                product_id: item.product_id.value(),
                product_name: item.product_name.clone(),
                quantity: item.quantity,
                unit_price_cents: item.unit_price.cents(),
                total_price_cents: item.total_price().cents(),
                notes: item.notes.clone(),
            })
            .collect();
        Self {
            id: order.id().map(|id| id.to_string()).unwrap_or_default(),
            customer_id: order.customer_id().to_string(),
            status: order.status().as_str().to_string(),
            total_cents: order.total_amount().cents(),
            notes: order.notes().map(String::from),
            cancellation_reason: order.cancellation_reason().map(String::from),
            created_at: order.created_at().to_rfc3339(),
            updated_at: order.updated_at().to_rfc3339(),
            version: order.version().as_i64(),
            items,
        }
    }
}

fn page_response(page: Page<Order>) -> PageResponse<OrderResponse> {
    let total_pages = page.total_pages();
    PageResponse {
        content: page.content.iter().map(OrderResponse::from).collect(),
        page: page.page,
        size: page.size,
        total_elements: page.total_elements,
        total_pages,
    }
}

// -- Handlers --

/// POST /orders — create an order for a customer.
#[tracing::instrument(skip(state, body))]
pub async fn create<R, C, N>(
    State(state): State<Arc<AppState<R, C, N>>>,
    Json(body): Json<CreateOrderBody>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError>
where
    R: OrderRepository + 'static,
    C: CatalogGateway + 'static,
    N: NotificationSink + 'static,
{
    let customer_id = CustomerId::new(body.customer_id)
        .map_err(|e| ApiError::BadRequest(format!("Invalid customer_id: {e}")))?;
    let request = CreateOrderRequest {
        customer_id,
        items: body
            .items
            .into_iter()
            .map(|item| CreateOrderItem {
                product_id: item.product_id.into(),
                quantity: item.quantity,
                notes: item.notes,
            })
            .collect(),
        notes: body.notes,
    };

    let order = state.orchestrator.create_order(request).await?;
    Ok((StatusCode::CREATED, Json(OrderResponse::from(&order))))
}

/// GET /orders/:id — fetch one order.
#[tracing::instrument(skip(state))]
pub async fn get<R, C, N>(
    State(state): State<Arc<AppState<R, C, N>>>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError>
where
    R: OrderRepository + 'static,
    C: CatalogGateway + 'static,
    N: NotificationSink + 'static,
{
    let order_id = parse_order_id(&id)?;
    let order = state.orchestrator.get_order(order_id).await?;
    Ok(Json(OrderResponse::from(&order)))
}

/// GET /orders — paginated listing, optionally filtered by customer or
/// status. The two filters are mutually exclusive.
#[tracing::instrument(skip(state, query))]
pub async fn list<R, C, N>(
    State(state): State<Arc<AppState<R, C, N>>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<PageResponse<OrderResponse>>, ApiError>
where
    R: OrderRepository + 'static,
    C: CatalogGateway + 'static,
    N: NotificationSink + 'static,
{
    let page = PageRequest::new(
        query.page.unwrap_or(0),
        query.size.unwrap_or(PageRequest::DEFAULT_SIZE),
    );

    let result = match (query.customer_id, query.status) {
        (Some(_), Some(_)) => {
            return Err(ApiError::BadRequest(
                "customer_id and status filters cannot be combined".to_string(),
            ));
        }
        (Some(customer), None) => {
            let customer_id = CustomerId::new(customer)
                .map_err(|e| ApiError::BadRequest(format!("Invalid customer_id: {e}")))?;
            state
                .orchestrator
                .get_orders_by_customer(&customer_id, page)
                .await?
        }
        (None, Some(status)) => {
            let status = OrderStatus::parse(&status)
                .ok_or_else(|| ApiError::BadRequest(format!("Unknown status: {status}")))?;
            state.orchestrator.get_orders_by_status(status, page).await?
        }
        (None, None) => state.orchestrator.get_all_orders(page).await?,
    };

    Ok(Json(page_response(result)))
}

/// POST /orders/:id/confirm — confirm a pending order.
#[tracing::instrument(skip(state))]
pub async fn confirm<R, C, N>(
    State(state): State<Arc<AppState<R, C, N>>>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError>
where
    R: OrderRepository + 'static,
    C: CatalogGateway + 'static,
    N: NotificationSink + 'static,
{
    let order_id = parse_order_id(&id)?;
    let order = state.orchestrator.confirm_order(order_id).await?;
    Ok(Json(OrderResponse::from(&order)))
}

/// POST /orders/:id/cancel — cancel an order with a reason.
#[tracing::instrument(skip(state, body))]
pub async fn cancel<R, C, N>(
    State(state): State<Arc<AppState<R, C, N>>>,
    Path(id): Path<String>,
    Json(body): Json<CancelOrderBody>,
) -> Result<Json<OrderResponse>, ApiError>
where
    R: OrderRepository + 'static,
    C: CatalogGateway + 'static,
    N: NotificationSink + 'static,
{
    let order_id = parse_order_id(&id)?;
    let order = state
        .orchestrator
        .cancel_order(order_id, &body.reason)
        .await?;
    Ok(Json(OrderResponse::from(&order)))
}

/// POST /orders/:id/deliver — mark an order as delivered.
#[tracing::instrument(skip(state))]
pub async fn deliver<R, C, N>(
    State(state): State<Arc<AppState<R, C, N>>>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError>
where
    R: OrderRepository + 'static,
    C: CatalogGateway + 'static,
    N: NotificationSink + 'static,
{
    let order_id = parse_order_id(&id)?;
    let order = state.orchestrator.mark_order_as_delivered(order_id).await?;
    Ok(Json(OrderResponse::from(&order)))
}

/// GET /orders/statistics — aggregate counts and rates.
#[tracing::instrument(skip(state))]
pub async fn statistics<R, C, N>(
    State(state): State<Arc<AppState<R, C, N>>>,
) -> Result<Json<OrderStatistics>, ApiError>
where
    R: OrderRepository + 'static,
    C: CatalogGateway + 'static,
    N: NotificationSink + 'static,
{
    let stats = state.orchestrator.get_order_statistics().await?;
    Ok(Json(stats))
}

fn parse_order_id(id: &str) -> Result<OrderId, ApiError> {
    let uuid = uuid::Uuid::parse_str(id)
        .map_err(|e| ApiError::BadRequest(format!("Invalid order id: {e}")))?;
    Ok(OrderId::from_uuid(uuid))
}
