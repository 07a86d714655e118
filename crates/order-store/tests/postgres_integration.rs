//! PostgreSQL integration tests
//!
//! These tests use a shared PostgreSQL container for efficiency.
//! Run with:
//!
//! ```bash
//! cargo test -p order-store --test postgres_integration
//! ```

use std::sync::Arc;

use common::{CustomerId, Money, OrderId, PageRequest, ProductId, Version};
use domain::{Order, OrderItem, OrderStatus};
use order_store::{OrderRepository, PostgresOrderRepository, StoreError};
use serial_test::serial;
use sqlx::PgPool;
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

/// Global shared container
static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            let temp_pool = PgPool::connect(&connection_string).await.unwrap();

            sqlx::raw_sql(include_str!("../../../migrations/001_create_orders_table.sql"))
                .execute(&temp_pool)
                .await
                .unwrap();

            temp_pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

/// Get a fresh repository with its own pool and a cleared table
async fn get_test_repo() -> PostgresOrderRepository {
    let info = get_container_info().await;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&info.connection_string)
        .await
        .unwrap();

    sqlx::query("TRUNCATE TABLE orders")
        .execute(&pool)
        .await
        .unwrap();

    PostgresOrderRepository::new(pool)
}

fn order_for(customer: &str) -> Order {
    let items = vec![
        OrderItem::new(
            ProductId::new(42),
            "Widget",
            2,
            Money::from_cents(999),
            None,
        )
        .unwrap(),
        OrderItem::new(
            ProductId::new(7),
            "Gadget",
            1,
            Money::from_cents(2500),
            Some("wrap it".to_string()),
        )
        .unwrap(),
    ];
    Order::new(CustomerId::new(customer).unwrap(), items, Some("note".to_string())).unwrap()
}

#[tokio::test]
#[serial]
async fn save_and_load_roundtrip() {
    let repo = get_test_repo().await;

    let saved = repo.save(order_for("C1")).await.unwrap();
    assert!(saved.id().is_some());
    assert_eq!(saved.version(), Version::new(1));

    let loaded = repo.find_by_id(saved.id().unwrap()).await.unwrap().unwrap();
    assert_eq!(loaded.customer_id().as_str(), "C1");
    assert_eq!(loaded.status(), OrderStatus::Pending);
    assert_eq!(loaded.total_amount().cents(), 2 * 999 + 2500);
    assert_eq!(loaded.items().len(), 2);
    assert_eq!(loaded.items()[0].product_id, ProductId::new(42));
    assert_eq!(loaded.items()[1].notes.as_deref(), Some("wrap it"));
    assert_eq!(loaded.notes(), Some("note"));
}

#[tokio::test]
#[serial]
async fn save_bumps_version_and_updated_at() {
    let repo = get_test_repo().await;

    let saved = repo.save(order_for("C1")).await.unwrap();
    let first_updated = saved.updated_at();

    let mut confirmed = saved;
    confirmed.confirm().unwrap();
    let again = repo.save(confirmed).await.unwrap();

    assert_eq!(again.version(), Version::new(2));
    assert!(again.updated_at() >= first_updated);

    let loaded = repo.find_by_id(again.id().unwrap()).await.unwrap().unwrap();
    assert_eq!(loaded.status(), OrderStatus::Confirmed);
    assert_eq!(loaded.version(), Version::new(2));
}

#[tokio::test]
#[serial]
async fn stale_version_save_is_rejected() {
    let repo = get_test_repo().await;

    let saved = repo.save(order_for("C1")).await.unwrap();
    let id = saved.id().unwrap();

    let copy_a = repo.find_by_id(id).await.unwrap().unwrap();
    let copy_b = repo.find_by_id(id).await.unwrap().unwrap();

    repo.save(copy_a).await.unwrap();

    let result = repo.save(copy_b).await;
    match result {
        Err(StoreError::VersionConflict {
            order_id,
            expected,
            actual,
        }) => {
            assert_eq!(order_id, id);
            assert_eq!(expected, Version::new(1));
            assert_eq!(actual, Version::new(2));
        }
        other => panic!("expected version conflict, got {other:?}"),
    }
}

#[tokio::test]
#[serial]
async fn update_of_missing_row_is_not_found() {
    let repo = get_test_repo().await;

    let mut order = order_for("C1");
    let phantom_id = OrderId::new();
    order.mark_persisted(phantom_id, Version::new(1), chrono::Utc::now());

    let result = repo.save(order).await;
    assert!(matches!(result, Err(StoreError::NotFound(id)) if id == phantom_id));
}

#[tokio::test]
#[serial]
async fn find_by_id_missing_returns_none() {
    let repo = get_test_repo().await;
    let found = repo.find_by_id(OrderId::new()).await.unwrap();
    assert!(found.is_none());
}

#[tokio::test]
#[serial]
async fn find_by_customer_with_pagination() {
    let repo = get_test_repo().await;

    for _ in 0..3 {
        repo.save(order_for("C1")).await.unwrap();
    }
    repo.save(order_for("C2")).await.unwrap();

    let c1 = CustomerId::new("C1").unwrap();
    let page = repo
        .find_by_customer(&c1, PageRequest::new(0, 2))
        .await
        .unwrap();
    assert_eq!(page.content.len(), 2);
    assert_eq!(page.total_elements, 3);
    assert_eq!(page.total_pages(), 2);

    let last = repo
        .find_by_customer(&c1, PageRequest::new(1, 2))
        .await
        .unwrap();
    assert_eq!(last.content.len(), 1);
}

#[tokio::test]
#[serial]
async fn find_by_status_and_counts() {
    let repo = get_test_repo().await;

    let saved = repo.save(order_for("C1")).await.unwrap();
    repo.save(order_for("C2")).await.unwrap();

    let mut cancelled = saved;
    cancelled.cancel("test").unwrap();
    repo.save(cancelled).await.unwrap();

    let pending = repo
        .find_by_status(OrderStatus::Pending, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(pending.total_elements, 1);

    assert_eq!(repo.count().await.unwrap(), 2);
    assert_eq!(
        repo.count_by_status(OrderStatus::Cancelled).await.unwrap(),
        1
    );
    assert_eq!(
        repo.count_by_status(OrderStatus::Delivered).await.unwrap(),
        0
    );
}

#[tokio::test]
#[serial]
async fn cancellation_reason_persists() {
    let repo = get_test_repo().await;

    let saved = repo.save(order_for("C1")).await.unwrap();
    let mut cancelled = saved;
    cancelled.cancel("customer request").unwrap();
    let saved = repo.save(cancelled).await.unwrap();

    let loaded = repo.find_by_id(saved.id().unwrap()).await.unwrap().unwrap();
    assert_eq!(loaded.status(), OrderStatus::Cancelled);
    assert_eq!(loaded.cancellation_reason(), Some("customer request"));
}
