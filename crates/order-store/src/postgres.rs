use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{CustomerId, Money, OrderId, Page, PageRequest, Version};
use domain::{Order, OrderItem, OrderStatus};
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::error::{Result, StoreError};
use crate::repository::OrderRepository;

/// PostgreSQL-backed order repository.
///
/// One row per aggregate; line items are embedded as a JSONB column so the
/// aggregate is saved and loaded atomically. Optimistic concurrency is
/// enforced with a guarded `UPDATE ... WHERE version = $n`.
#[derive(Clone)]
pub struct PostgresOrderRepository {
    pool: PgPool,
}

impl PostgresOrderRepository {
    /// Creates a new PostgreSQL order repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn row_to_order(row: PgRow) -> Result<Order> {
        let items_json: serde_json::Value = row.try_get("items")?;
        let items: Vec<OrderItem> = serde_json::from_value(items_json)?;

        let customer_id: String = row.try_get("customer_id")?;
        let customer_id = CustomerId::new(customer_id).map_err(invalid_row)?;

        let status: String = row.try_get("status")?;
        let status = OrderStatus::parse(&status)
            .ok_or_else(|| invalid_row(format!("unknown order status '{status}'")))?;

        Ok(Order::from_parts(
            OrderId::from_uuid(row.try_get::<Uuid, _>("id")?),
            customer_id,
            status,
            Money::from_cents(row.try_get("total_amount_cents")?),
            row.try_get("notes")?,
            row.try_get("cancellation_reason")?,
            row.try_get::<DateTime<Utc>, _>("created_at")?,
            row.try_get::<DateTime<Utc>, _>("updated_at")?,
            Version::new(row.try_get("version")?),
            items,
        ))
    }

    async fn query_page(
        &self,
        where_clause: &str,
        bind: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<Order>> {
        let count_sql = format!("SELECT COUNT(*) FROM orders {where_clause}");
        let select_sql = format!(
            "SELECT * FROM orders {where_clause} ORDER BY created_at, id LIMIT {} OFFSET {}",
            page.size,
            page.offset()
        );

        let (total, rows) = if let Some(value) = bind {
            let total: i64 = sqlx::query_scalar(&count_sql)
                .bind(value)
                .fetch_one(&self.pool)
                .await?;
            let rows = sqlx::query(&select_sql)
                .bind(value)
                .fetch_all(&self.pool)
                .await?;
            (total, rows)
        } else {
            let total: i64 = sqlx::query_scalar(&count_sql).fetch_one(&self.pool).await?;
            let rows = sqlx::query(&select_sql).fetch_all(&self.pool).await?;
            (total, rows)
        };

        let orders: Vec<Order> = rows
            .into_iter()
            .map(Self::row_to_order)
            .collect::<Result<_>>()?;
        Ok(Page::new(orders, page, total as usize))
    }
}

fn invalid_row(message: impl std::fmt::Display) -> StoreError {
    StoreError::Serialization(serde_json::Error::io(std::io::Error::other(
        message.to_string(),
    )))
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    async fn save(&self, mut order: Order) -> Result<Order> {
        let now = Utc::now();
        let items_json = serde_json::to_value(order.items())?;

        match order.id() {
            None => {
                let id = OrderId::new();
                let version = order.version().next();

                sqlx::query(
                    r#"
                    INSERT INTO orders
                        (id, customer_id, status, total_amount_cents, notes,
                         cancellation_reason, created_at, updated_at, version, items)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                    "#,
                )
                .bind(id.as_uuid())
                .bind(order.customer_id().as_str())
                .bind(order.status().as_str())
                .bind(order.total_amount().cents())
                .bind(order.notes())
                .bind(order.cancellation_reason())
                .bind(order.created_at())
                .bind(now)
                .bind(version.as_i64())
                .bind(&items_json)
                .execute(&self.pool)
                .await?;

                order.mark_persisted(id, version, now);
                Ok(order)
            }
            Some(id) => {
                let expected = order.version();
                let version = expected.next();

                let result = sqlx::query(
                    r#"
                    UPDATE orders
                    SET customer_id = $2, status = $3, total_amount_cents = $4,
                        notes = $5, cancellation_reason = $6, updated_at = $7,
                        version = $8, items = $9
                    WHERE id = $1 AND version = $10
                    "#,
                )
                .bind(id.as_uuid())
                .bind(order.customer_id().as_str())
                .bind(order.status().as_str())
                .bind(order.total_amount().cents())
                .bind(order.notes())
                .bind(order.cancellation_reason())
                .bind(now)
                .bind(version.as_i64())
                .bind(&items_json)
                .bind(expected.as_i64())
                .execute(&self.pool)
                .await?;

                if result.rows_affected() == 0 {
                    // Stale version or missing row; one more read tells which.
                    let actual: Option<i64> =
                        sqlx::query_scalar("SELECT version FROM orders WHERE id = $1")
                            .bind(id.as_uuid())
                            .fetch_optional(&self.pool)
                            .await?;
                    return match actual {
                        Some(actual) => Err(StoreError::VersionConflict {
                            order_id: id,
                            expected,
                            actual: Version::new(actual),
                        }),
                        None => Err(StoreError::NotFound(id)),
                    };
                }

                order.mark_persisted(id, version, now);
                Ok(order)
            }
        }
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>> {
        let row = sqlx::query("SELECT * FROM orders WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_order).transpose()
    }

    async fn find_all(&self, page: PageRequest) -> Result<Page<Order>> {
        self.query_page("", None, page).await
    }

    async fn find_by_customer(
        &self,
        customer_id: &CustomerId,
        page: PageRequest,
    ) -> Result<Page<Order>> {
        self.query_page("WHERE customer_id = $1", Some(customer_id.as_str()), page)
            .await
    }

    async fn find_by_status(
        &self,
        status: OrderStatus,
        page: PageRequest,
    ) -> Result<Page<Order>> {
        self.query_page("WHERE status = $1", Some(status.as_str()), page)
            .await
    }

    async fn count(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }

    async fn count_by_status(&self, status: OrderStatus) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE status = $1")
            .bind(status.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }
}
