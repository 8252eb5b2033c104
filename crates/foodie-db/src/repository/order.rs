//! SurrealDB implementation of [`OrderRepository`].
//!
//! Order lines are embedded in the order record so that a lifecycle
//! transition is one `UPDATE` statement. Writes are guarded by the
//! `revision` column: the update only matches while the stored revision
//! equals the one the caller read.

use chrono::{DateTime, Utc};
use foodie_core::access::Visibility;
use foodie_core::error::FoodieResult;
use foodie_core::models::order::{CreateOrder, Order, OrderLine, OrderStats, OrderStatus};
use foodie_core::repository::{OrderRepository, PaginatedResult, Pagination};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::debug;
use uuid::Uuid;

use super::{CountRow, country_filter, parse_enum};
use crate::error::{DbError, parse_uuid, write_error};

#[derive(Debug, SurrealValue)]
struct OrderRow {
    owner_id: String,
    restaurant_id: String,
    country: String,
    status: String,
    lines: serde_json::Value,
    total_cents: i64,
    payment_method_id: Option<String>,
    notes: Option<String>,
    revision: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    placed_at: Option<DateTime<Utc>>,
    cancelled_at: Option<DateTime<Utc>>,
}

#[derive(Debug, SurrealValue)]
struct OrderRowWithId {
    record_id: String,
    owner_id: String,
    restaurant_id: String,
    country: String,
    status: String,
    lines: serde_json::Value,
    total_cents: i64,
    payment_method_id: Option<String>,
    notes: Option<String>,
    revision: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    placed_at: Option<DateTime<Utc>>,
    cancelled_at: Option<DateTime<Utc>>,
}

#[derive(Debug, SurrealValue)]
struct RevenueRow {
    total: u64,
    revenue: i64,
}

impl OrderRow {
    fn into_order(self, id: Uuid) -> Result<Order, DbError> {
        let lines: Vec<OrderLine> = serde_json::from_value(self.lines)
            .map_err(|e| DbError::Corrupt(format!("invalid order lines: {e}")))?;
        let payment_method_id = self
            .payment_method_id
            .as_deref()
            .map(|s| parse_uuid("payment_method", s))
            .transpose()?;

        Ok(Order {
            id,
            owner_id: parse_uuid("owner", &self.owner_id)?,
            restaurant_id: parse_uuid("restaurant", &self.restaurant_id)?,
            country: parse_enum("country", &self.country)?,
            status: parse_enum("order status", &self.status)?,
            lines,
            total_cents: self.total_cents,
            payment_method_id,
            notes: self.notes,
            revision: self.revision,
            created_at: self.created_at,
            updated_at: self.updated_at,
            placed_at: self.placed_at,
            cancelled_at: self.cancelled_at,
        })
    }
}

impl OrderRowWithId {
    fn try_into_order(self) -> Result<Order, DbError> {
        let id = parse_uuid("order", &self.record_id)?;
        OrderRow {
            owner_id: self.owner_id,
            restaurant_id: self.restaurant_id,
            country: self.country,
            status: self.status,
            lines: self.lines,
            total_cents: self.total_cents,
            payment_method_id: self.payment_method_id,
            notes: self.notes,
            revision: self.revision,
            created_at: self.created_at,
            updated_at: self.updated_at,
            placed_at: self.placed_at,
            cancelled_at: self.cancelled_at,
        }
        .into_order(id)
    }
}

/// SurrealDB implementation of the Order repository.
#[derive(Clone)]
pub struct SurrealOrderRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealOrderRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> OrderRepository for SurrealOrderRepository<C> {
    async fn create(&self, input: CreateOrder) -> FoodieResult<Order> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('food_order', $id) SET \
                 owner_id = $owner_id, \
                 restaurant_id = $restaurant_id, \
                 country = $country, \
                 status = $status, \
                 lines = [], \
                 total_cents = 0, \
                 notes = $notes, \
                 revision = 0",
            )
            .bind(("id", id_str.clone()))
            .bind(("owner_id", input.owner_id.to_string()))
            .bind(("restaurant_id", input.restaurant_id.to_string()))
            .bind(("country", input.country.as_str().to_string()))
            .bind(("status", OrderStatus::Draft.as_str().to_string()))
            .bind(("notes", input.notes))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<OrderRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "order".into(),
            id: id_str,
        })?;

        Ok(row.into_order(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> FoodieResult<Order> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('food_order', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<OrderRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "order".into(),
            id: id_str,
        })?;

        Ok(row.into_order(id)?)
    }

    async fn find_draft(&self, owner_id: Uuid, restaurant_id: Uuid) -> FoodieResult<Option<Order>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM food_order \
                 WHERE owner_id = $owner_id \
                 AND restaurant_id = $restaurant_id \
                 AND status = $status \
                 ORDER BY created_at DESC LIMIT 1",
            )
            .bind(("owner_id", owner_id.to_string()))
            .bind(("restaurant_id", restaurant_id.to_string()))
            .bind(("status", OrderStatus::Draft.as_str().to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<OrderRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(rows
            .into_iter()
            .next()
            .map(|row| row.try_into_order())
            .transpose()?)
    }

    async fn list(
        &self,
        visibility: Visibility,
        pagination: Pagination,
    ) -> FoodieResult<PaginatedResult<Order>> {
        let (filter, country) = country_filter(visibility);

        let count_query = format!("SELECT count() AS total FROM food_order {filter} GROUP ALL");
        let mut count_builder = self.db.query(&count_query);
        if let Some(ref country) = country {
            count_builder = count_builder.bind(("country", country.clone()));
        }
        let mut count_result = count_builder.await.map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let query = format!(
            "SELECT meta::id(id) AS record_id, * FROM food_order {filter} \
             ORDER BY created_at DESC \
             LIMIT $limit START $offset"
        );
        let mut builder = self
            .db
            .query(&query)
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset));
        if let Some(country) = country {
            builder = builder.bind(("country", country));
        }
        let mut result = builder.await.map_err(DbError::from)?;
        let rows: Vec<OrderRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_order())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }

    async fn update(&self, order: &Order) -> FoodieResult<Order> {
        let id_str = order.id.to_string();
        let lines = serde_json::to_value(&order.lines)
            .map_err(|e| DbError::Corrupt(format!("unserializable order lines: {e}")))?;

        let result = self
            .db
            .query(
                "UPDATE type::record('food_order', $id) SET \
                 status = $status, \
                 lines = $lines, \
                 total_cents = $total_cents, \
                 payment_method_id = $payment_method_id, \
                 notes = $notes, \
                 updated_at = $updated_at, \
                 placed_at = $placed_at, \
                 cancelled_at = $cancelled_at, \
                 revision = revision + 1 \
                 WHERE revision = $expected",
            )
            .bind(("id", id_str.clone()))
            .bind(("status", order.status.as_str().to_string()))
            .bind(("lines", lines))
            .bind(("total_cents", order.total_cents))
            .bind((
                "payment_method_id",
                order.payment_method_id.map(|id| id.to_string()),
            ))
            .bind(("notes", order.notes.clone()))
            .bind(("updated_at", order.updated_at))
            .bind(("placed_at", order.placed_at))
            .bind(("cancelled_at", order.cancelled_at))
            .bind(("expected", order.revision))
            .await
            .map_err(|e| write_error("order", &id_str, e))?;

        let mut result = result
            .check()
            .map_err(|e| write_error("order", &id_str, e))?;

        let rows: Vec<OrderRow> = result.take(0).map_err(DbError::from)?;
        match rows.into_iter().next() {
            Some(row) => Ok(row.into_order(order.id)?),
            None => {
                // Either the record is gone or its revision moved on.
                self.get_by_id(order.id).await?;
                debug!(
                    order_id = %order.id,
                    expected_revision = order.revision,
                    "Order revision mismatch"
                );
                Err(DbError::Conflict {
                    entity: "order".into(),
                    id: id_str,
                }
                .into())
            }
        }
    }

    async fn stats(&self) -> FoodieResult<OrderStats> {
        let mut count_result = self
            .db
            .query("SELECT count() AS total FROM food_order GROUP ALL")
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total_orders = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut placed_result = self
            .db
            .query(
                "SELECT count() AS total, math::sum(total_cents) AS revenue \
                 FROM food_order WHERE status = $status GROUP ALL",
            )
            .bind(("status", OrderStatus::Placed.as_str().to_string()))
            .await
            .map_err(DbError::from)?;
        let placed_rows: Vec<RevenueRow> = placed_result.take(0).map_err(DbError::from)?;
        let (placed_orders, revenue_cents) = placed_rows
            .first()
            .map(|r| (r.total, r.revenue))
            .unwrap_or((0, 0));

        Ok(OrderStats {
            total_orders,
            placed_orders,
            revenue_cents,
        })
    }
}
