//! SurrealDB implementation of [`PaymentMethodRepository`].

use chrono::{DateTime, Utc};
use foodie_core::error::FoodieResult;
use foodie_core::models::payment_method::{
    CreatePaymentMethod, PaymentMethod, UpdatePaymentMethod,
};
use foodie_core::repository::PaymentMethodRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::CountRow;
use crate::error::{DbError, parse_uuid};

#[derive(Debug, SurrealValue)]
struct PaymentMethodRow {
    name: String,
    description: String,
    active: bool,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct PaymentMethodRowWithId {
    record_id: String,
    name: String,
    description: String,
    active: bool,
    created_at: DateTime<Utc>,
}

impl PaymentMethodRow {
    fn into_payment_method(self, id: Uuid) -> PaymentMethod {
        PaymentMethod {
            id,
            name: self.name,
            description: self.description,
            active: self.active,
            created_at: self.created_at,
        }
    }
}

impl PaymentMethodRowWithId {
    fn try_into_payment_method(self) -> Result<PaymentMethod, DbError> {
        Ok(PaymentMethod {
            id: parse_uuid("payment_method", &self.record_id)?,
            name: self.name,
            description: self.description,
            active: self.active,
            created_at: self.created_at,
        })
    }
}

/// SurrealDB implementation of the PaymentMethod repository.
#[derive(Clone)]
pub struct SurrealPaymentMethodRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealPaymentMethodRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    /// Whether another method already uses `name`.
    async fn name_taken(&self, name: &str, except: Option<Uuid>) -> Result<bool, DbError> {
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM payment_method \
                 WHERE name = $name AND meta::id(id) != $except GROUP ALL",
            )
            .bind(("name", name.to_string()))
            .bind(("except", except.map(|id| id.to_string()).unwrap_or_default()))
            .await?;
        let rows: Vec<CountRow> = result.take(0)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0) > 0)
    }
}

impl<C: Connection> PaymentMethodRepository for SurrealPaymentMethodRepository<C> {
    async fn create(&self, input: CreatePaymentMethod) -> FoodieResult<PaymentMethod> {
        if self.name_taken(&input.name, None).await? {
            return Err(DbError::AlreadyExists {
                entity: format!("payment_method name={}", input.name),
            }
            .into());
        }

        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('payment_method', $id) SET \
                 name = $name, \
                 description = $description, \
                 active = $active",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", input.name))
            .bind(("description", input.description))
            .bind(("active", input.active))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<PaymentMethodRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "payment_method".into(),
            id: id_str,
        })?;

        Ok(row.into_payment_method(id))
    }

    async fn get_by_id(&self, id: Uuid) -> FoodieResult<PaymentMethod> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('payment_method', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<PaymentMethodRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "payment_method".into(),
            id: id_str,
        })?;

        Ok(row.into_payment_method(id))
    }

    async fn list(&self, active_only: bool) -> FoodieResult<Vec<PaymentMethod>> {
        let query = if active_only {
            "SELECT meta::id(id) AS record_id, * FROM payment_method \
             WHERE active = true ORDER BY name ASC"
        } else {
            "SELECT meta::id(id) AS record_id, * FROM payment_method \
             ORDER BY name ASC"
        };

        let mut result = self.db.query(query).await.map_err(DbError::from)?;
        let rows: Vec<PaymentMethodRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_payment_method())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(items)
    }

    async fn update(&self, id: Uuid, input: UpdatePaymentMethod) -> FoodieResult<PaymentMethod> {
        let id_str = id.to_string();

        if let Some(ref name) = input.name {
            if self.name_taken(name, Some(id)).await? {
                return Err(DbError::AlreadyExists {
                    entity: format!("payment_method name={name}"),
                }
                .into());
            }
        }

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.description.is_some() {
            sets.push("description = $description");
        }
        if input.active.is_some() {
            sets.push("active = $active");
        }
        if sets.is_empty() {
            return self.get_by_id(id).await;
        }

        let query = format!(
            "UPDATE type::record('payment_method', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(description) = input.description {
            builder = builder.bind(("description", description));
        }
        if let Some(active) = input.active {
            builder = builder.bind(("active", active));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<PaymentMethodRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "payment_method".into(),
            id: id_str,
        })?;

        Ok(row.into_payment_method(id))
    }
}
