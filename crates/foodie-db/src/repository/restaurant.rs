//! SurrealDB implementation of [`RestaurantRepository`].

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use foodie_core::access::Visibility;
use foodie_core::error::FoodieResult;
use foodie_core::models::restaurant::{CreateRestaurant, Restaurant, RestaurantSummary};
use foodie_core::repository::RestaurantRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::{CountRow, country_filter, parse_enum};
use crate::error::{DbError, parse_uuid};

#[derive(Debug, SurrealValue)]
struct RestaurantRow {
    name: String,
    description: Option<String>,
    country: String,
    address: Option<String>,
    phone: Option<String>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct RestaurantRowWithId {
    record_id: String,
    name: String,
    description: Option<String>,
    country: String,
    address: Option<String>,
    phone: Option<String>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct MenuCountRow {
    restaurant_id: String,
    total: u64,
}

impl RestaurantRow {
    fn into_restaurant(self, id: Uuid) -> Result<Restaurant, DbError> {
        Ok(Restaurant {
            id,
            name: self.name,
            description: self.description,
            country: parse_enum("country", &self.country)?,
            address: self.address,
            phone: self.phone,
            created_at: self.created_at,
        })
    }
}

impl RestaurantRowWithId {
    fn try_into_restaurant(self) -> Result<Restaurant, DbError> {
        let id = parse_uuid("restaurant", &self.record_id)?;
        RestaurantRow {
            name: self.name,
            description: self.description,
            country: self.country,
            address: self.address,
            phone: self.phone,
            created_at: self.created_at,
        }
        .into_restaurant(id)
    }
}

/// SurrealDB implementation of the Restaurant repository.
#[derive(Clone)]
pub struct SurrealRestaurantRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealRestaurantRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn menu_counts(&self) -> Result<HashMap<String, u64>, DbError> {
        let mut result = self
            .db
            .query(
                "SELECT restaurant_id, count() AS total FROM menu_item \
                 GROUP BY restaurant_id",
            )
            .await?;
        let rows: Vec<MenuCountRow> = result.take(0)?;
        Ok(rows
            .into_iter()
            .map(|r| (r.restaurant_id, r.total))
            .collect())
    }
}

impl<C: Connection> RestaurantRepository for SurrealRestaurantRepository<C> {
    async fn create(&self, input: CreateRestaurant) -> FoodieResult<Restaurant> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('restaurant', $id) SET \
                 name = $name, \
                 description = $description, \
                 country = $country, \
                 address = $address, \
                 phone = $phone",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", input.name))
            .bind(("description", input.description))
            .bind(("country", input.country.as_str().to_string()))
            .bind(("address", input.address))
            .bind(("phone", input.phone))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<RestaurantRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "restaurant".into(),
            id: id_str,
        })?;

        Ok(row.into_restaurant(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> FoodieResult<Restaurant> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('restaurant', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RestaurantRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "restaurant".into(),
            id: id_str,
        })?;

        Ok(row.into_restaurant(id)?)
    }

    async fn list(&self, visibility: Visibility) -> FoodieResult<Vec<RestaurantSummary>> {
        let (filter, country) = country_filter(visibility);
        let query = format!(
            "SELECT meta::id(id) AS record_id, * FROM restaurant {filter} \
             ORDER BY country ASC, name ASC"
        );

        let mut builder = self.db.query(&query);
        if let Some(country) = country {
            builder = builder.bind(("country", country));
        }
        let mut result = builder.await.map_err(DbError::from)?;
        let rows: Vec<RestaurantRowWithId> = result.take(0).map_err(DbError::from)?;

        let counts = self.menu_counts().await?;

        rows.into_iter()
            .map(|row| {
                let menu_item_count = counts.get(&row.record_id).copied().unwrap_or(0);
                Ok(RestaurantSummary {
                    restaurant: row.try_into_restaurant()?,
                    menu_item_count,
                })
            })
            .collect::<Result<Vec<_>, DbError>>()
            .map_err(Into::into)
    }

    async fn count(&self) -> FoodieResult<u64> {
        let mut result = self
            .db
            .query("SELECT count() AS total FROM restaurant GROUP ALL")
            .await
            .map_err(DbError::from)?;
        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }
}
