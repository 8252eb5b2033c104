//! SurrealDB implementation of [`MenuItemRepository`].

use chrono::{DateTime, Utc};
use foodie_core::error::{FoodieError, FoodieResult};
use foodie_core::models::menu_item::{CreateMenuItem, MenuItem};
use foodie_core::repository::MenuItemRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::{DbError, parse_uuid};

#[derive(Debug, SurrealValue)]
struct MenuItemRow {
    restaurant_id: String,
    name: String,
    description: Option<String>,
    price_cents: i64,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct MenuItemRowWithId {
    record_id: String,
    restaurant_id: String,
    name: String,
    description: Option<String>,
    price_cents: i64,
    created_at: DateTime<Utc>,
}

impl MenuItemRow {
    fn into_menu_item(self, id: Uuid) -> Result<MenuItem, DbError> {
        Ok(MenuItem {
            id,
            restaurant_id: parse_uuid("restaurant", &self.restaurant_id)?,
            name: self.name,
            description: self.description,
            price_cents: self.price_cents,
            created_at: self.created_at,
        })
    }
}

impl MenuItemRowWithId {
    fn try_into_menu_item(self) -> Result<MenuItem, DbError> {
        let id = parse_uuid("menu_item", &self.record_id)?;
        MenuItemRow {
            restaurant_id: self.restaurant_id,
            name: self.name,
            description: self.description,
            price_cents: self.price_cents,
            created_at: self.created_at,
        }
        .into_menu_item(id)
    }
}

/// SurrealDB implementation of the MenuItem repository.
#[derive(Clone)]
pub struct SurrealMenuItemRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealMenuItemRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> MenuItemRepository for SurrealMenuItemRepository<C> {
    async fn create(&self, input: CreateMenuItem) -> FoodieResult<MenuItem> {
        if input.price_cents < 0 {
            return Err(FoodieError::Validation {
                message: "price must not be negative".into(),
            });
        }

        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('menu_item', $id) SET \
                 restaurant_id = $restaurant_id, \
                 name = $name, \
                 description = $description, \
                 price_cents = $price_cents",
            )
            .bind(("id", id_str.clone()))
            .bind(("restaurant_id", input.restaurant_id.to_string()))
            .bind(("name", input.name))
            .bind(("description", input.description))
            .bind(("price_cents", input.price_cents))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<MenuItemRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "menu_item".into(),
            id: id_str,
        })?;

        Ok(row.into_menu_item(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> FoodieResult<MenuItem> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('menu_item', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<MenuItemRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "menu_item".into(),
            id: id_str,
        })?;

        Ok(row.into_menu_item(id)?)
    }

    async fn list_by_restaurant(&self, restaurant_id: Uuid) -> FoodieResult<Vec<MenuItem>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM menu_item \
                 WHERE restaurant_id = $restaurant_id \
                 ORDER BY name ASC",
            )
            .bind(("restaurant_id", restaurant_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<MenuItemRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_menu_item())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(items)
    }
}
