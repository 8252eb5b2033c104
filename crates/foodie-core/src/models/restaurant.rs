//! Restaurant domain model.
//!
//! Restaurants are the root of country scoping: menu items inherit the
//! country of their restaurant, and orders copy it at creation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::country::Country;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// Assigned at creation, immutable thereafter.
    pub country: Country,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRestaurant {
    pub name: String,
    pub description: Option<String>,
    pub country: Country,
    pub address: Option<String>,
    pub phone: Option<String>,
}

/// A restaurant together with the number of items on its menu, as
/// shown in listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantSummary {
    pub restaurant: Restaurant,
    pub menu_item_count: u64,
}
