//! Order domain model.
//!
//! Orders are country-scoped through the restaurant they were opened
//! against. Status changes only go through [`crate::lifecycle`].

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::country::Country;
use crate::error::FoodieError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Line items may still change.
    Draft,
    Placed,
    /// Terminal.
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Draft => "DRAFT",
            OrderStatus::Placed => "PLACED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = FoodieError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DRAFT" => Ok(OrderStatus::Draft),
            "PLACED" => Ok(OrderStatus::Placed),
            "CANCELLED" => Ok(OrderStatus::Cancelled),
            other => Err(FoodieError::Configuration(format!(
                "unknown order status: {other}"
            ))),
        }
    }
}

/// One line of an order. The unit price is captured when the item is
/// added, so later menu price changes do not alter existing orders.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderLine {
    pub id: Uuid,
    pub menu_item_id: Uuid,
    pub quantity: u32,
    pub unit_price_cents: i64,
}

impl OrderLine {
    pub fn subtotal_cents(&self) -> i64 {
        self.unit_price_cents * i64::from(self.quantity)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    /// The identity that opened the order.
    pub owner_id: Uuid,
    pub restaurant_id: Uuid,
    /// Copied from the restaurant at creation.
    pub country: Country,
    pub status: OrderStatus,
    /// In insertion order.
    pub lines: Vec<OrderLine>,
    pub total_cents: i64,
    pub payment_method_id: Option<Uuid>,
    pub notes: Option<String>,
    /// Incremented on every persisted change; used for compare-and-set
    /// writes.
    pub revision: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub placed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl Order {
    pub fn line_total_cents(&self) -> i64 {
        self.lines.iter().map(OrderLine::subtotal_cents).sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrder {
    pub owner_id: Uuid,
    pub restaurant_id: Uuid,
    pub country: Country,
    pub notes: Option<String>,
}

/// Aggregate order figures for the admin dashboard.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderStats {
    pub total_orders: u64,
    pub placed_orders: u64,
    /// Sum of totals over placed orders.
    pub revenue_cents: i64,
}
