//! Payment method domain model.
//!
//! Payment methods are global (not country-scoped) records. Only
//! administrators may create or change them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub id: Uuid,
    /// Unique display label (e.g., `Credit Card`).
    pub name: String,
    pub description: String,
    /// Inactive methods cannot be chosen at checkout.
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePaymentMethod {
    pub name: String,
    pub description: String,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdatePaymentMethod {
    pub name: Option<String>,
    pub description: Option<String>,
    pub active: Option<bool>,
}
