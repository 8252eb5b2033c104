//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Country-scoped listings take a
//! [`Visibility`] so the filter is applied in the query rather than after
//! the rows have been loaded.

use uuid::Uuid;

use crate::access::Visibility;
use crate::error::FoodieResult;
use crate::models::{
    menu_item::{CreateMenuItem, MenuItem},
    order::{CreateOrder, Order, OrderStats},
    payment_method::{CreatePaymentMethod, PaymentMethod, UpdatePaymentMethod},
    restaurant::{CreateRestaurant, Restaurant, RestaurantSummary},
    session::{CreateSession, Session},
    user::{CreateUser, User},
};

/// Pagination parameters for list queries.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 50,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

// ---------------------------------------------------------------------------
// Users & sessions
// ---------------------------------------------------------------------------

pub trait UserRepository: Send + Sync {
    /// Hashes `input.password` before storing. Usernames are unique.
    fn create(&self, input: CreateUser) -> impl Future<Output = FoodieResult<User>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = FoodieResult<User>> + Send;
    fn get_by_username(&self, username: &str) -> impl Future<Output = FoodieResult<User>> + Send;
    fn count(&self) -> impl Future<Output = FoodieResult<u64>> + Send;
}

pub trait SessionRepository: Send + Sync {
    fn create(&self, input: CreateSession) -> impl Future<Output = FoodieResult<Session>> + Send;
    fn get_by_token_hash(
        &self,
        token_hash: &str,
    ) -> impl Future<Output = FoodieResult<Session>> + Send;
    fn invalidate(&self, id: Uuid) -> impl Future<Output = FoodieResult<()>> + Send;
    /// Remove all expired sessions, returning how many were removed.
    fn cleanup_expired(&self) -> impl Future<Output = FoodieResult<u64>> + Send;
}

// ---------------------------------------------------------------------------
// Restaurants & menus (country-scoped)
// ---------------------------------------------------------------------------

pub trait RestaurantRepository: Send + Sync {
    fn create(
        &self,
        input: CreateRestaurant,
    ) -> impl Future<Output = FoodieResult<Restaurant>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = FoodieResult<Restaurant>> + Send;
    /// Restaurants admitted by `visibility`, ordered by country then name,
    /// each with its menu item count.
    fn list(
        &self,
        visibility: Visibility,
    ) -> impl Future<Output = FoodieResult<Vec<RestaurantSummary>>> + Send;
    fn count(&self) -> impl Future<Output = FoodieResult<u64>> + Send;
}

pub trait MenuItemRepository: Send + Sync {
    fn create(&self, input: CreateMenuItem)
    -> impl Future<Output = FoodieResult<MenuItem>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = FoodieResult<MenuItem>> + Send;
    /// Menu of one restaurant, ordered by name.
    fn list_by_restaurant(
        &self,
        restaurant_id: Uuid,
    ) -> impl Future<Output = FoodieResult<Vec<MenuItem>>> + Send;
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

pub trait OrderRepository: Send + Sync {
    /// Insert a new DRAFT order at revision 0.
    fn create(&self, input: CreateOrder) -> impl Future<Output = FoodieResult<Order>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = FoodieResult<Order>> + Send;
    /// The owner's DRAFT order for a restaurant, if any.
    fn find_draft(
        &self,
        owner_id: Uuid,
        restaurant_id: Uuid,
    ) -> impl Future<Output = FoodieResult<Option<Order>>> + Send;
    /// Orders admitted by `visibility`, newest first.
    fn list(
        &self,
        visibility: Visibility,
        pagination: Pagination,
    ) -> impl Future<Output = FoodieResult<PaginatedResult<Order>>> + Send;
    /// Persist `order` only if the stored revision still equals
    /// `order.revision`. The stored revision is bumped by one.
    ///
    /// Returns `FoodieError::Conflict` when the row moved underneath the
    /// caller.
    fn update(&self, order: &Order) -> impl Future<Output = FoodieResult<Order>> + Send;
    fn stats(&self) -> impl Future<Output = FoodieResult<OrderStats>> + Send;
}

// ---------------------------------------------------------------------------
// Payment methods (global)
// ---------------------------------------------------------------------------

pub trait PaymentMethodRepository: Send + Sync {
    /// Names are unique; a duplicate yields `AlreadyExists`.
    fn create(
        &self,
        input: CreatePaymentMethod,
    ) -> impl Future<Output = FoodieResult<PaymentMethod>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = FoodieResult<PaymentMethod>> + Send;
    /// All methods ordered by name, optionally only the active ones.
    fn list(
        &self,
        active_only: bool,
    ) -> impl Future<Output = FoodieResult<Vec<PaymentMethod>>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdatePaymentMethod,
    ) -> impl Future<Output = FoodieResult<PaymentMethod>> + Send;
}
