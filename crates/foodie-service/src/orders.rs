//! Order operations.
//!
//! Each lifecycle operation reads the order, evaluates
//! [`transition`](foodie_core::lifecycle::transition) against it and
//! writes the result with a compare-and-set on the order's revision. A
//! lost race re-reads and re-evaluates, so the loser of two concurrent
//! `place` calls sees the order already PLACED.

use chrono::Utc;
use foodie_core::access::{Action, Global, Visibility, authorize};
use foodie_core::error::{FoodieError, FoodieResult};
use foodie_core::lifecycle::{LifecyclePolicy, OrderEvent, transition};
use foodie_core::models::order::{CreateOrder, Order};
use foodie_core::models::payment_method::PaymentMethod;
use foodie_core::models::user::Identity;
use foodie_core::repository::{
    MenuItemRepository, OrderRepository, PaginatedResult, Pagination, PaymentMethodRepository,
    RestaurantRepository,
};
use tracing::{info, warn};
use uuid::Uuid;

/// How many times a transition is re-evaluated after losing a race.
const DEFAULT_MAX_ATTEMPTS: u32 = 3;

pub struct OrderService<O, R, M, P>
where
    O: OrderRepository,
    R: RestaurantRepository,
    M: MenuItemRepository,
    P: PaymentMethodRepository,
{
    orders: O,
    restaurants: R,
    menu_items: M,
    payment_methods: P,
    policy: LifecyclePolicy,
    max_attempts: u32,
}

impl<O, R, M, P> OrderService<O, R, M, P>
where
    O: OrderRepository,
    R: RestaurantRepository,
    M: MenuItemRepository,
    P: PaymentMethodRepository,
{
    pub fn new(orders: O, restaurants: R, menu_items: M, payment_methods: P) -> Self {
        Self {
            orders,
            restaurants,
            menu_items,
            payment_methods,
            policy: LifecyclePolicy::default(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn with_policy(mut self, policy: LifecyclePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// The identity's DRAFT order at `restaurant_id`, created if it does
    /// not exist yet.
    pub async fn start(&self, identity: &Identity, restaurant_id: Uuid) -> FoodieResult<Order> {
        let restaurant = self.restaurants.get_by_id(restaurant_id).await?;
        authorize(identity, Action::CreateOrder, &restaurant).into_result(Action::CreateOrder)?;

        if let Some(existing) = self.orders.find_draft(identity.id, restaurant.id).await? {
            return Ok(existing);
        }

        let order = self
            .orders
            .create(CreateOrder {
                owner_id: identity.id,
                restaurant_id: restaurant.id,
                country: restaurant.country,
                notes: None,
            })
            .await?;

        info!(
            order_id = %order.id,
            owner_id = %identity.id,
            restaurant_id = %restaurant.id,
            country = %order.country,
            "Order created"
        );
        Ok(order)
    }

    /// Orders the identity may see, newest first.
    pub async fn list(
        &self,
        identity: &Identity,
        pagination: Pagination,
    ) -> FoodieResult<PaginatedResult<Order>> {
        authorize(identity, Action::View, &Global).into_result(Action::View)?;
        self.orders
            .list(Visibility::for_identity(identity), pagination)
            .await
    }

    pub async fn view(&self, identity: &Identity, order_id: Uuid) -> FoodieResult<Order> {
        let order = self.orders.get_by_id(order_id).await?;
        authorize(identity, Action::View, &order).into_result(Action::View)?;
        Ok(order)
    }

    pub async fn add_item(
        &self,
        identity: &Identity,
        order_id: Uuid,
        menu_item_id: Uuid,
        quantity: u32,
    ) -> FoodieResult<Order> {
        let menu_item = self.menu_items.get_by_id(menu_item_id).await?;
        self.apply(identity, order_id, OrderEvent::AddItem {
            menu_item,
            quantity,
        })
        .await
    }

    pub async fn remove_item(
        &self,
        identity: &Identity,
        order_id: Uuid,
        line_id: Uuid,
    ) -> FoodieResult<Order> {
        self.apply(identity, order_id, OrderEvent::RemoveItem { line_id })
            .await
    }

    /// Check out. `payment_method_id` may be omitted when the order
    /// already carries one.
    pub async fn place(
        &self,
        identity: &Identity,
        order_id: Uuid,
        payment_method_id: Option<Uuid>,
    ) -> FoodieResult<Order> {
        self.apply(identity, order_id, OrderEvent::Place { payment_method_id })
            .await
    }

    pub async fn cancel(&self, identity: &Identity, order_id: Uuid) -> FoodieResult<Order> {
        self.apply(identity, order_id, OrderEvent::Cancel).await
    }

    pub async fn update_payment(
        &self,
        identity: &Identity,
        order_id: Uuid,
        payment_method_id: Uuid,
    ) -> FoodieResult<Order> {
        self.apply(identity, order_id, OrderEvent::UpdatePayment { payment_method_id })
            .await
    }

    /// Active payment methods, sorted by name.
    pub async fn available_payment_methods(
        &self,
        identity: &Identity,
    ) -> FoodieResult<Vec<PaymentMethod>> {
        authorize(identity, Action::View, &Global).into_result(Action::View)?;
        self.payment_methods.list(true).await
    }

    async fn apply(
        &self,
        identity: &Identity,
        order_id: Uuid,
        event: OrderEvent,
    ) -> FoodieResult<Order> {
        for attempt in 1..=self.max_attempts {
            let current = self.orders.get_by_id(order_id).await?;
            let next = transition(&current, &event, identity, &self.policy, Utc::now())?;

            if let OrderEvent::Place { .. } | OrderEvent::UpdatePayment { .. } = event {
                if let Some(payment_method_id) = next.payment_method_id {
                    self.require_active(payment_method_id).await?;
                }
            }

            match self.orders.update(&next).await {
                Ok(saved) => {
                    info!(
                        order_id = %saved.id,
                        identity_id = %identity.id,
                        event = event.name(),
                        status = %saved.status,
                        total_cents = saved.total_cents,
                        revision = saved.revision,
                        "Order updated"
                    );
                    return Ok(saved);
                }
                Err(FoodieError::Conflict { .. }) => {
                    warn!(
                        order_id = %order_id,
                        event = event.name(),
                        attempt,
                        "Order changed concurrently, retrying"
                    );
                }
                Err(e) => return Err(e),
            }
        }

        Err(FoodieError::Conflict {
            entity: "order".into(),
            id: order_id.to_string(),
        })
    }

    async fn require_active(&self, payment_method_id: Uuid) -> FoodieResult<()> {
        let method = match self.payment_methods.get_by_id(payment_method_id).await {
            Ok(m) => m,
            Err(FoodieError::NotFound { .. }) => {
                return Err(FoodieError::Validation {
                    message: format!("unknown payment method {payment_method_id}"),
                });
            }
            Err(e) => return Err(e),
        };
        if !method.active {
            return Err(FoodieError::Validation {
                message: format!("payment method {} is not active", method.name),
            });
        }
        Ok(())
    }
}
