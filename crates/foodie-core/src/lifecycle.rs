//! Order lifecycle state machine.
//!
//! ```text
//!             add-item / remove-item
//!                 ┌──────┐
//!                 ▼      │
//!  create ──▶  DRAFT ────┘ ──place──▶ PLACED ──update-payment──┐
//!                 │                     │  ▲                   │
//!                 │                     │  └───────────────────┘
//!                 └──────cancel──────▶ CANCELLED ◀──cancel──┘
//! ```
//!
//! [`transition`] is pure: it authorizes the event, validates it against
//! the current state and returns the next order value. Persisting the
//! result (with a compare-and-set on [`Order::revision`]) is the
//! caller's job.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::access::{Action, authorize, authorize_edit};
use crate::error::{FoodieError, FoodieResult};
use crate::models::menu_item::MenuItem;
use crate::models::order::{Order, OrderLine, OrderStatus};
use crate::models::user::Identity;

/// Knobs for lifecycle rules that differ between deployments.
#[derive(Debug, Clone)]
pub struct LifecyclePolicy {
    /// Reject `place` with `MissingPayment` when neither the order nor
    /// the event carries a payment method (default: `true`).
    pub require_payment_method: bool,
    /// Upper bound on a single line's quantity (default: 99).
    pub max_line_quantity: u32,
}

impl Default for LifecyclePolicy {
    fn default() -> Self {
        Self {
            require_payment_method: true,
            max_line_quantity: 99,
        }
    }
}

#[derive(Debug, Clone)]
pub enum OrderEvent {
    /// Add `quantity` of a menu item. Merges into an existing line for
    /// the same item.
    AddItem { menu_item: MenuItem, quantity: u32 },
    RemoveItem { line_id: Uuid },
    /// Check out. A payment method given here overrides one already on
    /// the order.
    Place { payment_method_id: Option<Uuid> },
    Cancel,
    UpdatePayment { payment_method_id: Uuid },
}

impl OrderEvent {
    pub fn name(&self) -> &'static str {
        match self {
            OrderEvent::AddItem { .. } => "add-item",
            OrderEvent::RemoveItem { .. } => "remove-item",
            OrderEvent::Place { .. } => "place",
            OrderEvent::Cancel => "cancel",
            OrderEvent::UpdatePayment { .. } => "update-payment",
        }
    }
}

/// Apply `event` to `order` on behalf of `identity`.
///
/// Authorization is checked before state, so a denied caller learns
/// nothing about the order's status.
pub fn transition(
    order: &Order,
    event: &OrderEvent,
    identity: &Identity,
    policy: &LifecyclePolicy,
    now: DateTime<Utc>,
) -> FoodieResult<Order> {
    authorize_event(order, event, identity)?;

    let mut next = order.clone();

    match event {
        OrderEvent::AddItem {
            menu_item,
            quantity,
        } => {
            require_status(order, event, &[OrderStatus::Draft])?;
            add_line(&mut next, menu_item, *quantity, policy)?;
        }
        OrderEvent::RemoveItem { line_id } => {
            require_status(order, event, &[OrderStatus::Draft])?;
            let before = next.lines.len();
            next.lines.retain(|l| l.id != *line_id);
            if next.lines.len() == before {
                return Err(FoodieError::not_found("order_line", line_id));
            }
        }
        OrderEvent::Place { payment_method_id } => {
            require_status(order, event, &[OrderStatus::Draft])?;
            if order.lines.is_empty() {
                return Err(FoodieError::EmptyOrder);
            }
            let payment = payment_method_id.or(order.payment_method_id);
            if payment.is_none() && policy.require_payment_method {
                return Err(FoodieError::MissingPayment);
            }
            next.payment_method_id = payment;
            next.status = OrderStatus::Placed;
            next.placed_at = Some(now);
        }
        OrderEvent::Cancel => {
            require_status(order, event, &[OrderStatus::Draft, OrderStatus::Placed])?;
            next.status = OrderStatus::Cancelled;
            next.cancelled_at = Some(now);
        }
        OrderEvent::UpdatePayment { payment_method_id } => {
            require_status(order, event, &[OrderStatus::Placed])?;
            next.payment_method_id = Some(*payment_method_id);
        }
    }

    next.total_cents = next.line_total_cents();
    next.updated_at = now;
    Ok(next)
}

fn authorize_event(order: &Order, event: &OrderEvent, identity: &Identity) -> FoodieResult<()> {
    match event {
        OrderEvent::AddItem { .. } | OrderEvent::RemoveItem { .. } => {
            authorize_edit(identity, order).into_result(Action::CreateOrder)
        }
        OrderEvent::Place { .. } => {
            authorize(identity, Action::PlaceOrder, order).into_result(Action::PlaceOrder)
        }
        OrderEvent::Cancel => {
            authorize(identity, Action::CancelOrder, order).into_result(Action::CancelOrder)
        }
        OrderEvent::UpdatePayment { .. } => {
            authorize(identity, Action::UpdatePayment, order).into_result(Action::UpdatePayment)
        }
    }
}

fn require_status(order: &Order, event: &OrderEvent, allowed: &[OrderStatus]) -> FoodieResult<()> {
    if allowed.contains(&order.status) {
        Ok(())
    } else {
        Err(FoodieError::InvalidState {
            status: order.status,
            event: event.name(),
        })
    }
}

fn add_line(
    order: &mut Order,
    menu_item: &MenuItem,
    quantity: u32,
    policy: &LifecyclePolicy,
) -> FoodieResult<()> {
    if quantity == 0 {
        return Err(FoodieError::validation("quantity must be at least 1"));
    }
    if menu_item.restaurant_id != order.restaurant_id {
        return Err(FoodieError::validation(format!(
            "menu item {} does not belong to the order's restaurant",
            menu_item.id
        )));
    }

    match order
        .lines
        .iter_mut()
        .find(|l| l.menu_item_id == menu_item.id)
    {
        Some(line) => {
            let merged = line.quantity.saturating_add(quantity);
            if merged > policy.max_line_quantity {
                return Err(FoodieError::validation(format!(
                    "quantity may not exceed {}",
                    policy.max_line_quantity
                )));
            }
            line.quantity = merged;
            line.unit_price_cents = menu_item.price_cents;
        }
        None => {
            if quantity > policy.max_line_quantity {
                return Err(FoodieError::validation(format!(
                    "quantity may not exceed {}",
                    policy.max_line_quantity
                )));
            }
            order.lines.push(OrderLine {
                id: Uuid::new_v4(),
                menu_item_id: menu_item.id,
                quantity,
                unit_price_cents: menu_item.price_cents,
            });
        }
    }

    Ok(())
}
