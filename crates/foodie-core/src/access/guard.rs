//! Authorization guard.
//!
//! Composes the role capability table with the country scope filter.
//! The role check runs first so a MEMBER attempting a manager action is
//! told about the role, not the country; both checks are required.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::capability::{Action, capable};
use super::scope::{ScopedEntity, in_scope};
use crate::error::{FoodieError, FoodieResult};
use crate::models::order::Order;
use crate::models::user::{Identity, Role};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DenyReason {
    InsufficientRole,
    OutOfScope,
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DenyReason::InsufficientRole => "INSUFFICIENT_ROLE",
            DenyReason::OutOfScope => "OUT_OF_SCOPE",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    /// Convert into a result, tagging a denial with the action that was
    /// attempted.
    pub fn into_result(self, action: Action) -> FoodieResult<()> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(reason) => Err(FoodieError::Forbidden { action, reason }),
        }
    }
}

/// Decide whether `identity` may perform `action` on `entity`.
pub fn authorize<E: ScopedEntity + ?Sized>(
    identity: &Identity,
    action: Action,
    entity: &E,
) -> Decision {
    let decision = if !capable(identity.role, action) {
        Decision::Deny(DenyReason::InsufficientRole)
    } else if !in_scope(identity, entity) {
        Decision::Deny(DenyReason::OutOfScope)
    } else {
        Decision::Allow
    };

    if let Decision::Deny(reason) = decision {
        debug!(
            identity_id = %identity.id,
            role = %identity.role,
            action = %action,
            %reason,
            "Access denied"
        );
    }

    decision
}

/// Decide whether `identity` may change the line items of `order`.
///
/// Beyond `CREATE_ORDER` and scope, members may only edit orders they
/// own; admins and managers may edit any in-scope order. Order status is
/// not considered here; that is the lifecycle's concern.
pub fn authorize_edit(identity: &Identity, order: &Order) -> Decision {
    match authorize(identity, Action::CreateOrder, order) {
        Decision::Allow => {}
        deny => return deny,
    }

    match identity.role {
        Role::Admin | Role::Manager => Decision::Allow,
        Role::Member if order.owner_id == identity.id => Decision::Allow,
        Role::Member => {
            debug!(
                identity_id = %identity.id,
                order_id = %order.id,
                "Member may not edit another user's order"
            );
            Decision::Deny(DenyReason::InsufficientRole)
        }
    }
}
