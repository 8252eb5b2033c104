//! Static role capability table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FoodieError;
use crate::models::user::Role;

/// Every action a role capability can gate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    View,
    CreateOrder,
    PlaceOrder,
    CancelOrder,
    UpdatePayment,
    ViewDashboard,
}

impl Action {
    pub const ALL: [Action; 6] = [
        Action::View,
        Action::CreateOrder,
        Action::PlaceOrder,
        Action::CancelOrder,
        Action::UpdatePayment,
        Action::ViewDashboard,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::View => "VIEW",
            Action::CreateOrder => "CREATE_ORDER",
            Action::PlaceOrder => "PLACE_ORDER",
            Action::CancelOrder => "CANCEL_ORDER",
            Action::UpdatePayment => "UPDATE_PAYMENT",
            Action::ViewDashboard => "VIEW_DASHBOARD",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = FoodieError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| FoodieError::Configuration(format!("unknown action: {s}")))
    }
}

/// Whether `role` holds the capability for `action`.
///
/// Total over `Role × Action`; adding a variant to either enum fails to
/// compile until this table is extended.
pub fn capable(role: Role, action: Action) -> bool {
    match (role, action) {
        (Role::Admin, _) => true,

        (Role::Manager, Action::View | Action::CreateOrder) => true,
        (Role::Manager, Action::PlaceOrder | Action::CancelOrder) => true,
        (Role::Manager, Action::UpdatePayment | Action::ViewDashboard) => false,

        (Role::Member, Action::View | Action::CreateOrder) => true,
        (
            Role::Member,
            Action::PlaceOrder
            | Action::CancelOrder
            | Action::UpdatePayment
            | Action::ViewDashboard,
        ) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_matches_published_matrix() {
        let expected = [
            (Action::View, [true, true, true]),
            (Action::CreateOrder, [true, true, true]),
            (Action::PlaceOrder, [true, true, false]),
            (Action::CancelOrder, [true, true, false]),
            (Action::UpdatePayment, [true, false, false]),
            (Action::ViewDashboard, [true, false, false]),
        ];

        for (action, row) in expected {
            for (role, allowed) in Role::ALL.into_iter().zip(row) {
                assert_eq!(
                    capable(role, action),
                    allowed,
                    "capable({role}, {action}) should be {allowed}"
                );
            }
        }
    }

    #[test]
    fn admin_holds_every_capability() {
        assert!(Action::ALL.into_iter().all(|a| capable(Role::Admin, a)));
    }

    #[test]
    fn action_names_parse() {
        for action in Action::ALL {
            assert_eq!(action.as_str().parse::<Action>().unwrap(), action);
        }
    }

    #[test]
    fn unknown_action_is_configuration_error() {
        let err = "DELETE_RESTAURANT".parse::<Action>().unwrap_err();
        assert!(matches!(err, FoodieError::Configuration(_)));
    }
}
