//! Error types for the Foodie system.

use thiserror::Error;

use crate::access::{Action, DenyReason};
use crate::models::order::OrderStatus;

#[derive(Debug, Error)]
pub enum FoodieError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Entity already exists: {entity}")]
    AlreadyExists { entity: String },

    #[error("Authentication failed: {reason}")]
    AuthenticationFailed { reason: String },

    #[error("Forbidden: {action} denied ({reason})")]
    Forbidden { action: Action, reason: DenyReason },

    #[error("Order is {status}; cannot {event}")]
    InvalidState {
        status: OrderStatus,
        event: &'static str,
    },

    #[error("Order has no line items")]
    EmptyOrder,

    #[error("Order has no payment method")]
    MissingPayment,

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Concurrent modification of {entity} {id}")]
    Conflict { entity: String, id: String },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type FoodieResult<T> = Result<T, FoodieError>;

/// Coarse classification a boundary layer maps onto user-visible
/// responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Role or country scope denied the action.
    Forbidden,
    /// The request is well-formed but not valid for the current state.
    InvalidRequest,
    NotFound,
    Unauthenticated,
    Conflict,
    Internal,
}

impl FoodieError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FoodieError::Forbidden { .. } => ErrorKind::Forbidden,
            FoodieError::InvalidState { .. }
            | FoodieError::EmptyOrder
            | FoodieError::MissingPayment
            | FoodieError::Validation { .. }
            | FoodieError::AlreadyExists { .. } => ErrorKind::InvalidRequest,
            FoodieError::NotFound { .. } => ErrorKind::NotFound,
            FoodieError::AuthenticationFailed { .. } => ErrorKind::Unauthenticated,
            FoodieError::Conflict { .. } => ErrorKind::Conflict,
            FoodieError::Configuration(_)
            | FoodieError::Database(_)
            | FoodieError::Internal(_) => ErrorKind::Internal,
        }
    }

    pub(crate) fn not_found(entity: &str, id: impl ToString) -> Self {
        FoodieError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        FoodieError::Validation {
            message: message.into(),
        }
    }
}
