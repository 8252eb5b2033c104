//! Authentication error types.

use foodie_core::error::FoodieError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("session has expired")]
    SessionExpired,

    #[error("invalid session: {0}")]
    SessionInvalid(String),

    #[error("password must be at least {min_length} characters")]
    WeakPassword { min_length: usize },

    #[error("cryptography error: {0}")]
    Crypto(String),

    #[error("invalid auth configuration: {0}")]
    Configuration(String),
}

impl From<AuthError> for FoodieError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials
            | AuthError::SessionExpired
            | AuthError::SessionInvalid(_) => FoodieError::AuthenticationFailed {
                reason: err.to_string(),
            },
            AuthError::WeakPassword { .. } => FoodieError::Validation {
                message: err.to_string(),
            },
            AuthError::Crypto(msg) => FoodieError::Internal(msg),
            AuthError::Configuration(msg) => FoodieError::Configuration(msg),
        }
    }
}
