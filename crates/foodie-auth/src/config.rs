//! Authentication configuration.

use chrono::Duration;

use crate::error::AuthError;

/// Longest accepted session lifetime: one year.
pub const MAX_SESSION_LIFETIME_SECS: u64 = 365 * 86_400;

/// Configuration for the authentication service.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Session lifetime in seconds (default: 86_400 = 24 hours).
    pub session_lifetime_secs: u64,
    /// Optional pepper prepended to passwords before Argon2id verification.
    pub pepper: Option<String>,
    /// Minimum password length for policy enforcement.
    pub min_password_length: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_lifetime_secs: 86_400,
            pepper: None,
            min_password_length: 8,
        }
    }
}

impl AuthConfig {
    /// The session lifetime as a [`Duration`].
    ///
    /// Rejects lifetimes above [`MAX_SESSION_LIFETIME_SECS`]; zero is
    /// allowed and yields sessions that expire on creation.
    pub fn session_lifetime(&self) -> Result<Duration, AuthError> {
        if self.session_lifetime_secs > MAX_SESSION_LIFETIME_SECS {
            return Err(AuthError::Configuration(format!(
                "session lifetime {}s exceeds the maximum of {MAX_SESSION_LIFETIME_SECS}s",
                self.session_lifetime_secs
            )));
        }
        i64::try_from(self.session_lifetime_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .ok_or_else(|| {
                AuthError::Configuration(format!(
                    "session lifetime {}s is out of range",
                    self.session_lifetime_secs
                ))
            })
    }
}
