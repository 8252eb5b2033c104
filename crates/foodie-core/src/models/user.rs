//! User and identity domain models.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::country::Country;
use crate::error::FoodieError;

/// The closed set of roles. Capabilities per role live in
/// [`crate::access::capability`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Manager,
    Member,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Manager, Role::Member];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Manager => "MANAGER",
            Role::Member => "MEMBER",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = FoodieError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Role::Admin),
            "MANAGER" => Ok(Role::Manager),
            "MEMBER" => Ok(Role::Member),
            other => Err(FoodieError::Configuration(format!("unknown role: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub full_name: String,
    pub password_hash: String,
    pub role: Role,
    pub country: Country,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn identity(&self) -> Identity {
        Identity {
            id: self.id,
            role: self.role,
            country: self.country,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub full_name: String,
    /// Raw password (will be hashed with Argon2id before storage).
    pub password: String,
    pub role: Role,
    pub country: Country,
}

/// The caller on whose behalf an operation runs.
///
/// Resolved once per request from a session and passed explicitly to
/// every guard, lifecycle and service call. Never mutated.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Identity {
    pub id: Uuid,
    pub role: Role,
    pub country: Country,
}

impl Identity {
    pub fn new(id: Uuid, role: Role, country: Country) -> Self {
        Self { id, role, country }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_storage_form() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn role_serializes_in_storage_form() {
        let json = serde_json::to_string(&Role::Manager).unwrap();
        assert_eq!(json, "\"MANAGER\"");
    }

    #[test]
    fn unknown_role_fails_fast() {
        assert!(matches!(
            "OWNER".parse::<Role>(),
            Err(FoodieError::Configuration(_))
        ));
    }
}
