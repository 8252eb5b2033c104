use std::{env, fmt::Display, str::FromStr};

use foodie_auth::AuthConfig;
use foodie_auth::config::MAX_SESSION_LIFETIME_SECS;
use foodie_core::error::{FoodieError, FoodieResult};
use foodie_core::lifecycle::LifecyclePolicy;
use foodie_db::DbConfig;
use tracing::{info, warn};

pub struct Config {
    pub db: DbConfig,
    pub auth: AuthConfig,
    pub policy: LifecyclePolicy,
    pub seed: bool,
}

impl Config {
    pub fn load() -> FoodieResult<Self> {
        let db_defaults = DbConfig::default();
        let auth_defaults = AuthConfig::default();
        let policy_defaults = LifecyclePolicy::default();

        Ok(Self {
            db: DbConfig {
                url: try_load("FOODIE_DB_URL", &db_defaults.url)?,
                namespace: try_load("FOODIE_DB_NAMESPACE", &db_defaults.namespace)?,
                database: try_load("FOODIE_DB_DATABASE", &db_defaults.database)?,
                username: try_load("FOODIE_DB_USER", &db_defaults.username)?,
                password: load_secret("FOODIE_DB_PASSWORD").unwrap_or(db_defaults.password),
            },
            auth: AuthConfig {
                session_lifetime_secs: in_range(
                    "FOODIE_SESSION_LIFETIME_SECS",
                    try_load(
                        "FOODIE_SESSION_LIFETIME_SECS",
                        &auth_defaults.session_lifetime_secs.to_string(),
                    )?,
                    1,
                    MAX_SESSION_LIFETIME_SECS,
                )?,
                pepper: load_secret("FOODIE_PASSWORD_PEPPER"),
                min_password_length: auth_defaults.min_password_length,
            },
            policy: LifecyclePolicy {
                require_payment_method: try_load("FOODIE_REQUIRE_PAYMENT_METHOD", "true")?,
                max_line_quantity: in_range(
                    "FOODIE_MAX_LINE_QUANTITY",
                    try_load(
                        "FOODIE_MAX_LINE_QUANTITY",
                        &policy_defaults.max_line_quantity.to_string(),
                    )?,
                    1,
                    u32::MAX,
                )?,
            },
            seed: try_load("FOODIE_SEED", "false")?,
        })
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> FoodieResult<T>
where
    T::Err: Display,
{
    env::var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
            FoodieError::Configuration(format!("invalid {key}: {e}"))
        })
}

fn in_range<T: PartialOrd + Display>(key: &str, value: T, min: T, max: T) -> FoodieResult<T> {
    if value < min || value > max {
        warn!("{key} out of range: {value}");
        return Err(FoodieError::Configuration(format!(
            "{key} must be between {min} and {max}, got {value}"
        )));
    }
    Ok(value)
}

/// Secrets are never logged; an empty value counts as unset.
fn load_secret(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Some(value.trim().to_string()),
        _ => {
            info!("{key} not set");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_for_unset_keys() {
        let value: u64 = try_load("FOODIE_TEST_UNSET_LIFETIME", "86400").unwrap();
        assert_eq!(value, 86_400);
    }

    #[test]
    fn malformed_default_is_a_configuration_error() {
        let err = try_load::<bool>("FOODIE_TEST_UNSET_FLAG", "maybe").unwrap_err();
        assert!(matches!(err, FoodieError::Configuration(_)));
    }

    #[test]
    fn session_lifetime_is_bounded() {
        for secs in [0, MAX_SESSION_LIFETIME_SECS + 1, 10_000_000_000_000_000] {
            let err = in_range("FOODIE_SESSION_LIFETIME_SECS", secs, 1, MAX_SESSION_LIFETIME_SECS)
                .unwrap_err();
            assert!(matches!(err, FoodieError::Configuration(_)));
        }
        let ok = in_range("FOODIE_SESSION_LIFETIME_SECS", 86_400, 1, MAX_SESSION_LIFETIME_SECS);
        assert_eq!(ok.unwrap(), 86_400);
    }

    #[test]
    fn zero_line_quantity_cap_is_rejected() {
        let err = in_range("FOODIE_MAX_LINE_QUANTITY", 0u32, 1, u32::MAX).unwrap_err();
        assert!(matches!(err, FoodieError::Configuration(_)));
    }
}
