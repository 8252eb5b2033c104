//! SurrealDB repository implementations.

mod menu_item;
mod order;
mod payment_method;
mod restaurant;
mod session;
mod user;

pub use menu_item::SurrealMenuItemRepository;
pub use order::SurrealOrderRepository;
pub use payment_method::SurrealPaymentMethodRepository;
pub use restaurant::SurrealRestaurantRepository;
pub use session::SurrealSessionRepository;
pub use user::SurrealUserRepository;

use std::str::FromStr;

use foodie_core::access::Visibility;
use surrealdb_types::SurrealValue;

use crate::error::DbError;

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
pub(crate) struct CountRow {
    pub(crate) total: u64,
}

/// Parse a stored enum string, treating unknown values as corruption.
pub(crate) fn parse_enum<T: FromStr>(field: &str, value: &str) -> Result<T, DbError> {
    value
        .parse()
        .map_err(|_| DbError::Corrupt(format!("unknown {field}: {value}")))
}

/// `WHERE` fragment and bound value for a country-scoped listing.
pub(crate) fn country_filter(visibility: Visibility) -> (&'static str, Option<String>) {
    match visibility.restriction() {
        Some(country) => ("WHERE country = $country", Some(country.to_string())),
        None => ("", None),
    }
}
