//! Country domain model.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FoodieError;

/// The countries Foodie operates in.
///
/// Restaurants, their menus and orders are tagged with a country at
/// creation; non-admin users only ever see rows from their own country.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Country {
    India,
    America,
}

impl Country {
    pub const ALL: [Country; 2] = [Country::India, Country::America];

    pub fn as_str(&self) -> &'static str {
        match self {
            Country::India => "India",
            Country::America => "America",
        }
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Country {
    type Err = FoodieError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "India" => Ok(Country::India),
            "America" => Ok(Country::America),
            other => Err(FoodieError::Configuration(format!(
                "unknown country: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_its_own_display() {
        for country in Country::ALL {
            assert_eq!(country.to_string().parse::<Country>().unwrap(), country);
        }
    }

    #[test]
    fn unknown_country_is_configuration_error() {
        let err = "Atlantis".parse::<Country>().unwrap_err();
        assert!(matches!(err, FoodieError::Configuration(_)));
    }
}
