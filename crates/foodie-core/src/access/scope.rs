//! Country scope filtering.
//!
//! A single predicate decides visibility for both reads and writes.
//! Repository listings take a [`Visibility`] derived from the same
//! identity so that pushed-down query filters agree with [`in_scope`].

use crate::models::country::Country;
use crate::models::order::Order;
use crate::models::payment_method::PaymentMethod;
use crate::models::restaurant::{Restaurant, RestaurantSummary};
use crate::models::user::{Identity, Role};

/// An entity whose visibility may depend on a country.
pub trait ScopedEntity {
    /// The country this entity belongs to, or `None` for global
    /// entities that every identity may see.
    fn country(&self) -> Option<Country>;
}

impl ScopedEntity for Restaurant {
    fn country(&self) -> Option<Country> {
        Some(self.country)
    }
}

impl ScopedEntity for RestaurantSummary {
    fn country(&self) -> Option<Country> {
        Some(self.restaurant.country)
    }
}

impl ScopedEntity for Order {
    fn country(&self) -> Option<Country> {
        Some(self.country)
    }
}

impl ScopedEntity for PaymentMethod {
    fn country(&self) -> Option<Country> {
        None
    }
}

impl ScopedEntity for Country {
    fn country(&self) -> Option<Country> {
        Some(*self)
    }
}

impl<T: ScopedEntity + ?Sized> ScopedEntity for &T {
    fn country(&self) -> Option<Country> {
        (**self).country()
    }
}

/// Target for actions that are not about any particular row.
#[derive(Debug, Clone, Copy, Default)]
pub struct Global;

impl ScopedEntity for Global {
    fn country(&self) -> Option<Country> {
        None
    }
}

/// The set of countries an identity may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    All,
    Country(Country),
}

impl Visibility {
    pub fn for_identity(identity: &Identity) -> Self {
        match identity.role {
            Role::Admin => Visibility::All,
            Role::Manager | Role::Member => Visibility::Country(identity.country),
        }
    }

    pub fn admits(&self, country: Country) -> bool {
        match self {
            Visibility::All => true,
            Visibility::Country(own) => *own == country,
        }
    }

    /// The country a query must be restricted to, if any.
    pub fn restriction(&self) -> Option<Country> {
        match self {
            Visibility::All => None,
            Visibility::Country(c) => Some(*c),
        }
    }
}

/// `true` when the identity is an admin, the entity is global, or the
/// countries match.
pub fn in_scope<E: ScopedEntity + ?Sized>(identity: &Identity, entity: &E) -> bool {
    match entity.country() {
        None => true,
        Some(country) => Visibility::for_identity(identity).admits(country),
    }
}

/// Keep the entities in scope for `identity`, preserving order.
pub fn filter_collection<E, I>(identity: &Identity, entities: I) -> Vec<E>
where
    E: ScopedEntity,
    I: IntoIterator<Item = E>,
{
    entities
        .into_iter()
        .filter(|e| in_scope(identity, e))
        .collect()
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    fn identity(role: Role, country: Country) -> Identity {
        Identity::new(Uuid::new_v4(), role, country)
    }

    #[test]
    fn non_admin_scope_is_country_equality() {
        for role in [Role::Manager, Role::Member] {
            for own in Country::ALL {
                for target in Country::ALL {
                    assert_eq!(
                        in_scope(&identity(role, own), &target),
                        own == target,
                        "{role} in {own} vs {target}"
                    );
                }
            }
        }
    }

    #[test]
    fn admin_sees_every_country() {
        for own in Country::ALL {
            for target in Country::ALL {
                assert!(in_scope(&identity(Role::Admin, own), &target));
            }
        }
    }

    #[test]
    fn global_entities_are_always_in_scope() {
        let member = identity(Role::Member, Country::India);
        assert!(in_scope(&member, &Global));
    }

    #[test]
    fn filter_preserves_order() {
        let member = identity(Role::Member, Country::America);
        let input = vec![
            Country::America,
            Country::India,
            Country::America,
            Country::India,
        ];
        let kept = filter_collection(&member, input.iter());
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|c| **c == Country::America));

        let admin = identity(Role::Admin, Country::America);
        let all: Vec<Country> = filter_collection(&admin, input.clone());
        assert_eq!(all, input);
    }

    #[test]
    fn visibility_restriction() {
        let admin = identity(Role::Admin, Country::India);
        assert_eq!(Visibility::for_identity(&admin).restriction(), None);

        let manager = identity(Role::Manager, Country::India);
        assert_eq!(
            Visibility::for_identity(&manager).restriction(),
            Some(Country::India)
        );
    }
}
