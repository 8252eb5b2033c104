//! Demo data: the six provisioned users, a handful of restaurants with
//! menus in each country, and the default payment methods.

use foodie_core::error::FoodieResult;
use foodie_core::models::country::Country;
use foodie_core::models::menu_item::CreateMenuItem;
use foodie_core::models::payment_method::CreatePaymentMethod;
use foodie_core::models::restaurant::CreateRestaurant;
use foodie_core::models::user::{CreateUser, Role};
use foodie_core::repository::{
    MenuItemRepository, PaymentMethodRepository, RestaurantRepository, UserRepository,
};
use surrealdb::{Connection, Surreal};
use tracing::info;

use crate::repository::{
    SurrealMenuItemRepository, SurrealPaymentMethodRepository, SurrealRestaurantRepository,
    SurrealUserRepository,
};

/// Password shared by every seeded account.
pub const DEMO_PASSWORD: &str = "password123";

const USERS: &[(&str, &str, Role, Country)] = &[
    ("nick-fury", "Nick Fury", Role::Admin, Country::America),
    ("captain-marvel", "Captain Marvel", Role::Manager, Country::India),
    ("captain-america", "Captain America", Role::Manager, Country::America),
    ("thanos", "Thanos", Role::Member, Country::India),
    ("thor", "Thor", Role::Member, Country::India),
    ("travis", "Travis", Role::Member, Country::America),
];

struct SeedRestaurant {
    name: &'static str,
    description: &'static str,
    country: Country,
    address: &'static str,
    phone: &'static str,
    menu: &'static [(&'static str, &'static str, i64)],
}

const RESTAURANTS: &[SeedRestaurant] = &[
    SeedRestaurant {
        name: "Spice Route",
        description: "South Indian classics",
        country: Country::India,
        address: "12 MG Road, Bengaluru",
        phone: "+91 80 5550 1200",
        menu: &[
            ("Masala Dosa", "Rice crepe with spiced potato", 250),
            ("Idli Sambar", "Steamed rice cakes with lentil stew", 180),
            ("Filter Coffee", "Chicory coffee with milk", 90),
        ],
    },
    SeedRestaurant {
        name: "Tandoor House",
        description: "North Indian grill",
        country: Country::India,
        address: "7 Connaught Place, New Delhi",
        phone: "+91 11 5550 3400",
        menu: &[
            ("Butter Chicken", "Chicken in tomato butter gravy", 420),
            ("Garlic Naan", "Leavened flatbread", 80),
            ("Paneer Tikka", "Grilled cottage cheese", 350),
        ],
    },
    SeedRestaurant {
        name: "Liberty Diner",
        description: "All-day American breakfast",
        country: Country::America,
        address: "200 Broadway, New York",
        phone: "+1 212 555 0199",
        menu: &[
            ("Pancake Stack", "Buttermilk pancakes with syrup", 1099),
            ("Cheeseburger", "Beef patty, cheddar, brioche", 1399),
            ("Milkshake", "Vanilla, chocolate or strawberry", 699),
        ],
    },
    SeedRestaurant {
        name: "Golden Gate Tacos",
        description: "Mission-style tacos",
        country: Country::America,
        address: "18 Valencia St, San Francisco",
        phone: "+1 415 555 0142",
        menu: &[
            ("Carnitas Taco", "Slow-cooked pork", 499),
            ("Burrito Bowl", "Rice, beans, salsa, choice of protein", 1199),
        ],
    },
];

const PAYMENT_METHODS: &[(&str, &str)] = &[
    ("Cash on Delivery", "Pay the courier in cash"),
    ("Credit Card", "Visa, Mastercard and Amex"),
    ("UPI", "Unified Payments Interface"),
];

/// Populate an empty database with demo data.
///
/// Returns `false` without touching anything when users already exist.
pub async fn seed<C: Connection>(db: &Surreal<C>, pepper: Option<&str>) -> FoodieResult<bool> {
    let users = match pepper {
        Some(p) => SurrealUserRepository::with_pepper(db.clone(), p.to_string()),
        None => SurrealUserRepository::new(db.clone()),
    };

    if users.count().await? > 0 {
        info!("Database already seeded, skipping");
        return Ok(false);
    }

    for (username, full_name, role, country) in USERS {
        users
            .create(CreateUser {
                username: (*username).into(),
                full_name: (*full_name).into(),
                password: DEMO_PASSWORD.into(),
                role: *role,
                country: *country,
            })
            .await?;
    }

    let restaurants = SurrealRestaurantRepository::new(db.clone());
    let menu_items = SurrealMenuItemRepository::new(db.clone());
    for seed in RESTAURANTS {
        let restaurant = restaurants
            .create(CreateRestaurant {
                name: seed.name.into(),
                description: Some(seed.description.into()),
                country: seed.country,
                address: Some(seed.address.into()),
                phone: Some(seed.phone.into()),
            })
            .await?;

        for (name, description, price_cents) in seed.menu {
            menu_items
                .create(CreateMenuItem {
                    restaurant_id: restaurant.id,
                    name: (*name).into(),
                    description: Some((*description).into()),
                    price_cents: *price_cents,
                })
                .await?;
        }
    }

    let payment_methods = SurrealPaymentMethodRepository::new(db.clone());
    for (name, description) in PAYMENT_METHODS {
        payment_methods
            .create(CreatePaymentMethod {
                name: (*name).into(),
                description: (*description).into(),
                active: true,
            })
            .await?;
    }

    info!(
        users = USERS.len(),
        restaurants = RESTAURANTS.len(),
        payment_methods = PAYMENT_METHODS.len(),
        "Database seeded"
    );

    Ok(true)
}
