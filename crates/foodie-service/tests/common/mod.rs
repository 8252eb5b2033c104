//! Shared fixture: an in-memory database seeded with the demo data and
//! the three services wired over it.

#![allow(dead_code)]

use foodie_core::access::Visibility;
use foodie_core::models::country::Country;
use foodie_core::models::menu_item::MenuItem;
use foodie_core::models::payment_method::PaymentMethod;
use foodie_core::models::restaurant::Restaurant;
use foodie_core::models::user::Identity;
use foodie_core::repository::{
    MenuItemRepository, PaymentMethodRepository, RestaurantRepository, UserRepository,
};
use foodie_db::repository::{
    SurrealMenuItemRepository, SurrealOrderRepository, SurrealPaymentMethodRepository,
    SurrealRestaurantRepository, SurrealUserRepository,
};
use foodie_service::{AdminService, OrderService, RestaurantService};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};

pub type Orders = OrderService<
    SurrealOrderRepository<Db>,
    SurrealRestaurantRepository<Db>,
    SurrealMenuItemRepository<Db>,
    SurrealPaymentMethodRepository<Db>,
>;

pub type Restaurants =
    RestaurantService<SurrealRestaurantRepository<Db>, SurrealMenuItemRepository<Db>>;

pub type Admin = AdminService<
    SurrealUserRepository<Db>,
    SurrealRestaurantRepository<Db>,
    SurrealOrderRepository<Db>,
    SurrealPaymentMethodRepository<Db>,
>;

pub struct Fixture {
    pub db: Surreal<Db>,
    pub restaurants: Restaurants,
    pub orders: Orders,
    pub admin: Admin,
}

pub async fn setup() -> Fixture {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    foodie_db::run_migrations(&db).await.unwrap();
    foodie_db::seed(&db, None).await.unwrap();

    Fixture {
        restaurants: RestaurantService::new(
            SurrealRestaurantRepository::new(db.clone()),
            SurrealMenuItemRepository::new(db.clone()),
        ),
        orders: orders_for(&db),
        admin: AdminService::new(
            SurrealUserRepository::new(db.clone()),
            SurrealRestaurantRepository::new(db.clone()),
            SurrealOrderRepository::new(db.clone()),
            SurrealPaymentMethodRepository::new(db.clone()),
        ),
        db,
    }
}

pub fn orders_for(db: &Surreal<Db>) -> Orders {
    OrderService::new(
        SurrealOrderRepository::new(db.clone()),
        SurrealRestaurantRepository::new(db.clone()),
        SurrealMenuItemRepository::new(db.clone()),
        SurrealPaymentMethodRepository::new(db.clone()),
    )
}

impl Fixture {
    pub async fn identity(&self, username: &str) -> Identity {
        SurrealUserRepository::new(self.db.clone())
            .get_by_username(username)
            .await
            .unwrap()
            .identity()
    }

    /// First seeded restaurant (by name) in `country`.
    pub async fn restaurant_in(&self, country: Country) -> Restaurant {
        SurrealRestaurantRepository::new(self.db.clone())
            .list(Visibility::Country(country))
            .await
            .unwrap()
            .remove(0)
            .restaurant
    }

    pub async fn menu_of(&self, restaurant: &Restaurant) -> Vec<MenuItem> {
        SurrealMenuItemRepository::new(self.db.clone())
            .list_by_restaurant(restaurant.id)
            .await
            .unwrap()
    }

    pub async fn payment_method(&self) -> PaymentMethod {
        SurrealPaymentMethodRepository::new(self.db.clone())
            .list(true)
            .await
            .unwrap()
            .remove(0)
    }
}
