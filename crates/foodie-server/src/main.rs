//! Foodie Server: application entry point.
//!
//! Connects to SurrealDB, applies migrations, optionally seeds the demo
//! data and sweeps expired sessions. After a fresh seed it walks one
//! checkout through the services with the configured lifecycle policy.

mod config;

use std::process::ExitCode;

use foodie_auth::{AuthService, LoginInput};
use foodie_core::error::FoodieResult;
use foodie_core::lifecycle::LifecyclePolicy;
use foodie_core::models::order::Order;
use foodie_core::models::restaurant::Restaurant;
use foodie_core::models::user::Identity;
use foodie_db::repository::{
    SurrealMenuItemRepository, SurrealOrderRepository, SurrealPaymentMethodRepository,
    SurrealRestaurantRepository, SurrealSessionRepository, SurrealUserRepository,
};
use foodie_db::{DEMO_PASSWORD, DbManager};
use foodie_service::{OrderService, RestaurantService};
use surrealdb::Surreal;
use surrealdb::engine::any::Any;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use crate::config::Config;

type Orders = OrderService<
    SurrealOrderRepository<Any>,
    SurrealRestaurantRepository<Any>,
    SurrealMenuItemRepository<Any>,
    SurrealPaymentMethodRepository<Any>,
>;

type Restaurants =
    RestaurantService<SurrealRestaurantRepository<Any>, SurrealMenuItemRepository<Any>>;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("foodie=info".parse().unwrap_or_else(|_| LevelFilter::INFO.into())),
        )
        .json()
        .init();

    info!("Starting Foodie server...");

    match run().await {
        Ok(()) => {
            info!("Foodie server stopped.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, kind = ?e.kind(), "Foodie server failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> FoodieResult<()> {
    let config = Config::load()?;
    info!(
        require_payment_method = config.policy.require_payment_method,
        max_line_quantity = config.policy.max_line_quantity,
        session_lifetime_secs = config.auth.session_lifetime_secs,
        "Configuration loaded"
    );

    let manager = DbManager::connect(&config.db)
        .await
        .map_err(foodie_db::DbError::from)?;
    let db = manager.client().clone();
    foodie_db::run_migrations(&db).await?;

    let users = match config.auth.pepper.clone() {
        Some(pepper) => SurrealUserRepository::with_pepper(db.clone(), pepper),
        None => SurrealUserRepository::new(db.clone()),
    };
    let auth = AuthService::new(
        users,
        SurrealSessionRepository::new(db.clone()),
        config.auth.clone(),
    );
    auth.purge_expired_sessions().await?;

    if config.seed && foodie_db::seed(&db, config.auth.pepper.as_deref()).await? {
        // Prove the seeded accounts work end to end.
        let login = auth
            .login(LoginInput {
                username: "nick-fury".into(),
                password: DEMO_PASSWORD.into(),
            })
            .await?;
        let identity = auth.identify(&login.session_token).await?;

        let restaurants = restaurant_service(&db);
        let orders = order_service(&db, &config.policy);
        let visible = restaurants.list(&identity).await?;
        let demo_order = match visible.first() {
            Some(summary) => {
                Some(demo_checkout(&orders, &restaurants, &identity, &summary.restaurant).await?)
            }
            None => None,
        };
        auth.logout(&login.session_token).await?;

        info!(
            restaurants = visible.len(),
            menu_items = visible.iter().map(|s| s.menu_item_count).sum::<u64>(),
            demo_order_id = ?demo_order.as_ref().map(|o| o.id),
            "Demo data ready"
        );
    }

    Ok(())
}

fn restaurant_service(db: &Surreal<Any>) -> Restaurants {
    RestaurantService::new(
        SurrealRestaurantRepository::new(db.clone()),
        SurrealMenuItemRepository::new(db.clone()),
    )
}

fn order_service(db: &Surreal<Any>, policy: &LifecyclePolicy) -> Orders {
    OrderService::new(
        SurrealOrderRepository::new(db.clone()),
        SurrealRestaurantRepository::new(db.clone()),
        SurrealMenuItemRepository::new(db.clone()),
        SurrealPaymentMethodRepository::new(db.clone()),
    )
    .with_policy(policy.clone())
}

/// Order one of the restaurant's dishes and check out with the first
/// active payment method.
async fn demo_checkout(
    orders: &Orders,
    restaurants: &Restaurants,
    identity: &Identity,
    restaurant: &Restaurant,
) -> FoodieResult<Order> {
    let menu = restaurants.view(identity, restaurant.id).await?.menu;
    let mut order = orders.start(identity, restaurant.id).await?;
    if let Some(item) = menu.first() {
        order = orders.add_item(identity, order.id, item.id, 1).await?;
    }
    let payment = orders
        .available_payment_methods(identity)
        .await?
        .into_iter()
        .next()
        .map(|m| m.id);
    orders.place(identity, order.id, payment).await
}

#[cfg(test)]
mod tests {
    use foodie_core::error::FoodieError;
    use foodie_core::models::order::OrderStatus;
    use foodie_core::repository::UserRepository;
    use foodie_db::DbConfig;

    use super::*;

    async fn seeded() -> Surreal<Any> {
        let manager = DbManager::connect(&DbConfig {
            url: "mem://".into(),
            ..Default::default()
        })
        .await
        .unwrap();
        let db = manager.client().clone();
        foodie_db::run_migrations(&db).await.unwrap();
        assert!(foodie_db::seed(&db, None).await.unwrap());
        db
    }

    async fn nick_fury(db: &Surreal<Any>) -> Identity {
        SurrealUserRepository::new(db.clone())
            .get_by_username("nick-fury")
            .await
            .unwrap()
            .identity()
    }

    async fn first_restaurant(db: &Surreal<Any>, identity: &Identity) -> Restaurant {
        restaurant_service(db)
            .list(identity)
            .await
            .unwrap()
            .remove(0)
            .restaurant
    }

    #[tokio::test]
    async fn demo_checkout_places_an_order() {
        let db = seeded().await;
        let fury = nick_fury(&db).await;
        let restaurant = first_restaurant(&db, &fury).await;

        let orders = order_service(&db, &LifecyclePolicy::default());
        let order = demo_checkout(&orders, &restaurant_service(&db), &fury, &restaurant)
            .await
            .unwrap();

        assert_eq!(order.status, OrderStatus::Placed);
        assert_eq!(order.lines.len(), 1);
        assert!(order.payment_method_id.is_some());
    }

    #[tokio::test]
    async fn order_service_carries_configured_policy() {
        let db = seeded().await;
        let fury = nick_fury(&db).await;
        let restaurant = first_restaurant(&db, &fury).await;
        let item = restaurant_service(&db)
            .view(&fury, restaurant.id)
            .await
            .unwrap()
            .menu
            .remove(0);

        let strict = order_service(&db, &LifecyclePolicy::default());
        let lenient = order_service(
            &db,
            &LifecyclePolicy {
                require_payment_method: false,
                max_line_quantity: 2,
            },
        );

        let order = strict.start(&fury, restaurant.id).await.unwrap();
        strict.add_item(&fury, order.id, item.id, 3).await.unwrap();

        let err = lenient.add_item(&fury, order.id, item.id, 3).await.unwrap_err();
        assert!(matches!(err, FoodieError::Validation { .. }));

        let err = strict.place(&fury, order.id, None).await.unwrap_err();
        assert!(matches!(err, FoodieError::MissingPayment));

        let placed = lenient.place(&fury, order.id, None).await.unwrap();
        assert_eq!(placed.status, OrderStatus::Placed);
        assert!(placed.payment_method_id.is_none());
    }
}
