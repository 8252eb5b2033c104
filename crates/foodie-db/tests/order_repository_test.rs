//! Integration tests for the Order repository, including the
//! compare-and-set on `revision`.

use chrono::Utc;
use foodie_core::access::Visibility;
use foodie_core::error::FoodieError;
use foodie_core::models::country::Country;
use foodie_core::models::order::{CreateOrder, Order, OrderLine, OrderStats, OrderStatus};
use foodie_core::repository::{OrderRepository, Pagination};
use foodie_db::repository::SurrealOrderRepository;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

async fn setup() -> SurrealOrderRepository<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    foodie_db::run_migrations(&db).await.unwrap();
    SurrealOrderRepository::new(db)
}

fn draft(owner_id: Uuid, restaurant_id: Uuid, country: Country) -> CreateOrder {
    CreateOrder {
        owner_id,
        restaurant_id,
        country,
        notes: None,
    }
}

fn with_line(order: &Order, quantity: u32, unit_price_cents: i64) -> Order {
    let mut next = order.clone();
    next.lines.push(OrderLine {
        id: Uuid::new_v4(),
        menu_item_id: Uuid::new_v4(),
        quantity,
        unit_price_cents,
    });
    next.total_cents = next.line_total_cents();
    next.updated_at = Utc::now();
    next
}

#[tokio::test]
async fn create_starts_empty_draft() {
    let repo = setup().await;
    let order = repo
        .create(CreateOrder {
            notes: Some("extra chutney".into()),
            ..draft(Uuid::new_v4(), Uuid::new_v4(), Country::India)
        })
        .await
        .unwrap();

    assert_eq!(order.status, OrderStatus::Draft);
    assert!(order.lines.is_empty());
    assert_eq!(order.total_cents, 0);
    assert_eq!(order.revision, 0);
    assert_eq!(order.payment_method_id, None);

    let fetched = repo.get_by_id(order.id).await.unwrap();
    assert_eq!(fetched.notes.as_deref(), Some("extra chutney"));
}

#[tokio::test]
async fn update_round_trips_lines_and_bumps_revision() {
    let repo = setup().await;
    let order = repo
        .create(draft(Uuid::new_v4(), Uuid::new_v4(), Country::India))
        .await
        .unwrap();

    let edited = with_line(&order, 2, 250);
    let saved = repo.update(&edited).await.unwrap();
    assert_eq!(saved.revision, 1);
    assert_eq!(saved.lines, edited.lines);
    assert_eq!(saved.total_cents, 500);

    let mut placed = saved.clone();
    let payment = Uuid::new_v4();
    placed.status = OrderStatus::Placed;
    placed.payment_method_id = Some(payment);
    placed.placed_at = Some(Utc::now());
    let saved = repo.update(&placed).await.unwrap();

    assert_eq!(saved.revision, 2);
    assert_eq!(saved.status, OrderStatus::Placed);
    assert_eq!(saved.payment_method_id, Some(payment));
    assert!(saved.placed_at.is_some());
}

#[tokio::test]
async fn stale_revision_is_a_conflict() {
    let repo = setup().await;
    let order = repo
        .create(draft(Uuid::new_v4(), Uuid::new_v4(), Country::India))
        .await
        .unwrap();

    // Two writers read revision 0; the first one wins.
    let first = with_line(&order, 1, 100);
    let second = with_line(&order, 3, 100);

    repo.update(&first).await.unwrap();
    let err = repo.update(&second).await.unwrap_err();
    assert!(matches!(err, FoodieError::Conflict { .. }));

    let stored = repo.get_by_id(order.id).await.unwrap();
    assert_eq!(stored.lines, first.lines);
    assert_eq!(stored.revision, 1);
}

#[tokio::test]
async fn updating_missing_order_is_not_found() {
    let repo = setup().await;
    let order = repo
        .create(draft(Uuid::new_v4(), Uuid::new_v4(), Country::India))
        .await
        .unwrap();
    let mut ghost = order.clone();
    ghost.id = Uuid::new_v4();

    let err = repo.update(&ghost).await.unwrap_err();
    assert!(matches!(err, FoodieError::NotFound { .. }));
}

#[tokio::test]
async fn find_draft_ignores_placed_orders() {
    let repo = setup().await;
    let owner = Uuid::new_v4();
    let restaurant = Uuid::new_v4();

    assert!(repo.find_draft(owner, restaurant).await.unwrap().is_none());

    let order = repo
        .create(draft(owner, restaurant, Country::America))
        .await
        .unwrap();
    let found = repo.find_draft(owner, restaurant).await.unwrap().unwrap();
    assert_eq!(found.id, order.id);

    let mut placed = with_line(&order, 1, 100);
    placed.status = OrderStatus::Placed;
    repo.update(&placed).await.unwrap();

    assert!(repo.find_draft(owner, restaurant).await.unwrap().is_none());
    assert!(
        repo.find_draft(Uuid::new_v4(), restaurant)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn list_applies_visibility_and_pagination() {
    let repo = setup().await;
    let owner = Uuid::new_v4();
    for _ in 0..3 {
        repo.create(draft(owner, Uuid::new_v4(), Country::India))
            .await
            .unwrap();
    }
    repo.create(draft(owner, Uuid::new_v4(), Country::America))
        .await
        .unwrap();

    let india = repo
        .list(Visibility::Country(Country::India), Pagination::default())
        .await
        .unwrap();
    assert_eq!(india.total, 3);
    assert!(india.items.iter().all(|o| o.country == Country::India));

    let page = repo
        .list(
            Visibility::All,
            Pagination {
                offset: 0,
                limit: 2,
            },
        )
        .await
        .unwrap();
    assert_eq!(page.total, 4);
    assert_eq!(page.items.len(), 2);
    assert!(page.items[0].created_at >= page.items[1].created_at);
}

#[tokio::test]
async fn stats_count_revenue_from_placed_orders_only() {
    let repo = setup().await;
    assert_eq!(repo.stats().await.unwrap(), OrderStats::default());

    let owner = Uuid::new_v4();
    let a = repo
        .create(draft(owner, Uuid::new_v4(), Country::India))
        .await
        .unwrap();
    let b = repo
        .create(draft(owner, Uuid::new_v4(), Country::India))
        .await
        .unwrap();
    repo.create(draft(owner, Uuid::new_v4(), Country::America))
        .await
        .unwrap();

    let mut placed = with_line(&a, 2, 300);
    placed.status = OrderStatus::Placed;
    repo.update(&placed).await.unwrap();

    let mut cancelled = with_line(&b, 1, 999);
    cancelled.status = OrderStatus::Cancelled;
    repo.update(&cancelled).await.unwrap();

    assert_eq!(
        repo.stats().await.unwrap(),
        OrderStats {
            total_orders: 3,
            placed_orders: 1,
            revenue_cents: 600,
        }
    );
}
