//! Integration tests for User and Session repositories.

use chrono::{Duration, Utc};
use foodie_core::error::FoodieError;
use foodie_core::models::country::Country;
use foodie_core::models::session::CreateSession;
use foodie_core::models::user::{CreateUser, Role};
use foodie_core::repository::{SessionRepository, UserRepository};
use foodie_db::repository::{SurrealSessionRepository, SurrealUserRepository};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};

async fn setup() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    foodie_db::run_migrations(&db).await.unwrap();
    db
}

fn thanos() -> CreateUser {
    CreateUser {
        username: "thanos".into(),
        full_name: "Thanos".into(),
        password: "inevitable".into(),
        role: Role::Member,
        country: Country::India,
    }
}

// ---------------------------------------------------------------------------
// User tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_and_get_user() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let user = repo.create(thanos()).await.unwrap();
    assert_eq!(user.username, "thanos");
    assert_eq!(user.role, Role::Member);
    assert_eq!(user.country, Country::India);
    assert!(user.password_hash.starts_with("$argon2id$"));
    assert_ne!(user.password_hash, "inevitable");

    let by_id = repo.get_by_id(user.id).await.unwrap();
    assert_eq!(by_id.username, "thanos");

    let by_name = repo.get_by_username("thanos").await.unwrap();
    assert_eq!(by_name.id, user.id);
    assert_eq!(by_name.identity().country, Country::India);
}

#[tokio::test]
async fn duplicate_username_is_rejected() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    repo.create(thanos()).await.unwrap();
    let err = repo.create(thanos()).await.unwrap_err();
    assert!(matches!(err, FoodieError::AlreadyExists { .. }));
    assert_eq!(repo.count().await.unwrap(), 1);
}

#[tokio::test]
async fn unknown_user_is_not_found() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let err = repo.get_by_username("gamora").await.unwrap_err();
    assert!(matches!(err, FoodieError::NotFound { .. }));

    let err = repo.get_by_id(uuid::Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, FoodieError::NotFound { .. }));
}

// ---------------------------------------------------------------------------
// Session tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_lookup_and_invalidate_session() {
    let db = setup().await;
    let user = SurrealUserRepository::new(db.clone())
        .create(thanos())
        .await
        .unwrap();
    let repo = SurrealSessionRepository::new(db);

    let session = repo
        .create(CreateSession {
            user_id: user.id,
            token_hash: "abc123".into(),
            expires_at: Utc::now() + Duration::hours(1),
        })
        .await
        .unwrap();
    assert_eq!(session.user_id, user.id);

    let found = repo.get_by_token_hash("abc123").await.unwrap();
    assert_eq!(found.id, session.id);

    repo.invalidate(session.id).await.unwrap();
    let err = repo.get_by_token_hash("abc123").await.unwrap_err();
    assert!(matches!(err, FoodieError::NotFound { .. }));
}

#[tokio::test]
async fn cleanup_removes_only_expired_sessions() {
    let db = setup().await;
    let user = SurrealUserRepository::new(db.clone())
        .create(thanos())
        .await
        .unwrap();
    let repo = SurrealSessionRepository::new(db);

    repo.create(CreateSession {
        user_id: user.id,
        token_hash: "stale".into(),
        expires_at: Utc::now() - Duration::minutes(5),
    })
    .await
    .unwrap();
    repo.create(CreateSession {
        user_id: user.id,
        token_hash: "fresh".into(),
        expires_at: Utc::now() + Duration::hours(1),
    })
    .await
    .unwrap();

    assert_eq!(repo.cleanup_expired().await.unwrap(), 1);
    assert!(repo.get_by_token_hash("stale").await.is_err());
    assert!(repo.get_by_token_hash("fresh").await.is_ok());
}
