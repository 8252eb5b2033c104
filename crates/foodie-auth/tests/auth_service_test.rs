//! Integration tests for the authentication service.

use foodie_auth::config::AuthConfig;
use foodie_auth::service::{AuthService, LoginInput};
use foodie_auth::token;
use foodie_core::error::{ErrorKind, FoodieError};
use foodie_core::models::country::Country;
use foodie_core::models::user::{CreateUser, Role};
use foodie_core::repository::SessionRepository;
use foodie_db::repository::{SurrealSessionRepository, SurrealUserRepository};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};

type Service = AuthService<SurrealUserRepository<Db>, SurrealSessionRepository<Db>>;

fn test_config() -> AuthConfig {
    AuthConfig {
        session_lifetime_secs: 3600,
        pepper: Some("test-pepper".into()),
        min_password_length: 8,
    }
}

/// Spin up in-memory DB, run migrations and provision captain-marvel.
async fn setup_with(config: AuthConfig) -> (Service, Surreal<Db>) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    foodie_db::run_migrations(&db).await.unwrap();

    let users = match config.pepper.clone() {
        Some(p) => SurrealUserRepository::with_pepper(db.clone(), p),
        None => SurrealUserRepository::new(db.clone()),
    };
    let service = AuthService::new(users, SurrealSessionRepository::new(db.clone()), config);

    service
        .provision(CreateUser {
            username: "captain-marvel".into(),
            full_name: "Captain Marvel".into(),
            password: "password123".into(),
            role: Role::Manager,
            country: Country::India,
        })
        .await
        .unwrap();

    (service, db)
}

async fn setup() -> (Service, Surreal<Db>) {
    setup_with(test_config()).await
}

fn login(username: &str, password: &str) -> LoginInput {
    LoginInput {
        username: username.into(),
        password: password.into(),
    }
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[tokio::test]
async fn login_happy_path() {
    let (service, _) = setup().await;

    let out = service
        .login(login("captain-marvel", "password123"))
        .await
        .unwrap();

    assert!(!out.session_token.is_empty());
    assert_eq!(out.identity.role, Role::Manager);
    assert_eq!(out.identity.country, Country::India);
}

#[tokio::test]
async fn bad_credentials_fail_uniformly() {
    let (service, _) = setup().await;

    let wrong_password = service
        .login(login("captain-marvel", "password124"))
        .await
        .unwrap_err();
    let unknown_user = service
        .login(login("captain-britain", "password123"))
        .await
        .unwrap_err();

    assert_eq!(wrong_password.kind(), ErrorKind::Unauthenticated);
    assert_eq!(wrong_password.to_string(), unknown_user.to_string());
}

#[tokio::test]
async fn provision_enforces_password_policy() {
    let (service, _) = setup().await;

    let err = service
        .provision(CreateUser {
            username: "thor".into(),
            full_name: "Thor".into(),
            password: "mjolnir".into(),
            role: Role::Member,
            country: Country::India,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, FoodieError::Validation { .. }));
}

// ---------------------------------------------------------------------------
// Identify & logout
// ---------------------------------------------------------------------------

#[tokio::test]
async fn identify_resolves_session_to_identity() {
    let (service, _) = setup().await;
    let out = service
        .login(login("captain-marvel", "password123"))
        .await
        .unwrap();

    let identity = service.identify(&out.session_token).await.unwrap();
    assert_eq!(identity, out.identity);
}

#[tokio::test]
async fn unknown_token_is_unauthenticated() {
    let (service, _) = setup().await;
    let err = service.identify("not-a-token").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthenticated);
}

#[tokio::test]
async fn expired_session_is_rejected_and_removed() {
    let (service, db) = setup_with(AuthConfig {
        session_lifetime_secs: 0,
        ..test_config()
    })
    .await;

    let out = service
        .login(login("captain-marvel", "password123"))
        .await
        .unwrap();

    let err = service.identify(&out.session_token).await.unwrap_err();
    assert!(matches!(err, FoodieError::AuthenticationFailed { .. }));

    let sessions = SurrealSessionRepository::new(db);
    let lookup = sessions
        .get_by_token_hash(&token::hash_session_token(&out.session_token))
        .await;
    assert!(matches!(lookup, Err(FoodieError::NotFound { .. })));
}

#[tokio::test]
async fn logout_invalidates_session() {
    let (service, _) = setup().await;
    let out = service
        .login(login("captain-marvel", "password123"))
        .await
        .unwrap();

    service.logout(&out.session_token).await.unwrap();
    assert!(service.identify(&out.session_token).await.is_err());

    // A second logout is a no-op.
    service.logout(&out.session_token).await.unwrap();
}

#[tokio::test]
async fn purge_counts_expired_sessions() {
    let (service, _) = setup_with(AuthConfig {
        session_lifetime_secs: 0,
        ..test_config()
    })
    .await;

    for _ in 0..2 {
        service
            .login(login("captain-marvel", "password123"))
            .await
            .unwrap();
    }

    assert_eq!(service.purge_expired_sessions().await.unwrap(), 2);
    assert_eq!(service.purge_expired_sessions().await.unwrap(), 0);
}

#[tokio::test]
async fn oversized_session_lifetime_fails_without_opening_a_session() {
    let (service, _) = setup_with(AuthConfig {
        session_lifetime_secs: 10_000_000_000_000_000,
        ..test_config()
    })
    .await;

    let err = service
        .login(login("captain-marvel", "password123"))
        .await
        .unwrap_err();
    assert!(matches!(err, FoodieError::Configuration(_)));
    assert_eq!(service.purge_expired_sessions().await.unwrap(), 0);
}
