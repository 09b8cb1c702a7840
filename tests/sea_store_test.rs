//! SeaORM store tests against an in-memory SQLite database.
//!
//! The pool is limited to one connection so every scope sees the same
//! database; each test drops its scope before opening the next.

use std::sync::Arc;

use sea_orm::ConnectOptions;

use identity::domain::{Password, User};
use identity::errors::AppError;
use identity::infra::{Database, Persistence, UnitOfWork};
use identity::services::{UserManager, UserService};

async fn database() -> Database {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).sqlx_logging(false);
    Database::connect(options).await.unwrap()
}

async fn persistence() -> Persistence {
    Persistence::new(database().await.get_connection())
}

fn user(email: &str) -> User {
    User::new(email, Password::new("password").unwrap()).unwrap()
}

#[tokio::test]
async fn test_migrations_are_applied() {
    let db = database().await;
    db.ping().await.unwrap();

    let status = db.migration_status().await.unwrap();
    assert!(!status.is_empty());
    assert!(status.iter().all(|(_, applied)| *applied));
}

#[tokio::test]
async fn test_add_then_get_round_trips() {
    let store = persistence().await;
    let original = user("petete@version1.com");

    let scope = store.begin().await.unwrap();
    scope.users().add(original.clone()).await.unwrap();
    scope.commit().await.unwrap();

    let scope = store.begin().await.unwrap();
    let stored = scope.users().get("petete@version1.com").await.unwrap().unwrap();
    drop(scope);

    assert_eq!(stored, original);
    assert_eq!(stored.password().as_str(), original.password().as_str());
    assert_eq!(
        stored.created_at().timestamp_micros(),
        original.created_at().timestamp_micros()
    );
    assert_eq!(
        stored.updated_at().timestamp_micros(),
        original.updated_at().timestamp_micros()
    );
    assert!(!stored.is_active());
    assert!(!stored.is_validated());
}

#[tokio::test]
async fn test_get_missing_is_none() {
    let store = persistence().await;

    let scope = store.begin().await.unwrap();
    let found = scope.users().get("ghost@example.com").await.unwrap();
    drop(scope);

    assert!(found.is_none());
}

#[tokio::test]
async fn test_duplicate_primary_key_is_user_already_exists() {
    let store = persistence().await;

    let scope = store.begin().await.unwrap();
    scope.users().add(user("petete@version1.com")).await.unwrap();
    scope.commit().await.unwrap();

    let scope = store.begin().await.unwrap();
    let err = scope
        .users()
        .add(user("petete@version1.com"))
        .await
        .unwrap_err();
    drop(scope);

    assert!(matches!(err, AppError::UserAlreadyExists));
}

#[tokio::test]
async fn test_update_missing_is_user_does_not_exist() {
    let store = persistence().await;

    let scope = store.begin().await.unwrap();
    let err = scope
        .users()
        .update(user("ghost@example.com"))
        .await
        .unwrap_err();
    drop(scope);

    assert!(matches!(err, AppError::UserDoesNotExist));
}

#[tokio::test]
async fn test_uncommitted_scope_rolls_back() {
    let store = persistence().await;

    let scope = store.begin().await.unwrap();
    scope.users().add(user("dropped@example.com")).await.unwrap();
    drop(scope);

    let scope = store.begin().await.unwrap();
    scope.users().add(user("rolled@example.com")).await.unwrap();
    scope.rollback().await.unwrap();

    let scope = store.begin().await.unwrap();
    let users = scope.users().list().await.unwrap();
    drop(scope);

    assert!(users.is_empty());
}

#[tokio::test]
async fn test_service_lifecycle_on_database() {
    let service = UserManager::new(Arc::new(persistence().await));
    for email in ["a@example.com", "b@example.com", "c@example.com"] {
        service
            .register(email.to_string(), "password".to_string())
            .await
            .unwrap();
    }

    let user = service.validate("a@example.com").await.unwrap();
    assert!(user.is_validated());
    let user = service.enable("a@example.com").await.unwrap();
    assert!(user.is_active() && user.is_validated());

    // The last update comes first
    let users = service.list().await.unwrap();
    let emails: Vec<&str> = users.iter().map(User::email).collect();
    assert_eq!(emails, ["a@example.com", "c@example.com", "b@example.com"]);

    let page = service.list_paginated(1, 2).await.unwrap();
    assert_eq!(page.total, 3);
    assert!(page.has_next);
    assert_eq!(page.items[0].email(), "a@example.com");

    let page = service.list_paginated(2, 2).await.unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].email(), "b@example.com");
    assert!(!page.has_next);

    assert!(matches!(
        service
            .register("a@example.com".to_string(), "again".to_string())
            .await,
        Err(AppError::UserAlreadyExists)
    ));
}
