//! User lifecycle behaviour over the in-memory unit of work.

use std::sync::Arc;

use identity::domain::{Password, User};
use identity::errors::AppError;
use identity::infra::{InMemoryPersistence, UnitOfWork};
use identity::services::{UserManager, UserService};

fn setup() -> (UserManager<InMemoryPersistence>, InMemoryPersistence) {
    let store = InMemoryPersistence::new();
    (UserManager::new(Arc::new(store.clone())), store)
}

async fn register(service: &UserManager<InMemoryPersistence>, email: &str) -> User {
    service
        .register(email.to_string(), "password".to_string())
        .await
        .unwrap()
}

#[tokio::test]
async fn test_register_twice_keeps_one_record() {
    let (service, store) = setup();
    register(&service, "petete@version1.com").await;

    let err = service
        .register("petete@version1.com".to_string(), "other".to_string())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::UserAlreadyExists));
    assert_eq!(store.len().await, 1);
    // The first password still applies
    let user = service.get("petete@version1.com").await.unwrap();
    assert!(user.password().verify("password"));
}

#[tokio::test]
async fn test_register_invalid_email_creates_nothing() {
    let (service, store) = setup();

    let err = service
        .register("petete".to_string(), "password".to_string())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::InvalidEmailFormat));
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_registered_user_is_hashed_and_inactive() {
    let (service, _) = setup();
    register(&service, "petete@version1.com").await;

    let user = service.get("petete@version1.com").await.unwrap();

    assert_eq!(user.email(), "petete@version1.com");
    assert_ne!(user.password().as_str(), "password");
    assert!(user.password().verify("password"));
    assert!(!user.is_active());
    assert!(!user.is_validated());
    assert_eq!(user.created_at(), user.updated_at());
}

#[tokio::test]
async fn test_validate_sets_flag_and_bumps_timestamp() {
    let (service, _) = setup();
    let before = register(&service, "petete@version1.com").await;

    let after = service.validate("petete@version1.com").await.unwrap();

    assert!(after.is_validated());
    assert!(!after.is_active());
    assert!(after.updated_at() >= before.updated_at());
    assert_eq!(after.created_at(), before.created_at());
}

#[tokio::test]
async fn test_transitions_on_missing_user() {
    let (service, _) = setup();

    assert!(matches!(
        service.validate("ghost@example.com").await,
        Err(AppError::UserDoesNotExist)
    ));
    assert!(matches!(
        service.enable("ghost@example.com").await,
        Err(AppError::UserDoesNotExist)
    ));
    assert!(matches!(
        service.disable("ghost@example.com").await,
        Err(AppError::UserDoesNotExist)
    ));
    assert!(matches!(
        service.get("ghost@example.com").await,
        Err(AppError::UserDoesNotExist)
    ));
}

#[tokio::test]
async fn test_enable_and_disable_are_idempotent() {
    let (service, _) = setup();
    register(&service, "petete@version1.com").await;

    let first = service.enable("petete@version1.com").await.unwrap();
    let second = service.enable("petete@version1.com").await.unwrap();
    assert!(first.is_active());
    assert!(second.is_active());
    assert!(second.updated_at() >= first.updated_at());

    let third = service.disable("petete@version1.com").await.unwrap();
    let fourth = service.disable("petete@version1.com").await.unwrap();
    assert!(!third.is_active());
    assert!(!fourth.is_active());
    assert!(fourth.updated_at() >= third.updated_at());
}

#[tokio::test]
async fn test_flags_are_independent() {
    let (service, _) = setup();
    register(&service, "petete@version1.com").await;

    // Enabling does not require validation first
    let user = service.enable("petete@version1.com").await.unwrap();
    assert!(user.is_active());
    assert!(!user.is_validated());

    service.validate("petete@version1.com").await.unwrap();
    let user = service.disable("petete@version1.com").await.unwrap();
    assert!(!user.is_active());
    assert!(user.is_validated());
}

#[tokio::test]
async fn test_pagination_over_three_users() {
    let (service, _) = setup();
    for email in ["a@example.com", "b@example.com", "c@example.com"] {
        register(&service, email).await;
    }

    let page = service.list_paginated(1, 1).await.unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.total, 3);
    assert!(page.has_next);

    let page = service.list_paginated(3, 1).await.unwrap();
    assert_eq!(page.items.len(), 1);
    assert!(!page.has_next);

    let page = service.list_paginated(1, 100_000).await.unwrap();
    assert_eq!(page.items.len(), 3);
    assert!(!page.has_next);

    let page = service.list_paginated(4, 1).await.unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.total, 3);
    assert!(!page.has_next);
}

#[tokio::test]
async fn test_pagination_rejects_zero() {
    let (service, _) = setup();

    assert!(matches!(
        service.list_paginated(0, 10).await,
        Err(AppError::Validation(_))
    ));
    assert!(matches!(
        service.list_paginated(1, 0).await,
        Err(AppError::Validation(_))
    ));
}

#[tokio::test]
async fn test_list_is_most_recently_updated_first() {
    let (service, _) = setup();
    for email in ["a@example.com", "b@example.com", "c@example.com"] {
        register(&service, email).await;
    }

    let users = service.list().await.unwrap();
    let emails: Vec<&str> = users.iter().map(User::email).collect();
    assert_eq!(emails, ["c@example.com", "b@example.com", "a@example.com"]);
    assert!(users
        .windows(2)
        .all(|w| w[0].updated_at() >= w[1].updated_at()));

    // Touching a record moves it to the front
    service.validate("a@example.com").await.unwrap();
    let users = service.list().await.unwrap();
    assert_eq!(users[0].email(), "a@example.com");
}

#[tokio::test]
async fn test_add_then_get_round_trips() {
    let store = InMemoryPersistence::new();
    let user = User::new("petete@version1.com", Password::new("password").unwrap()).unwrap();

    let scope = store.begin().await.unwrap();
    scope.users().add(user.clone()).await.unwrap();
    scope.commit().await.unwrap();

    let scope = store.begin().await.unwrap();
    let stored = scope.users().get("petete@version1.com").await.unwrap().unwrap();
    drop(scope);

    assert_eq!(stored, user);
    assert_eq!(stored.created_at(), user.created_at());
    assert_eq!(stored.updated_at(), user.updated_at());
    assert_eq!(stored.password().as_str(), user.password().as_str());
    assert_eq!(stored.is_active(), user.is_active());
    assert_eq!(stored.is_validated(), user.is_validated());
}

#[tokio::test]
async fn test_scope_without_commit_leaves_no_trace() {
    let store = InMemoryPersistence::new();
    let user = User::new("petete@version1.com", Password::new("password").unwrap()).unwrap();

    let scope = store.begin().await.unwrap();
    scope.users().add(user.clone()).await.unwrap();
    drop(scope);
    assert!(store.is_empty().await);

    let scope = store.begin().await.unwrap();
    scope.users().add(user).await.unwrap();
    scope.rollback().await.unwrap();
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_concurrent_registration_has_one_winner() {
    let (service, store) = setup();
    let service = Arc::new(service);

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let service = Arc::clone(&service);
            tokio::spawn(async move {
                service
                    .register("race@example.com".to_string(), format!("password-{}", i))
                    .await
            })
        })
        .collect();

    let mut winners = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => winners += 1,
            Err(AppError::UserAlreadyExists) => {}
            Err(e) => panic!("unexpected error: {}", e),
        }
    }

    assert_eq!(winners, 1);
    assert_eq!(store.len().await, 1);
}
