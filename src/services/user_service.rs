//! User lifecycle service.
//!
//! Every operation runs in its own unit-of-work scope. Mutations commit at
//! the end; any error returns early, dropping the scope, which rolls back.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{Page, PageRequest, Password, User};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Register a new user with a plain text password
    async fn register(&self, email: String, plain_password: String) -> AppResult<User>;

    /// Get a user by email
    async fn get(&self, email: &str) -> AppResult<User>;

    /// List all users, most recently updated first
    async fn list(&self) -> AppResult<Vec<User>>;

    /// List one page of users, same order as `list`
    async fn list_paginated(&self, page: u64, page_size: u64) -> AppResult<Page<User>>;

    /// Mark a user's email address as validated
    async fn validate(&self, email: &str) -> AppResult<User>;

    /// Activate a user
    async fn enable(&self, email: &str) -> AppResult<User>;

    /// Deactivate a user
    async fn disable(&self, email: &str) -> AppResult<User>;
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    /// Create new user service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    /// Fetch, mutate in memory, write back and commit.
    async fn transition<F>(&self, email: &str, action: &'static str, apply: F) -> AppResult<User>
    where
        F: FnOnce(&mut User) + Send,
    {
        let scope = self.uow.begin().await?;
        let mut user = scope.users().get(email).await?.ok_or_not_found()?;

        apply(&mut user);
        let user = scope.users().update(user).await?;
        scope.commit().await?;

        tracing::info!(
            email = %user.email(),
            active = user.is_active(),
            validated = user.is_validated(),
            "User {}",
            action
        );
        Ok(user)
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn register(&self, email: String, plain_password: String) -> AppResult<User> {
        let password = Password::new(&plain_password)?;
        let user = User::new(email, password)?;

        let scope = self.uow.begin().await?;
        if scope.users().get(user.email()).await?.is_some() {
            tracing::warn!(email = %user.email(), "Registration rejected: user already exists");
            return Err(AppError::UserAlreadyExists);
        }

        // A concurrent registration can still win between the check and the
        // insert; storage reports that as UserAlreadyExists too.
        let user = scope.users().add(user).await?;
        scope.commit().await?;

        tracing::info!(email = %user.email(), "User registered");
        Ok(user)
    }

    async fn get(&self, email: &str) -> AppResult<User> {
        let scope = self.uow.begin().await?;
        let user = scope.users().get(email).await?;
        user.ok_or_not_found()
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let scope = self.uow.begin().await?;
        let users = scope.users().list().await?;
        Ok(users)
    }

    async fn list_paginated(&self, page: u64, page_size: u64) -> AppResult<Page<User>> {
        let request = PageRequest::new(page, page_size)?;
        let scope = self.uow.begin().await?;
        let page = scope.users().list_paginated(request).await?;
        Ok(page)
    }

    async fn validate(&self, email: &str) -> AppResult<User> {
        self.transition(email, "validated", User::validate).await
    }

    async fn enable(&self, email: &str) -> AppResult<User> {
        self.transition(email, "enabled", User::enable).await
    }

    async fn disable(&self, email: &str) -> AppResult<User> {
        self.transition(email, "disabled", User::disable).await
    }
}
