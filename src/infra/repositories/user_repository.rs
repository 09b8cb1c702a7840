//! User repository: the persistence-facing capability set for users.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, DatabaseTransaction, EntityTrait, PaginatorTrait, QueryOrder, QuerySelect,
    Select,
};

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::domain::{Page, PageRequest, User};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait.
///
/// Every implementation is bound to the transaction of the scope that
/// handed it out. Uniqueness is not pre-checked by `add`: a duplicate
/// email is reported by storage as `UserAlreadyExists`.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user
    async fn add(&self, user: User) -> AppResult<User>;

    /// Look a user up by email; `None` when absent
    async fn get(&self, email: &str) -> AppResult<Option<User>>;

    /// Overwrite every mutable field of an existing user
    async fn update(&self, user: User) -> AppResult<User>;

    /// All users, most recently updated first
    async fn list(&self) -> AppResult<Vec<User>>;

    /// One page of `list`, plus the total count
    async fn list_paginated(&self, request: PageRequest) -> AppResult<Page<User>>;
}

/// Transaction-bound SeaORM user repository.
///
/// Owns the transaction; the enclosing scope takes it back to commit.
pub struct TxUserRepository {
    txn: DatabaseTransaction,
}

impl TxUserRepository {
    pub(crate) fn new(txn: DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub(crate) fn into_transaction(self) -> DatabaseTransaction {
        self.txn
    }

    fn ordered() -> Select<UserEntity> {
        UserEntity::find()
            .order_by_desc(user::Column::UpdatedAt)
            .order_by_asc(user::Column::Email)
    }
}

#[async_trait]
impl UserRepository for TxUserRepository {
    async fn add(&self, user: User) -> AppResult<User> {
        let model = ActiveModel::from(&user)
            .insert(&self.txn)
            .await
            .map_err(AppError::from_db)?;

        Ok(User::from(model))
    }

    async fn get(&self, email: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(email.to_owned())
            .one(&self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn update(&self, user: User) -> AppResult<User> {
        let model = ActiveModel::from(&user)
            .update(&self.txn)
            .await
            .map_err(AppError::from_db)?;

        Ok(User::from(model))
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let models = Self::ordered()
            .all(&self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(User::from).collect())
    }

    async fn list_paginated(&self, request: PageRequest) -> AppResult<Page<User>> {
        let total = UserEntity::find()
            .count(&self.txn)
            .await
            .map_err(AppError::from)?;

        let models = Self::ordered()
            .offset(request.offset())
            .limit(request.page_size())
            .all(&self.txn)
            .await
            .map_err(AppError::from)?;

        let items = models.into_iter().map(User::from).collect();
        Ok(Page::new(items, request, total))
    }
}
