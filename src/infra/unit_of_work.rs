//! Unit of Work pattern implementation.
//!
//! A `UnitOfWork` is a factory of transaction scopes. Each scope owns one
//! storage transaction and the repository bound to it:
//!
//! - `commit()` makes everything done through the scope durable
//! - `rollback()` discards it
//! - dropping the scope without committing also discards it
//!
//! Services open one scope per operation; scopes are never shared.

use async_trait::async_trait;
use sea_orm::{
    AccessMode, ConnectionTrait, DatabaseBackend, DatabaseConnection, IsolationLevel,
    TransactionTrait,
};

use super::repositories::{TxUserRepository, UserRepository};
use crate::errors::{AppError, AppResult};

/// Unit of Work trait for dependency injection.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Open a new transactional scope.
    async fn begin(&self) -> AppResult<Box<dyn TransactionScope>>;
}

/// One open transaction and the repositories bound to it.
#[async_trait]
pub trait TransactionScope: Send {
    /// User repository for this transaction
    fn users(&self) -> &dyn UserRepository;

    /// Persist all changes made through this scope.
    async fn commit(self: Box<Self>) -> AppResult<()>;

    /// Discard all changes made through this scope.
    async fn rollback(self: Box<Self>) -> AppResult<()>;
}

/// Database-backed UnitOfWork over a pooled connection.
#[derive(Clone)]
pub struct Persistence {
    db: DatabaseConnection,
}

impl Persistence {
    /// Create a new UnitOfWork over the connection pool.
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Postgres transactions run at ReadCommitted; the email primary key,
    /// not the isolation level, is what keeps registrations unique.
    fn transaction_config(&self) -> (Option<IsolationLevel>, Option<AccessMode>) {
        match self.db.get_database_backend() {
            DatabaseBackend::Postgres => (
                Some(IsolationLevel::ReadCommitted),
                Some(AccessMode::ReadWrite),
            ),
            _ => (None, None),
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    async fn begin(&self) -> AppResult<Box<dyn TransactionScope>> {
        let (isolation, access_mode) = self.transaction_config();
        let txn = self
            .db
            .begin_with_config(isolation, access_mode)
            .await
            .map_err(AppError::from)?;

        Ok(Box::new(TxScope {
            users: TxUserRepository::new(txn),
        }))
    }
}

/// Scope over a SeaORM transaction. SeaORM rolls an open transaction back
/// when it is dropped.
struct TxScope {
    users: TxUserRepository,
}

#[async_trait]
impl TransactionScope for TxScope {
    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        self.users
            .into_transaction()
            .commit()
            .await
            .map_err(AppError::from_db)
    }

    async fn rollback(self: Box<Self>) -> AppResult<()> {
        self.users
            .into_transaction()
            .rollback()
            .await
            .map_err(AppError::from)
    }
}
