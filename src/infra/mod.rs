//! Infrastructure layer - storage and transactions
//!
//! - Database connection and migrations
//! - User repository (SeaORM)
//! - Unit of Work: a Postgres-backed one and an in-memory one

pub mod db;
pub mod memory;
pub mod repositories;
pub mod unit_of_work;

pub use db::{Database, Migrator};
pub use memory::InMemoryPersistence;
pub use repositories::{TxUserRepository, UserRepository};
pub use unit_of_work::{Persistence, TransactionScope, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::MockUserRepository;
