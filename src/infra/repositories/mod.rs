//! Repository layer - Data access abstraction

pub(crate) mod entities;
mod user_repository;

pub use user_repository::{TxUserRepository, UserRepository};

// Export mock for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
