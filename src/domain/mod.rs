//! Domain layer - Core business entities and logic
//!
//! Pure in-memory types; nothing here touches storage.

pub mod pagination;
pub mod password;
pub mod user;

pub use pagination::{Page, PageRequest};
pub use password::Password;
pub use user::{User, UserResponse};
