//! Application services layer - Use cases and business logic.
//!
//! Services depend on the `UnitOfWork` abstraction and open one scope per
//! operation.

mod auth_service;
pub mod container;
mod user_service;

pub use auth_service::{AuthService, Authenticator, Claims, TokenResponse};
pub use container::Services;
pub use user_service::{UserManager, UserService};
