//! Identity - user registration, lifecycle flags and bearer tokens
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: `User`, `Password` and pagination values
//! - **services**: User lifecycle and authentication use cases
//! - **infra**: Storage, unit of work and migrations
//! - **api**: HTTP handlers, extractors and routes
//! - **types**: Request parameter types
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Start on in-memory storage
//! cargo run -- serve --in-memory
//!
//! # Run migrations
//! cargo run -- migrate up
//!
//! # Bootstrap an admin
//! cargo run -- user create admin@example.com secret
//! cargo run -- user enable admin@example.com
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Page, PageRequest, Password, User};
pub use errors::{AppError, AppResult};
pub use infra::{InMemoryPersistence, Persistence, UnitOfWork};
