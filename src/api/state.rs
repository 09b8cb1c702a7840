//! Application state - Dependency injection container.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::Database;
use crate::services::{AuthService, Services, UserService};

/// Application state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth_service: Arc<dyn AuthService>,
    /// User service
    pub user_service: Arc<dyn UserService>,
    /// Database connection, absent when running on in-memory storage
    pub database: Option<Arc<Database>>,
}

impl AppState {
    /// Services backed by the database, which is also health-checked.
    pub fn from_database(database: Arc<Database>, config: Config) -> Self {
        let services = Services::from_connection(database.get_connection(), config);
        Self::from_services(&services, Some(database))
    }

    /// Services backed by process memory. Nothing survives a restart.
    pub fn in_memory(config: Config) -> Self {
        Self::from_services(&Services::in_memory(config), None)
    }

    pub fn from_services(services: &Services, database: Option<Arc<Database>>) -> Self {
        Self {
            auth_service: services.auth(),
            user_service: services.users(),
            database,
        }
    }
}
