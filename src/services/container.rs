//! Service Container - wires services onto one unit-of-work factory.

use std::sync::Arc;

use super::{AuthService, Authenticator, UserManager, UserService};
use crate::config::Config;
use crate::infra::{InMemoryPersistence, Persistence, UnitOfWork};

/// Shared handles to every application service.
///
/// The unit of work held here is a factory: each service call opens its
/// own scope, so one container serves any number of concurrent requests.
#[derive(Clone)]
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
}

impl Services {
    /// Create a new service container from already-built services
    pub fn new(auth_service: Arc<dyn AuthService>, user_service: Arc<dyn UserService>) -> Self {
        Self {
            auth_service,
            user_service,
        }
    }

    /// Build every service over the given unit of work
    pub fn from_unit_of_work<U>(uow: Arc<U>, config: Config) -> Self
    where
        U: UnitOfWork + 'static,
    {
        let auth_service = Arc::new(Authenticator::new(uow.clone(), config));
        let user_service = Arc::new(UserManager::new(uow));
        Self::new(auth_service, user_service)
    }

    /// Services backed by the database connection pool
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: Config) -> Self {
        Self::from_unit_of_work(Arc::new(Persistence::new(db)), config)
    }

    /// Services backed by process memory
    pub fn in_memory(config: Config) -> Self {
        Self::from_unit_of_work(Arc::new(InMemoryPersistence::new()), config)
    }

    pub fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    pub fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }
}
