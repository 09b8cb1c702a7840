//! In-memory UnitOfWork.
//!
//! Each scope works on a private copy of the committed rows. `commit` folds
//! the scope's writes back in; anything else throws them away. An email
//! inserted by two concurrent scopes commits only once, mirroring the
//! primary-key constraint of the database store.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use super::repositories::UserRepository;
use super::unit_of_work::{TransactionScope, UnitOfWork};
use crate::domain::{Page, PageRequest, User};
use crate::errors::{AppError, AppResult};

type Rows = HashMap<String, User>;

/// Process-local user storage with transactional scopes.
#[derive(Clone, Default)]
pub struct InMemoryPersistence {
    rows: Arc<RwLock<Rows>>,
}

impl InMemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of committed users
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

#[async_trait]
impl UnitOfWork for InMemoryPersistence {
    async fn begin(&self) -> AppResult<Box<dyn TransactionScope>> {
        let rows = self.rows.read().await.clone();
        Ok(Box::new(MemoryScope {
            committed: Arc::clone(&self.rows),
            users: MemoryUserRepository {
                state: Mutex::new(Working {
                    rows,
                    inserted: HashSet::new(),
                    written: HashSet::new(),
                }),
            },
        }))
    }
}

/// Uncommitted state of one scope
struct Working {
    rows: Rows,
    inserted: HashSet<String>,
    written: HashSet<String>,
}

struct MemoryUserRepository {
    state: Mutex<Working>,
}

fn sorted(rows: &Rows) -> Vec<User> {
    let mut users: Vec<User> = rows.values().cloned().collect();
    users.sort_by(|a, b| {
        b.updated_at()
            .cmp(&a.updated_at())
            .then_with(|| a.email().cmp(b.email()))
    });
    users
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn add(&self, user: User) -> AppResult<User> {
        let mut state = self.state.lock().await;
        if state.rows.contains_key(user.email()) {
            return Err(AppError::UserAlreadyExists);
        }

        let email = user.email().to_string();
        state.inserted.insert(email.clone());
        state.written.insert(email.clone());
        state.rows.insert(email, user.clone());
        Ok(user)
    }

    async fn get(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self.state.lock().await.rows.get(email).cloned())
    }

    async fn update(&self, user: User) -> AppResult<User> {
        let mut state = self.state.lock().await;
        let Some(row) = state.rows.get_mut(user.email()) else {
            return Err(AppError::UserDoesNotExist);
        };

        *row = user.clone();
        state.written.insert(user.email().to_string());
        Ok(user)
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        Ok(sorted(&self.state.lock().await.rows))
    }

    async fn list_paginated(&self, request: PageRequest) -> AppResult<Page<User>> {
        let all = sorted(&self.state.lock().await.rows);
        let total = all.len() as u64;
        let items = all
            .into_iter()
            .skip(usize::try_from(request.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(request.page_size()).unwrap_or(usize::MAX))
            .collect();

        Ok(Page::new(items, request, total))
    }
}

struct MemoryScope {
    committed: Arc<RwLock<Rows>>,
    users: MemoryUserRepository,
}

#[async_trait]
impl TransactionScope for MemoryScope {
    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        let MemoryScope { committed, users } = *self;
        let working = users.state.into_inner();
        let mut committed = committed.write().await;

        if working
            .inserted
            .iter()
            .any(|email| committed.contains_key(email))
        {
            return Err(AppError::UserAlreadyExists);
        }

        for email in &working.written {
            if let Some(user) = working.rows.get(email) {
                committed.insert(email.clone(), user.clone());
            }
        }
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> AppResult<()> {
        Ok(())
    }
}
