//! User aggregate and related types.
//!
//! A user is identified by its email address. The two lifecycle flags,
//! `validated` and `active`, are independent: enabling a user does not
//! require the email to have been validated first.

use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use validator::ValidateEmail;

use super::Password;
use crate::errors::{AppError, AppResult};

/// User aggregate
#[derive(Debug, Clone)]
pub struct User {
    email: String,
    password: Password,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    active: bool,
    validated: bool,
}

impl User {
    /// Create a fresh, inactive and unvalidated user.
    ///
    /// # Errors
    /// Returns `InvalidEmailFormat` if `email` is not a valid address.
    pub fn new(email: impl Into<String>, password: Password) -> AppResult<Self> {
        let email = email.into();
        if !email.validate_email() {
            return Err(AppError::InvalidEmailFormat);
        }

        let now = Utc::now();
        Ok(Self {
            email,
            password,
            created_at: now,
            updated_at: now,
            active: false,
            validated: false,
        })
    }

    /// Rebuild a user from persisted state. Storage adapters only.
    pub fn from_parts(
        email: String,
        password: Password,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        active: bool,
        validated: bool,
    ) -> Self {
        Self {
            email,
            password,
            created_at,
            updated_at,
            active,
            validated,
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Hashed credential
    pub fn password(&self) -> &Password {
        &self.password
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Mark the email address as validated
    pub fn validate(&mut self) {
        self.validated = true;
        self.touch();
    }

    pub fn is_validated(&self) -> bool {
        self.validated
    }

    /// Allow the user to be used
    pub fn enable(&mut self) {
        self.active = true;
        self.touch();
    }

    /// Prevent the user from being used
    pub fn disable(&mut self) {
        self.active = false;
        self.touch();
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Bump `updated_at`, never moving it backwards.
    fn touch(&mut self) {
        self.updated_at = Utc::now().max(self.updated_at);
    }
}

// Identity is the email alone.
impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.email == other.email
    }
}

impl Eq for User {}

impl Hash for User {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.email.hash(state);
    }
}

/// User response (safe to return to client)
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct UserResponse {
    /// User email address
    #[schema(example = "user@example.com")]
    pub email: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
    /// Whether the user may be used
    pub active: bool,
    /// Whether the email address has been validated
    pub validated: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            email: user.email,
            created_at: user.created_at,
            updated_at: user.updated_at,
            active: user.active,
            validated: user.validated,
        }
    }
}
