//! Authentication service - credential checks and bearer tokens.
//!
//! Bad credentials are an expected outcome (`Ok(None)`), not an error.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::config::{is_valid_scope, Config, SECONDS_PER_MINUTE, TOKEN_TYPE_BEARER};
use crate::domain::{Password, User};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// JWT claims payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's email
    pub sub: String,
    #[serde(default)]
    pub scopes: Vec<String>,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes.iter().any(|s| s == scope)
    }
}

/// Token response returned after successful authentication
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Token type (always "bearer")
    #[schema(example = "bearer")]
    pub token_type: String,
    /// Token lifetime in seconds
    #[schema(example = 1800)]
    pub expires_in: i64,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Check a password; `None` when the user is unknown or the password is wrong
    async fn authenticate(&self, email: &str, password: &str) -> AppResult<Option<User>>;

    /// Sign an access token for `user` carrying `scopes`
    fn issue_token(&self, user: &User, scopes: Vec<String>) -> AppResult<TokenResponse>;

    /// Verify a token's signature and expiry and extract its claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    /// Create new auth service instance with Unit of Work
    pub fn new(uow: Arc<U>, config: Config) -> Self {
        Self { uow, config }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn authenticate(&self, email: &str, password: &str) -> AppResult<Option<User>> {
        let scope = self.uow.begin().await?;
        let user = scope.users().get(email).await?;

        let Some(user) = user else {
            // Same work as a real check, so unknown emails can't be told apart by timing
            Password::verify_dummy(password);
            tracing::debug!(email = %email, "Authentication failed: unknown user");
            return Ok(None);
        };

        if !user.password().verify(password) {
            tracing::debug!(email = %email, "Authentication failed: wrong password");
            return Ok(None);
        }

        Ok(Some(user))
    }

    fn issue_token(&self, user: &User, scopes: Vec<String>) -> AppResult<TokenResponse> {
        if let Some(unknown) = scopes.iter().find(|s| !is_valid_scope(s)) {
            return Err(AppError::validation(format!("Unknown scope: {}", unknown)));
        }

        let mut granted: Vec<String> = Vec::with_capacity(scopes.len());
        for scope in scopes {
            if !granted.contains(&scope) {
                granted.push(scope);
            }
        }

        let minutes = self.config.jwt_expiration_minutes;
        let lifetime = Duration::try_minutes(minutes)
            .zip(minutes.checked_mul(SECONDS_PER_MINUTE))
            .filter(|(_, seconds)| *seconds > 0);
        let Some((lifetime, expires_in)) = lifetime else {
            return Err(AppError::configuration(format!(
                "Token lifetime of {} minutes is out of range",
                minutes
            )));
        };

        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(lifetime)
            .ok_or_else(|| AppError::configuration("Token expiry overflows the calendar"))?;

        let claims = Claims {
            sub: user.email().to_string(),
            scopes: granted,
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(
            &Header::new(self.config.jwt_algorithm),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret_bytes()),
        )?;

        tracing::info!(email = %user.email(), scopes = ?claims.scopes, "Access token issued");

        Ok(TokenResponse {
            access_token: token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in,
        })
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret_bytes()),
            &Validation::new(self.config.jwt_algorithm),
        )?;

        Ok(token_data.claims)
    }
}
