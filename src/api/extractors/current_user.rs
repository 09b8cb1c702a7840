//! Bearer-token extractor for protected handlers.
//!
//! Every protected route needs the `me` scope plus the scope named by its
//! [`ScopeRequirement`]. Checks run in a fixed order: token, subject,
//! scopes (401), then the active flag (400).

use std::marker::PhantomData;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::api::AppState;
use crate::config::{BEARER_TOKEN_PREFIX, SCOPE_ADMIN, SCOPE_ME, SCOPE_USERS_READ};
use crate::domain::User;
use crate::errors::AppError;

/// Scope a route asks for on top of `me`.
pub trait ScopeRequirement: Send + Sync + 'static {
    const SCOPE: Option<&'static str>;
}

/// Nothing beyond `me`
#[derive(Debug, Clone, Copy)]
pub struct Me;

impl ScopeRequirement for Me {
    const SCOPE: Option<&'static str> = None;
}

#[derive(Debug, Clone, Copy)]
pub struct UsersRead;

impl ScopeRequirement for UsersRead {
    const SCOPE: Option<&'static str> = Some(SCOPE_USERS_READ);
}

#[derive(Debug, Clone, Copy)]
pub struct Admin;

impl ScopeRequirement for Admin {
    const SCOPE: Option<&'static str> = Some(SCOPE_ADMIN);
}

/// The active user a request's bearer token belongs to, with the token's scopes.
#[derive(Debug, Clone)]
pub struct CurrentUser<R = Me> {
    pub user: User,
    pub scopes: Vec<String>,
    requirement: PhantomData<R>,
}

/// Fail with `InsufficientScope` unless every required scope was granted.
fn require_scopes(email: &str, granted: &[String], required: &[&str]) -> Result<(), AppError> {
    match required.iter().find(|r| !granted.iter().any(|g| g.as_str() == **r)) {
        None => Ok(()),
        Some(missing) => {
            tracing::debug!(email, scope = missing, "Missing token scope");
            Err(AppError::InsufficientScope)
        }
    }
}

#[async_trait]
impl<R: ScopeRequirement> FromRequestParts<AppState> for CurrentUser<R> {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix(BEARER_TOKEN_PREFIX))
            .ok_or(AppError::Unauthorized)?;

        let claims = state.auth_service.verify_token(token)?;

        // A token for a user that no longer resolves is just a bad token
        let user = match state.user_service.get(&claims.sub).await {
            Ok(user) => user,
            Err(AppError::UserDoesNotExist) => return Err(AppError::Unauthorized),
            Err(e) => return Err(e),
        };

        let required: Vec<&str> = std::iter::once(SCOPE_ME).chain(R::SCOPE).collect();
        require_scopes(user.email(), &claims.scopes, &required)?;

        if !user.is_active() {
            return Err(AppError::InactiveUser);
        }

        Ok(CurrentUser {
            user,
            scopes: claims.scopes,
            requirement: PhantomData,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn granted(scopes: &[&str]) -> Vec<String> {
        scopes.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_all_required_scopes_present() {
        let granted = granted(&["me", "admin"]);
        assert!(require_scopes("a@example.com", &granted, &["me", "admin"]).is_ok());
    }

    #[test]
    fn test_route_scope_alone_is_not_enough() {
        let granted = granted(&["admin"]);
        let err = require_scopes("a@example.com", &granted, &["me", "admin"]).unwrap_err();
        assert!(matches!(err, AppError::InsufficientScope));
    }

    #[test]
    fn test_me_alone_is_not_enough_for_admin() {
        let granted = granted(&["me"]);
        let err = require_scopes("a@example.com", &granted, &["me", "admin"]).unwrap_err();
        assert!(matches!(err, AppError::InsufficientScope));
    }
}
