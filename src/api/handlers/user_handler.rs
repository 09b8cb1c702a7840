//! User handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidateEmail};

use crate::api::extractors::{Admin, CurrentUser, Me, UsersRead, ValidatedJson};
use crate::api::AppState;
use crate::domain::UserResponse;
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

/// User registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    /// User email address
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "user@example.com")]
    pub username: String,
    /// User password
    #[schema(example = "SecurePass123!")]
    pub password: String,
}

/// One page of users
#[derive(Debug, Serialize, ToSchema)]
pub struct UserPageResponse {
    pub items: Vec<UserResponse>,
    pub page: u64,
    pub page_size: u64,
    pub total: u64,
    pub has_next: bool,
}

/// Path segments must be addresses; anything else can never name a user
fn check_email(email: &str) -> AppResult<()> {
    if email.validate_email() {
        Ok(())
    } else {
        Err(AppError::InvalidEmailFormat)
    }
}

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(register))
        .route("/users/:email", get(get_user))
        .route("/users/:email/validate", post(validate_user))
        .route("/users/:email/enable", post(enable_user))
        .route("/users/:email/disable", post(disable_user))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/v1/users",
    tag = "Users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = UserResponse),
        (status = 400, description = "Invalid email format"),
        (status = 409, description = "User already exists")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let user = state
        .user_service
        .register(payload.username, payload.password)
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// List users, most recently updated first
///
/// Paginated when `page` or `page_size` is given.
#[utoipa::path(
    get,
    path = "/v1/users",
    tag = "Users",
    params(PaginationParams),
    security(("bearer_auth" = ["me", "users:read"])),
    responses(
        (status = 200, description = "All users, or one page of users when paginated", body = UserPageResponse),
        (status = 400, description = "Page or page size is zero"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_users(
    _: CurrentUser<UsersRead>,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Response> {
    let response = match params.requested() {
        Some((page, page_size)) => {
            let page = state
                .user_service
                .list_paginated(page, page_size)
                .await?
                .map(UserResponse::from);
            Json(UserPageResponse {
                items: page.items,
                page: page.page,
                page_size: page.page_size,
                total: page.total,
                has_next: page.has_next,
            })
            .into_response()
        }
        None => {
            let users = state.user_service.list().await?;
            let users: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
            Json(users).into_response()
        }
    };

    Ok(response)
}

/// Get a user by email
#[utoipa::path(
    get,
    path = "/v1/users/{email}",
    tag = "Users",
    params(("email" = String, Path, description = "User email address")),
    security(("bearer_auth" = ["me"])),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 400, description = "Invalid email format or inactive user"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    _: CurrentUser<Me>,
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> AppResult<Json<UserResponse>> {
    check_email(&email)?;

    let user = state.user_service.get(&email).await?;
    Ok(Json(UserResponse::from(user)))
}

/// Mark a user's email as validated
#[utoipa::path(
    post,
    path = "/v1/users/{email}/validate",
    tag = "Users",
    params(("email" = String, Path, description = "User email address")),
    security(("bearer_auth" = ["me", "admin"])),
    responses(
        (status = 200, description = "User validated", body = UserResponse),
        (status = 400, description = "Invalid email format or inactive user"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    )
)]
pub async fn validate_user(
    _: CurrentUser<Admin>,
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> AppResult<Json<UserResponse>> {
    check_email(&email)?;

    let user = state.user_service.validate(&email).await?;
    Ok(Json(UserResponse::from(user)))
}

/// Activate a user
#[utoipa::path(
    post,
    path = "/v1/users/{email}/enable",
    tag = "Users",
    params(("email" = String, Path, description = "User email address")),
    security(("bearer_auth" = ["me", "admin"])),
    responses(
        (status = 200, description = "User enabled", body = UserResponse),
        (status = 400, description = "Invalid email format or inactive user"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    )
)]
pub async fn enable_user(
    _: CurrentUser<Admin>,
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> AppResult<Json<UserResponse>> {
    check_email(&email)?;

    let user = state.user_service.enable(&email).await?;
    Ok(Json(UserResponse::from(user)))
}

/// Deactivate a user
#[utoipa::path(
    post,
    path = "/v1/users/{email}/disable",
    tag = "Users",
    params(("email" = String, Path, description = "User email address")),
    security(("bearer_auth" = ["me", "admin"])),
    responses(
        (status = 200, description = "User disabled", body = UserResponse),
        (status = 400, description = "Invalid email format or inactive user"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    )
)]
pub async fn disable_user(
    _: CurrentUser<Admin>,
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> AppResult<Json<UserResponse>> {
    check_email(&email)?;

    let user = state.user_service.disable(&email).await?;
    Ok(Json(UserResponse::from(user)))
}
