//! Token issuance handler.

use axum::{extract::State, response::Json, routing::post, Form, Router};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::api::AppState;
use crate::errors::{AppError, AppResult};
use crate::services::TokenResponse;

/// OAuth2 password-grant form
#[derive(Debug, Deserialize, ToSchema)]
pub struct TokenRequest {
    /// User email address
    #[schema(example = "user@example.com")]
    pub username: String,
    /// User password
    #[schema(example = "SecurePass123!")]
    pub password: String,
    /// Space separated scopes, e.g. `me users:read`
    #[serde(default)]
    #[schema(example = "me users:read")]
    pub scope: String,
}

/// Create token routes
pub fn token_routes() -> Router<AppState> {
    Router::new().route("/token", post(issue_token))
}

/// Exchange credentials for a bearer token
#[utoipa::path(
    post,
    path = "/v1/token",
    tag = "Authentication",
    request_body(content = TokenRequest, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 400, description = "Unknown scope requested"),
        (status = 401, description = "Incorrect username or password")
    )
)]
pub async fn issue_token(
    State(state): State<AppState>,
    Form(form): Form<TokenRequest>,
) -> AppResult<Json<TokenResponse>> {
    let user = state
        .auth_service
        .authenticate(&form.username, &form.password)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let scopes = form.scope.split_whitespace().map(str::to_owned).collect();
    let token = state.auth_service.issue_token(&user, scopes)?;

    Ok(Json(token))
}
