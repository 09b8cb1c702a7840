//! OpenAPI documentation configuration.
//!
//! Served through Swagger UI at `/swagger-ui`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{token_handler, user_handler};
use crate::domain::UserResponse;
use crate::services::TokenResponse;

/// OpenAPI documentation for the identity service
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Identity",
        version = "0.1.0",
        description = "User registration, lifecycle flags and bearer tokens",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        token_handler::issue_token,
        user_handler::register,
        user_handler::list_users,
        user_handler::get_user,
        user_handler::validate_user,
        user_handler::enable_user,
        user_handler::disable_user,
    ),
    components(
        schemas(
            UserResponse,
            TokenResponse,
            token_handler::TokenRequest,
            user_handler::RegisterRequest,
            user_handler::UserPageResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Bearer token issuance"),
        (name = "Users", description = "Registration and lifecycle operations")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT obtained from /v1/token"))
                        .build(),
                ),
            );
        }
    }
}
