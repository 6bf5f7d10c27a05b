//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{account_handler, auth_handler};
use crate::domain::AccountResponse;
use crate::services::TokenResponse;
use crate::types::MessageResponse;

/// OpenAPI documentation for the FinTrack API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "FinTrack API",
        version = "0.1.0",
        description = "Authentication and account lifecycle for the FinTrack personal finance tracker",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT"),
        contact(name = "FinTrack", email = "support@fintrack.app")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development"),
    ),
    paths(
        // Authentication endpoints
        auth_handler::register,
        auth_handler::activate,
        auth_handler::login,
        // Account endpoints
        account_handler::profile,
    ),
    components(
        schemas(
            // Domain types
            AccountResponse,
            // Auth types
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            auth_handler::LoginResponse,
            TokenResponse,
            // Shared types
            MessageResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Account registration, activation, and login"),
        (name = "Account", description = "Authenticated account operations")
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
                        .description(Some("JWT token obtained from /login"))
                        .build(),
                ),
            );
        }
    }
}
