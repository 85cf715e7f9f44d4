//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every handler under `/api` plus the health probes,
//! the response DTOs and the [`ErrorSchema`] wrapper that documents
//! [`crate::domain::Error`] without coupling the domain to utoipa.
//!
//! Swagger UI serves the document at `/docs` in debug builds.

use crate::inbound::http::dto::{
    LoginResponse, MessageResponse, PartResponse, PlaneResponse, PlaneWithPartsResponse,
    UserResponse,
};
use crate::inbound::http::parts::{AddPartRequest, UpdatePartRequest, UpdateUsageRequest};
use crate::inbound::http::planes::{CreatePlaneRequest, UpdatePlaneRequest};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::users::{LoginRequest, RegisterRequest, UpdateUserRequest};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Register the two ways a signed token may be presented.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "AuthCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "auth_token",
                "Token cookie issued by POST /api/users/login.",
            ))),
        );
        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Aircraft maintenance backend API",
        description = "Accounts, fleet registry, installed parts and maintenance alerts."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("AuthCookie" = []), ("BearerToken" = [])),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::planes::create_plane,
        crate::inbound::http::planes::list_planes,
        crate::inbound::http::planes::get_plane_by_tail,
        crate::inbound::http::planes::get_plane,
        crate::inbound::http::planes::update_plane,
        crate::inbound::http::planes::delete_plane,
        crate::inbound::http::planes::get_plane_with_parts,
        crate::inbound::http::parts::add_part,
        crate::inbound::http::parts::get_parts_by_plane,
        crate::inbound::http::parts::get_all_parts,
        crate::inbound::http::parts::get_part,
        crate::inbound::http::parts::update_part,
        crate::inbound::http::parts::update_part_usage,
        crate::inbound::http::parts::delete_part,
        crate::inbound::http::parts::maintenance_alerts,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        UserResponse,
        LoginResponse,
        MessageResponse,
        PlaneResponse,
        PartResponse,
        PlaneWithPartsResponse,
        RegisterRequest,
        LoginRequest,
        UpdateUserRequest,
        CreatePlaneRequest,
        UpdatePlaneRequest,
        AddPartRequest,
        UpdatePartRequest,
        UpdateUsageRequest,
    )),
    tags(
        (name = "users", description = "Accounts and authentication"),
        (name = "planes", description = "Fleet registry"),
        (name = "parts", description = "Installed parts and maintenance alerts"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
