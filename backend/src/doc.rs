//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct generating the OpenAPI specification for the
//! REST API: message endpoints, health probes, shared schemas, and the bearer
//! token security scheme. Debug builds serve the document at
//! `/api-docs/openapi.json`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::messages::{
    DeleteMessageResponseBody, MessageResponseBody, NearbyMessagesResponseBody, PostMessageBody,
};

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .description(Some("Opaque bearer token resolved by the token verifier."))
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
        title = "Geonote API",
        description = "Proximity message store: post short location-tagged notes and read the ones near you."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::messages::post_message,
        crate::inbound::http::messages::nearby_messages,
        crate::inbound::http::messages::delete_message,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        PostMessageBody,
        MessageResponseBody,
        NearbyMessagesResponseBody,
        DeleteMessageResponseBody,
    )),
    tags(
        (name = "messages", description = "Posting, reading, and deleting proximity messages"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
