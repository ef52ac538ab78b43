use utoipa::{
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
    Modify, OpenApi,
};

use super::api::error::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        super::api::sync::status,
        super::api::sync::activate,
        super::api::sync::deactivate,
        super::api::sync::viewport,
    ),
    components(
        schemas(
            ErrorResponse,
            crate::sync::SyncStatus,
            crate::sync::SyncState,
            crate::sync::ViewportSample,
            crate::sync::Camera,
            crate::geo::Extent,
            crate::geo::SpatialReference,
            crate::kml::LookAtDescriptor,
        )
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Globe Sync API",
        description = "Push map viewport changes to a polling globe viewer",
        version = "0.1.0"
    ),
    tags(
        (name = "sync", description = "Sync lifecycle and viewport notifications")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_key",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}
