use axum::{routing::get, routing::post, Router};
use std::future::Future;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::api::sync as sync_handlers;
use super::api_doc::ApiDoc;
use super::auth::AppState;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Sync API endpoints
        .route("/api/sync/status", get(sync_handlers::status))
        .route("/api/sync/activate", post(sync_handlers::activate))
        .route("/api/sync/deactivate", post(sync_handlers::deactivate))
        .route("/api/viewport", post(sync_handlers::viewport))
        // OpenAPI / Swagger
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_server<F>(state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let bind_addr = state.config.web.bind.clone();
    let app = router(state);

    log::info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::geo::WkidProjector;
    use crate::sync::{SyncController, SyncState};
    use crate::web::api::error::ApiError;
    use crate::web::auth::AuthenticatedUser;
    use axum::{extract::State, http::StatusCode, Json};
    use std::sync::Arc;
    use tempfile::TempDir;
    use tokio::sync::Mutex;

    fn state(temp: &TempDir) -> AppState {
        let mut config = Config::default();
        config.sync.save_directory = temp.path().to_path_buf();
        config.viewer.launch = false;
        let config = Arc::new(config);
        let controller = SyncController::new(config.clone(), Arc::new(WkidProjector));
        AppState {
            config,
            controller: Arc::new(Mutex::new(controller)),
        }
    }

    fn anonymous() -> AuthenticatedUser {
        AuthenticatedUser { name: None }
    }

    #[test]
    fn test_openapi_lists_sync_paths() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/sync/status",
            "/api/sync/activate",
            "/api/sync/deactivate",
            "/api/viewport",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }

    #[tokio::test]
    async fn test_router_builds() {
        let temp = TempDir::new().unwrap();
        let _ = router(state(&temp));
    }

    #[tokio::test]
    async fn test_lifecycle_through_handlers() {
        let temp = TempDir::new().unwrap();
        let state = state(&temp);

        let Json(status) = sync_handlers::status(State(state.clone()), anonymous())
            .await
            .ok()
            .unwrap();
        assert_eq!(status.state, SyncState::Inactive);

        let Json(status) = sync_handlers::activate(State(state.clone()), anonymous(), None)
            .await
            .ok()
            .unwrap();
        assert!(matches!(status.state, SyncState::Active { .. }));

        let code = sync_handlers::viewport(
            State(state.clone()),
            anonymous(),
            Json(crate::sync::ViewportSample {
                camera: crate::sync::Camera {
                    x: 127.785,
                    y: 26.36,
                    spatial_reference: None,
                    heading: 45.0,
                    pitch: -20.0,
                    roll: 0.0,
                },
                extent: crate::geo::Extent {
                    x_min: 127.78,
                    y_min: 26.35,
                    x_max: 127.79,
                    y_max: 26.37,
                    spatial_reference: Default::default(),
                },
            }),
        )
        .await
        .ok()
        .unwrap();
        assert_eq!(code, StatusCode::ACCEPTED);

        let second = sync_handlers::activate(State(state.clone()), anonymous(), None).await;
        assert!(matches!(second, Err(ApiError::Conflict("sync_active"))));

        let Json(status) = sync_handlers::deactivate(State(state.clone()), anonymous())
            .await
            .ok()
            .unwrap();
        assert_eq!(status.state, SyncState::Inactive);
        assert!(!status.view_path.exists());
    }
}
