use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::features;
use super::health;
use super::overrides;
use super::state::AppState;

/// Options for the HTTP adapter
#[derive(Debug, Clone)]
pub struct RouterOptions {
    pub cors: bool,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self { cors: true }
    }
}

/// Create the router with application state
pub fn create_router(state: AppState, options: RouterOptions) -> Router {
    let router = Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        // Override management
        .route("/overrides", get(overrides::list_overrides))
        .route(
            "/overrides/{feature_id}",
            get(overrides::get_override)
                .post(overrides::set_override)
                .delete(overrides::clear_override),
        )
        // Registered features and resolution
        .route("/features", get(features::list_features))
        .route("/features/{feature_id}/model", get(features::resolve_model))
        .with_state(state);

    let router = if options.cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    };

    router.layer(TraceLayer::new_for_http())
}

/// Router with default options
pub fn create_default_router(state: AppState) -> Router {
    create_router(state, RouterOptions::default())
}
