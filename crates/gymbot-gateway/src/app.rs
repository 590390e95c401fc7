use axum::{
    routing::{get, post},
    Router,
};
use gymbot_conversation::TurnRouter;
use gymbot_core::config::GymbotConfig;
use std::sync::Arc;

/// Central shared state: passed as Arc<AppState> to all Axum handlers.
pub struct AppState {
    pub config: GymbotConfig,
    pub turns: TurnRouter,
}

impl AppState {
    pub fn new(config: GymbotConfig, turns: TurnRouter) -> Self {
        Self { config, turns }
    }
}

/// Assemble the full Axum router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(crate::http::health::health_handler))
        .route(
            "/fulfillment",
            post(crate::http::fulfillment::fulfillment_handler),
        )
        .with_state(state)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}
