//! Route definitions for the Cocoon Price Advisor

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::{handlers, middleware::identity_middleware, AppState};

/// Create API routes
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Recognized locations (public)
        .route("/locations", get(handlers::list_locations))
        // Recommendation (identity optional, enables history)
        .route("/recommend", post(handlers::recommend))
        // History (identity required)
        .route("/history", get(handlers::list_history))
        .route_layer(middleware::from_fn_with_state(state, identity_middleware))
}
