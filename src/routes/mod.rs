//! HTTP route handlers.
//!
//! Two routes: the maintenance window redirect and the liveness probe. Every
//! request is bounded by the configured timeout and wrapped in a request span
//! carrying a unique request ID.

pub mod alive;
pub mod window;

use axum::{middleware, routing::get, Router};
use tower_http::timeout::TimeoutLayer;

use crate::config::{ALIVE_ROUTE, WINDOW_ROUTE};
use crate::middleware::request_id_layer;
use crate::state::AppState;

/// Creates the Axum router with all routes and layers.
pub fn create_router(state: AppState) -> Router {
    let request_timeout = state.config.http.request_timeout();

    Router::new()
        .route(WINDOW_ROUTE, get(window::window))
        .route(ALIVE_ROUTE, get(alive::alive))
        .with_state(state)
        // Requests running past the limit are answered with 408
        .layer(TimeoutLayer::new(request_timeout))
        // Request ID middleware - creates root span with request_id for correlation
        .layer(middleware::from_fn(request_id_layer))
}
