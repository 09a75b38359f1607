//! Route definitions for the Delivery Notifier service

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::{handlers, middleware::api_key_middleware, AppState};

/// Create API routes. All of them require the `x-api-key` header.
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(notification_routes())
        .route_layer(middleware::from_fn_with_state(state, api_key_middleware))
}

/// Buyer notification routes
fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/notifications", post(handlers::notify_buyer))
        .route("/notifications/:email", get(handlers::get_notification_history))
}
