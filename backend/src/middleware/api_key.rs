//! API key middleware
//!
//! Every `/api/v1` request must carry the configured key in `x-api-key`.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::AppError;
use crate::AppState;

/// Header holding the caller's API key
pub const API_KEY_HEADER: &str = "x-api-key";

/// Reject requests whose `x-api-key` header does not match the configured key
pub async fn api_key_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|h| h.to_str().ok());

    if provided != Some(state.config.api_key.as_str()) {
        tracing::warn!(
            path = %request.uri().path(),
            key_present = provided.is_some(),
            "Rejected request with invalid API key"
        );
        return AppError::Unauthorized.into_response();
    }

    next.run(request).await
}
