//! HTTP handlers for buyer notification endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use shared::{NotificationHistoryResponse, NotificationRequest, NotificationServiceResponse};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::AppState;

/// Check the delivery forecast and notify the buyer when rain is expected
pub async fn notify_buyer(
    State(state): State<AppState>,
    payload: Result<Json<NotificationRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<NotificationServiceResponse>)> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::warn!("Rejected notification request body: {}", rejection);
        AppError::InvalidJson
    })?;

    request.validate()?;

    tracing::info!("NotifyBuyer request [{}] {}", request.email, request.location);

    let response = state.notifications.send_notification(&request).await?;

    tracing::info!(
        forecast_code = response.forecast_code,
        buyer_notification = response.buyer_notification,
        "NotifyBuyer response"
    );

    Ok((StatusCode::CREATED, Json(response)))
}

/// Get the notifications sent to a buyer
pub async fn get_notification_history(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> AppResult<Json<NotificationHistoryResponse>> {
    tracing::info!("GetNotificationHistory request [{}]", email);

    let history = state.notifications.get_history(&email).await?;
    Ok(Json(history))
}
