//! Buyer notification service
//!
//! Supports:
//! - Checking tomorrow's forecast at a delivery location
//! - Deciding whether the forecast code is notify-worthy
//! - Mailing the buyer and recording the notification
//! - Reading a buyer's notification history

use std::sync::Arc;

use chrono::Utc;
use shared::{
    Notification, NotificationHistoryEntry, NotificationHistoryResponse, NotificationRequest,
    NotificationServiceResponse,
};

use crate::error::AppResult;
use crate::external::{ForecastProvider, NotificationSender};
use crate::repository::NotificationRepository;

/// Days of forecast requested; the delivery day is the second one
pub const FORECAST_DAYS_AHEAD: u32 = 2;

/// Notification service for buyer delivery warnings
#[derive(Clone)]
pub struct NotificationService {
    forecast: Arc<dyn ForecastProvider>,
    repository: Arc<dyn NotificationRepository>,
    sender: Arc<dyn NotificationSender>,
}

impl NotificationService {
    /// Create a new NotificationService instance
    pub fn new(
        forecast: Arc<dyn ForecastProvider>,
        repository: Arc<dyn NotificationRepository>,
        sender: Arc<dyn NotificationSender>,
    ) -> Self {
        Self {
            forecast,
            repository,
            sender,
        }
    }

    // ========================================================================
    // Notification Pipeline
    // ========================================================================

    /// Check the delivery forecast and notify the buyer when warranted.
    ///
    /// The response is built before any side effect and returned whatever the
    /// decision. When the buyer is notified the mail goes out first and the
    /// record is saved after; a failed save is returned as the error even
    /// though the mail was already sent.
    pub async fn send_notification(
        &self,
        request: &NotificationRequest,
    ) -> AppResult<NotificationServiceResponse> {
        let forecast = self
            .forecast
            .fetch_forecast(&request.location, FORECAST_DAYS_AHEAD)
            .await?;

        let buyer_notification = self.requires_buyer_notification(forecast.code).await?;

        let response = NotificationServiceResponse {
            forecast_code: forecast.code,
            forecast_description: forecast.description.clone(),
            buyer_notification,
        };

        tracing::info!(
            email = %request.email,
            forecast_code = forecast.code,
            buyer_notification,
            "Notification decision"
        );

        if buyer_notification {
            let notification = create_notification(request, forecast.code);

            self.sender
                .send(&request.email, &delay_message(&forecast.description))
                .await?;
            self.repository.save_notification(&notification).await?;
        }

        Ok(response)
    }

    /// Whether `code` is in the stored set of notify-worthy codes
    pub async fn requires_buyer_notification(&self, code: f64) -> AppResult<bool> {
        let codes = self.repository.get_notification_codes().await?;
        Ok(is_notify_worthy(&codes, code))
    }

    // ========================================================================
    // Notification History
    // ========================================================================

    /// Get the notifications sent to a buyer, oldest first.
    ///
    /// A buyer with no notifications is `AppError::NotFound`, never an empty
    /// history.
    pub async fn get_history(&self, email: &str) -> AppResult<NotificationHistoryResponse> {
        let notifications = self.repository.get_notifications(email).await?;

        Ok(NotificationHistoryResponse {
            history: notifications.iter().map(to_history_entry).collect(),
        })
    }
}

/// Shortest decimal form of a forecast code: `123.0` -> `"123"`, `1.5` -> `"1.5"`
pub fn format_forecast_code(code: f64) -> String {
    code.to_string()
}

/// Membership test of a forecast code in the stored code set
pub fn is_notify_worthy(codes: &[String], code: f64) -> bool {
    let code = format_forecast_code(code);
    codes.iter().any(|c| *c == code)
}

/// Plaintext mail body warning the buyer about the forecast
pub fn delay_message(description: &str) -> String {
    format!(
        "Hola! Tenemos programada la entrega de tu paquete para mañana, en la dirección de entrega \
         esperamos un día con {} y por esta razón es posible que tengamos retrasos. Haremos todo a \
         nuestro alcance para cumplir con tu entrega.",
        description.to_lowercase()
    )
}

fn create_notification(request: &NotificationRequest, forecast_code: f64) -> Notification {
    Notification {
        email: request.email.clone(),
        location: request.location.clone(),
        forecast_code,
        buyer_notification: true,
        created_at: Utc::now(),
    }
}

/// Project a stored notification into a history entry
pub fn to_history_entry(notification: &Notification) -> NotificationHistoryEntry {
    NotificationHistoryEntry {
        notification_sent_at: notification.created_at,
        location: notification.location.clone(),
        forecast_code: notification.forecast_code,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::DeliveryLocation;

    fn codes(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_format_forecast_code() {
        assert_eq!(format_forecast_code(123.0), "123");
        assert_eq!(format_forecast_code(1183.0), "1183");
        assert_eq!(format_forecast_code(1.5), "1.5");
    }

    #[test]
    fn test_is_notify_worthy() {
        let stored = codes(&["123", "1183"]);

        assert!(is_notify_worthy(&stored, 123.0));
        assert!(is_notify_worthy(&stored, 1183.0));
        assert!(!is_notify_worthy(&stored, 999.0));
        assert!(!is_notify_worthy(&stored, 123.5));
    }

    #[test]
    fn test_stored_codes_are_compared_as_text() {
        // "123.0" is not the minimal form, so it never matches
        assert!(!is_notify_worthy(&codes(&["123.0"]), 123.0));
        assert!(!is_notify_worthy(&[], 123.0));
    }

    #[test]
    fn test_delay_message_lowercases_description() {
        let text = delay_message("Lluvia Moderada");

        assert!(text.starts_with("Hola! Tenemos programada la entrega de tu paquete para mañana"));
        assert!(text.contains("esperamos un día con lluvia moderada y por esta razón"));
    }

    #[test]
    fn test_create_notification() {
        let request = NotificationRequest {
            email: "buyer@example.com".to_string(),
            location: DeliveryLocation::new("4.6097", "-74.0817"),
        };

        let notification = create_notification(&request, 1183.0);

        assert_eq!(notification.email, "buyer@example.com");
        assert_eq!(notification.location, request.location);
        assert_eq!(notification.forecast_code, 1183.0);
        assert!(notification.buyer_notification);
    }

    #[test]
    fn test_history_entry_drops_email_and_flag() {
        let notification = Notification {
            email: "buyer@example.com".to_string(),
            location: DeliveryLocation::new("40.7128", "-74.0060"),
            forecast_code: 1234.0,
            buyer_notification: true,
            created_at: Utc::now(),
        };

        let entry = to_history_entry(&notification);

        assert_eq!(entry.notification_sent_at, notification.created_at);
        assert_eq!(entry.location, notification.location);
        assert_eq!(entry.forecast_code, 1234.0);
    }
}
