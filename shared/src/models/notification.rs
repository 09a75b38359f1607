//! Buyer notification models and DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::types::DeliveryLocation;
use crate::validation::{validate_buyer_email, validate_delivery_location};

/// A notification that was sent to a buyer.
///
/// Only ever built with a resolved forecast code and persisted right after the
/// mail goes out. Records are append-only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub email: String,
    pub location: DeliveryLocation,
    pub forecast_code: f64,
    pub buyer_notification: bool,
    pub created_at: DateTime<Utc>,
}

/// Request to evaluate the forecast for a delivery and notify the buyer
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct NotificationRequest {
    #[validate(custom = "validate_buyer_email")]
    pub email: String,

    #[validate(custom = "validate_delivery_location")]
    pub location: DeliveryLocation,
}

/// Outcome of a notification request, returned whether or not a mail was sent
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NotificationServiceResponse {
    pub forecast_code: f64,
    pub forecast_description: String,
    pub buyer_notification: bool,
}

/// One entry of a buyer's notification history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NotificationHistoryEntry {
    pub notification_sent_at: DateTime<Utc>,
    pub location: DeliveryLocation,
    pub forecast_code: f64,
}

/// Notification history for a buyer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NotificationHistoryResponse {
    pub history: Vec<NotificationHistoryEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_rejects_unknown_fields() {
        let body = r#"{"email":"buyer@example.com","location":{"latitude":"4.6","longitude":"-74.08"},"extra":1}"#;
        assert!(serde_json::from_str::<NotificationRequest>(body).is_err());
    }

    #[test]
    fn test_request_validation() {
        let valid = NotificationRequest {
            email: "buyer@example.com".to_string(),
            location: DeliveryLocation::new("4.6097", "-74.0817"),
        };
        assert!(valid.validate().is_ok());

        let bad_email = NotificationRequest {
            email: "not-an-email".to_string(),
            ..valid.clone()
        };
        let errors = bad_email.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));

        let bad_location = NotificationRequest {
            location: DeliveryLocation::new("91", "-74.0817"),
            ..valid
        };
        let errors = bad_location.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("location"));
    }

    #[test]
    fn test_history_entry_wire_shape() {
        let entry = NotificationHistoryEntry {
            notification_sent_at: DateTime::parse_from_rfc3339("2024-05-01T10:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
            location: DeliveryLocation::new("4.6097", "-74.0817"),
            forecast_code: 1183.0,
        };

        let json = serde_json::to_value(NotificationHistoryResponse {
            history: vec![entry],
        })
        .unwrap();

        let first = &json["history"][0];
        assert_eq!(first["location"]["latitude"], "4.6097");
        assert_eq!(first["location"]["longitude"], "-74.0817");
        assert_eq!(first["forecast_code"], 1183.0);
        assert!(first.get("notification_sent_at").is_some());
        assert!(first.get("email").is_none());
    }
}
