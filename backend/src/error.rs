//! Error handling for the Delivery Notifier service
//!
//! Provides consistent error responses in English and Spanish

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

use crate::external::forecast::ForecastError;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Request errors
    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Invalid JSON data")]
    InvalidJson,

    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    /// The requested resource does not exist. Callers branch on this
    /// variant instead of inspecting error text.
    #[error("Not Found: {0}")]
    NotFound(String),

    // External service errors
    #[error(transparent)]
    Forecast(#[from] ForecastError),

    #[error("Mail delivery failed: {0}")]
    Mail(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    // Database errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound(_))
    }
}

impl From<ValidationErrors> for AppError {
    /// Reports the first failing field in name order
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by_key(|(field, _)| *field);

        fields
            .into_iter()
            .find_map(|(field, errs)| {
                errs.first().map(|err| AppError::Validation {
                    field: field.to_string(),
                    message: err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid {}", field)),
                })
            })
            .unwrap_or_else(|| AppError::Validation {
                field: "request".to_string(),
                message: "Invalid request".to_string(),
            })
    }
}

/// Error response structure
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message_en: String,
    pub message_es: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ErrorDetail {
    pub fn new(code: &str, message_en: impl Into<String>, message_es: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message_en: message_en.into(),
            message_es: message_es.into(),
            field: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail::new("UNAUTHORIZED", "Unauthorized access", "Acceso no autorizado"),
            ),
            AppError::InvalidJson => (
                StatusCode::BAD_REQUEST,
                ErrorDetail::new("INVALID_JSON", "Invalid JSON data", "Datos JSON inválidos"),
            ),
            AppError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    field: Some(field.clone()),
                    ..ErrorDetail::new(
                        "VALIDATION_ERROR",
                        message.clone(),
                        format!("Datos inválidos: {}", field),
                    )
                },
            ),
            AppError::NotFound(message) => (
                StatusCode::NOT_FOUND,
                ErrorDetail::new("NOT_FOUND", message.clone(), "Recurso no encontrado"),
            ),
            AppError::Forecast(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new(
                    "FORECAST_ERROR",
                    err.to_string(),
                    "No fue posible consultar el pronóstico del clima",
                ),
            ),
            AppError::Mail(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new(
                    "MAIL_ERROR",
                    format!("Mail delivery failed: {}", msg),
                    "No fue posible enviar la notificación",
                ),
            ),
            AppError::Configuration(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new(
                    "CONFIGURATION_ERROR",
                    format!("Configuration error: {}", msg),
                    "Error de configuración",
                ),
            ),
            AppError::Database(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new(
                    "DATABASE_ERROR",
                    format!("Database error: {}", err),
                    "Ocurrió un error en la base de datos",
                ),
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new("INTERNAL_ERROR", msg.clone(), "Ocurrió un error inesperado"),
            ),
        };

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers and services
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::NotFound("x".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(AppError::InvalidJson.into_response().status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Unauthorized.into_response().status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::Mail("relay down".into()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_not_found_is_distinguished() {
        assert!(AppError::NotFound("Notification codes not found".into()).is_not_found());
        assert!(!AppError::Internal("Notification codes not found".into()).is_not_found());
    }
}
