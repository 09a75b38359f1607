//! In-memory collaborators for exercising the notification pipeline

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use delivery_notifier::{
    external::{ForecastError, ForecastProvider, NotificationSender},
    repository::NotificationRepository,
    AppError, AppResult, NotificationService,
};
use shared::{DeliveryLocation, ForecastResult, Notification, NotificationRequest};

/// Forecast provider returning a fixed forecast, or a terminal upstream failure
pub struct StubForecast {
    result: Option<ForecastResult>,
    pub calls: Mutex<Vec<(DeliveryLocation, u32)>>,
}

impl StubForecast {
    pub fn returning(code: f64, description: &str) -> Arc<Self> {
        Arc::new(Self {
            result: Some(ForecastResult::new(code, description)),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            result: None,
            calls: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl ForecastProvider for StubForecast {
    async fn fetch_forecast(
        &self,
        location: &DeliveryLocation,
        days_ahead: u32,
    ) -> Result<ForecastResult, ForecastError> {
        self.calls.lock().unwrap().push((location.clone(), days_ahead));
        self.result
            .clone()
            .ok_or(ForecastError::UpstreamStatus(503))
    }
}

/// Notification store kept in memory
#[derive(Default)]
pub struct InMemoryRepository {
    pub notifications: Mutex<Vec<Notification>>,
    pub codes: Option<Vec<String>>,
    pub fail_saves: bool,
    pub save_calls: Mutex<usize>,
}

impl InMemoryRepository {
    pub fn with_codes(codes: &[&str]) -> Self {
        Self {
            codes: Some(codes.iter().map(|c| c.to_string()).collect()),
            ..Default::default()
        }
    }

    pub fn failing_saves(mut self) -> Self {
        self.fail_saves = true;
        self
    }

    pub fn save_count(&self) -> usize {
        *self.save_calls.lock().unwrap()
    }
}

#[async_trait]
impl NotificationRepository for InMemoryRepository {
    async fn save_notification(&self, notification: &Notification) -> AppResult<()> {
        *self.save_calls.lock().unwrap() += 1;
        if self.fail_saves {
            return Err(AppError::Internal("save rejected".to_string()));
        }
        self.notifications.lock().unwrap().push(notification.clone());
        Ok(())
    }

    async fn get_notifications(&self, email: &str) -> AppResult<Vec<Notification>> {
        let found: Vec<Notification> = self
            .notifications
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.email == email)
            .cloned()
            .collect();

        if found.is_empty() {
            return Err(AppError::NotFound(format!(
                "Notifications with email {} not found",
                email
            )));
        }
        Ok(found)
    }

    async fn get_notification_codes(&self) -> AppResult<Vec<String>> {
        match &self.codes {
            Some(codes) if !codes.is_empty() => Ok(codes.clone()),
            _ => Err(AppError::NotFound("Notification codes not found".to_string())),
        }
    }
}

/// Sender that records every message instead of mailing it
#[derive(Default)]
pub struct RecordingSender {
    pub sent: Mutex<Vec<(String, String)>>,
    pub fail: bool,
}

impl RecordingSender {
    pub fn send_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl NotificationSender for RecordingSender {
    async fn send(&self, email: &str, text: &str) -> AppResult<()> {
        if self.fail {
            return Err(AppError::Mail("relay unavailable".to_string()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((email.to_string(), text.to_string()));
        Ok(())
    }
}

pub fn service(
    forecast: Arc<StubForecast>,
    repository: Arc<InMemoryRepository>,
    sender: Arc<RecordingSender>,
) -> NotificationService {
    NotificationService::new(forecast, repository, sender)
}

pub fn request(email: &str) -> NotificationRequest {
    NotificationRequest {
        email: email.to_string(),
        location: DeliveryLocation::new("4.6097", "-74.0817"),
    }
}

/// A stored notification created `minutes_ago` minutes in the past
pub fn stored(email: &str, forecast_code: f64, minutes_ago: i64) -> Notification {
    Notification {
        email: email.to_string(),
        location: DeliveryLocation::new("40.7128", "-74.0060"),
        forecast_code,
        buyer_notification: true,
        created_at: Utc::now() - Duration::minutes(minutes_ago),
    }
}
