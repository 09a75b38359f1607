//! Persistence for buyer notifications and notify-worthy forecast codes

mod postgres;

use async_trait::async_trait;
use shared::Notification;

use crate::error::AppResult;

pub use postgres::PgNotificationRepository;

/// Store of sent notifications and the codes that trigger them
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Append a notification to the buyer's history
    async fn save_notification(&self, notification: &Notification) -> AppResult<()>;

    /// All notifications for `email` in insertion order.
    ///
    /// Returns `AppError::NotFound` when the buyer has none.
    async fn get_notifications(&self, email: &str) -> AppResult<Vec<Notification>>;

    /// The notify-worthy forecast codes, as stored.
    ///
    /// Returns `AppError::NotFound` when no codes are configured.
    async fn get_notification_codes(&self) -> AppResult<Vec<String>>;
}
