//! PostgreSQL notification store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::{DeliveryLocation, Notification};
use sqlx::{FromRow, PgPool};

use super::NotificationRepository;
use crate::error::{AppError, AppResult};

/// Notification repository backed by PostgreSQL
#[derive(Clone)]
pub struct PgNotificationRepository {
    db: PgPool,
}

/// Stored notification row
#[derive(Debug, FromRow)]
struct NotificationRow {
    email: String,
    latitude: String,
    longitude: String,
    forecast_code: f64,
    buyer_notification: bool,
    created_at: DateTime<Utc>,
}

impl From<NotificationRow> for Notification {
    fn from(row: NotificationRow) -> Self {
        Notification {
            email: row.email,
            location: DeliveryLocation {
                latitude: row.latitude,
                longitude: row.longitude,
            },
            forecast_code: row.forecast_code,
            buyer_notification: row.buyer_notification,
            created_at: row.created_at,
        }
    }
}

impl PgNotificationRepository {
    /// Create a new PgNotificationRepository instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl NotificationRepository for PgNotificationRepository {
    async fn save_notification(&self, notification: &Notification) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO notifications (
                email, latitude, longitude,
                forecast_code, buyer_notification, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&notification.email)
        .bind(&notification.location.latitude)
        .bind(&notification.location.longitude)
        .bind(notification.forecast_code)
        .bind(notification.buyer_notification)
        .bind(notification.created_at)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    async fn get_notifications(&self, email: &str) -> AppResult<Vec<Notification>> {
        let rows = sqlx::query_as::<_, NotificationRow>(
            r#"
            SELECT email, latitude, longitude,
                   forecast_code, buyer_notification, created_at
            FROM notifications
            WHERE email = $1
            ORDER BY id ASC
            "#,
        )
        .bind(email)
        .fetch_all(&self.db)
        .await?;

        if rows.is_empty() {
            return Err(AppError::NotFound(format!(
                "Notifications with email {} not found",
                email
            )));
        }

        Ok(rows.into_iter().map(Notification::from).collect())
    }

    async fn get_notification_codes(&self) -> AppResult<Vec<String>> {
        let codes = sqlx::query_scalar::<_, String>(
            r#"
            SELECT code
            FROM notification_codes
            ORDER BY position ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        if codes.is_empty() {
            return Err(AppError::NotFound("Notification codes not found".to_string()));
        }

        Ok(codes)
    }
}
