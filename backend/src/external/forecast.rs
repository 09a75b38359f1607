//! Weather forecast client
//!
//! Integrates with WeatherAPI's `forecast.json` endpoint. Every call goes
//! through [`send_with_retry`] with a fixed retry policy owned by this module.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde_json::Value;
use shared::{DeliveryLocation, ForecastResult};
use thiserror::Error;

use crate::config::ForecastServiceConfig;
use crate::external::forecast_mapper::{map_to_forecast, ForecastMapError};
use crate::external::http::{
    send_with_retry, HttpTransport, RequestError, RequestOptions, ReqwestTransport,
};

/// Attempts per forecast request
pub const FORECAST_MAX_ATTEMPTS: u32 = 3;
/// Delay between attempts
pub const FORECAST_RETRY_DELAY: Duration = Duration::from_secs(2);
/// Timeout for a single attempt
pub const FORECAST_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
/// Language requested for condition descriptions
pub const FORECAST_LANGUAGE: &str = "es";

#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("invalid forecast service URL: {0}")]
    InvalidUrl(String),

    #[error(transparent)]
    Request(#[from] RequestError),

    #[error("failed to communicate with the third-party service")]
    UpstreamStatus(u16),

    #[error("invalid forecast response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Mapping(#[from] ForecastMapError),
}

/// Source of forecasts for a delivery location
#[async_trait]
pub trait ForecastProvider: Send + Sync {
    async fn fetch_forecast(
        &self,
        location: &DeliveryLocation,
        days_ahead: u32,
    ) -> Result<ForecastResult, ForecastError>;
}

/// WeatherAPI forecast client
#[derive(Clone)]
pub struct WeatherApiClient {
    transport: Arc<dyn HttpTransport>,
    base_url: String,
    api_key: String,
}

impl WeatherApiClient {
    /// Create a client that talks to the configured service over reqwest
    pub fn new(config: &ForecastServiceConfig) -> Self {
        Self::with_transport(config, Arc::new(ReqwestTransport::new()))
    }

    /// Create a client on top of a custom transport (for testing)
    pub fn with_transport(config: &ForecastServiceConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    /// Build the forecast URL. Query values are percent-encoded.
    pub fn forecast_url(
        &self,
        location: &DeliveryLocation,
        days_ahead: u32,
    ) -> Result<Url, ForecastError> {
        let mut url = Url::parse(&format!("{}/forecast.json", self.base_url))
            .map_err(|e| ForecastError::InvalidUrl(e.to_string()))?;

        url.query_pairs_mut()
            .append_pair("key", &self.api_key)
            .append_pair("q", &location.to_string())
            .append_pair("days", &days_ahead.to_string())
            .append_pair("aqi", "no")
            .append_pair("alerts", "no")
            .append_pair("lang", FORECAST_LANGUAGE);

        Ok(url)
    }
}

#[async_trait]
impl ForecastProvider for WeatherApiClient {
    async fn fetch_forecast(
        &self,
        location: &DeliveryLocation,
        days_ahead: u32,
    ) -> Result<ForecastResult, ForecastError> {
        let url = self.forecast_url(location, days_ahead)?;
        tracing::debug!(
            endpoint = %format!("{}/forecast.json", self.base_url),
            q = %location,
            days_ahead,
            "Fetching forecast"
        );

        let options = RequestOptions::get(url.as_str())
            .with_retry(FORECAST_MAX_ATTEMPTS, FORECAST_RETRY_DELAY)
            .with_timeout(FORECAST_REQUEST_TIMEOUT);

        let response = send_with_retry(self.transport.as_ref(), &options)
            .await
            .map_err(|e| {
                tracing::error!("Forecast request failed: {}", e);
                e
            })?;

        if !response.is_success() {
            tracing::warn!(status = response.status, "Forecast service returned non-success status");
            return Err(ForecastError::UpstreamStatus(response.status));
        }

        let document: Value = serde_json::from_str(&response.body).map_err(|e| {
            tracing::warn!("Failed to decode forecast response: {}", e);
            e
        })?;

        Ok(map_to_forecast(&document)?)
    }
}
