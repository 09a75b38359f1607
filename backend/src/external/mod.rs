//! External service integrations

pub mod forecast;
pub mod forecast_mapper;
pub mod http;
pub mod mailer;

pub use forecast::{ForecastError, ForecastProvider, WeatherApiClient};
pub use mailer::{NotificationSender, SmtpMailer};
