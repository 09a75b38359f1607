//! Forecast models

use serde::{Deserialize, Serialize};

/// The forecast condition picked for a delivery day.
///
/// Condition codes are small integers on the provider side but travel as
/// JSON numbers, so they are kept and compared as `f64`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForecastResult {
    pub code: f64,
    pub description: String,
}

impl ForecastResult {
    pub fn new(code: f64, description: impl Into<String>) -> Self {
        Self {
            code,
            description: description.into(),
        }
    }
}
