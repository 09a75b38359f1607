//! Common types used across the service

use serde::{Deserialize, Serialize};

/// Delivery coordinates as supplied by the caller.
///
/// Both values are kept as the caller's original strings and forwarded to the
/// weather provider as-is; range checks live in [`crate::validation`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DeliveryLocation {
    pub latitude: String,
    pub longitude: String,
}

impl DeliveryLocation {
    pub fn new(latitude: impl Into<String>, longitude: impl Into<String>) -> Self {
        Self {
            latitude: latitude.into(),
            longitude: longitude.into(),
        }
    }
}

impl std::fmt::Display for DeliveryLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}
