//! Validation utilities for the Delivery Notifier service

use std::borrow::Cow;

use validator::ValidationError;

use crate::types::DeliveryLocation;

// ============================================================================
// Plain Validations
// ============================================================================

/// Validate email shape: `local@domain.tld`, lower case, 2-4 letter TLD
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    let (local, domain) = email.split_once('@').ok_or("Invalid email")?;

    let local_ok = !local.is_empty()
        && local
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || "._%+-".contains(c));
    if !local_ok {
        return Err("Invalid email");
    }

    let (host, tld) = domain.rsplit_once('.').ok_or("Invalid email")?;
    let host_ok = !host.is_empty()
        && host
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '.' || c == '-');
    let tld_ok = (2..=4).contains(&tld.len()) && tld.chars().all(|c| c.is_ascii_lowercase());

    if host_ok && tld_ok {
        Ok(())
    } else {
        Err("Invalid email")
    }
}

/// Validate a latitude string (decimal degrees, -90 to 90)
pub fn validate_latitude(latitude: &str) -> Result<(), &'static str> {
    validate_degrees(latitude, 90.0).map_err(|_| "Invalid latitude")
}

/// Validate a longitude string (decimal degrees, -180 to 180)
pub fn validate_longitude(longitude: &str) -> Result<(), &'static str> {
    validate_degrees(longitude, 180.0).map_err(|_| "Invalid longitude")
}

fn validate_degrees(value: &str, bound: f64) -> Result<(), ()> {
    let degrees: f64 = value.trim().parse().map_err(|_| ())?;
    if degrees.is_finite() && (-bound..=bound).contains(&degrees) {
        Ok(())
    } else {
        Err(())
    }
}

// ============================================================================
// Validator Hooks
// ============================================================================

/// `validator` hook for the buyer email field
pub fn validate_buyer_email(email: &str) -> Result<(), ValidationError> {
    validate_email(email).map_err(|msg| validation_error("email", msg))
}

/// `validator` hook for the delivery location field
pub fn validate_delivery_location(location: &DeliveryLocation) -> Result<(), ValidationError> {
    validate_latitude(&location.latitude)
        .and_then(|_| validate_longitude(&location.longitude))
        .map_err(|msg| validation_error("location", msg))
}

fn validation_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}
