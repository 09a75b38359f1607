//! Shared types and models for the Delivery Notifier service
//!
//! This crate contains the domain values and wire DTOs shared between the
//! backend server and any client tooling.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
