//! Domain models for the Delivery Notifier service

mod forecast;
mod notification;

pub use forecast::*;
pub use notification::*;
