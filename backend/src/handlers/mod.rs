//! HTTP request handlers

pub mod health;
pub mod notification;

pub use health::*;
pub use notification::*;
