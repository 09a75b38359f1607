//! Business logic services for the Delivery Notifier service

pub mod notification;

pub use notification::NotificationService;
