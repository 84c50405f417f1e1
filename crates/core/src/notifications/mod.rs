//! Notifications module - best-effort, append-only user notifications.
//!
//! Dispatch always happens after the owning transaction has committed, and
//! every error is caught and logged at the call site: a notification problem
//! must never retroactively fail an RSVP or conversion that already
//! succeeded.

mod notifications_model;
mod notifications_service;
mod notifications_traits;

pub use notifications_model::{NewNotification, Notification, NotificationKind};
pub use notifications_service::NotificationService;
pub use notifications_traits::{NotificationRepositoryTrait, NotificationServiceTrait};
