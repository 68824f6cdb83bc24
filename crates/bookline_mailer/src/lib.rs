//! Email notification collaborator for Bookline
//!
//! Sends the operator a plain-text email for every accepted booking through
//! a transactional mail HTTP API. Implements the `NotificationService` seam
//! from `bookline_common`.

pub mod service;

pub use service::{MailerError, MailerNotificationService};
