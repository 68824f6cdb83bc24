// --- File: crates/bookline_common/src/services.rs ---
//! Service abstractions for external collaborators.
//!
//! This module provides trait definitions for the collaborators the booking
//! handlers depend on. These traits allow for dependency injection and easier
//! testing by decoupling the application logic from specific implementations
//! of persistence and notification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// A wrapper error type that implements std::error::Error for Box<dyn std::error::Error + Send + Sync>
#[derive(Debug)]
pub struct BoxedError(pub Box<dyn StdError + Send + Sync>);

impl fmt::Display for BoxedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StdError for BoxedError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

impl From<Box<dyn StdError + Send + Sync>> for BoxedError {
    fn from(err: Box<dyn StdError + Send + Sync>) -> Self {
        BoxedError(err)
    }
}

/// A trait for booking persistence operations.
///
/// The handlers only ever produce and consume booking values; ownership of
/// the stored data lies with the implementation behind this trait.
pub trait BookingRepository: Send + Sync {
    /// Error type returned by repository operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Persist a new booking and return the stored record.
    fn create_booking(&self, booking: NewBooking) -> BoxFuture<'_, BookingRecord, Self::Error>;

    /// Fetch all bookings whose instant falls in the half-open window
    /// `[start, end)`.
    fn find_by_time_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<BookingRecord>, Self::Error>;
}

/// A trait for notification service operations.
///
/// This trait defines the operations that can be performed on a notification
/// service, such as sending emails.
pub trait NotificationService: Send + Sync {
    /// Error type returned by notification service operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Send an email notification.
    fn send_email(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> BoxFuture<'_, NotificationResult, Self::Error>;
}

/// A booking as submitted by a client, with the date/time pair already
/// normalized to a single instant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBooking {
    pub name: String,
    pub email: String,
    pub number: String,
    pub address: String,
    pub message: Option<String>,
    pub service: String,
    pub addition_service: Option<String>,
    /// The absolute instant the booking starts at.
    pub start_time: DateTime<Utc>,
}

/// A booking as stored by the persistence collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRecord {
    /// Storage-assigned identifier.
    pub id: Option<String>,
    pub name: String,
    pub email: String,
    pub number: String,
    pub address: String,
    pub message: Option<String>,
    pub service: String,
    pub addition_service: Option<String>,
    /// The absolute instant the booking starts at.
    pub start_time: DateTime<Utc>,
}

/// Represents the result of a notification operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationResult {
    /// The ID of the notification.
    pub id: String,
    /// The status of the notification.
    pub status: String,
}

/// A factory for creating service instances.
///
/// This trait provides access to the collaborators the booking routes need.
pub trait ServiceFactory: Send + Sync {
    /// Get a booking repository instance.
    fn booking_repository(&self) -> Option<Arc<dyn BookingRepository<Error = BoxedError>>>;

    /// Get a notification service instance.
    fn notification_service(&self) -> Option<Arc<dyn NotificationService<Error = BoxedError>>>;
}
