// --- File: crates/bookline_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// The base error type for all Bookline errors.
///
/// This enum provides the error variants shared across crates. Each crate
/// keeps its own specific error type and maps into this one at the HTTP
/// boundary.
#[derive(Error, Debug)]
pub enum BooklineError {
    /// Error occurred due to missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error occurred during validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error occurred during database operation
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Error occurred due to an internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// A trait for converting errors to HTTP status codes.
///
/// This trait can be implemented by error types to provide a consistent way
/// to convert errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for BooklineError {
    fn status_code(&self) -> u16 {
        match self {
            BooklineError::ConfigError(_) => 500,
            BooklineError::ValidationError(_) => 400,
            BooklineError::DatabaseError(_) => 500,
            BooklineError::InternalError(_) => 500,
        }
    }
}

/// A trait for adding context to errors.
///
/// This trait can be implemented by error types to provide a consistent way
/// to add context to errors.
pub trait Context<T, E> {
    /// Adds context to an error.
    fn context<C>(self, context: C) -> Result<T, BooklineError>
    where
        C: fmt::Display + Send + Sync + 'static;

    /// Adds context to an error with a lazy context provider.
    fn with_context<C, F>(self, f: F) -> Result<T, BooklineError>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E: std::error::Error + Send + Sync + 'static> Context<T, E> for Result<T, E> {
    fn context<C>(self, context: C) -> Result<T, BooklineError>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|error| BooklineError::InternalError(format!("{}: {}", context, error)))
    }

    fn with_context<C, F>(self, f: F) -> Result<T, BooklineError>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|error| BooklineError::InternalError(format!("{}: {}", f(), error)))
    }
}

// Utility functions for error handling
pub fn config_error<T: fmt::Display>(message: T) -> BooklineError {
    BooklineError::ConfigError(message.to_string())
}

pub fn validation_error<T: fmt::Display>(message: T) -> BooklineError {
    BooklineError::ValidationError(message.to_string())
}
