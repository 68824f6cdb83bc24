// --- File: crates/bookline_common/src/lib.rs ---

// Declare modules within this crate
pub mod error; // Error handling
pub mod features; // Feature flag handling
pub mod http; // HTTP utilities
pub mod logging; // Logging utilities
pub mod services; // Service abstractions

// Re-export error types and utilities for easier access
pub use error::{config_error, validation_error, BooklineError, Context, HttpStatusCode};

// Re-export HTTP utilities for easier access
pub use http::{client::HTTP_CLIENT, map_json_error, IntoHttpResponse};

// Re-export logging utilities for easier access
pub use logging::{init, init_with_level, log_result};

// Re-export feature flag handling utilities for easier access
pub use features::is_feature_enabled;
