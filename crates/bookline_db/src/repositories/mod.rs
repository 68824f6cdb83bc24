//! Repository implementations for specific entity types

pub mod booking_sql;

pub use booking_sql::SqlBookingRepository;
