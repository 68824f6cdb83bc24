//! Database integration for Bookline
//!
//! This crate provides the persistence collaborator of the booking service:
//! a database-agnostic client built on SQLx and a SQL implementation of the
//! booking repository seam from `bookline_common`.

pub mod client;
pub mod error;
pub mod repositories;

pub use client::DbClient;
pub use error::DbError;
pub use repositories::SqlBookingRepository;
