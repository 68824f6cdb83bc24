//! SQL implementation of the booking repository
//!
//! Booking instants are stored as fixed-width RFC 3339 UTC text so that
//! lexical range comparisons on the column match chronological order across
//! all supported backends.

use crate::error::DbError;
use crate::DbClient;
use bookline_common::services::{
    BookingRecord, BookingRepository, BoxFuture, BoxedError, NewBooking,
};
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::Row;
use tracing::{debug, error, info};
use uuid::Uuid;

/// SQL implementation of the booking repository
#[derive(Debug, Clone)]
pub struct SqlBookingRepository {
    /// The database client
    db_client: DbClient,
}

fn encode_instant(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn decode_instant(raw: &str) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DbError::DecodeError(format!("invalid start_time '{}': {}", raw, e)))
}

fn record_from_row(row: &sqlx::any::AnyRow) -> Result<BookingRecord, DbError> {
    let raw_start: String = row
        .try_get("start_time")
        .map_err(|e| DbError::DecodeError(e.to_string()))?;

    Ok(BookingRecord {
        id: row.try_get("id").ok(),
        name: row.try_get("name").unwrap_or_default(),
        email: row.try_get("email").unwrap_or_default(),
        number: row.try_get("number").unwrap_or_default(),
        address: row.try_get("address").unwrap_or_default(),
        message: row.try_get("message").ok().flatten(),
        service: row.try_get("service").unwrap_or_default(),
        addition_service: row.try_get("addition_service").ok().flatten(),
        start_time: decode_instant(&raw_start)?,
    })
}

impl SqlBookingRepository {
    /// Create a new SQL booking repository
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }

    /// Initialize the database schema
    ///
    /// This function creates the necessary tables for storing bookings
    /// if they don't already exist.
    pub async fn init_schema(&self) -> Result<(), DbError> {
        debug!("Initializing booking schema");

        let query = r#"
            CREATE TABLE IF NOT EXISTS bookings (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                number TEXT NOT NULL,
                address TEXT NOT NULL,
                message TEXT,
                service TEXT NOT NULL,
                addition_service TEXT,
                start_time TEXT NOT NULL,
                created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            )
        "#;

        self.db_client.execute(query).await?;

        self.db_client
            .execute("CREATE INDEX IF NOT EXISTS idx_bookings_start_time ON bookings (start_time)")
            .await?;

        info!("Booking schema initialized successfully");
        Ok(())
    }

    /// Persist a new booking
    ///
    /// # Returns
    ///
    /// The stored booking record with its ID set
    pub async fn insert_booking(&self, booking: NewBooking) -> Result<BookingRecord, DbError> {
        debug!(
            "Inserting booking for {} at {}",
            booking.name, booking.start_time
        );

        let id = Uuid::new_v4().to_string();

        let query = r#"
            INSERT INTO bookings (id, name, email, number, address, message, service, addition_service, start_time)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#;

        sqlx::query(query)
            .bind(&id)
            .bind(&booking.name)
            .bind(&booking.email)
            .bind(&booking.number)
            .bind(&booking.address)
            .bind(&booking.message)
            .bind(&booking.service)
            .bind(&booking.addition_service)
            .bind(encode_instant(&booking.start_time))
            .execute(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to insert booking: {}", e);
                DbError::QueryError(e.to_string())
            })?;

        info!("Booking stored successfully");
        Ok(BookingRecord {
            id: Some(id),
            name: booking.name,
            email: booking.email,
            number: booking.number,
            address: booking.address,
            message: booking.message,
            service: booking.service,
            addition_service: booking.addition_service,
            start_time: booking.start_time,
        })
    }

    /// Fetch all bookings whose instant falls in the half-open window `[start, end)`
    ///
    /// Results are ordered chronologically.
    pub async fn bookings_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<BookingRecord>, DbError> {
        debug!("Fetching bookings between {} and {}", start, end);

        let query = r#"
            SELECT id, name, email, number, address, message, service, addition_service, start_time
            FROM bookings
            WHERE start_time >= $1 AND start_time < $2
            ORDER BY start_time ASC
        "#;

        let rows = sqlx::query(query)
            .bind(encode_instant(&start))
            .bind(encode_instant(&end))
            .fetch_all(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to fetch bookings: {}", e);
                DbError::QueryError(e.to_string())
            })?;

        rows.iter().map(record_from_row).collect()
    }
}

impl BookingRepository for SqlBookingRepository {
    type Error = BoxedError;

    fn create_booking(&self, booking: NewBooking) -> BoxFuture<'_, BookingRecord, Self::Error> {
        Box::pin(async move {
            self.insert_booking(booking)
                .await
                .map_err(|e| BoxedError(Box::new(e)))
        })
    }

    fn find_by_time_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<BookingRecord>, Self::Error> {
        Box::pin(async move {
            self.bookings_in_range(start, end)
                .await
                .map_err(|e| BoxedError(Box::new(e)))
        })
    }
}
