// File: crates/bookline_booking/src/handlers.rs
use crate::logic::{
    blocked_time_labels, day_bounds, format_in_policy, normalize_booking_time, BlockPolicy,
    BookingError, BookingRequest, BookingResponse, TimezonePolicy, UnavailableTimesQuery,
};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use bookline_common::error::{config_error, validation_error, BooklineError};
use bookline_common::http::map_json_error;
use bookline_common::services::{
    BookingRecord, BookingRepository, BoxedError, NewBooking, NotificationService,
};
use bookline_config::AppConfig;
use std::sync::Arc;
use tracing::{error, info};

// Define shared state needed by booking handlers
#[derive(Clone)]
pub struct BookingState {
    pub config: Arc<AppConfig>,
    pub repository: Arc<dyn BookingRepository<Error = BoxedError>>,
    /// Absent when the mailer feature is disabled; bookings then succeed
    /// without a notification.
    pub notifier: Option<Arc<dyn NotificationService<Error = BoxedError>>>,
}

/// Resolve the configured timezone and block policies.
fn booking_policies(config: &AppConfig) -> Result<(BlockPolicy, TimezonePolicy), BookingError> {
    let booking_config = config.booking.clone().unwrap_or_default();
    let tz = TimezonePolicy::from_config(booking_config.time_zone.as_deref());
    let defaults = BlockPolicy::default();
    let policy = BlockPolicy::new(
        booking_config
            .slot_width_minutes
            .unwrap_or(defaults.slot_width_minutes()),
        booking_config
            .slots_per_booking
            .unwrap_or(defaults.slots_per_booking()),
    )?;
    Ok((policy, tz))
}

/// The plain-text notification the operator receives for a new booking.
/// Date and time are reformatted through the same timezone policy the
/// submission was normalized with.
fn booking_notification_body(record: &BookingRecord, tz: &TimezonePolicy) -> String {
    format!(
        "You have received a new booking.\n\
         Service: {}\n\
         Additional Service: {}\n\
         Name: {}\n\
         Email: {}\n\
         Number: {}\n\
         Address: {}\n\
         Date: {}\n\
         Time: {}\n\
         Message: {}\n",
        record.service,
        record.addition_service.as_deref().unwrap_or("None"),
        record.name,
        record.email,
        record.number,
        record.address,
        format_in_policy(&record.start_time, tz, "%Y-%m-%d"),
        format_in_policy(&record.start_time, tz, "%H:%M"),
        record
            .message
            .as_deref()
            .unwrap_or("No additional message."),
    )
}

/// Handler to accept a booking submission.
#[axum::debug_handler]
pub async fn book_handler(
    State(state): State<Arc<BookingState>>,
    Json(payload): Json<BookingRequest>, // Extract JSON body
) -> Result<Json<BookingResponse>, (StatusCode, String)> {
    let (_, tz) = booking_policies(&state.config).map_err(|e| {
        error!("Invalid booking configuration: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Server configuration error: booking config invalid.".to_string(),
        )
    })?;

    // Combine date and time into a single instant; reject before anything
    // is persisted.
    let start_time = normalize_booking_time(&payload.date, &payload.time, &tz).map_err(|e| {
        info!("Rejected booking submission: {}", e);
        (
            StatusCode::BAD_REQUEST,
            "Invalid date or time format".to_string(),
        )
    })?;

    let new_booking = NewBooking {
        name: payload.name,
        email: payload.email,
        number: payload.number,
        address: payload.address,
        message: payload.message,
        service: payload.service,
        addition_service: payload.addition_service,
        start_time,
    };

    let stored = state
        .repository
        .create_booking(new_booking)
        .await
        .map_err(|e| {
            error!("Error saving booking: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to save booking data.".to_string(),
            )
        })?;
    info!("Booking saved successfully: {:?}", stored.id);

    if let Some(notifier) = &state.notifier {
        let mailer_config = state.config.mailer.as_ref().ok_or_else(|| {
            error!("Mailer configured as notifier but mailer config missing.");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Server configuration error: mailer config missing.".to_string(),
            )
        })?;

        let subject = format!("New Booking: {}", stored.service);
        let body = booking_notification_body(&stored, &tz);
        match notifier
            .send_email(&mailer_config.notify_address, &subject, &body)
            .await
        {
            Ok(_) => info!("Email sent successfully"),
            Err(e) => {
                // The booking is already saved at this point; the caller
                // still has to learn the notification failed.
                error!("Error sending email: {}", e);
                return Err((
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to send booking confirmation email.".to_string(),
                ));
            }
        }
    }

    Ok(Json(BookingResponse {
        success: true,
        booking_id: stored.id,
        message: "Booking data received and email sent successfully".to_string(),
    }))
}

/// Handler to fetch the blocked time labels for a specific date.
#[axum::debug_handler]
pub async fn unavailable_times_handler(
    State(state): State<Arc<BookingState>>,
    Query(query): Query<UnavailableTimesQuery>,
) -> Result<Json<Vec<String>>, Response> {
    let (policy, tz) = booking_policies(&state.config).map_err(|e| {
        error!("Invalid booking configuration: {}", e);
        config_error(e).into_response()
    })?;

    let (day_start, day_end) =
        day_bounds(&query.date, &tz).map_err(|e| validation_error(e).into_response())?;

    let result = state
        .repository
        .find_by_time_range(day_start, day_end)
        .await
        .map(|bookings| {
            info!(
                "Bookings found for {}: {}",
                query.date,
                bookings.len()
            );
            let instants: Vec<_> = bookings.iter().map(|b| b.start_time).collect();
            blocked_time_labels(&instants, &policy, &tz)
        })
        .map_err(|e| {
            error!("Error fetching bookings: {}", e);
            BooklineError::DatabaseError("Failed to fetch unavailable times".to_string())
        });

    map_json_error(result, |e| e)
}
