// --- File: crates/bookline_booking/src/routes.rs ---

use crate::handlers::{book_handler, unavailable_times_handler, BookingState};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Creates a router containing all routes for the booking feature.
///
/// The state carries the configuration plus the injected persistence and
/// notification collaborators, so callers decide which concrete services
/// back the routes.
pub fn routes(state: Arc<BookingState>) -> Router {
    Router::new()
        .route("/book", post(book_handler))
        .route("/bookings/unavailable-times", get(unavailable_times_handler))
        .with_state(state)
}
