// --- File: crates/bookline_booking/src/logic.rs ---
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;

// --- Error Handling ---
use thiserror::Error;
#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Invalid date or time format: {0}")]
    InvalidTimeFormat(String),
    #[error("Invalid block policy: {0}")]
    InvalidPolicy(String),
}

// --- Data Structures ---

/// A booking submission as the frontend sends it.
#[derive(Deserialize, Debug)]
pub struct BookingRequest {
    pub name: String,
    pub email: String,
    pub number: String,
    pub address: String,
    #[serde(default)]
    pub message: Option<String>,
    pub service: String,
    #[serde(default, rename = "additionService")]
    pub addition_service: Option<String>,
    /// Booking date in YYYY-MM-DD format
    pub date: String,
    /// Booking time in HH:mm format (24-hour)
    pub time: String,
}

#[derive(Serialize, Debug)]
pub struct BookingResponse {
    pub success: bool,
    pub booking_id: Option<String>,
    pub message: String,
}

#[derive(Deserialize, Debug)]
pub struct UnavailableTimesQuery {
    /// Query date in YYYY-MM-DD format
    pub date: String,
}

// --- Timezone Policy ---

/// How submitted wall-clock times relate to absolute instants.
///
/// The policy is explicit configuration, passed into every conversion; none
/// of the functions below read ambient timezone state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimezonePolicy {
    /// Interpret wall-clock input in this IANA timezone.
    Tz(Tz),
    /// Treat input as already absolute: no timezone math is applied on the
    /// way in or out.
    NaiveUtc,
}

impl TimezonePolicy {
    /// Config sentinel selecting [`TimezonePolicy::NaiveUtc`].
    pub const NAIVE_SENTINEL: &'static str = "naive";

    /// The zone the service is operated in when none is configured.
    pub fn default_zone() -> Self {
        TimezonePolicy::Tz(Tz::America__Edmonton)
    }

    /// Resolve the configured timezone string into a policy.
    ///
    /// Unparseable zone names fall back to the default zone.
    pub fn from_config(value: Option<&str>) -> Self {
        match value {
            None => Self::default_zone(),
            Some(s) if s.eq_ignore_ascii_case(Self::NAIVE_SENTINEL) => TimezonePolicy::NaiveUtc,
            Some(s) => Tz::from_str(s)
                .map(TimezonePolicy::Tz)
                .unwrap_or_else(|_| Self::default_zone()),
        }
    }
}

// --- Block Policy ---

/// How many consecutive slots a single booking occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockPolicy {
    slot_width_minutes: i64,
    slots_per_booking: u32,
}

impl BlockPolicy {
    pub fn new(slot_width_minutes: i64, slots_per_booking: u32) -> Result<Self, BookingError> {
        if slot_width_minutes <= 0 {
            return Err(BookingError::InvalidPolicy(format!(
                "slot width must be positive, got {} minutes",
                slot_width_minutes
            )));
        }
        if slots_per_booking == 0 {
            return Err(BookingError::InvalidPolicy(
                "a booking must block at least one slot".to_string(),
            ));
        }
        Ok(Self {
            slot_width_minutes,
            slots_per_booking,
        })
    }

    pub fn slot_width_minutes(&self) -> i64 {
        self.slot_width_minutes
    }

    pub fn slots_per_booking(&self) -> u32 {
        self.slots_per_booking
    }
}

impl Default for BlockPolicy {
    /// 30-minute slots; a booking blocks its own slot plus the next four,
    /// covering two hours.
    fn default() -> Self {
        Self {
            slot_width_minutes: 30,
            slots_per_booking: 5,
        }
    }
}

// --- Time Normalization ---

/// Parses a `(date, time)` string pair into the absolute instant it denotes
/// under the given timezone policy.
///
/// `date` must be `YYYY-MM-DD` and `time` 24-hour `HH:mm`; the pair is
/// interpreted as one wall-clock timestamp. The result is truncated to the
/// start of the minute. Anything that does not name a valid calendar date
/// and time is rejected here, so no invalid value ever reaches persistence.
pub fn normalize_booking_time(
    date: &str,
    time: &str,
    tz: &TimezonePolicy,
) -> Result<DateTime<Utc>, BookingError> {
    let combined = format!("{} {}", date, time);
    let naive = NaiveDateTime::parse_from_str(&combined, "%Y-%m-%d %H:%M")
        .map_err(|e| BookingError::InvalidTimeFormat(format!("'{}': {}", combined, e)))?;

    let instant = match tz {
        TimezonePolicy::Tz(zone) => zone
            .from_local_datetime(&naive)
            // Ambiguous wall clocks (DST fold) resolve to the earlier
            // instant; wall clocks inside a DST gap have no instant at all.
            .earliest()
            .ok_or_else(|| {
                BookingError::InvalidTimeFormat(format!(
                    "'{}' does not exist in {}",
                    combined, zone
                ))
            })?
            .with_timezone(&Utc),
        TimezonePolicy::NaiveUtc => Utc.from_utc_datetime(&naive),
    };

    // Truncate to the start of the minute
    let instant = instant
        .with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(instant);
    Ok(instant)
}

/// Formats an instant back into the wall clock of the given timezone policy.
///
/// Using the same policy as [`normalize_booking_time`] makes the two
/// functions round-trip: a normalized `(date, time)` pair formats back to
/// the original strings.
pub fn format_in_policy(instant: &DateTime<Utc>, tz: &TimezonePolicy, fmt: &str) -> String {
    match tz {
        TimezonePolicy::Tz(zone) => instant.with_timezone(zone).format(fmt).to_string(),
        TimezonePolicy::NaiveUtc => instant.format(fmt).to_string(),
    }
}

/// UTC window `[00:00 local, next 00:00 local)` covering one calendar day
/// of the query date under the given timezone policy.
///
/// The bounds are computed from the local midnights on either side of the
/// day, so the window is 23 or 25 hours wide on DST transition days.
pub fn day_bounds(
    date: &str,
    tz: &TimezonePolicy,
) -> Result<(DateTime<Utc>, DateTime<Utc>), BookingError> {
    let day = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|e| BookingError::InvalidTimeFormat(format!("'{}': {}", date, e)))?;
    let next_day = day
        .succ_opt()
        .ok_or_else(|| BookingError::InvalidTimeFormat(format!("'{}': out of range", date)))?;

    let start = normalize_booking_time(&day.format("%Y-%m-%d").to_string(), "00:00", tz)?;
    let end = normalize_booking_time(&next_day.format("%Y-%m-%d").to_string(), "00:00", tz)?;
    Ok((start, end))
}

// --- Availability Logic ---

/// Computes the deduplicated list of blocked `HH:mm` labels for a day's
/// bookings.
///
/// Every booking blocks `slots_per_booking` consecutive labels starting at
/// its own wall-clock slot, each `slot_width_minutes` apart. Duplicates are
/// dropped; emission order is the order in which labels are first generated.
/// Labels generated past local midnight stay bare `HH:mm` labels with no
/// date attached, which is what the single-day booking view expects.
///
/// Callers are responsible for only passing bookings that belong to the
/// queried calendar day.
pub fn blocked_time_labels(
    bookings: &[DateTime<Utc>],
    policy: &BlockPolicy,
    tz: &TimezonePolicy,
) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut labels = Vec::new();

    for booking in bookings {
        for slot in 0..policy.slots_per_booking() {
            let offset = Duration::minutes(policy.slot_width_minutes() * i64::from(slot));
            let label = match tz {
                TimezonePolicy::Tz(zone) => {
                    (booking.with_timezone(zone) + offset).format("%H:%M").to_string()
                }
                TimezonePolicy::NaiveUtc => (*booking + offset).format("%H:%M").to_string(),
            };
            if seen.insert(label.clone()) {
                labels.push(label);
            }
        }
    }

    labels
}
