//! Business metrics for seat selection and booking.
//!
//! Recorded through the `metrics` facade; nothing is exported unless the
//! host application installs a recorder.
//!
//! # Exported Metrics
//!
//! ## Counters
//! - `seatmap_selection_attempts_total{outcome}` - Selection requests by outcome
//!   (`accepted`, `OCCUPIED`, `GENDER_CONFLICT`, `INVALID_SEAT`, `NO_SEAT_SELECTED`)
//! - `seatmap_selections_invalidated_total` - Selections dropped after a gender change
//! - `seatmap_trips_booked_total{kind}` - Trips stored by kind
//!
//! ## Gauges
//! - `seatmap_seats_available` - Free seats on the most recently generated chart

use crate::error::SeatError;
use crate::types::{SeatNumber, TripKind};
use metrics::{describe_counter, describe_gauge};

/// Selection requests by outcome
pub const SELECTION_ATTEMPTS: &str = "seatmap_selection_attempts_total";
/// Selections dropped by revalidation
pub const SELECTIONS_INVALIDATED: &str = "seatmap_selections_invalidated_total";
/// Trips stored by kind
pub const TRIPS_BOOKED: &str = "seatmap_trips_booked_total";
/// Free seats on the latest chart
pub const SEATS_AVAILABLE: &str = "seatmap_seats_available";

/// Register all metric descriptions.
///
/// Call once at startup, before any metrics are recorded.
pub fn register_booking_metrics() {
    describe_counter!(
        SELECTION_ATTEMPTS,
        "Seat selection requests by outcome (accepted or error code)"
    );
    describe_counter!(
        SELECTIONS_INVALIDATED,
        "Selections dropped because a gender change made them conflict"
    );
    describe_counter!(TRIPS_BOOKED, "Trips stored in the session history by kind");
    describe_gauge!(
        SEATS_AVAILABLE,
        "Free seats on the most recently generated chart"
    );

    tracing::info!("Booking metrics registered");
}

/// Count one selection request
pub fn record_selection_attempt(result: &Result<SeatNumber, SeatError>) {
    let outcome = match result {
        Ok(_) => "accepted",
        Err(error) => error.code(),
    };
    metrics::counter!(SELECTION_ATTEMPTS, "outcome" => outcome).increment(1);
}

/// Count one selection dropped by revalidation
pub fn record_selection_invalidated() {
    metrics::counter!(SELECTIONS_INVALIDATED).increment(1);
}

/// Count one stored trip
pub fn record_trip_booked(kind: TripKind) {
    metrics::counter!(TRIPS_BOOKED, "kind" => kind.as_str()).increment(1);
}

/// Publish the free-seat count of a freshly generated chart
pub fn record_seats_available(count: usize) {
    // Note: Precision loss acceptable for metrics (seat counts < 2^52)
    #[allow(clippy::cast_precision_loss)]
    metrics::gauge!(SEATS_AVAILABLE).set(count as f64);
}
