//! Error types for seat selection, chart generation and booking.

use crate::types::{Gender, Pnr, SeatNumber};
use thiserror::Error;

/// Why a seat cannot be selected.
///
/// Every variant is an expected, user-correctable condition: the screen shows
/// the message and the passenger picks another seat or gender.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SeatError {
    /// Another passenger already holds the seat.
    #[error("Seat {seat} is already taken")]
    Occupied {
        /// Requested seat
        seat: SeatNumber,
    },

    /// The paired seat is held by a passenger of the other gender.
    #[error(
        "Seat {seat} is next to a {neighbor_gender} passenger in seat {neighbor}; \
         a {requested} passenger cannot sit there"
    )]
    GenderConflict {
        /// Requested seat
        seat: SeatNumber,
        /// Occupied neighbor
        neighbor: SeatNumber,
        /// Gender of the neighbor's occupant
        neighbor_gender: Gender,
        /// Gender the passenger chose
        requested: Gender,
    },

    /// The seat number does not exist on this bus.
    #[error("Seat {seat} does not exist on a {size}-seat bus")]
    InvalidSeat {
        /// Requested seat
        seat: SeatNumber,
        /// Seats on the bus
        size: u32,
    },

    /// Continue was pressed before any seat was chosen.
    #[error("No seat selected")]
    NoSeatSelected,
}

impl SeatError {
    /// Stable machine-readable code
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Occupied { .. } => "OCCUPIED",
            Self::GenderConflict { .. } => "GENDER_CONFLICT",
            Self::InvalidSeat { .. } => "INVALID_SEAT",
            Self::NoSeatSelected => "NO_SEAT_SELECTED",
        }
    }
}

/// Errors raised while generating a seating chart.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ChartError {
    /// A bus needs at least one seat.
    #[error("A seating chart needs at least one seat")]
    EmptyLayout,

    /// Occupancy probability outside `[0, 1]`.
    #[error("Occupancy probability must be within [0, 1], got {0}")]
    InvalidProbability(f64),

    /// Explicit seat list does not match the layout.
    #[error("Seat {found} found where seat {expected} was expected")]
    SeatOutOfOrder {
        /// Seat number expected at this position
        expected: SeatNumber,
        /// Seat number found
        found: SeatNumber,
    },

    /// Stored layout size disagrees with the seat list.
    #[error("Layout has {size} seats but {seats} were listed")]
    SizeMismatch {
        /// Size recorded for the layout
        size: u32,
        /// Number of seats listed
        seats: usize,
    },
}

/// Errors raised by the trip repository and booking session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BookingError {
    /// Nobody is signed in to the session.
    #[error("Sign in before booking")]
    NotSignedIn,

    /// Seat selection has not been confirmed yet.
    #[error("Confirm a seat before booking")]
    SelectionNotConfirmed,

    /// Guest count must be at least one.
    #[error("Guest count must be at least 1")]
    InvalidGuestCount,

    /// Hotel stays need check-out after check-in.
    #[error("Check-out must be after check-in")]
    InvalidStay,

    /// Hotel booking without stay dates.
    #[error("Hotel bookings need check-in and check-out dates")]
    MissingStay,

    /// Seat number zero is never valid.
    #[error("Seat {0} is not a valid seat number")]
    InvalidSeat(SeatNumber),

    /// Every drawn booking reference was already taken.
    #[error("No unused PNR found after {attempts} attempts")]
    PnrExhausted {
        /// Draws tried
        attempts: u32,
    },

    /// Two stored trips share a booking reference.
    #[error("PNR {0} appears more than once")]
    DuplicatePnr(Pnr),

    /// Stored trip history could not be read or written.
    #[error("Trip history is unreadable: {0}")]
    Snapshot(String),
}

impl From<serde_json::Error> for BookingError {
    fn from(error: serde_json::Error) -> Self {
        Self::Snapshot(error.to_string())
    }
}

/// Malformed configuration value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Invalid value '{value}' for {key}: {reason}")]
pub struct ConfigError {
    /// Environment variable name
    pub key: &'static str,
    /// Offending value
    pub value: String,
    /// What was expected
    pub reason: &'static str,
}
