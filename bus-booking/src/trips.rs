//! Trip history ("my trips").
//!
//! Confirmed bookings of every kind land in a [`TripRepository`]. The
//! repository is owned by the booking session and emptied on sign-out.

use crate::error::BookingError;
use crate::metrics;
use crate::types::{NewTrip, Passenger, Pnr, SeatNumber, Stay, Trip, TripId, TripKind};
use seatmap_core::environment::{Clock, RandomSource};
use std::collections::HashSet;
use std::sync::Arc;

/// Name stored when the booking form was left blank
pub const GUEST_NAME: &str = "Guest";

/// PNR draws tried before a booking is refused
pub const MAX_PNR_ATTEMPTS: u32 = 32;

/// Storage for booked trips
pub trait TripRepository: Send {
    /// Validate and store a booking, assigning its id, PNR and timestamp
    ///
    /// # Errors
    ///
    /// Returns a [`BookingError`] when the request fails validation.
    fn create(&mut self, trip: NewTrip) -> Result<Trip, BookingError>;

    /// All trips in booking order
    fn list(&self) -> Vec<Trip>;

    /// Look up a trip by booking reference
    fn find_by_pnr(&self, pnr: &Pnr) -> Option<Trip>;

    /// Forget every trip
    fn clear(&mut self);
}

/// Check a booking request and fill in defaults
///
/// # Errors
///
/// - [`BookingError::InvalidGuestCount`] for zero guests
/// - [`BookingError::InvalidSeat`] for seat number zero
/// - [`BookingError::MissingStay`] for a hotel booking without dates
/// - [`BookingError::InvalidStay`] when check-out is not after check-in
pub fn validate(mut trip: NewTrip) -> Result<NewTrip, BookingError> {
    check_booking(trip.kind, trip.seat, trip.stay, trip.guest_count)?;

    if trip.passenger.name.trim().is_empty() {
        trip.passenger = Passenger::new(GUEST_NAME, trip.passenger.surname.trim());
    }
    Ok(trip)
}

fn check_booking(
    kind: TripKind,
    seat: Option<SeatNumber>,
    stay: Option<Stay>,
    guest_count: u32,
) -> Result<(), BookingError> {
    if guest_count == 0 {
        return Err(BookingError::InvalidGuestCount);
    }
    if let Some(seat) = seat.filter(|s| s.value() == 0) {
        return Err(BookingError::InvalidSeat(seat));
    }
    match (kind, stay) {
        (TripKind::Hotel, None) => Err(BookingError::MissingStay),
        (_, Some(stay)) if stay.nights() <= 0 => Err(BookingError::InvalidStay),
        _ => Ok(()),
    }
}

/// In-memory trip history
///
/// Ids and PNRs are drawn from the injected random source and timestamps come
/// from the injected clock, so a scripted source and a fixed clock give fully
/// reproducible trips.
pub struct InMemoryTripRepository {
    trips: Vec<Trip>,
    rng: Box<dyn RandomSource>,
    clock: Arc<dyn Clock>,
}

impl InMemoryTripRepository {
    /// Creates an empty repository
    #[must_use]
    pub fn new(rng: Box<dyn RandomSource>, clock: Arc<dyn Clock>) -> Self {
        Self {
            trips: Vec::new(),
            rng,
            clock,
        }
    }

    /// Number of stored trips
    #[must_use]
    pub fn len(&self) -> usize {
        self.trips.len()
    }

    /// Whether no trips are stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }

    /// Trips with the given seat, for bus and flight bookings
    #[must_use]
    pub fn with_seat(&self, seat: SeatNumber) -> Vec<&Trip> {
        self.trips.iter().filter(|t| t.seat == Some(seat)).collect()
    }

    /// Serialize the history to JSON
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Snapshot`] if serialization fails.
    pub fn export_json(&self) -> Result<String, BookingError> {
        Ok(serde_json::to_string_pretty(&self.trips)?)
    }

    /// Replace the history with trips read from JSON
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Snapshot`] for malformed input, any booking
    /// validation error for an invalid trip, and
    /// [`BookingError::DuplicatePnr`] when two trips share a reference. The
    /// current history is left untouched in every error case.
    pub fn import_json(&mut self, json: &str) -> Result<usize, BookingError> {
        let trips: Vec<Trip> = serde_json::from_str(json)?;

        let mut seen = HashSet::with_capacity(trips.len());
        for trip in &trips {
            check_booking(trip.kind, trip.seat, trip.stay, trip.guest_count)?;
            if !seen.insert(&trip.pnr) {
                return Err(BookingError::DuplicatePnr(trip.pnr.clone()));
            }
        }

        self.trips = trips;
        tracing::debug!(count = self.trips.len(), "Imported trip history");
        Ok(self.trips.len())
    }

    fn next_id(&mut self) -> TripId {
        let mut bytes = [0_u8; 16];
        self.rng.fill_bytes(&mut bytes);
        TripId::from_random_bytes(bytes)
    }

    fn next_pnr(&mut self) -> Result<Pnr, BookingError> {
        for _ in 0..MAX_PNR_ATTEMPTS {
            let pnr = Pnr::generate(self.rng.as_mut());
            if self.trips.iter().all(|t| t.pnr != pnr) {
                return Ok(pnr);
            }
        }
        tracing::warn!(attempts = MAX_PNR_ATTEMPTS, "No unused PNR drawn");
        Err(BookingError::PnrExhausted {
            attempts: MAX_PNR_ATTEMPTS,
        })
    }
}

impl TripRepository for InMemoryTripRepository {
    fn create(&mut self, trip: NewTrip) -> Result<Trip, BookingError> {
        let trip = validate(trip)?;

        let pnr = self.next_pnr()?;
        let stored = Trip {
            id: self.next_id(),
            pnr,
            booked_at: self.clock.now(),
            kind: trip.kind,
            itinerary: trip.itinerary,
            passenger: trip.passenger,
            seat: trip.seat,
            stay: trip.stay,
            guest_count: trip.guest_count,
        };

        tracing::info!(
            pnr = %stored.pnr,
            kind = %stored.kind,
            seat = ?stored.seat.map(|s| s.value()),
            "Trip booked"
        );
        metrics::record_trip_booked(stored.kind);

        self.trips.push(stored.clone());
        Ok(stored)
    }

    fn list(&self) -> Vec<Trip> {
        self.trips.clone()
    }

    fn find_by_pnr(&self, pnr: &Pnr) -> Option<Trip> {
        self.trips.iter().find(|t| &t.pnr == pnr).cloned()
    }

    fn clear(&mut self) {
        tracing::debug!(count = self.trips.len(), "Clearing trip history");
        self.trips.clear();
    }
}
