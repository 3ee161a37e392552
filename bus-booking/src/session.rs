//! Booking session.
//!
//! Owns everything that outlives a single screen: the signed-in passenger,
//! the trip history and the random source charts are drawn from. Each visit to
//! the seat map gets a fresh [`SeatSelectionStore`].

use crate::chart::SeatChart;
use crate::config::Config;
use crate::error::{BookingError, ChartError};
use crate::metrics;
use crate::selection::{
    SeatSelectionAction, SeatSelectionEnvironment, SeatSelectionReducer, SeatSelectionState,
};
use crate::trips::{InMemoryTripRepository, TripRepository};
use crate::types::{Itinerary, NewTrip, Passenger, Pnr, SeatHandoff, Trip, TripKind};
use seatmap_core::environment::{Clock, RandomSource, SystemClock};
use seatmap_core::store::Store;
use std::sync::Arc;

/// Store driving one seat-selection screen
pub type SeatSelectionStore =
    Store<SeatSelectionState, SeatSelectionAction, SeatSelectionEnvironment, SeatSelectionReducer>;

/// Application-level booking session
pub struct BookingSession {
    config: Config,
    clock: Arc<dyn Clock>,
    chart_rng: Box<dyn RandomSource>,
    trips: Box<dyn TripRepository>,
    passenger: Option<Passenger>,
}

impl BookingSession {
    /// Creates a session from explicit dependencies
    #[must_use]
    pub fn new(
        config: Config,
        clock: Arc<dyn Clock>,
        chart_rng: Box<dyn RandomSource>,
        trips: Box<dyn TripRepository>,
    ) -> Self {
        Self {
            config,
            clock,
            chart_rng,
            trips,
            passenger: None,
        }
    }

    /// Creates a session with the system clock, an in-memory trip history and
    /// random sources chosen by `config`
    #[must_use]
    pub fn from_config(config: Config) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let trips = InMemoryTripRepository::new(config.random_source(), Arc::clone(&clock));
        let chart_rng = config.random_source();
        Self::new(config, clock, chart_rng, Box::new(trips))
    }

    /// Active configuration
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Signed-in passenger, if any
    #[must_use]
    pub const fn passenger(&self) -> Option<&Passenger> {
        self.passenger.as_ref()
    }

    /// Sign a passenger in, replacing any previous one
    pub fn sign_in(&mut self, passenger: Passenger) {
        tracing::info!(passenger = %passenger.full_name(), "Signed in");
        self.passenger = Some(passenger);
    }

    /// Sign out and forget the trip history
    pub fn sign_out(&mut self) {
        if let Some(passenger) = self.passenger.take() {
            tracing::info!(passenger = %passenger.full_name(), "Signed out");
        }
        self.trips.clear();
    }

    /// Open the seat map: sample a chart and wrap it in a fresh store
    ///
    /// # Errors
    ///
    /// Returns a [`ChartError`] when the configured chart size or occupancy
    /// is unusable.
    pub fn begin_seat_selection(&mut self) -> Result<SeatSelectionStore, ChartError> {
        let chart = SeatChart::generate(
            self.config.chart_layout(),
            self.config.chart.occupancy,
            self.chart_rng.as_mut(),
        )?;
        Ok(self.seat_selection_for(chart))
    }

    /// Open the seat map on a known chart
    #[must_use]
    pub fn seat_selection_for(&self, chart: SeatChart) -> SeatSelectionStore {
        metrics::record_seats_available(chart.available_count());
        tracing::debug!(
            size = chart.layout().size(),
            available = chart.available_count(),
            "Seat selection opened"
        );

        let env = SeatSelectionEnvironment::new(
            Arc::clone(&self.clock),
            self.config.revalidation_policy(),
        );
        Store::new(SeatSelectionState::new(chart), SeatSelectionReducer::new(), env)
            .with_feedback_limit(self.config.selection.feedback_limit)
    }

    /// Turn a confirmed seat into a stored bus trip for the signed-in passenger
    ///
    /// # Errors
    ///
    /// - [`BookingError::NotSignedIn`] without a signed-in passenger
    /// - [`BookingError::SelectionNotConfirmed`] when `handoff` is `None`
    /// - any validation error from the trip repository
    pub fn book_bus_trip(
        &mut self,
        handoff: Option<SeatHandoff>,
        itinerary: Itinerary,
    ) -> Result<Trip, BookingError> {
        let passenger = self.passenger.clone().ok_or(BookingError::NotSignedIn)?;
        let handoff = handoff.ok_or(BookingError::SelectionNotConfirmed)?;

        let request = NewTrip::new(TripKind::Bus, itinerary, passenger).with_seat(handoff.seat);
        self.trips.create(request)
    }

    /// Store any other booking (flight, hotel) for the signed-in passenger
    ///
    /// The passenger on `request` is kept when it carries a name; otherwise
    /// the signed-in passenger is used.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::NotSignedIn`] without a signed-in passenger,
    /// or any validation error from the trip repository.
    pub fn book(&mut self, mut request: NewTrip) -> Result<Trip, BookingError> {
        let passenger = self.passenger.as_ref().ok_or(BookingError::NotSignedIn)?;
        if request.passenger.full_name().is_empty() {
            request.passenger = passenger.clone();
        }
        self.trips.create(request)
    }

    /// Trips booked in this session, oldest first
    #[must_use]
    pub fn trips(&self) -> Vec<Trip> {
        self.trips.list()
    }

    /// Look up a trip by booking reference
    #[must_use]
    pub fn find_trip(&self, pnr: &Pnr) -> Option<Trip> {
        self.trips.find_by_pnr(pnr)
    }
}
