//! Bus Booking - seat allocation for 2+1 intercity coaches
//!
//! Implements the seat map of a bus booking flow on top of the `seatmap-core`
//! reducer runtime:
//!
//! - **Layout**: seats numbered front to back, three per row
//! - **Chart generation**: each seat independently sold with a configurable
//!   probability, sold seats tagged with the passenger's gender
//! - **Allocation rules**: a free seat may be taken unless its paired seat
//!   holds a passenger of the other gender
//! - **Selection session**: a reducer tracking the passenger's gender, held
//!   seat, last rejection and confirmed handoff
//! - **Trip history**: confirmed bookings with locally generated PNRs
//!
//! # Seat Layout
//!
//! ```text
//!   single   aisle   pair
//!  ┌─────┐         ┌─────┬─────┐
//!  │  1  │         │  2  │  3  │
//!  ├─────┤         ├─────┼─────┤
//!  │  4  │         │  5  │  6  │
//!  ├─────┤         ├─────┼─────┤
//!  │  7  │         │  8  │  9  │
//!  └─────┘         └─────┴─────┘
//! ```
//!
//! | `seat mod 3` | Position     | Neighbor   |
//! |--------------|--------------|------------|
//! | 1            | single       | none       |
//! | 2            | pair, left   | `seat + 1` |
//! | 0            | pair, right  | `seat - 1` |
//!
//! # Example
//!
//! ```ignore
//! let mut session = BookingSession::from_config(Config::from_env());
//! session.sign_in(Passenger::new("Ayşe", "Yılmaz"));
//!
//! let mut store = session.begin_seat_selection()?;
//! store.send(SeatSelectionAction::ChooseGender { gender: Gender::Female })?;
//! store.send(SeatSelectionAction::SelectSeat { seat: SeatNumber::new(3) })?;
//! store.send(SeatSelectionAction::ConfirmSelection)?;
//!
//! let trip = session.book_bus_trip(store.state(|s| s.handoff), itinerary)?;
//! println!("PNR: {}", trip.pnr);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod chart;
pub mod config;
pub mod error;
pub mod layout;
pub mod metrics;
pub mod rules;
pub mod selection;
pub mod session;
pub mod trips;
pub mod types;

pub use chart::SeatChart;
pub use config::Config;
pub use error::{BookingError, ChartError, ConfigError, SeatError};
pub use layout::{BusLayout, SeatPosition};
pub use rules::{assignable_seats, try_select};
pub use selection::{
    RevalidationPolicy, SeatSelectionAction, SeatSelectionEnvironment, SeatSelectionReducer,
    SeatSelectionState,
};
pub use session::{BookingSession, SeatSelectionStore};
pub use trips::{InMemoryTripRepository, TripRepository};
pub use types::*;
