//! Seating chart generation.
//!
//! A chart is a [`BusLayout`] plus one [`Seat`] per seat number. Charts are
//! sampled once per visit to the seat-selection screen and are read-only
//! afterwards.

use crate::error::{ChartError, SeatError};
use crate::layout::{BusLayout, DEFAULT_CHART_SIZE};
use crate::types::{Gender, Seat, SeatNumber};
use seatmap_core::environment::RandomSource;
use serde::{Deserialize, Serialize};

/// Chance that any given seat is already sold
pub const DEFAULT_OCCUPANCY_PROBABILITY: f64 = 0.4;

/// Seats of one bus, in seat-number order
///
/// Deserialization goes through [`SeatChart::from_seats`], so a stored chart
/// is held to the same numbering as a built one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSeatChart")]
pub struct SeatChart {
    layout: BusLayout,
    seats: Vec<Seat>,
}

/// Wire shape of [`SeatChart`] before validation
#[derive(Deserialize)]
struct RawSeatChart {
    layout: BusLayout,
    seats: Vec<Seat>,
}

impl TryFrom<RawSeatChart> for SeatChart {
    type Error = ChartError;

    fn try_from(raw: RawSeatChart) -> Result<Self, Self::Error> {
        let chart = Self::from_seats(raw.seats)?;
        if chart.layout != raw.layout {
            return Err(ChartError::SizeMismatch {
                size: raw.layout.size(),
                seats: chart.seats.len(),
            });
        }
        Ok(chart)
    }
}

impl SeatChart {
    /// Sample a chart: each seat is independently occupied with
    /// `occupancy_probability`, and an occupied seat's passenger is male or
    /// female with equal chance.
    ///
    /// Draws one sample per seat, plus one more for each occupied seat.
    ///
    /// # Errors
    ///
    /// Returns [`ChartError::EmptyLayout`] for a zero-seat layout and
    /// [`ChartError::InvalidProbability`] for a probability outside `[0, 1]`.
    pub fn generate<R: RandomSource + ?Sized>(
        layout: BusLayout,
        occupancy_probability: f64,
        rng: &mut R,
    ) -> Result<Self, ChartError> {
        if layout.is_empty() {
            return Err(ChartError::EmptyLayout);
        }
        if !(0.0..=1.0).contains(&occupancy_probability) {
            return Err(ChartError::InvalidProbability(occupancy_probability));
        }

        let seats = sample_seats(layout, occupancy_probability, rng);

        let occupied = seats.iter().filter(|s| s.occupied).count();
        tracing::debug!(
            size = layout.size(),
            occupied,
            occupancy_probability,
            "Generated seating chart"
        );

        Ok(Self { layout, seats })
    }

    /// Sample a 40-seat chart at 40% occupancy
    #[must_use]
    pub fn generate_default<R: RandomSource + ?Sized>(rng: &mut R) -> Self {
        let layout = BusLayout::new(DEFAULT_CHART_SIZE);
        let seats = sample_seats(layout, DEFAULT_OCCUPANCY_PROBABILITY, rng);
        Self { layout, seats }
    }

    /// A chart with every seat free
    #[must_use]
    pub fn empty(size: u32) -> Self {
        let layout = BusLayout::new(size);
        let seats = layout.seats().map(Seat::free).collect();
        Self { layout, seats }
    }

    /// Build a chart from an explicit seat list
    ///
    /// # Errors
    ///
    /// Returns [`ChartError::EmptyLayout`] for an empty list and
    /// [`ChartError::SeatOutOfOrder`] unless seat `i` (0-based) is
    /// numbered `i + 1`.
    pub fn from_seats(seats: Vec<Seat>) -> Result<Self, ChartError> {
        if seats.is_empty() {
            return Err(ChartError::EmptyLayout);
        }
        for (expected, seat) in (1_u32..).zip(&seats) {
            if seat.number.value() != expected {
                return Err(ChartError::SeatOutOfOrder {
                    expected: SeatNumber::new(expected),
                    found: seat.number,
                });
            }
        }
        let size = u32::try_from(seats.len()).map_err(|_| ChartError::EmptyLayout)?;
        Ok(Self {
            layout: BusLayout::new(size),
            seats,
        })
    }

    /// Mark `seat` as held by a passenger of `gender`; out-of-range seats
    /// are ignored
    #[must_use]
    pub fn with_occupant(mut self, seat: u32, gender: Gender) -> Self {
        if let Some(slot) = self.slot_mut(SeatNumber::new(seat)) {
            *slot = Seat::occupied_by(slot.number, gender);
        }
        self
    }

    /// Mark `seat` as sold with no recorded gender; out-of-range seats are
    /// ignored
    #[must_use]
    pub fn with_unknown_occupant(mut self, seat: u32) -> Self {
        if let Some(slot) = self.slot_mut(SeatNumber::new(seat)) {
            slot.occupied = true;
            slot.occupant_gender = None;
        }
        self
    }

    fn slot_mut(&mut self, seat: SeatNumber) -> Option<&mut Seat> {
        if !self.layout.contains(seat) {
            return None;
        }
        self.seats.get_mut(seat.value() as usize - 1)
    }

    /// The bus layout
    #[must_use]
    pub const fn layout(&self) -> BusLayout {
        self.layout
    }

    /// All seats, front to back
    #[must_use]
    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    /// Look up one seat
    ///
    /// # Errors
    ///
    /// Returns [`SeatError::InvalidSeat`] when `seat` is outside the layout.
    pub fn seat(&self, seat: SeatNumber) -> Result<&Seat, SeatError> {
        let seat = self.layout.check(seat)?;
        self.seats
            .get(seat.value() as usize - 1)
            .ok_or(SeatError::InvalidSeat {
                seat,
                size: self.layout.size(),
            })
    }

    /// Number of free seats
    #[must_use]
    pub fn available_count(&self) -> usize {
        self.seats.iter().filter(|s| s.is_free()).count()
    }

    /// Number of sold seats
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.seats.len() - self.available_count()
    }
}

fn sample_seats<R: RandomSource + ?Sized>(
    layout: BusLayout,
    occupancy_probability: f64,
    rng: &mut R,
) -> Vec<Seat> {
    layout
        .seats()
        .map(|number| {
            if !rng.chance(occupancy_probability) {
                return Seat::free(number);
            }
            let gender = if rng.chance(0.5) {
                Gender::Male
            } else {
                Gender::Female
            };
            Seat::occupied_by(number, gender)
        })
        .collect()
}
