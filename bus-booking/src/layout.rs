//! 2+1 bus layout geometry.
//!
//! Seats are numbered front to back, three per row: a single seat on one side
//! of the aisle followed by a pair on the other side.
//!
//! ```text
//!  row 1:  [ 1]   aisle   [ 2][ 3]
//!  row 2:  [ 4]   aisle   [ 5][ 6]
//!  row 3:  [ 7]   aisle   [ 8][ 9]
//! ```
//!
//! The position of a seat follows from its number modulo 3:
//! `1` is a single seat, `2` the left seat of a pair (neighbor `n + 1`),
//! `0` the right seat of a pair (neighbor `n - 1`).

use crate::error::SeatError;
use crate::types::SeatNumber;
use serde::{Deserialize, Serialize};

/// Seats per bus unless configured otherwise
pub const DEFAULT_CHART_SIZE: u32 = 40;

/// Seats in one physical row
pub const SEATS_PER_ROW: u32 = 3;

/// Where a seat sits within its row
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeatPosition {
    /// Window seat with no neighbor
    Single,
    /// Left seat of a pair
    PairLeft,
    /// Right seat of a pair
    PairRight,
}

impl SeatPosition {
    /// Position of a seat number in a 2+1 layout
    #[must_use]
    pub const fn of(seat: SeatNumber) -> Self {
        match seat.value() % SEATS_PER_ROW {
            1 => Self::Single,
            2 => Self::PairLeft,
            _ => Self::PairRight,
        }
    }
}

/// Paired seat for `seat`, ignoring the size of the bus
///
/// `None` for single seats and for seat `0`, which no layout contains.
#[must_use]
pub const fn neighbor_of(seat: SeatNumber) -> Option<SeatNumber> {
    if seat.value() == 0 {
        return None;
    }
    match SeatPosition::of(seat) {
        SeatPosition::Single => None,
        SeatPosition::PairLeft => Some(SeatNumber::new(seat.value() + 1)),
        SeatPosition::PairRight => Some(SeatNumber::new(seat.value() - 1)),
    }
}

/// A 2+1 bus with `size` seats numbered `1..=size`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusLayout {
    size: u32,
}

impl BusLayout {
    /// A layout with `size` seats
    #[must_use]
    pub const fn new(size: u32) -> Self {
        Self { size }
    }

    /// Number of seats
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Whether the layout has no seats at all
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Whether `seat` exists on this bus
    #[must_use]
    pub const fn contains(&self, seat: SeatNumber) -> bool {
        seat.value() >= 1 && seat.value() <= self.size
    }

    /// Check that `seat` exists on this bus
    ///
    /// # Errors
    ///
    /// Returns [`SeatError::InvalidSeat`] when `seat` is outside `1..=size`.
    pub const fn check(&self, seat: SeatNumber) -> Result<SeatNumber, SeatError> {
        if self.contains(seat) {
            Ok(seat)
        } else {
            Err(SeatError::InvalidSeat {
                seat,
                size: self.size,
            })
        }
    }

    /// Paired seat for `seat` on this bus
    ///
    /// A pair-left seat in the last, incomplete row has no neighbor.
    ///
    /// # Errors
    ///
    /// Returns [`SeatError::InvalidSeat`] when `seat` is outside `1..=size`.
    pub fn neighbor_of(&self, seat: SeatNumber) -> Result<Option<SeatNumber>, SeatError> {
        self.check(seat)?;
        Ok(neighbor_of(seat).filter(|n| self.contains(*n)))
    }

    /// Position of `seat` within its row
    ///
    /// # Errors
    ///
    /// Returns [`SeatError::InvalidSeat`] when `seat` is outside `1..=size`.
    pub fn position_of(&self, seat: SeatNumber) -> Result<SeatPosition, SeatError> {
        self.check(seat).map(SeatPosition::of)
    }

    /// 1-based row of `seat`
    ///
    /// # Errors
    ///
    /// Returns [`SeatError::InvalidSeat`] when `seat` is outside `1..=size`.
    pub fn row_of(&self, seat: SeatNumber) -> Result<u32, SeatError> {
        self.check(seat).map(|s| (s.value() - 1) / SEATS_PER_ROW + 1)
    }

    /// Number of rows, counting a trailing partial row
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.size.div_ceil(SEATS_PER_ROW)
    }

    /// All seat numbers, front to back
    pub fn seats(&self) -> impl Iterator<Item = SeatNumber> {
        (1..=self.size).map(SeatNumber::new)
    }
}

impl Default for BusLayout {
    fn default() -> Self {
        Self::new(DEFAULT_CHART_SIZE)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn seat(n: u32) -> SeatNumber {
        SeatNumber::new(n)
    }

    #[test]
    fn test_positions_follow_modulo_three() {
        assert_eq!(SeatPosition::of(seat(1)), SeatPosition::Single);
        assert_eq!(SeatPosition::of(seat(2)), SeatPosition::PairLeft);
        assert_eq!(SeatPosition::of(seat(3)), SeatPosition::PairRight);
        assert_eq!(SeatPosition::of(seat(40)), SeatPosition::Single);
    }

    #[test]
    fn test_neighbors() {
        assert_eq!(neighbor_of(seat(1)), None);
        assert_eq!(neighbor_of(seat(2)), Some(seat(3)));
        assert_eq!(neighbor_of(seat(3)), Some(seat(2)));
        assert_eq!(neighbor_of(seat(39)), Some(seat(38)));
        assert_eq!(neighbor_of(seat(0)), None);
    }

    #[test]
    fn test_layout_bounds() {
        let layout = BusLayout::default();
        assert_eq!(layout.size(), 40);
        assert_eq!(layout.rows(), 14);
        assert!(layout.neighbor_of(seat(0)).is_err());
        assert_eq!(
            layout.neighbor_of(seat(41)),
            Err(SeatError::InvalidSeat { seat: seat(41), size: 40 })
        );
        assert_eq!(layout.neighbor_of(seat(40)).unwrap(), None);
    }

    #[test]
    fn test_trailing_pair_left_has_no_neighbor() {
        let layout = BusLayout::new(41);
        assert_eq!(layout.position_of(seat(41)).unwrap(), SeatPosition::PairLeft);
        assert_eq!(layout.neighbor_of(seat(41)).unwrap(), None);
        assert_eq!(layout.neighbor_of(seat(39)).unwrap(), Some(seat(38)));
    }

    #[test]
    fn test_rows() {
        let layout = BusLayout::default();
        assert_eq!(layout.row_of(seat(1)).unwrap(), 1);
        assert_eq!(layout.row_of(seat(3)).unwrap(), 1);
        assert_eq!(layout.row_of(seat(4)).unwrap(), 2);
        assert_eq!(layout.row_of(seat(40)).unwrap(), 14);
        assert_eq!(layout.seats().count(), 40);
    }
}
