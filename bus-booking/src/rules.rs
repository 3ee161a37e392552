//! Seat allocation rules.
//!
//! A seat can be selected when:
//! 1. it exists on the bus,
//! 2. nobody holds it, and
//! 3. its paired seat, if any, is free or held by a passenger of the same
//!    gender as the one choosing.
//!
//! An occupied neighbor with no recorded gender never blocks a selection.
//! Single seats have no neighbor and are never blocked by rule 3.
//!
//! The rules only read the chart; accepting a seat does not occupy it.

use crate::chart::SeatChart;
use crate::error::SeatError;
use crate::types::{Gender, SeatNumber};

/// Validate a selection request against the chart
///
/// Returns the seat to hold as the new selection. Calling this twice with the
/// same arguments returns the same result.
///
/// # Errors
///
/// - [`SeatError::InvalidSeat`] when `seat` is not on the bus
/// - [`SeatError::Occupied`] when the seat is already taken
/// - [`SeatError::GenderConflict`] when the paired seat holds a passenger of
///   the other gender
pub fn try_select(
    chart: &SeatChart,
    seat: SeatNumber,
    chosen: Gender,
) -> Result<SeatNumber, SeatError> {
    let target = chart.seat(seat)?;
    if target.occupied {
        return Err(SeatError::Occupied { seat });
    }

    let Some(neighbor) = chart.layout().neighbor_of(seat)? else {
        return Ok(seat);
    };

    let neighbor_seat = chart.seat(neighbor)?;
    match neighbor_seat.occupant_gender {
        Some(neighbor_gender) if neighbor_seat.occupied && neighbor_gender != chosen => {
            Err(SeatError::GenderConflict {
                seat,
                neighbor,
                neighbor_gender,
                requested: chosen,
            })
        },
        _ => Ok(seat),
    }
}

/// Every seat `chosen` could select right now, front to back
#[must_use]
pub fn assignable_seats(chart: &SeatChart, chosen: Gender) -> Vec<SeatNumber> {
    chart
        .layout()
        .seats()
        .filter(|seat| try_select(chart, *seat, chosen).is_ok())
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn seat(n: u32) -> SeatNumber {
        SeatNumber::new(n)
    }

    #[test]
    fn test_occupied_seat_is_rejected_for_everyone() {
        let chart = SeatChart::empty(40).with_occupant(5, Gender::Male);
        for gender in [Gender::Male, Gender::Female] {
            assert_eq!(
                try_select(&chart, seat(5), gender),
                Err(SeatError::Occupied { seat: seat(5) })
            );
        }
    }

    #[test]
    fn test_gender_conflict_next_to_female() {
        let chart = SeatChart::empty(40).with_occupant(2, Gender::Female);

        assert_eq!(
            try_select(&chart, seat(3), Gender::Male),
            Err(SeatError::GenderConflict {
                seat: seat(3),
                neighbor: seat(2),
                neighbor_gender: Gender::Female,
                requested: Gender::Male,
            })
        );
        assert_eq!(try_select(&chart, seat(3), Gender::Female), Ok(seat(3)));
    }

    #[test]
    fn test_conflict_applies_from_the_left_seat_too() {
        let chart = SeatChart::empty(40).with_occupant(9, Gender::Male);
        assert!(matches!(
            try_select(&chart, seat(8), Gender::Female),
            Err(SeatError::GenderConflict { neighbor, .. }) if neighbor == seat(9)
        ));
        assert_eq!(try_select(&chart, seat(8), Gender::Male), Ok(seat(8)));
    }

    #[test]
    fn test_single_seat_ignores_surroundings() {
        let chart = SeatChart::empty(40)
            .with_occupant(3, Gender::Female)
            .with_occupant(5, Gender::Female);
        assert_eq!(try_select(&chart, seat(4), Gender::Male), Ok(seat(4)));
    }

    #[test]
    fn test_free_neighbor_never_conflicts() {
        let chart = SeatChart::empty(40);
        assert_eq!(try_select(&chart, seat(7), Gender::Female), Ok(seat(7)));
        assert_eq!(try_select(&chart, seat(6), Gender::Male), Ok(seat(6)));
    }

    #[test]
    fn test_neighbor_without_gender_does_not_conflict() {
        let chart = SeatChart::empty(40).with_unknown_occupant(11);
        assert_eq!(try_select(&chart, seat(12), Gender::Male), Ok(seat(12)));
    }

    #[test]
    fn test_out_of_range_seat_is_invalid() {
        let chart = SeatChart::empty(40);
        assert_eq!(
            try_select(&chart, seat(0), Gender::Male),
            Err(SeatError::InvalidSeat { seat: seat(0), size: 40 })
        );
        assert_eq!(
            try_select(&chart, seat(41), Gender::Female),
            Err(SeatError::InvalidSeat { seat: seat(41), size: 40 })
        );
    }

    #[test]
    fn test_selection_is_idempotent() {
        let chart = SeatChart::empty(40).with_occupant(2, Gender::Female);
        let first = try_select(&chart, seat(3), Gender::Female);
        let second = try_select(&chart, seat(3), Gender::Female);
        assert_eq!(first, second);
        assert_eq!(chart.available_count(), 39);
    }

    #[test]
    fn test_assignable_seats() {
        let chart = SeatChart::empty(6)
            .with_occupant(2, Gender::Female)
            .with_occupant(4, Gender::Male);

        assert_eq!(
            assignable_seats(&chart, Gender::Male),
            vec![seat(1), seat(5), seat(6)]
        );
        assert_eq!(
            assignable_seats(&chart, Gender::Female),
            vec![seat(1), seat(3), seat(5), seat(6)]
        );
    }
}
