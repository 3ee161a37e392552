//! Property tests for the 2+1 layout and seat allocation rules.
//!
//! Charts are sampled from seeded random sources so every failing case can be
//! replayed from the reported seed.
//!
//! Run with: `cargo test --test seat_rules_property_test`

#![allow(clippy::unwrap_used)]

use bus_booking::layout::{self, BusLayout, SeatPosition};
use bus_booking::{Gender, SeatChart, SeatError, SeatNumber, assignable_seats, try_select};
use proptest::prelude::*;
use seatmap_testing::seeded_random;

fn gender() -> impl Strategy<Value = Gender> {
    prop_oneof![Just(Gender::Male), Just(Gender::Female)]
}

fn chart() -> impl Strategy<Value = SeatChart> {
    (1_u32..64, 0.0_f64..=1.0, any::<u64>()).prop_map(|(size, occupancy, seed)| {
        SeatChart::generate(BusLayout::new(size), occupancy, &mut seeded_random(seed)).unwrap()
    })
}

proptest! {
    #[test]
    fn single_seats_have_no_neighbor(row in 0_u32..10_000) {
        let seat = SeatNumber::new(row * 3 + 1);
        prop_assert_eq!(layout::neighbor_of(seat), None);
        prop_assert_eq!(SeatPosition::of(seat), SeatPosition::Single);
    }

    #[test]
    fn paired_seats_point_at_each_other(row in 0_u32..10_000) {
        let left = SeatNumber::new(row * 3 + 2);
        let right = SeatNumber::new(row * 3 + 3);

        prop_assert_eq!(layout::neighbor_of(left), Some(right));
        prop_assert_eq!(layout::neighbor_of(right), Some(left));
    }

    #[test]
    fn neighbor_relation_is_symmetric(seat in 1_u32..100_000) {
        let seat = SeatNumber::new(seat);
        if let Some(neighbor) = layout::neighbor_of(seat) {
            prop_assert_eq!(layout::neighbor_of(neighbor), Some(seat));
        }
    }

    #[test]
    fn neighbors_stay_on_the_bus(size in 1_u32..200, seat in 1_u32..200) {
        let bus = BusLayout::new(size);
        let seat = SeatNumber::new(seat);
        match bus.neighbor_of(seat) {
            Ok(Some(neighbor)) => {
                prop_assert!(bus.contains(neighbor));
            },
            Ok(None) => {},
            Err(error) => {
                prop_assert_eq!(error, SeatError::InvalidSeat { seat, size });
            },
        }
    }

    #[test]
    fn occupied_seats_are_always_refused(chart in chart(), chosen in gender()) {
        for seat in chart.seats().iter().filter(|s| s.occupied) {
            prop_assert_eq!(
                try_select(&chart, seat.number, chosen),
                Err(SeatError::Occupied { seat: seat.number })
            );
        }
    }

    #[test]
    fn free_single_seats_are_always_accepted(chart in chart(), chosen in gender()) {
        let singles = chart
            .seats()
            .iter()
            .filter(|s| s.is_free() && SeatPosition::of(s.number) == SeatPosition::Single);
        for seat in singles {
            prop_assert_eq!(try_select(&chart, seat.number, chosen), Ok(seat.number));
        }
    }

    #[test]
    fn conflicts_name_an_occupied_neighbor_of_the_other_gender(
        chart in chart(),
        chosen in gender(),
    ) {
        for seat in chart.layout().seats() {
            if let Err(SeatError::GenderConflict { neighbor, neighbor_gender, requested, .. }) =
                try_select(&chart, seat, chosen)
            {
                let occupant = chart.seat(neighbor).unwrap();
                prop_assert!(occupant.occupied);
                prop_assert_eq!(occupant.occupant_gender, Some(neighbor_gender));
                prop_assert_eq!(requested, chosen);
                prop_assert_ne!(neighbor_gender, chosen);
                // The other gender may always take the seat
                prop_assert_eq!(try_select(&chart, seat, chosen.opposite()), Ok(seat));
            }
        }
    }

    #[test]
    fn selection_is_idempotent_and_read_only(
        chart in chart(),
        chosen in gender(),
        seat in 0_u32..70,
    ) {
        let before = chart.clone();
        let seat = SeatNumber::new(seat);

        let first = try_select(&chart, seat, chosen);
        let second = try_select(&chart, seat, chosen);

        prop_assert_eq!(first, second);
        prop_assert_eq!(chart, before);
    }

    #[test]
    fn assignable_seats_are_free_and_accepted(chart in chart(), chosen in gender()) {
        let assignable = assignable_seats(&chart, chosen);

        prop_assert!(assignable.windows(2).all(|w| w[0] < w[1]));
        for seat in &assignable {
            prop_assert!(chart.seat(*seat).unwrap().is_free());
        }
        let accepted = chart
            .layout()
            .seats()
            .filter(|s| try_select(&chart, *s, chosen).is_ok())
            .count();
        prop_assert_eq!(assignable.len(), accepted);
    }

    #[test]
    fn every_sold_seat_has_a_gender(chart in chart()) {
        prop_assert!(chart
            .seats()
            .iter()
            .filter(|s| s.occupied)
            .all(|s| s.occupant_gender.is_some()));
        prop_assert_eq!(chart.available_count() + chart.occupied_count(), chart.seats().len());
    }
}
