//! Seat-selection screen session.
//!
//! One [`SeatSelectionState`] exists per visit to the seat map. The passenger
//! picks a gender, taps seats, and finally confirms; the confirmed seat is
//! handed to the booking flow as a [`SeatHandoff`].
//!
//! Commands are validated with [`rules::try_select`](crate::rules::try_select)
//! and folded into state as events. Events are produced by the reducer only;
//! an event sent to the reducer is logged and dropped. The chart itself is
//! never modified.
//!
//! **Gender changes**: under [`RevalidationPolicy::Revalidate`] (the default)
//! choosing a different gender re-checks the held seat, and a seat that now
//! conflicts with its neighbor is dropped with a `SelectionInvalidated` event.
//! [`RevalidationPolicy::Keep`] leaves the held seat untouched until the next
//! tap.

use crate::chart::SeatChart;
use crate::error::SeatError;
use crate::metrics;
use crate::rules;
use crate::types::{Gender, SeatHandoff, SeatNumber};
use seatmap_core::{SmallVec, effect::Effect, environment::Clock, reducer::Reducer, smallvec};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ============================================================================
// State
// ============================================================================

/// What happens to a held seat when the passenger changes gender
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevalidationPolicy {
    /// Re-check the held seat and drop it if it now conflicts
    #[default]
    Revalidate,
    /// Keep the held seat until the next selection attempt
    Keep,
}

/// State of one seat-selection screen
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeatSelectionState {
    /// Seating chart for this visit
    pub chart: SeatChart,
    /// Gender the passenger declared
    pub chosen_gender: Gender,
    /// Seat currently held, if any
    pub selected_seat: Option<SeatNumber>,
    /// Most recent rejection, shown to the passenger
    pub last_error: Option<SeatError>,
    /// Confirmed selection waiting for the booking flow
    pub handoff: Option<SeatHandoff>,
}

impl SeatSelectionState {
    /// Fresh screen state for `chart`
    #[must_use]
    pub fn new(chart: SeatChart) -> Self {
        Self {
            chart,
            chosen_gender: Gender::default(),
            selected_seat: None,
            last_error: None,
            handoff: None,
        }
    }

    /// Fresh screen state with a preselected gender
    #[must_use]
    pub fn with_gender(chart: SeatChart, gender: Gender) -> Self {
        Self {
            chosen_gender: gender,
            ..Self::new(chart)
        }
    }

    /// Whether the continue button should be enabled
    #[must_use]
    pub const fn can_continue(&self) -> bool {
        self.selected_seat.is_some()
    }
}

// ============================================================================
// Actions (Commands + Events)
// ============================================================================

/// Actions for the seat-selection screen
#[derive(Clone, Debug, PartialEq)]
pub enum SeatSelectionAction {
    // Commands
    /// Passenger picked a gender
    ChooseGender {
        /// Declared gender
        gender: Gender,
    },

    /// Passenger tapped a seat
    SelectSeat {
        /// Tapped seat
        seat: SeatNumber,
    },

    /// Re-check the held seat against the current gender
    RevalidateSelection,

    /// Passenger deselected their seat
    ClearSelection,

    /// Passenger pressed continue
    ConfirmSelection,

    // Events (emitted by the reducer, ignored when sent)
    /// Declared gender changed
    GenderChosen {
        /// New gender
        gender: Gender,
    },

    /// A seat is now held
    SeatSelected {
        /// Held seat
        seat: SeatNumber,
        /// Gender it was validated against
        gender: Gender,
    },

    /// A request was refused; the previous selection stands
    SelectionRejected {
        /// Requested seat, `None` when confirming without one
        seat: Option<SeatNumber>,
        /// Why
        error: SeatError,
    },

    /// The held seat stopped passing the rules and was dropped
    SelectionInvalidated {
        /// Dropped seat
        seat: SeatNumber,
        /// Why
        error: SeatError,
    },

    /// The held seat was released
    SelectionCleared,

    /// The held seat was confirmed for booking
    SelectionConfirmed {
        /// Selection handed to the booking flow
        handoff: SeatHandoff,
    },
}

// ============================================================================
// Environment
// ============================================================================

/// Environment dependencies for the seat-selection screen
#[derive(Clone)]
pub struct SeatSelectionEnvironment {
    /// Clock for confirmation timestamps
    pub clock: Arc<dyn Clock>,
    /// Behaviour on gender change
    pub policy: RevalidationPolicy,
}

impl SeatSelectionEnvironment {
    /// Creates a new `SeatSelectionEnvironment`
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, policy: RevalidationPolicy) -> Self {
        Self { clock, policy }
    }
}

// ============================================================================
// Reducer
// ============================================================================

/// Reducer for the seat-selection screen
#[derive(Clone, Debug, Default)]
pub struct SeatSelectionReducer;

impl SeatSelectionReducer {
    /// Creates a new `SeatSelectionReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Applies an event to state
    fn apply_event(state: &mut SeatSelectionState, action: &SeatSelectionAction) {
        match action {
            SeatSelectionAction::GenderChosen { gender } => {
                state.chosen_gender = *gender;
                state.handoff = None;
            },
            SeatSelectionAction::SeatSelected { seat, .. } => {
                state.selected_seat = Some(*seat);
                state.last_error = None;
                state.handoff = None;
            },
            SeatSelectionAction::SelectionRejected { error, .. } => {
                state.last_error = Some(*error);
            },
            SeatSelectionAction::SelectionInvalidated { error, .. } => {
                state.selected_seat = None;
                state.last_error = Some(*error);
                state.handoff = None;
            },
            SeatSelectionAction::SelectionCleared => {
                state.selected_seat = None;
                state.last_error = None;
                state.handoff = None;
            },
            SeatSelectionAction::SelectionConfirmed { handoff } => {
                state.handoff = Some(*handoff);
                state.last_error = None;
            },
            // Commands don't modify state directly
            SeatSelectionAction::ChooseGender { .. }
            | SeatSelectionAction::SelectSeat { .. }
            | SeatSelectionAction::RevalidateSelection
            | SeatSelectionAction::ClearSelection
            | SeatSelectionAction::ConfirmSelection => {},
        }
    }
}

impl Reducer for SeatSelectionReducer {
    type State = SeatSelectionState;
    type Action = SeatSelectionAction;
    type Environment = SeatSelectionEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Commands ==========
            SeatSelectionAction::ChooseGender { gender } => {
                if gender == state.chosen_gender {
                    return SmallVec::new();
                }

                Self::apply_event(state, &SeatSelectionAction::GenderChosen { gender });
                tracing::debug!(%gender, "Passenger gender changed");

                if env.policy == RevalidationPolicy::Revalidate && state.selected_seat.is_some() {
                    smallvec![Effect::dispatch(SeatSelectionAction::RevalidateSelection)]
                } else {
                    SmallVec::new()
                }
            },

            SeatSelectionAction::SelectSeat { seat } => {
                let result = rules::try_select(&state.chart, seat, state.chosen_gender);
                metrics::record_selection_attempt(&result);

                let event = match result {
                    Ok(seat) => SeatSelectionAction::SeatSelected {
                        seat,
                        gender: state.chosen_gender,
                    },
                    Err(error) => {
                        tracing::warn!(%seat, code = error.code(), "Seat selection rejected");
                        SeatSelectionAction::SelectionRejected {
                            seat: Some(seat),
                            error,
                        }
                    },
                };
                Self::apply_event(state, &event);
                SmallVec::new()
            },

            SeatSelectionAction::RevalidateSelection => {
                let Some(seat) = state.selected_seat else {
                    return SmallVec::new();
                };

                if let Err(error) = rules::try_select(&state.chart, seat, state.chosen_gender) {
                    tracing::warn!(%seat, code = error.code(), "Held seat no longer valid");
                    metrics::record_selection_invalidated();
                    Self::apply_event(
                        state,
                        &SeatSelectionAction::SelectionInvalidated { seat, error },
                    );
                }
                SmallVec::new()
            },

            SeatSelectionAction::ClearSelection => {
                if state.selected_seat.is_some() {
                    Self::apply_event(state, &SeatSelectionAction::SelectionCleared);
                }
                SmallVec::new()
            },

            SeatSelectionAction::ConfirmSelection => {
                let event = match state.selected_seat {
                    Some(seat) => SeatSelectionAction::SelectionConfirmed {
                        handoff: SeatHandoff {
                            seat,
                            gender: state.chosen_gender,
                            confirmed_at: env.clock.now(),
                        },
                    },
                    None => SeatSelectionAction::SelectionRejected {
                        seat: None,
                        error: SeatError::NoSeatSelected,
                    },
                };
                if let SeatSelectionAction::SelectionConfirmed { handoff } = &event {
                    tracing::info!(seat = %handoff.seat, gender = %handoff.gender, "Seat confirmed");
                }
                Self::apply_event(state, &event);
                SmallVec::new()
            },

            // ========== Events ==========
            // Only the reducer records events; one sent from outside would
            // bypass the allocation rules.
            event => {
                tracing::warn!(?event, "Ignoring externally sent selection event");
                SmallVec::new()
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use seatmap_core::store::Store;
    use seatmap_testing::{ReducerTest, assertions, test_clock};

    fn seat(n: u32) -> SeatNumber {
        SeatNumber::new(n)
    }

    fn create_test_env() -> SeatSelectionEnvironment {
        SeatSelectionEnvironment::new(Arc::new(test_clock()), RevalidationPolicy::Revalidate)
    }

    fn chart_with_female_in_two() -> SeatChart {
        SeatChart::empty(40).with_occupant(2, Gender::Female)
    }

    #[test]
    fn test_select_free_seat() {
        ReducerTest::new(SeatSelectionReducer::new())
            .with_env(create_test_env())
            .given_state(SeatSelectionState::new(SeatChart::empty(40)))
            .when_action(SeatSelectionAction::SelectSeat { seat: seat(4) })
            .then_state(|state| {
                assert_eq!(state.selected_seat, Some(SeatNumber::new(4)));
                assert!(state.last_error.is_none());
                assert!(state.can_continue());
            })
            .then_effects(|effects| {
                assertions::assert_no_effects(effects);
            })
            .run();
    }

    #[test]
    fn test_conflict_keeps_previous_selection() {
        ReducerTest::new(SeatSelectionReducer::new())
            .with_env(create_test_env())
            .given_state(SeatSelectionState::new(chart_with_female_in_two()))
            .given_actions(vec![SeatSelectionAction::SelectSeat { seat: seat(7) }])
            .when_action(SeatSelectionAction::SelectSeat { seat: seat(3) })
            .then_state(|state| {
                assert_eq!(state.selected_seat, Some(SeatNumber::new(7)));
                assert_eq!(state.last_error.map(|e| e.code()), Some("GENDER_CONFLICT"));
            })
            .run();
    }

    #[test]
    fn test_new_selection_replaces_old() {
        ReducerTest::new(SeatSelectionReducer::new())
            .with_env(create_test_env())
            .given_state(SeatSelectionState::with_gender(
                chart_with_female_in_two(),
                Gender::Female,
            ))
            .given_actions(vec![SeatSelectionAction::SelectSeat { seat: seat(10) }])
            .when_action(SeatSelectionAction::SelectSeat { seat: seat(3) })
            .then_state(|state| {
                assert_eq!(state.selected_seat, Some(SeatNumber::new(3)));
            })
            .run();
    }

    #[test]
    fn test_occupied_rejection_clears_after_success() {
        let mut state = SeatSelectionState::new(chart_with_female_in_two());
        let reducer = SeatSelectionReducer::new();
        let env = create_test_env();

        reducer.reduce(&mut state, SeatSelectionAction::SelectSeat { seat: seat(2) }, &env);
        assert_eq!(state.last_error, Some(SeatError::Occupied { seat: seat(2) }));
        assert_eq!(state.selected_seat, None);

        reducer.reduce(&mut state, SeatSelectionAction::SelectSeat { seat: seat(1) }, &env);
        assert_eq!(state.last_error, None);
        assert_eq!(state.selected_seat, Some(seat(1)));
    }

    #[test]
    fn test_gender_change_dispatches_revalidation() {
        ReducerTest::new(SeatSelectionReducer::new())
            .with_env(create_test_env())
            .given_state(SeatSelectionState::with_gender(
                chart_with_female_in_two(),
                Gender::Female,
            ))
            .given_actions(vec![SeatSelectionAction::SelectSeat { seat: seat(3) }])
            .when_action(SeatSelectionAction::ChooseGender {
                gender: Gender::Male,
            })
            .then_state(|state| {
                assert_eq!(state.chosen_gender, Gender::Male);
                // Not revalidated until the dispatched action runs
                assert_eq!(state.selected_seat, Some(SeatNumber::new(3)));
            })
            .then_effects(|effects| {
                assertions::assert_dispatches(effects, &SeatSelectionAction::RevalidateSelection);
            })
            .run();
    }

    #[test]
    fn test_gender_change_without_selection_has_no_effects() {
        ReducerTest::new(SeatSelectionReducer::new())
            .with_env(create_test_env())
            .given_state(SeatSelectionState::new(SeatChart::empty(40)))
            .when_action(SeatSelectionAction::ChooseGender {
                gender: Gender::Female,
            })
            .then_effects(|effects| {
                assertions::assert_no_effects(effects);
            })
            .run();
    }

    #[test]
    fn test_store_drops_conflicting_seat_on_gender_change() {
        let mut store = Store::new(
            SeatSelectionState::with_gender(chart_with_female_in_two(), Gender::Female),
            SeatSelectionReducer::new(),
            create_test_env(),
        );

        store.send(SeatSelectionAction::SelectSeat { seat: seat(3) }).unwrap();
        let reduced = store
            .send(SeatSelectionAction::ChooseGender { gender: Gender::Male })
            .unwrap();

        assert_eq!(reduced, 2);
        assert_eq!(store.state(|s| s.selected_seat), None);
        assert_eq!(
            store.state(|s| s.last_error.map(|e| e.code())),
            Some("GENDER_CONFLICT")
        );
    }

    #[test]
    fn test_store_keeps_compatible_seat_on_gender_change() {
        let mut store = Store::new(
            SeatSelectionState::new(chart_with_female_in_two()),
            SeatSelectionReducer::new(),
            create_test_env(),
        );

        store.send(SeatSelectionAction::SelectSeat { seat: seat(4) }).unwrap();
        store
            .send(SeatSelectionAction::ChooseGender { gender: Gender::Female })
            .unwrap();

        assert_eq!(store.state(|s| s.selected_seat), Some(seat(4)));
        assert_eq!(store.state(|s| s.last_error), None);
    }

    #[test]
    fn test_keep_policy_preserves_stale_selection() {
        let env = SeatSelectionEnvironment::new(Arc::new(test_clock()), RevalidationPolicy::Keep);
        let mut store = Store::new(
            SeatSelectionState::with_gender(chart_with_female_in_two(), Gender::Female),
            SeatSelectionReducer::new(),
            env,
        );

        store.send(SeatSelectionAction::SelectSeat { seat: seat(3) }).unwrap();
        store
            .send(SeatSelectionAction::ChooseGender { gender: Gender::Male })
            .unwrap();

        assert_eq!(store.state(|s| s.selected_seat), Some(seat(3)));

        // The next attempt is checked against the new gender
        store.send(SeatSelectionAction::SelectSeat { seat: seat(3) }).unwrap();
        assert_eq!(
            store.state(|s| s.last_error.map(|e| e.code())),
            Some("GENDER_CONFLICT")
        );
    }

    #[test]
    fn test_confirm_hands_off_selection() {
        let expected_time = test_clock().now();

        ReducerTest::new(SeatSelectionReducer::new())
            .with_env(create_test_env())
            .given_state(SeatSelectionState::with_gender(SeatChart::empty(40), Gender::Female))
            .given_actions(vec![SeatSelectionAction::SelectSeat { seat: seat(7) }])
            .when_action(SeatSelectionAction::ConfirmSelection)
            .then_state(move |state| {
                let handoff = state.handoff.unwrap();
                assert_eq!(handoff.seat, SeatNumber::new(7));
                assert_eq!(handoff.gender, Gender::Female);
                assert_eq!(handoff.confirmed_at, expected_time);
            })
            .run();
    }

    #[test]
    fn test_confirm_without_selection_is_rejected() {
        ReducerTest::new(SeatSelectionReducer::new())
            .with_env(create_test_env())
            .given_state(SeatSelectionState::new(SeatChart::empty(40)))
            .when_action(SeatSelectionAction::ConfirmSelection)
            .then_state(|state| {
                assert!(state.handoff.is_none());
                assert_eq!(state.last_error, Some(SeatError::NoSeatSelected));
            })
            .run();
    }

    #[test]
    fn test_clear_selection() {
        ReducerTest::new(SeatSelectionReducer::new())
            .with_env(create_test_env())
            .given_state(SeatSelectionState::new(SeatChart::empty(40)))
            .given_actions(vec![
                SeatSelectionAction::SelectSeat { seat: seat(5) },
                SeatSelectionAction::ConfirmSelection,
            ])
            .when_action(SeatSelectionAction::ClearSelection)
            .then_state(|state| {
                assert_eq!(state.selected_seat, None);
                assert!(state.handoff.is_none());
                assert!(!state.can_continue());
            })
            .run();
    }

    #[test]
    fn test_chart_is_never_modified() {
        let chart = chart_with_female_in_two();
        let mut store = Store::new(
            SeatSelectionState::new(chart.clone()),
            SeatSelectionReducer::new(),
            create_test_env(),
        );

        for n in [1, 2, 3, 4, 5] {
            store.send(SeatSelectionAction::SelectSeat { seat: seat(n) }).unwrap();
        }
        store.send(SeatSelectionAction::ConfirmSelection).unwrap();

        assert_eq!(store.state(|s| s.chart.clone()), chart);
    }

    #[test]
    fn test_sent_events_cannot_bypass_rules() {
        let mut store = Store::new(
            SeatSelectionState::new(chart_with_female_in_two()),
            SeatSelectionReducer::new(),
            create_test_env(),
        );

        // Occupied seat, then a seat past the end of a 40-seat bus
        for n in [2, 999] {
            store
                .send(SeatSelectionAction::SeatSelected {
                    seat: seat(n),
                    gender: Gender::Male,
                })
                .unwrap();
            assert_eq!(store.state(|s| s.selected_seat), None);
        }

        store.send(SeatSelectionAction::ConfirmSelection).unwrap();
        assert!(store.state(|s| s.handoff).is_none());
        assert_eq!(store.state(|s| s.last_error), Some(SeatError::NoSeatSelected));
    }

    #[test]
    fn test_sent_confirmation_is_ignored() {
        let handoff = SeatHandoff {
            seat: seat(2),
            gender: Gender::Male,
            confirmed_at: test_clock().now(),
        };

        ReducerTest::new(SeatSelectionReducer::new())
            .with_env(create_test_env())
            .given_state(SeatSelectionState::new(chart_with_female_in_two()))
            .given_actions(vec![SeatSelectionAction::SelectSeat { seat: seat(4) }])
            .when_action(SeatSelectionAction::SelectionConfirmed { handoff })
            .then_state(|state| {
                assert!(state.handoff.is_none());
                assert_eq!(state.selected_seat, Some(SeatNumber::new(4)));
            })
            .then_effects(|effects| {
                assertions::assert_no_effects(effects);
            })
            .run();
    }

    #[test]
    fn test_sent_invalidation_keeps_valid_selection() {
        ReducerTest::new(SeatSelectionReducer::new())
            .with_env(create_test_env())
            .given_state(SeatSelectionState::new(SeatChart::empty(40)))
            .given_actions(vec![SeatSelectionAction::SelectSeat { seat: seat(7) }])
            .when_action(SeatSelectionAction::SelectionInvalidated {
                seat: seat(7),
                error: SeatError::Occupied { seat: seat(7) },
            })
            .then_state(|state| {
                assert_eq!(state.selected_seat, Some(SeatNumber::new(7)));
                assert!(state.last_error.is_none());
            })
            .run();
    }
}
