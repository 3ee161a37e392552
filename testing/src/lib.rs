//! # Seatmap Testing
//!
//! Testing utilities and helpers for the seatmap workspace.
//!
//! This crate provides:
//! - Deterministic implementations of Environment traits
//! - A Given-When-Then harness for reducers
//! - Assertion helpers for effects
//!
//! ## Example
//!
//! ```ignore
//! use seatmap_testing::{ReducerTest, ScriptedRandom, test_clock};
//!
//! #[test]
//! fn selects_free_single_seat() {
//!     ReducerTest::new(SeatSelectionReducer::new())
//!         .with_env(test_environment())
//!         .given_state(SeatSelectionState::new(SeatChart::empty(40)))
//!         .when_action(SeatSelectionAction::SelectSeat { seat: SeatNumber::new(4) })
//!         .then_state(|state| assert_eq!(state.selected_seat, Some(SeatNumber::new(4))))
//!         .run();
//! }
//! ```

use chrono::{DateTime, Utc};
use seatmap_core::environment::{Clock, RandomSource};


pub use reducer_test::{ReducerTest, assertions};

/// Deterministic implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, RandomSource, Utc};
    use seatmap_core::environment::StdRandom;

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use seatmap_testing::mocks::FixedClock;
    /// use seatmap_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(DateTime::from_timestamp(1_735_689_600, 0).unwrap_or_default())
    }

    /// Random source that replays a fixed script of unit samples
    ///
    /// The script wraps around when exhausted. An empty script always
    /// yields `0.0`.
    ///
    /// ```
    /// use seatmap_testing::mocks::ScriptedRandom;
    /// use seatmap_core::environment::RandomSource;
    ///
    /// let mut rng = ScriptedRandom::new([0.1, 0.9]);
    /// assert!(rng.chance(0.4));
    /// assert!(!rng.chance(0.4));
    /// assert!(rng.chance(0.4));
    /// ```
    #[derive(Debug, Clone, Default)]
    pub struct ScriptedRandom {
        script: Vec<f64>,
        cursor: usize,
    }

    impl ScriptedRandom {
        /// Create a scripted source; values are clamped into `[0, 1)`
        #[must_use]
        pub fn new(script: impl IntoIterator<Item = f64>) -> Self {
            Self {
                script: script
                    .into_iter()
                    .map(|x| x.clamp(0.0, 1.0 - f64::EPSILON))
                    .collect(),
                cursor: 0,
            }
        }

        /// Number of samples drawn so far
        #[must_use]
        pub const fn draws(&self) -> usize {
            self.cursor
        }
    }

    impl RandomSource for ScriptedRandom {
        fn next_unit(&mut self) -> f64 {
            if self.script.is_empty() {
                return 0.0;
            }
            let value = self.script[self.cursor % self.script.len()];
            self.cursor += 1;
            value
        }
    }

    /// Reproducible production-grade random source for property-style tests
    #[must_use]
    pub fn seeded_random(seed: u64) -> StdRandom {
        StdRandom::seeded(seed)
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, ScriptedRandom, seeded_random, test_clock};
