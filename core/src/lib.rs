//! # Seatmap Core
//!
//! Core traits and types for the seatmap workspace.
//!
//! Screen sessions (seat selection, booking) are modelled with the Reducer
//! pattern: every user interaction becomes an action, a pure reducer folds it
//! into state, and anything that is not a state change is described as an
//! [`Effect`](effect::Effect) for the [`Store`](store::Store) to carry out.
//!
//! ## Core Concepts
//!
//! - **State**: Domain state for a screen session
//! - **Action**: All possible inputs to a reducer (commands and events)
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Follow-up work descriptions (not execution)
//! - **Environment**: Injected dependencies via traits (clock, random source)
//!
//! ## Example
//!
//! ```ignore
//! use seatmap_core::*;
//!
//! impl Reducer for CounterReducer {
//!     type State = CounterState;
//!     type Action = CounterAction;
//!     type Environment = CounterEnvironment;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut CounterState,
//!         action: CounterAction,
//!         env: &CounterEnvironment,
//!     ) -> SmallVec<[Effect<CounterAction>; 4]> {
//!         state.count += 1;
//!         SmallVec::new()
//!     }
//! }
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use smallvec::{SmallVec, smallvec};

pub mod store;

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`
///
/// They contain all business logic and are deterministic and testable.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    ///
    /// # Example
    ///
    /// ```ignore
    /// impl Reducer for SeatSelectionReducer {
    ///     type State = SeatSelectionState;
    ///     type Action = SeatSelectionAction;
    ///     type Environment = SeatSelectionEnvironment;
    ///
    ///     fn reduce(
    ///         &self,
    ///         state: &mut SeatSelectionState,
    ///         action: SeatSelectionAction,
    ///         env: &SeatSelectionEnvironment,
    ///     ) -> SmallVec<[Effect<SeatSelectionAction>; 4]> {
    ///         match action {
    ///             SeatSelectionAction::SelectSeat { seat } => {
    ///                 // Business logic here
    ///                 SmallVec::new()
    ///             }
    ///             _ => SmallVec::new(),
    ///         }
    ///     }
    /// }
    /// ```
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Validates the action
        /// 2. Updates state in place
        /// 3. Returns effect descriptions to be executed
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Follow-up work descriptions
///
/// Effects are values, not execution. The [`Store`](crate::store::Store)
/// interprets them after the reducer returns.
pub mod effect {
    /// Effect type - describes follow-up work to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what
    /// should happen, returned from reducers and executed by the Store.
    #[derive(Debug, Clone, PartialEq)]
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Feed an action back into the reducer within the same `send`
        Dispatch(Box<Action>),

        /// Run effects one after another, in order
        Sequential(Vec<Effect<Action>>),
    }

    impl<Action> Effect<Action> {
        /// Describe an action to be fed back into the reducer
        #[must_use]
        pub fn dispatch(action: Action) -> Self {
            Effect::Dispatch(Box::new(action))
        }

        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Self {
            Effect::Sequential(effects)
        }

        /// Whether this effect does nothing at all
        #[must_use]
        pub fn is_none(&self) -> bool {
            match self {
                Effect::None => true,
                Effect::Dispatch(_) => false,
                Effect::Sequential(effects) => effects.iter().all(Effect::is_none),
            }
        }
    }
}

/// Environment module - Dependency injection traits
///
/// All external collaborators (wall clock, randomness) are abstracted behind
/// traits and injected via the Environment parameter, so reducers and
/// generators stay deterministic under test.
pub mod environment {
    use chrono::{DateTime, Utc};
    use rand::rngs::StdRng;
    use rand::{Rng, RngCore, SeedableRng};

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```ignore
    /// // Test - fixed time for deterministic tests
    /// struct FixedClock { time: DateTime<Utc> }
    /// impl Clock for FixedClock {
    ///     fn now(&self) -> DateTime<Utc> {
    ///         self.time
    ///     }
    /// }
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }

    /// Random source trait - abstracts randomness for testability
    ///
    /// Only [`next_unit`](RandomSource::next_unit) is required; the other
    /// draws are derived from it unless an implementation has a better way.
    pub trait RandomSource: Send {
        /// Uniform sample in `[0, 1)`
        fn next_unit(&mut self) -> f64;

        /// `true` with the given probability
        fn chance(&mut self, probability: f64) -> bool {
            self.next_unit() < probability
        }

        /// Uniform sample in `[0, bound)`; `0` when `bound` is zero
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss
        )] // the product is within [0, bound)
        fn next_below(&mut self, bound: u32) -> u32 {
            if bound == 0 {
                return 0;
            }
            let sample = (self.next_unit() * f64::from(bound)).floor() as u32;
            sample.min(bound - 1)
        }

        /// Fill `dest` with random bytes
        #[allow(clippy::cast_possible_truncation)] // next_below(256) fits a byte
        fn fill_bytes(&mut self, dest: &mut [u8]) {
            for byte in dest {
                *byte = self.next_below(256) as u8;
            }
        }
    }

    /// Production random source backed by [`StdRng`]
    #[derive(Debug, Clone)]
    pub struct StdRandom {
        rng: StdRng,
    }

    impl StdRandom {
        /// Random source seeded from the operating system
        #[must_use]
        pub fn from_entropy() -> Self {
            Self {
                rng: StdRng::from_entropy(),
            }
        }

        /// Reproducible random source for a fixed seed
        #[must_use]
        pub fn seeded(seed: u64) -> Self {
            Self {
                rng: StdRng::seed_from_u64(seed),
            }
        }
    }

    impl RandomSource for StdRandom {
        fn next_unit(&mut self) -> f64 {
            self.rng.gen_range(0.0..1.0)
        }

        fn next_below(&mut self, bound: u32) -> u32 {
            if bound == 0 {
                return 0;
            }
            self.rng.gen_range(0..bound)
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            self.rng.fill_bytes(dest);
        }
    }
}
