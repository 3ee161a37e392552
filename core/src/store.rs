//! Synchronous Store - owns state and drives the reducer.
//!
//! The Store is the imperative shell around a reducer:
//! 1. Receives an action via [`Store::send`]
//! 2. Runs the reducer against the owned state
//! 3. Interprets the returned effects, feeding dispatched actions back in
//!
//! Seat selection is a single-screen, single-threaded session, so the Store
//! is plain owned data with no locking. All work triggered by one `send`
//! completes before `send` returns.

use crate::effect::Effect;
use crate::reducer::Reducer;
use std::collections::VecDeque;
use thiserror::Error;

/// Default bound on actions dispatched by effects during one `send`
pub const DEFAULT_FEEDBACK_LIMIT: usize = 16;

/// Errors returned by [`Store::send`]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Effects kept dispatching actions past the configured bound
    #[error("Effects dispatched more than {limit} follow-up actions in one send")]
    FeedbackLimitExceeded {
        /// The configured bound
        limit: usize,
    },
}

/// The Store - runtime for a reducer
///
/// # Example
///
/// ```ignore
/// let mut store = Store::new(
///     SeatSelectionState::new(chart),
///     SeatSelectionReducer::new(),
///     environment,
/// );
///
/// store.send(SeatSelectionAction::SelectSeat { seat: SeatNumber::new(3) })?;
/// let selected = store.state(|s| s.selected_seat);
/// ```
pub struct Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    state: S,
    reducer: R,
    environment: E,
    feedback_limit: usize,
}

impl<S, A, E, R> Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    /// Create a new store with initial state, reducer, and environment
    #[must_use]
    pub const fn new(initial_state: S, reducer: R, environment: E) -> Self {
        Self {
            state: initial_state,
            reducer,
            environment,
            feedback_limit: DEFAULT_FEEDBACK_LIMIT,
        }
    }

    /// Bound the number of follow-up actions one `send` may dispatch
    #[must_use]
    pub const fn with_feedback_limit(mut self, limit: usize) -> Self {
        self.feedback_limit = limit;
        self
    }

    /// Send an action through the reducer and run all resulting effects
    ///
    /// Returns the number of actions reduced, including `action` itself.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::FeedbackLimitExceeded`] if effects dispatch more
    /// follow-up actions than the feedback limit allows. State changes made
    /// before the limit was hit are kept.
    #[tracing::instrument(skip(self, action), name = "store_send")]
    pub fn send(&mut self, action: A) -> Result<usize, StoreError> {
        metrics::counter!("store.commands.total").increment(1);

        let mut queue = VecDeque::from([action]);
        let mut dispatched = 0_usize;
        let mut reduced = 0_usize;

        while let Some(next) = queue.pop_front() {
            let effects = self.reducer.reduce(&mut self.state, next, &self.environment);
            reduced += 1;
            tracing::trace!("Reducer completed, returned {} effects", effects.len());

            for effect in effects {
                self.collect(effect, &mut queue, &mut dispatched)?;
            }
        }

        tracing::debug!(reduced, "Action processing completed");
        Ok(reduced)
    }

    fn collect(
        &self,
        effect: Effect<A>,
        queue: &mut VecDeque<A>,
        dispatched: &mut usize,
    ) -> Result<(), StoreError> {
        match effect {
            Effect::None => {
                tracing::trace!("Executing Effect::None (no-op)");
            },
            Effect::Dispatch(action) => {
                if *dispatched >= self.feedback_limit {
                    tracing::warn!(limit = self.feedback_limit, "Feedback limit exceeded");
                    metrics::counter!("store.feedback_limit.exceeded").increment(1);
                    return Err(StoreError::FeedbackLimitExceeded {
                        limit: self.feedback_limit,
                    });
                }
                *dispatched += 1;
                metrics::counter!("store.effects.executed", "type" => "dispatch").increment(1);
                queue.push_back(*action);
            },
            Effect::Sequential(effects) => {
                for inner in effects {
                    self.collect(inner, queue, dispatched)?;
                }
            },
        }
        Ok(())
    }

    /// Read current state via a closure
    ///
    /// ```ignore
    /// let selected = store.state(|s| s.selected_seat);
    /// ```
    pub fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&S) -> T,
    {
        f(&self.state)
    }

    /// Consume the store, returning its final state
    pub fn into_state(self) -> S {
        self.state
    }
}
