//! Configuration management for the booking session.
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::chart::DEFAULT_OCCUPANCY_PROBABILITY;
use crate::error::ConfigError;
use crate::layout::{BusLayout, DEFAULT_CHART_SIZE};
use crate::selection::RevalidationPolicy;
use seatmap_core::environment::{RandomSource, StdRandom};
use seatmap_core::store::DEFAULT_FEEDBACK_LIMIT;
use serde::{Deserialize, Serialize};
use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Seating chart generation
    pub chart: ChartConfig,
    /// Seat-selection screen behaviour
    pub selection: SelectionConfig,
    /// Seed for a reproducible random source; entropy when unset
    pub seed: Option<u64>,
}

/// Seating chart generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Seats per bus (default: 40)
    pub size: u32,
    /// Chance that a seat is already sold (default: 0.4)
    pub occupancy: f64,
}

/// Seat-selection screen behaviour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Re-check the held seat when the passenger changes gender (default: true)
    pub revalidate_on_gender_change: bool,
    /// Maximum actions fed back into the store per `send` (default: 16)
    pub feedback_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chart: ChartConfig {
                size: DEFAULT_CHART_SIZE,
                occupancy: DEFAULT_OCCUPANCY_PROBABILITY,
            },
            selection: SelectionConfig {
                revalidate_on_gender_change: true,
                feedback_limit: DEFAULT_FEEDBACK_LIMIT,
            },
            seed: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Unset or unparseable variables fall back to their defaults; call
    /// [`validate`](Self::validate) to reject out-of-range values.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            chart: ChartConfig {
                size: lookup("SEATMAP_CHART_SIZE")
                    .and_then(|s| s.trim().parse().ok())
                    .unwrap_or(defaults.chart.size),
                occupancy: lookup("SEATMAP_OCCUPANCY")
                    .and_then(|s| s.trim().parse().ok())
                    .unwrap_or(defaults.chart.occupancy),
            },
            selection: SelectionConfig {
                revalidate_on_gender_change: lookup("SEATMAP_REVALIDATE_ON_GENDER_CHANGE")
                    .and_then(|s| parse_flag(&s))
                    .unwrap_or(defaults.selection.revalidate_on_gender_change),
                feedback_limit: lookup("SEATMAP_FEEDBACK_LIMIT")
                    .and_then(|s| s.trim().parse().ok())
                    .unwrap_or(defaults.selection.feedback_limit),
            },
            seed: lookup("SEATMAP_SEED").and_then(|s| s.trim().parse().ok()),
        }
    }

    /// Reject values that would make the session unusable
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first offending variable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chart.size == 0 {
            return Err(ConfigError {
                key: "SEATMAP_CHART_SIZE",
                value: self.chart.size.to_string(),
                reason: "a bus needs at least one seat",
            });
        }
        if !(0.0..=1.0).contains(&self.chart.occupancy) {
            return Err(ConfigError {
                key: "SEATMAP_OCCUPANCY",
                value: self.chart.occupancy.to_string(),
                reason: "must be a probability within [0, 1]",
            });
        }
        if self.selection.feedback_limit == 0 {
            return Err(ConfigError {
                key: "SEATMAP_FEEDBACK_LIMIT",
                value: self.selection.feedback_limit.to_string(),
                reason: "must allow at least one dispatched action",
            });
        }
        Ok(())
    }

    /// Bus layout for new charts
    #[must_use]
    pub const fn chart_layout(&self) -> BusLayout {
        BusLayout::new(self.chart.size)
    }

    /// Gender-change behaviour for the selection reducer
    #[must_use]
    pub const fn revalidation_policy(&self) -> RevalidationPolicy {
        if self.selection.revalidate_on_gender_change {
            RevalidationPolicy::Revalidate
        } else {
            RevalidationPolicy::Keep
        }
    }

    /// Random source: seeded when `SEATMAP_SEED` is set
    #[must_use]
    pub fn random_source(&self) -> Box<dyn RandomSource> {
        match self.seed {
            Some(seed) => Box::new(StdRandom::seeded(seed)),
            None => Box::new(StdRandom::from_entropy()),
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
