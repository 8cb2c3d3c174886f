//! Sources for the target length of a phase.
//!
//! The cycler asks its source for a fresh target on every poll, so a source
//! is sampled far more often than a transition happens.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::CyclerConfig;

/// Produces the duration a phase should last before it is toggled.
pub trait CycleDuration: Send + 'static {
    fn next_target(&mut self) -> Duration;
}

/// Durations drawn uniformly from an inclusive range.
#[derive(Debug, Clone)]
pub struct UniformCycle {
    min: Duration,
    max: Duration,
    rng: StdRng,
}

impl UniformCycle {
    /// Seeded from the operating system's entropy source.
    ///
    /// Panics:
    /// If `min` is longer than `max`
    pub fn new(min: Duration, max: Duration) -> Self {
        Self::with_rng(min, max, StdRng::from_entropy())
    }

    /// Reproducible sequence of targets for a given `seed`.
    ///
    /// Panics:
    /// If `min` is longer than `max`
    pub fn seeded(min: Duration, max: Duration, seed: u64) -> Self {
        Self::with_rng(min, max, StdRng::seed_from_u64(seed))
    }

    /// Build from an already validated config.
    pub fn from_config(config: &CyclerConfig) -> Self {
        match config.seed {
            Some(seed) => Self::seeded(config.min_cycle, config.max_cycle, seed),
            None => Self::new(config.min_cycle, config.max_cycle),
        }
    }

    fn with_rng(min: Duration, max: Duration, rng: StdRng) -> Self {
        assert!(min <= max, "cycle lower bound {min:?} exceeds upper bound {max:?}");
        Self { min, max, rng }
    }
}

impl CycleDuration for UniformCycle {
    fn next_target(&mut self) -> Duration {
        self.rng.gen_range(self.min..=self.max)
    }
}

/// Always the same target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedCycle(pub Duration);

impl CycleDuration for FixedCycle {
    fn next_target(&mut self) -> Duration {
        self.0
    }
}
