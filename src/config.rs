use std::time::Duration;

use crate::error::ConfigError;

/// Timing parameters of a [`PhaseCycler`](crate::PhaseCycler).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CyclerConfig {
    /// Shortest a phase may last.
    pub min_cycle: Duration,
    /// Longest a phase may last.
    pub max_cycle: Duration,
    /// Sleep between two checks of the elapsed time.
    pub poll_interval: Duration,
    /// Fixed seed for the cycle-length generator; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for CyclerConfig {
    fn default() -> Self {
        Self {
            min_cycle: Duration::from_secs(4),
            max_cycle: Duration::from_secs(6),
            poll_interval: Duration::from_millis(1),
            seed: None,
        }
    }
}

impl CyclerConfig {
    #[must_use]
    pub fn with_cycle_bounds(mut self, min: Duration, max: Duration) -> Self {
        self.min_cycle = min;
        self.max_cycle = max;
        self
    }

    #[must_use]
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check the bounds are usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the bounds are inverted, the upper bound
    /// is zero, or the poll interval is zero (which would busy-spin).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_cycle > self.max_cycle {
            return Err(ConfigError::InvertedBounds {
                min: self.min_cycle,
                max: self.max_cycle,
            });
        }
        if self.max_cycle.is_zero() {
            return Err(ConfigError::ZeroCycle);
        }
        if self.poll_interval.is_zero() {
            return Err(ConfigError::ZeroPollInterval);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_four_to_six_seconds_polled_every_millisecond() {
        let config = CyclerConfig::default();
        assert_eq!(config.min_cycle, Duration::from_secs(4));
        assert_eq!(config.max_cycle, Duration::from_secs(6));
        assert_eq!(config.poll_interval, Duration::from_millis(1));
        assert_eq!(config.seed, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builder_methods_set_fields() {
        let config = CyclerConfig::default()
            .with_cycle_bounds(Duration::from_millis(10), Duration::from_millis(20))
            .with_poll_interval(Duration::from_micros(500))
            .with_seed(9);
        assert_eq!(config.min_cycle, Duration::from_millis(10));
        assert_eq!(config.max_cycle, Duration::from_millis(20));
        assert_eq!(config.poll_interval, Duration::from_micros(500));
        assert_eq!(config.seed, Some(9));
    }

    #[test]
    fn inverted_bounds_rejected() {
        let config = CyclerConfig::default()
            .with_cycle_bounds(Duration::from_secs(6), Duration::from_secs(4));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvertedBounds { .. })
        ));
    }

    #[test]
    fn zero_cycle_rejected() {
        let config = CyclerConfig::default().with_cycle_bounds(Duration::ZERO, Duration::ZERO);
        assert!(matches!(config.validate(), Err(ConfigError::ZeroCycle)));
    }

    #[test]
    fn zero_poll_rejected() {
        let config = CyclerConfig::default().with_poll_interval(Duration::ZERO);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroPollInterval)
        ));
    }

    #[test]
    fn equal_bounds_accepted() {
        let config = CyclerConfig::default()
            .with_cycle_bounds(Duration::from_secs(5), Duration::from_secs(5));
        assert!(config.validate().is_ok());
    }
}
