//! Error types for the phase cycler.
//!
//! The channel itself never fails; everything here concerns setting a cycler
//! up and getting its threads running.

use std::io;
use std::time::Duration;

use thiserror::Error;

/// A [`CyclerConfig`](crate::CyclerConfig) that cannot drive a cycler.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("minimum cycle {min:?} is longer than maximum cycle {max:?}")]
    InvertedBounds { min: Duration, max: Duration },

    #[error("maximum cycle must be longer than zero")]
    ZeroCycle,

    #[error("poll interval must be longer than zero")]
    ZeroPollInterval,
}

#[derive(Debug, Error)]
pub enum CyclerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// `start` was called on a cycler whose task is already running.
    #[error("phase cycler already started")]
    AlreadyStarted,

    #[error("failed to spawn thread: {0}")]
    Spawn(#[source] io::Error),

    #[error("observer thread panicked")]
    ObserverPanicked,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_convert_transparently() {
        let err: CyclerError = ConfigError::ZeroPollInterval.into();
        assert!(matches!(err, CyclerError::Config(ConfigError::ZeroPollInterval)));
        assert_eq!(err.to_string(), "poll interval must be longer than zero");
    }

    #[test]
    fn spawn_error_keeps_source() {
        let err = CyclerError::Spawn(io::Error::other("no threads left"));
        assert_eq!(err.to_string(), "failed to spawn thread: no threads left");
        assert!(std::error::Error::source(&err).is_some());
    }
}
