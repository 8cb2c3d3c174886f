//! A background thread that flips a red/green [`Phase`] at randomized
//! intervals and publishes every transition through a blocking
//! [`MessageChannel`](channels::MessageChannel).
//!
//! ```no_run
//! use phase_cycler::{CyclerConfig, PhaseCycler};
//!
//! let cycler = PhaseCycler::new(CyclerConfig::default())?;
//! cycler.start()?;
//! cycler.wait_for_green();
//! # Ok::<(), phase_cycler::CyclerError>(())
//! ```

pub mod cli;
pub mod config;
mod cycler;
pub mod error;
pub mod logging;
mod phase;
pub mod timing;

pub use channels::MessageChannel;
pub use config::CyclerConfig;
pub use cycler::PhaseCycler;
pub use error::{ConfigError, CyclerError};
pub use phase::Phase;
pub use timing::{CycleDuration, FixedCycle, UniformCycle};
