//! Command-line flags of the `phase-cycler` binary.

use std::time::Duration;

use clap::{ArgAction, Parser};

use crate::config::CyclerConfig;
use crate::logging::LogFormat;

/// Cycle a red/green phase in the background and report every green.
#[derive(Parser, Debug)]
#[command(name = "phase-cycler", author, version, about)]
pub struct Cli {
    /// Shortest a phase may last, in milliseconds.
    #[arg(long, default_value_t = 4000, env = "PHASE_CYCLER_MIN_CYCLE_MS")]
    pub min_cycle_ms: u64,

    /// Longest a phase may last, in milliseconds.
    #[arg(long, default_value_t = 6000, env = "PHASE_CYCLER_MAX_CYCLE_MS")]
    pub max_cycle_ms: u64,

    /// Sleep between two checks of the elapsed time, in milliseconds.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    pub poll_ms: u64,

    /// Seed for the cycle-length generator (reproducible runs).
    #[arg(long, env = "PHASE_CYCLER_SEED")]
    pub seed: Option<u64>,

    /// Exit after observing this many greens. Runs forever when omitted.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub greens: Option<u64>,

    /// How often to log the current phase, in milliseconds.
    #[arg(long, default_value_t = 1000, value_parser = clap::value_parser!(u64).range(1..))]
    pub status_ms: u64,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Log output format.
    #[arg(long, value_enum, default_value_t = LogFormat::Human)]
    pub log_format: LogFormat,
}

impl Cli {
    /// The cycler config described by the flags. Not yet validated.
    pub fn config(&self) -> CyclerConfig {
        let config = CyclerConfig::default()
            .with_cycle_bounds(
                Duration::from_millis(self.min_cycle_ms),
                Duration::from_millis(self.max_cycle_ms),
            )
            .with_poll_interval(Duration::from_millis(self.poll_ms));
        match self.seed {
            Some(seed) => config.with_seed(seed),
            None => config,
        }
    }

    pub fn status_interval(&self) -> Duration {
        Duration::from_millis(self.status_ms)
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_match_default_config() {
        let cli = Cli::try_parse_from(["phase-cycler"]).unwrap();
        assert_eq!(cli.config(), CyclerConfig::default());
        assert_eq!(cli.greens, None);
        assert_eq!(cli.verbose, 0);
        assert_eq!(cli.log_format, LogFormat::Human);
        assert_eq!(cli.status_interval(), Duration::from_secs(1));
    }

    #[test]
    fn flags_flow_into_config() {
        let cli = Cli::try_parse_from([
            "phase-cycler",
            "--min-cycle-ms",
            "40",
            "--max-cycle-ms",
            "60",
            "--poll-ms",
            "2",
            "--seed",
            "5",
            "--greens",
            "3",
            "-vv",
            "--log-format",
            "json",
        ])
        .unwrap();
        let config = cli.config();
        assert_eq!(config.min_cycle, Duration::from_millis(40));
        assert_eq!(config.max_cycle, Duration::from_millis(60));
        assert_eq!(config.poll_interval, Duration::from_millis(2));
        assert_eq!(config.seed, Some(5));
        assert_eq!(cli.greens, Some(3));
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.log_format, LogFormat::Json);
    }

    #[test]
    fn zero_poll_is_rejected_by_the_parser() {
        assert!(Cli::try_parse_from(["phase-cycler", "--poll-ms", "0"]).is_err());
    }

    #[test]
    fn zero_greens_is_rejected_by_the_parser() {
        assert!(Cli::try_parse_from(["phase-cycler", "--greens", "0"]).is_err());
        let cli = Cli::try_parse_from(["phase-cycler", "--greens", "1"]).unwrap();
        assert_eq!(cli.greens, Some(1));
    }
}
