//! Drives a [`PhaseCycler`]: one observer thread waits for greens while the
//! main thread logs the phase snapshot.

use std::process::ExitCode;
use std::sync::Arc;
use std::thread;

use clap::Parser;

use phase_cycler::cli::Cli;
use phase_cycler::logging::init_logging;
use phase_cycler::{CyclerError, PhaseCycler};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "phase cycler failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), CyclerError> {
    let cycler = Arc::new(PhaseCycler::new(cli.config())?);
    cycler.start()?;
    tracing::info!(phase = %cycler.current_phase(), "cycling started");

    // The only consumer of the transition channel.
    let observer = {
        let cycler = Arc::clone(&cycler);
        let limit = cli.greens;
        thread::Builder::new()
            .name("green-observer".into())
            .spawn(move || {
                let mut seen: u64 = 0;
                loop {
                    cycler.wait_for_green();
                    seen += 1;
                    tracing::info!(greens = seen, "green observed");
                    if limit.is_some_and(|limit| seen >= limit) {
                        break;
                    }
                }
            })
            .map_err(CyclerError::Spawn)?
    };

    let status_interval = cli.status_interval();
    while !observer.is_finished() {
        tracing::info!(
            phase = %cycler.current_phase(),
            transitions = cycler.transition_count(),
            "status"
        );
        thread::sleep(status_interval);
    }

    observer.join().map_err(|_| CyclerError::ObserverPanicked)
}
