use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use atomic_wait::{wait, wake_all};
use channels::MessageChannel;

use crate::config::CyclerConfig;
use crate::error::{ConfigError, CyclerError};
use crate::phase::Phase;
use crate::timing::{CycleDuration, UniformCycle};

/// State shared between the cycler handle and its background thread.
struct Shared {
    transitions: MessageChannel<Phase>,
    // Bit 0: current phase.
    // Bits 1..: number of transitions so far, wrapping.
    // Packing both into one word means every transition changes the value,
    // which is what `wait`/`wake_all` key on.
    state: AtomicU32,
}

impl Shared {
    /// Flip the phase and wake everything parked on the state word.
    ///
    /// Only the background thread calls this, so a plain load and store is
    /// enough.
    fn advance(&self) -> (Phase, Phase) {
        let old = self.state.load(Ordering::Relaxed);
        let new = old.wrapping_add(2) ^ 1;
        self.state.store(new, Ordering::Release);
        wake_all(&self.state);
        (Phase::from_bit(old), Phase::from_bit(new))
    }
}

/// Owns a [`Phase`] and a background thread that toggles it at randomized
/// intervals.
///
/// Every transition is published on an internal [`MessageChannel`]. Callers
/// synchronise on transitions with [`wait_for_green`](Self::wait_for_green),
/// or read a possibly stale snapshot with
/// [`current_phase`](Self::current_phase).
///
/// The background thread runs for the rest of the process. Dropping the
/// cycler detaches it.
pub struct PhaseCycler {
    shared: Arc<Shared>,
    poll_interval: Duration,
    // Taken by the worker once it is running, so a failed spawn leaves it
    // in place for the next `start`.
    source: Arc<Mutex<Option<Box<dyn CycleDuration>>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl PhaseCycler {
    /// Cycler whose phase lengths are drawn uniformly from the config bounds.
    ///
    /// # Errors
    ///
    /// Returns [`CyclerError::Config`] if the config does not validate.
    pub fn new(config: CyclerConfig) -> Result<Self, CyclerError> {
        config.validate()?;
        Self::with_source(UniformCycle::from_config(&config), config.poll_interval)
    }

    /// Cycler with an injected cycle-length source, e.g. a
    /// [`FixedCycle`](crate::FixedCycle) for deterministic timing.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroPollInterval`] wrapped in
    /// [`CyclerError::Config`] for a zero `poll_interval`, which would make
    /// the background thread busy-spin.
    pub fn with_source(
        source: impl CycleDuration,
        poll_interval: Duration,
    ) -> Result<Self, CyclerError> {
        if poll_interval.is_zero() {
            return Err(ConfigError::ZeroPollInterval.into());
        }
        let source: Box<dyn CycleDuration> = Box::new(source);
        Ok(Self {
            shared: Arc::new(Shared {
                transitions: MessageChannel::new(),
                state: AtomicU32::new(Phase::Red.to_bit()),
            }),
            poll_interval,
            source: Arc::new(Mutex::new(Some(source))),
            worker: Mutex::new(None),
        })
    }

    /// Launch the background thread that cycles through the phases.
    ///
    /// # Errors
    ///
    /// [`CyclerError::AlreadyStarted`] once the thread is running, and
    /// [`CyclerError::Spawn`] if the OS refuses to create it. A failed spawn
    /// leaves the cycler as it was, so `start` can be retried.
    pub fn start(&self) -> Result<(), CyclerError> {
        self.start_on(thread::Builder::new().name("phase-cycler".into()))
    }

    fn start_on(&self, builder: thread::Builder) -> Result<(), CyclerError> {
        // Held across the spawn so concurrent `start` calls cannot both get
        // past the check.
        let mut worker = lock(&self.worker);
        if worker.is_some() {
            return Err(CyclerError::AlreadyStarted);
        }

        let shared = Arc::clone(&self.shared);
        let source_slot = Arc::clone(&self.source);
        let poll_interval = self.poll_interval;
        let handle = builder
            .spawn(move || {
                let Some(source) = lock(&source_slot).take() else {
                    return;
                };
                cycle_through_phases(&shared, source, poll_interval);
            })
            .map_err(CyclerError::Spawn)?;

        *worker = Some(handle);
        tracing::debug!(poll_ms = millis(poll_interval), "phase cycler started");
        Ok(())
    }

    pub fn is_started(&self) -> bool {
        lock(&self.worker).is_some()
    }

    /// Snapshot of the phase, without blocking.
    ///
    /// Can be stale by the time the caller looks at it. Fine for status
    /// output, not for synchronisation.
    pub fn current_phase(&self) -> Phase {
        Phase::from_bit(self.shared.state.load(Ordering::Acquire))
    }

    /// Transitions so far (wraps at `2^31`).
    pub fn transition_count(&self) -> u32 {
        self.shared.state.load(Ordering::Acquire) >> 1
    }

    /// The stream of published transitions.
    pub fn channel(&self) -> &MessageChannel<Phase> {
        &self.shared.transitions
    }

    /// Block until a `Green` transition is received from the channel.
    ///
    /// See [`wait_for`](Self::wait_for) for the single-observer caveat.
    pub fn wait_for_green(&self) {
        self.wait_for(Phase::Green);
    }

    /// Block, receiving transitions, until one equals `target`.
    ///
    /// Each received transition is consumed, including the ones that do not
    /// match. Only one thread should wait on a given cycler this way: a
    /// second waiter will take transitions the first never sees, and can
    /// swallow the very `target` the first was waiting for. Use
    /// [`wait_until`](Self::wait_until) when several threads need to watch
    /// the same cycler.
    pub fn wait_for(&self, target: Phase) {
        loop {
            let phase = self.shared.transitions.receive();
            if phase == target {
                return;
            }
            tracing::trace!(%phase, %target, "discarding transition");
        }
    }

    /// Block until the phase snapshot equals `target`, without touching the
    /// channel.
    ///
    /// Any number of threads may call this concurrently, alongside a
    /// [`wait_for`](Self::wait_for) caller. Returns immediately if the phase
    /// already equals `target`. A phase that lasts shorter than a waiter takes
    /// to wake up can go unnoticed.
    pub fn wait_until(&self, target: Phase) {
        loop {
            let word = self.shared.state.load(Ordering::Acquire);
            if Phase::from_bit(word) == target {
                return;
            }
            // Sleeps only while the word still equals `word`, so a transition
            // between the load and here is not missed.
            wait(&self.shared.state, word);
        }
    }
}

impl fmt::Debug for PhaseCycler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhaseCycler")
            .field("current_phase", &self.current_phase())
            .field("transition_count", &self.transition_count())
            .field("queued", &self.shared.transitions.len())
            .field("poll_interval", &self.poll_interval)
            .field("started", &self.is_started())
            .finish_non_exhaustive()
    }
}

/// Body of the background thread. Never returns.
///
/// A new target is drawn on every poll rather than once per phase, so the
/// phase flips as soon as the elapsed time reaches any draw.
fn cycle_through_phases(shared: &Shared, mut source: Box<dyn CycleDuration>, poll: Duration) {
    let mut stopwatch = Instant::now();
    loop {
        let elapsed = stopwatch.elapsed();
        let target = source.next_target();
        tracing::trace!(
            elapsed_ms = millis(elapsed),
            target_ms = millis(target),
            "time since last transition"
        );

        if elapsed >= target {
            let (from, to) = shared.advance();
            shared.transitions.send(to);
            tracing::debug!(%from, %to, elapsed_ms = millis(elapsed), "phase transition");
            stopwatch = Instant::now();
        }

        thread::sleep(poll);
    }
}

// Both guarded values stay consistent across a panic: they are only ever
// replaced wholesale.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
