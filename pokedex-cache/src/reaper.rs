//! Background reaper thread.

use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use tracing::{debug, warn};

use pokedex_core::constants::REAPER_THREAD_NAME;

use crate::cache::Shared;

/// Stop flag paired with a condvar so `stop` wakes a sleeping reaper at once.
#[derive(Default)]
struct StopSignal {
    stopped: Mutex<bool>,
    cvar: Condvar,
}

/// Handle to a running reaper thread.
pub(crate) struct Reaper {
    signal: Arc<StopSignal>,
    handle: JoinHandle<()>,
}

impl Reaper {
    /// Starts a thread that reaps `shared` once every `interval`.
    ///
    /// Returns `None` if the OS refuses the thread; the cache then never reaps.
    pub(crate) fn spawn(shared: Arc<Shared>, interval: Duration) -> Option<Self> {
        let signal = Arc::new(StopSignal::default());
        let thread_signal = Arc::clone(&signal);

        let spawned = thread::Builder::new()
            .name(REAPER_THREAD_NAME.into())
            .spawn(move || run(&shared, &thread_signal, interval));

        Self::adopt(signal, spawned)
    }

    fn adopt(signal: Arc<StopSignal>, spawned: io::Result<JoinHandle<()>>) -> Option<Self> {
        match spawned {
            Ok(handle) => Some(Self { signal, handle }),
            Err(e) => {
                warn!(error = %e, "Failed to spawn cache reaper; entries will not expire");
                None
            }
        }
    }

    /// Signals the thread to exit and joins it.
    pub(crate) fn stop(self) {
        *self.signal.stopped.lock() = true;
        self.signal.cvar.notify_all();

        if self.handle.join().is_err() {
            warn!("Cache reaper thread panicked");
        }
    }
}

/// Ticker loop: sleep until the next deadline, reap, repeat until stopped.
///
/// Ticks missed while a reap pass runs long are skipped, not replayed.
fn run(shared: &Shared, signal: &StopSignal, interval: Duration) {
    debug!(?interval, "Cache reaper started");

    let mut stopped = signal.stopped.lock();
    let mut deadline = Instant::now() + interval;

    while !*stopped {
        if !signal.cvar.wait_until(&mut stopped, deadline).timed_out() {
            continue;
        }
        if *stopped {
            break;
        }

        // Scan without holding the stop flag.
        parking_lot::MutexGuard::unlocked(&mut stopped, || {
            shared.reap(Instant::now());
        });

        let now = Instant::now();
        deadline += interval;
        if deadline <= now {
            deadline = now + interval;
        }
    }

    debug!("Cache reaper stopped");
}
