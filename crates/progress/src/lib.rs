//! Simulated upload progress for yukifiles.
//!
//! A background thread emits a fixed number of progress steps with a fixed
//! delay between them. The run stops when its [`CancellationToken`] is
//! cancelled or when the [`UploadProgress`] handle is dropped:
//!
//! ```text
//! start ─→ Progress(1/n) ─→ … ─→ Progress(n/n) ─→ Completed
//!             ↑ cancel: nothing else is sent
//! ```

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use yukifiles_logger as logger;

/// Update sent by a running upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressUpdate {
    /// Step `step` of `total` finished.
    Progress { step: u32, total: u32, percent: u8 },
    /// All steps finished.
    Completed,
}

#[derive(Debug, Default)]
struct TokenState {
    cancelled: Mutex<bool>,
    wakeup: Condvar,
}

/// Shared cancellation flag. Cancelling wakes a sleeping worker immediately.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    state: Arc<TokenState>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel. Once this returns, the worker sends no further updates.
    pub fn cancel(&self) {
        let mut cancelled = self.lock();
        *cancelled = true;
        self.state.wakeup.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        *self.lock()
    }

    /// Sleep for `timeout` unless cancelled first. Returns true if cancelled.
    fn wait(&self, timeout: Duration) -> bool {
        let guard = self.lock();
        let (cancelled, _) = self
            .state
            .wakeup
            .wait_timeout_while(guard, timeout, |cancelled| !*cancelled)
            .unwrap_or_else(PoisonError::into_inner);
        *cancelled
    }

    /// Run `f` while holding the flag, unless already cancelled.
    fn run_unless_cancelled(&self, f: impl FnOnce()) -> bool {
        let cancelled = self.lock();
        if *cancelled {
            return false;
        }
        f();
        true
    }

    fn lock(&self) -> MutexGuard<'_, bool> {
        self.state
            .cancelled
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Handle to a running simulated upload.
#[derive(Debug)]
pub struct UploadProgress {
    token: CancellationToken,
    receiver: Receiver<ProgressUpdate>,
    worker: Option<JoinHandle<()>>,
}

impl UploadProgress {
    /// Start `steps` progress steps spaced `interval` apart.
    pub fn start(steps: u32, interval: Duration) -> Self {
        let token = CancellationToken::new();
        let (tx, receiver) = mpsc::channel();

        let worker_token = token.clone();
        let worker = thread::spawn(move || run(steps, interval, &worker_token, &tx));
        logger::debug(format!(
            "Upload progress started: {} steps every {} ms",
            steps,
            interval.as_millis()
        ));

        Self {
            token,
            receiver,
            worker: Some(worker),
        }
    }

    /// Token that cancels this run (can be handed to other owners).
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Wait up to `timeout` for the next update.
    ///
    /// Returns None on timeout or once the run is over and drained.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<ProgressUpdate> {
        self.receiver.recv_timeout(timeout).ok()
    }

    /// Iterate over updates until the run ends (completed or cancelled).
    pub fn updates(&self) -> impl Iterator<Item = ProgressUpdate> + '_ {
        self.receiver.iter()
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Cancel and wait for the worker to exit.
    pub fn cancel(&mut self) {
        self.token.cancel();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                logger::error("Upload progress worker panicked");
            }
        }
    }
}

impl Drop for UploadProgress {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn run(steps: u32, interval: Duration, token: &CancellationToken, tx: &Sender<ProgressUpdate>) {
    for step in 1..=steps {
        if token.wait(interval) {
            logger::info(format!("Upload cancelled at step {}/{}", step - 1, steps));
            return;
        }

        let update = ProgressUpdate::Progress {
            step,
            total: steps,
            percent: percent(step, steps),
        };
        if !token.run_unless_cancelled(|| {
            let _ = tx.send(update);
        }) {
            return;
        }
    }

    if token.run_unless_cancelled(|| {
        let _ = tx.send(ProgressUpdate::Completed);
    }) {
        logger::info("Upload completed");
    }
}

fn percent(step: u32, total: u32) -> u8 {
    if total == 0 {
        return 100;
    }
    (u64::from(step) * 100 / u64::from(total)) as u8
}
