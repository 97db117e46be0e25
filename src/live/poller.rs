//! Recurring stats poll bound to one streaming session.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

use tracing::trace;

use super::backend::LiveBackend;
use super::jobs::LiveMessage;

/// Handle to a running poll thread.
///
/// Dropping the handle cancels the timer: the flag is raised before the
/// stop channel closes, so a fetch that is already in flight never reports
/// back, and the sleeping thread wakes immediately.
pub(crate) struct PollTimer {
    generation: u64,
    cancelled: Arc<AtomicBool>,
    _stop: Sender<()>,
}

impl PollTimer {
    pub(crate) fn spawn<B: LiveBackend>(
        backend: Arc<B>,
        generation: u64,
        interval: Duration,
        tx: Sender<LiveMessage>,
    ) -> Self {
        let cancelled = Arc::new(AtomicBool::new(false));
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let flag = Arc::clone(&cancelled);
        thread::spawn(move || {
            loop {
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {}
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
                if flag.load(Ordering::Acquire) {
                    break;
                }
                let result = backend.stream_stats();
                if flag.load(Ordering::Acquire) {
                    trace!(generation, "Dropping poll result after cancel");
                    break;
                }
                if tx.send(LiveMessage::Stats { generation, result }).is_err() {
                    break;
                }
            }
            trace!(generation, "Poll thread exited");
        });
        Self {
            generation,
            cancelled,
            _stop: stop_tx,
        }
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }
}

impl Drop for PollTimer {
    fn drop(&mut self) {
        self.cancelled.store(true, Ordering::Release);
    }
}
