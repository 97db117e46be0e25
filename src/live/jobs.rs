use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};

use tracing::debug;

use crate::api::{ApiError, StreamCommand};
use crate::stats::StatsSnapshot;

use super::backend::LiveBackend;

/// Results delivered from background threads to the controller.
#[derive(Debug)]
pub(crate) enum LiveMessage {
    /// One poll tick; `generation` identifies the session that scheduled it.
    Stats {
        generation: u64,
        result: Result<StatsSnapshot, ApiError>,
    },
    Uploaded(UploadResult),
}

#[derive(Debug)]
pub(crate) struct UploadResult {
    pub(crate) path: PathBuf,
    pub(crate) result: Result<String, ApiError>,
}

/// Upload `path` on a worker thread. There is no abort; the job always
/// reports back.
pub(crate) fn spawn_upload<B: LiveBackend>(
    backend: Arc<B>,
    path: PathBuf,
    tx: Sender<LiveMessage>,
) {
    thread::spawn(move || {
        debug!(path = %path.display(), "Upload started");
        let result = backend.upload(&path);
        let _ = tx.send(LiveMessage::Uploaded(UploadResult { path, result }));
    });
}

/// Stream control commands, sent in order from one worker thread.
///
/// Callers never wait on the network; failures are logged and dropped.
pub(crate) struct CommandQueue {
    tx: Sender<StreamCommand>,
    worker: JoinHandle<()>,
}

impl CommandQueue {
    pub(crate) fn spawn<B: LiveBackend>(backend: Arc<B>) -> Self {
        let (tx, rx) = mpsc::channel::<StreamCommand>();
        let worker = thread::spawn(move || {
            for command in rx {
                match backend.stream_command(command) {
                    Ok(()) => debug!(path = command.path(), "Stream command sent"),
                    Err(err) => debug!(path = command.path(), "Stream command failed: {err}"),
                }
            }
        });
        Self { tx, worker }
    }

    pub(crate) fn send(&self, command: StreamCommand) {
        if self.tx.send(command).is_err() {
            debug!(path = command.path(), "Command worker gone; command dropped");
        }
    }

    /// Wait until every queued command has been sent.
    pub(crate) fn drain(self) {
        let Self { tx, worker } = self;
        drop(tx);
        if worker.join().is_err() {
            debug!("Command worker panicked");
        }
    }
}
