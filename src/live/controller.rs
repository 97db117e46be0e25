//! Owner of one live analysis session.
//!
//! All state lives on the thread that owns the controller. Poll ticks,
//! uploads and stream control commands run on worker threads, so no action
//! waits on the network. Results come back over a channel that
//! [`LiveController::pump`] drains; nothing from a worker is applied until
//! then, and poll results from a cancelled timer are discarded there.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::api::{ApiError, SessionCreate, StreamCommand, UserProfile};
use crate::config::{LiveSettings, MissingMetricPolicy};
use crate::export;
use crate::stats::StatsSnapshot;
use crate::widgets::telestrator::Telestrator;

use super::backend::LiveBackend;
use super::jobs::{self, CommandQueue, LiveMessage, UploadResult};
use super::poller::PollTimer;
use super::source::{StartPlan, StreamSource};
use super::state::{Phase, StreamState};
use super::timeline::{Timeline, TimelineMarker};
use super::toast::{Toast, ToastKind, ToastSlot};

const MSG_UPLOAD_FAILED: &str = "Upload failed";
const MSG_NO_DATA: &str = "No data to save!";
const MSG_SAVED: &str = "Session Saved Successfully!";
const MSG_SAVE_FAILED: &str = "Save Failed";
const MSG_CSV_FAILED: &str = "Error exporting CSV";
const MSG_REPORT_FAILED: &str = "Error exporting report";

/// Live session controller, generic over the backend so tests can fake it.
pub struct LiveController<B: LiveBackend> {
    backend: Arc<B>,
    poll_interval: Duration,
    missing_metrics: MissingMetricPolicy,
    source: StreamSource,
    state: StreamState,
    stream_url: Option<String>,
    snapshot: Option<StatsSnapshot>,
    timeline: Timeline,
    toast: ToastSlot,
    telestrator: Telestrator,
    show_3d: bool,
    uploading: bool,
    poll: Option<PollTimer>,
    commands: Option<CommandQueue>,
    next_generation: u64,
    session_started: Option<Instant>,
    tx: Sender<LiveMessage>,
    rx: Receiver<LiveMessage>,
}

impl<B: LiveBackend> LiveController<B> {
    pub fn new(backend: Arc<B>, settings: &LiveSettings) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            backend,
            poll_interval: Duration::from_millis(settings.poll_interval_ms),
            missing_metrics: settings.missing_metrics,
            source: StreamSource::default(),
            state: StreamState::default(),
            stream_url: None,
            snapshot: None,
            timeline: Timeline::default(),
            toast: ToastSlot::new(Duration::from_millis(settings.toast_duration_ms)),
            telestrator: Telestrator::default(),
            show_3d: false,
            uploading: false,
            poll: None,
            commands: None,
            next_generation: 0,
            session_started: None,
            tx,
            rx,
        }
    }

    /// Choose the source for the next Start. Locked while a session runs.
    pub fn set_source(&mut self, source: StreamSource) -> bool {
        if self.state.is_streaming || self.uploading {
            debug!(uploading = self.uploading, "Source change ignored while a session runs");
            return false;
        }
        self.source = source;
        true
    }

    pub fn source(&self) -> &StreamSource {
        &self.source
    }

    pub fn state(&self) -> &StreamState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    /// URL of the image stream for the running session.
    pub fn stream_url(&self) -> Option<&str> {
        self.stream_url.as_deref()
    }

    /// Latest stats snapshot, kept after Stop until replaced.
    pub fn snapshot(&self) -> Option<&StatsSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn markers(&self) -> &[TimelineMarker] {
        self.timeline.markers()
    }

    pub fn toast(&self) -> Option<&Toast> {
        self.toast.visible_at(Instant::now())
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    /// Number of scheduled poll timers; `1` while a session runs, else `0`.
    pub fn active_poll_timers(&self) -> usize {
        usize::from(self.poll.is_some())
    }

    pub fn telestrator(&self) -> &Telestrator {
        &self.telestrator
    }

    pub fn telestrator_mut(&mut self) -> &mut Telestrator {
        &mut self.telestrator
    }

    pub fn show_3d(&self) -> bool {
        self.show_3d
    }

    pub fn toggle_drawing(&mut self) {
        self.telestrator.toggle();
    }

    pub fn toggle_3d(&mut self) {
        self.show_3d = !self.show_3d;
    }

    /// Start a session from the selected source.
    ///
    /// Cameras and URLs go live immediately without waiting for the backend;
    /// a file is uploaded first and the session begins when [`pump`] sees
    /// the upload finish.
    ///
    /// [`pump`]: Self::pump
    pub fn start(&mut self) {
        if self.uploading {
            debug!("Start ignored while an upload is running");
            return;
        }
        if self.state.is_streaming {
            debug!("Start ignored while streaming");
            return;
        }
        match self.source.plan() {
            StartPlan::Nothing => debug!(source = self.source.label(), "Nothing to start"),
            StartPlan::Immediate(descriptor) => self.begin_session(descriptor),
            StartPlan::Upload(path) => {
                self.uploading = true;
                jobs::spawn_upload(Arc::clone(&self.backend), path, self.tx.clone());
            }
        }
    }

    pub fn pause(&mut self) {
        if self.state.phase() != Phase::Streaming {
            return;
        }
        self.state.is_paused = true;
        self.send_command(StreamCommand::Pause);
    }

    pub fn resume(&mut self) {
        if self.state.phase() != Phase::Paused {
            return;
        }
        self.state.is_paused = false;
        self.send_command(StreamCommand::Resume);
    }

    /// Pause when live, resume when paused, nothing when idle.
    pub fn toggle_pause(&mut self) {
        match self.state.phase() {
            Phase::Streaming => self.pause(),
            Phase::Paused => self.resume(),
            Phase::Idle => {}
        }
    }

    /// Ask the backend to rewind the source; local state is unchanged.
    pub fn restart(&mut self) {
        if !self.state.is_streaming {
            return;
        }
        self.send_command(StreamCommand::Restart);
    }

    /// End the session. The poll timer is cancelled before the request goes
    /// out, so no snapshot is applied after this returns.
    pub fn stop(&mut self) {
        if !self.state.is_streaming {
            return;
        }
        self.poll = None;
        self.state.clear();
        self.stream_url = None;
        self.session_started = None;
        info!("Session stopped");
        self.send_command(StreamCommand::Stop);
    }

    /// Stop any session and wait for queued control commands to go out.
    ///
    /// For front ends about to exit; the wait is bounded by HTTP timeouts.
    pub fn shutdown(mut self) {
        self.stop();
        if let Some(commands) = self.commands.take() {
            commands.drain();
        }
    }

    /// Apply finished background work. Call once per UI frame.
    pub fn pump(&mut self) {
        loop {
            match self.rx.try_recv() {
                Ok(message) => self.handle_message(message),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        self.toast.prune(Instant::now());
    }

    /// Read one snapshot outside of a running session.
    ///
    /// While streaming the poll timer owns the snapshot and this does
    /// nothing. A failed read keeps the previous snapshot.
    pub fn refresh_snapshot(&mut self) -> bool {
        if self.state.is_streaming {
            return false;
        }
        match self.backend.stream_stats() {
            Ok(snapshot) => {
                self.snapshot = Some(snapshot);
                true
            }
            Err(err) => {
                warn!("Stats read failed: {err}");
                false
            }
        }
    }

    /// Store the current snapshot as a history session.
    ///
    /// Fails with a toast and no request when nothing has been fetched yet.
    pub fn save_session(&mut self) {
        let Some(snapshot) = self.snapshot.as_ref() else {
            self.notify(MSG_NO_DATA, ToastKind::Error);
            return;
        };
        let missing = snapshot.missing_session_metrics();
        if !missing.is_empty() {
            match self.missing_metrics {
                MissingMetricPolicy::Zero => {
                    warn!(fields = ?missing, "Saving session with missing metrics as 0");
                }
                MissingMetricPolicy::Reject => {
                    let message = format!("Missing metrics: {}", missing.join(", "));
                    self.notify(message, ToastKind::Error);
                    return;
                }
            }
        }
        let payload = session_payload(snapshot, self.video_path());
        match self.backend.save_session(&payload) {
            Ok(()) => {
                info!(score = payload.technique_score, "Session saved");
                self.notify(MSG_SAVED, ToastKind::Success);
            }
            Err(err) => {
                warn!("Save failed: {err}");
                self.notify(MSG_SAVE_FAILED, ToastKind::Error);
            }
        }
    }

    /// Ask the backend for a CSV export and return its absolute URL.
    pub fn export_csv(&mut self) -> Option<String> {
        match self.backend.export_csv() {
            Ok(download_url) => {
                let url = export::csv_download_url(self.backend.origin(), &download_url);
                debug!(%url, "CSV export ready");
                Some(url)
            }
            Err(err) => {
                warn!("CSV export failed: {err}");
                self.notify(MSG_CSV_FAILED, ToastKind::Error);
                None
            }
        }
    }

    /// Write the PDF report for the current snapshot into `out_dir`.
    pub fn export_report(
        &mut self,
        identity: Option<&UserProfile>,
        out_dir: &Path,
    ) -> Option<PathBuf> {
        match export::write_session_report(self.snapshot.as_ref(), identity, out_dir) {
            Ok(path) => {
                self.notify(format!("Report saved to {}", path.display()), ToastKind::Success);
                Some(path)
            }
            Err(err) => {
                warn!("Report export failed: {err}");
                self.notify(MSG_REPORT_FAILED, ToastKind::Error);
                None
            }
        }
    }

    fn begin_session(&mut self, descriptor: String) {
        self.poll = None;
        self.next_generation += 1;
        let generation = self.next_generation;
        self.stream_url = Some(self.backend.video_feed_url(&descriptor));
        info!(source = self.source.label(), %descriptor, generation, "Session started");
        self.state.begin(descriptor);
        self.timeline.reset();
        self.session_started = Some(Instant::now());
        self.poll = Some(PollTimer::spawn(
            Arc::clone(&self.backend),
            generation,
            self.poll_interval,
            self.tx.clone(),
        ));
    }

    fn handle_message(&mut self, message: LiveMessage) {
        match message {
            LiveMessage::Stats { generation, result } => self.apply_stats(generation, result),
            LiveMessage::Uploaded(upload) => self.finish_upload(upload),
        }
    }

    fn apply_stats(&mut self, generation: u64, result: Result<StatsSnapshot, ApiError>) {
        let current = self.poll.as_ref().map(PollTimer::generation);
        if current != Some(generation) {
            debug!(generation, ?current, "Discarding stale poll result");
            return;
        }
        match result {
            Ok(snapshot) => {
                let elapsed = self
                    .session_started
                    .map(|started| started.elapsed())
                    .unwrap_or_default();
                self.timeline.observe(&snapshot, elapsed);
                self.snapshot = Some(snapshot);
            }
            Err(err) => debug!("Stats poll failed: {err}"),
        }
    }

    fn finish_upload(&mut self, upload: UploadResult) {
        self.uploading = false;
        match upload.result {
            Ok(filepath) => {
                debug!(local = %upload.path.display(), remote = %filepath, "Upload finished");
                if self.state.is_streaming {
                    debug!("Upload finished after another session started; ignoring");
                    return;
                }
                self.begin_session(filepath);
            }
            Err(err) => {
                warn!(path = %upload.path.display(), "Upload failed: {err}");
                self.notify(MSG_UPLOAD_FAILED, ToastKind::Error);
            }
        }
    }

    fn send_command(&mut self, command: StreamCommand) {
        let backend = &self.backend;
        self.commands
            .get_or_insert_with(|| CommandQueue::spawn(Arc::clone(backend)))
            .send(command);
    }

    fn video_path(&self) -> Option<String> {
        if self.source.is_file() {
            self.stream_url.clone()
        } else {
            None
        }
    }

    fn notify(&mut self, message: impl Into<String>, kind: ToastKind) {
        self.toast.show(message, kind, Instant::now());
    }

    #[cfg(test)]
    pub(crate) fn inject(&self, message: LiveMessage) {
        let _ = self.tx.send(message);
    }

    #[cfg(test)]
    pub(crate) fn current_generation(&self) -> Option<u64> {
        self.poll.as_ref().map(PollTimer::generation)
    }
}

fn session_payload(snapshot: &StatsSnapshot, video_path: Option<String>) -> SessionCreate {
    SessionCreate {
        duration_seconds: snapshot.duration_seconds.unwrap_or(0.0),
        technique_score: snapshot.score.unwrap_or(0.0),
        avg_cadence: snapshot.cadence.unwrap_or(0.0),
        avg_stride_length: snapshot.stride_length.unwrap_or(0.0),
        avg_gct: snapshot.gct.unwrap_or(0.0),
        max_swing_error: snapshot.error_percent("swing_mechanics"),
        max_hip_error: snapshot.error_percent("hip_stability"),
        video_path,
    }
}
