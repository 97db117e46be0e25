use std::time::Duration;

use crate::stats::StatsSnapshot;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkerKind {
    Warning,
}

impl MarkerKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Warning => "Warning",
        }
    }
}

/// A point on the session timeline where the backend raised a warning.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimelineMarker {
    /// Seconds into the session.
    pub timestamp_seconds: f64,
    pub kind: MarkerKind,
}

/// Append-only marker list for one streaming session.
#[derive(Clone, Debug, Default)]
pub struct Timeline {
    markers: Vec<TimelineMarker>,
}

impl Timeline {
    pub fn markers(&self) -> &[TimelineMarker] {
        &self.markers
    }

    /// Record one marker when `snapshot` carries a warning.
    ///
    /// The timestamp is the snapshot's `duration_seconds`; when the backend
    /// has not reported a positive duration yet, `elapsed` since the session
    /// began is used so the value stays in seconds-into-session.
    pub(super) fn observe(&mut self, snapshot: &StatsSnapshot, elapsed: Duration) -> bool {
        if !snapshot.has_warning() {
            return false;
        }
        let timestamp_seconds = snapshot
            .duration_seconds
            .filter(|seconds| *seconds > 0.0)
            .unwrap_or_else(|| elapsed.as_secs_f64());
        self.markers.push(TimelineMarker {
            timestamp_seconds,
            kind: MarkerKind::Warning,
        });
        true
    }

    pub(super) fn reset(&mut self) {
        self.markers.clear();
    }
}
