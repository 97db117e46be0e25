use crate::live::{StreamState, TimelineMarker};
use crate::stats::StatsSnapshot;

use super::format;

const DEFAULT_DURATION_SECONDS: f64 = 60.0;
const MARKER_MAX_PERCENT: f64 = 98.0;

#[derive(Clone, Debug, PartialEq)]
pub struct MarkerView {
    /// Horizontal position along the track, 0..=98.
    pub left_percent: f64,
    pub title: String,
}

/// Progress track with warning markers under the video.
#[derive(Clone, Debug, PartialEq)]
pub struct TimelineView {
    pub progress_percent: f64,
    pub markers: Vec<MarkerView>,
    /// Activity pulse while a session runs.
    pub pulse: bool,
}

impl TimelineView {
    pub fn build(
        snapshot: Option<&StatsSnapshot>,
        state: &StreamState,
        markers: &[TimelineMarker],
    ) -> Self {
        let reported = snapshot
            .and_then(|snapshot| snapshot.duration_seconds)
            .filter(|seconds| *seconds > 0.0);
        let duration = reported.unwrap_or(DEFAULT_DURATION_SECONDS);
        let current = reported.unwrap_or(0.0);
        let progress_percent = if duration > 0.0 {
            current / duration * 100.0
        } else {
            0.0
        };
        let markers = markers
            .iter()
            .enumerate()
            .map(|(index, marker)| {
                let position = if marker.timestamp_seconds != 0.0 {
                    marker.timestamp_seconds / duration * 100.0
                } else {
                    index as f64 * 15.0 + 10.0
                };
                MarkerView {
                    left_percent: position.min(MARKER_MAX_PERCENT),
                    title: format!(
                        "{} at {}s",
                        marker.kind.label(),
                        format::number(marker.timestamp_seconds)
                    ),
                }
            })
            .collect();
        Self {
            progress_percent,
            markers,
            pulse: state.is_streaming,
        }
    }
}
