//! Stats snapshots polled from the live analysis stream.
//!
//! The backend computes every metric; the client only reads the JSON and
//! classifies feedback messages by the marker glyph they start with.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

const SUCCESS_MARKER: &str = "✅";
const WARNING_MARKER: &str = "⚠";
const VARIATION_SELECTOR: char = '\u{FE0F}';
const ERROR_MARKER: &str = "❌";

/// One point-in-time read of `/stream/stats`.
///
/// Every numeric field is optional on the wire; a snapshot is always replaced
/// as a whole, never merged with an older one.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// Technique score, 0..=100.
    #[serde(default)]
    pub score: Option<f64>,
    /// Steps per minute.
    #[serde(default)]
    pub cadence: Option<f64>,
    #[serde(default)]
    pub step_count: Option<f64>,
    /// Metres.
    #[serde(default)]
    pub stride_length: Option<f64>,
    /// Ground-contact time in milliseconds.
    #[serde(default)]
    pub gct: Option<f64>,
    #[serde(default)]
    pub gct_status: Option<String>,
    #[serde(default)]
    pub duration_seconds: Option<f64>,
    #[serde(default)]
    pub symmetry: Option<Symmetry>,
    /// Error percentages keyed by name (`swing_mechanics`, `hip_stability`).
    #[serde(default)]
    pub errors: BTreeMap<String, f64>,
    #[serde(default)]
    pub feedback: Vec<String>,
    #[serde(default)]
    pub graph_data: GraphData,
    #[serde(default)]
    pub biomechanics: Biomechanics,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Symmetry {
    pub left: f64,
    pub right: f64,
}

/// Recent joint-angle history for the chart.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
    #[serde(default)]
    pub labels: Vec<serde_json::Value>,
    #[serde(default)]
    pub knee: Vec<f64>,
    #[serde(default)]
    pub hip: Vec<f64>,
}

impl GraphData {
    /// Labels rendered as display strings regardless of their JSON type.
    pub fn label_strings(&self) -> Vec<String> {
        self.labels
            .iter()
            .map(|label| match label {
                serde_json::Value::String(text) => text.clone(),
                other => other.to_string(),
            })
            .collect()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Biomechanics {
    #[serde(default)]
    pub arm_angle: Option<f64>,
    #[serde(default)]
    pub trunk_angle: Option<f64>,
    #[serde(default)]
    pub world_landmarks: Vec<Landmark>,
}

/// A pose landmark in metric world coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    #[serde(default)]
    pub visibility: Option<f64>,
}

/// Tone of a feedback message, taken from its marker glyph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sentiment {
    Success,
    Warning,
    Error,
    Neutral,
}

/// A feedback message split into tone and display text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedbackItem {
    pub sentiment: Sentiment,
    pub text: String,
}

/// Classify a raw feedback message by the markers it contains.
///
/// Warnings win over errors and errors over successes when a message
/// carries several markers.
pub fn classify(message: &str) -> Sentiment {
    if message.contains(WARNING_MARKER) {
        Sentiment::Warning
    } else if message.contains(ERROR_MARKER) {
        Sentiment::Error
    } else if message.contains(SUCCESS_MARKER) {
        Sentiment::Success
    } else {
        Sentiment::Neutral
    }
}

/// Remove marker glyphs and surrounding whitespace.
pub fn strip_markers(message: &str) -> String {
    message
        .replace(SUCCESS_MARKER, "")
        .replace(WARNING_MARKER, "")
        .replace(ERROR_MARKER, "")
        .replace(VARIATION_SELECTOR, "")
        .trim()
        .to_string()
}

impl StatsSnapshot {
    /// Feedback messages with their tone and display text.
    pub fn feedback_items(&self) -> Vec<FeedbackItem> {
        self.feedback
            .iter()
            .map(|message| FeedbackItem {
                sentiment: classify(message),
                text: strip_markers(message),
            })
            .collect()
    }

    /// Whether any feedback message is warning-tagged.
    pub fn has_warning(&self) -> bool {
        self.feedback
            .iter()
            .any(|message| classify(message) == Sentiment::Warning)
    }

    /// Named error percentage, `0` when the backend did not report it.
    pub fn error_percent(&self, name: &str) -> f64 {
        self.errors.get(name).copied().unwrap_or(0.0)
    }

    /// Names of the metrics a saved session needs that this snapshot lacks.
    pub fn missing_session_metrics(&self) -> Vec<&'static str> {
        [
            ("duration_seconds", self.duration_seconds),
            ("score", self.score),
            ("cadence", self.cadence),
            ("stride_length", self.stride_length),
            ("gct", self.gct),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| name)
        .collect()
    }
}
