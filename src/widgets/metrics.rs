use crate::stats::StatsSnapshot;

use super::format;

/// Color cue of a metric card.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    Neutral,
    Good,
    Fair,
    Poor,
    Unknown,
}

impl Tone {
    /// Ground-contact status from the backend (`green`/`yellow`/`red`/`gray`,
    /// or the older `Good`/`Fair`).
    pub fn from_gct_status(status: Option<&str>) -> Self {
        match status.map(str::trim) {
            Some(status) if status.eq_ignore_ascii_case("green") || status == "Good" => Self::Good,
            Some(status) if status.eq_ignore_ascii_case("yellow") || status == "Fair" => Self::Fair,
            Some(status) if status.eq_ignore_ascii_case("red") => Self::Poor,
            _ => Self::Unknown,
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Self::Neutral => "#111827",
            Self::Good => "#059669",
            Self::Fair => "#D97706",
            Self::Poor => "#DC2626",
            Self::Unknown => "#9CA3AF",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MetricCard {
    pub label: &'static str,
    pub value: String,
    pub unit: &'static str,
    pub tone: Tone,
}

fn card(label: &'static str, value: Option<f64>, unit: &'static str) -> MetricCard {
    MetricCard {
        label,
        value: format::number(value.unwrap_or(0.0)),
        unit,
        tone: Tone::Neutral,
    }
}

/// Compact metric grid next to the video.
pub fn metric_cards(snapshot: Option<&StatsSnapshot>) -> Vec<MetricCard> {
    let get = |pick: fn(&StatsSnapshot) -> Option<f64>| snapshot.and_then(pick);
    let mut gct = card("GCT", get(|s| s.gct), "ms");
    gct.tone = Tone::from_gct_status(snapshot.and_then(|s| s.gct_status.as_deref()));
    let symmetry = snapshot
        .and_then(|s| s.symmetry)
        .map(|sym| {
            format!(
                "L {}% / R {}%",
                format::number(sym.left),
                format::number(sym.right)
            )
        })
        .unwrap_or_else(|| "L 50% / R 50%".to_string());
    vec![
        card("Cadence", get(|s| s.cadence), "spm"),
        gct,
        card("Stride", get(|s| s.stride_length), "m"),
        MetricCard {
            label: "Symmetry",
            value: symmetry,
            unit: "",
            tone: Tone::Neutral,
        },
        card("Steps", get(|s| s.step_count), ""),
        card("Duration", get(|s| s.duration_seconds), "s"),
        card("Arm Angle", get(|s| s.biomechanics.arm_angle), "°"),
        card("Trunk Angle", get(|s| s.biomechanics.trunk_angle), "°"),
    ]
}
