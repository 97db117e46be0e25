use crate::stats::StatsSnapshot;

pub const KNEE_COLOR: &str = "#2563EB";
pub const HIP_COLOR: &str = "#EF4444";
pub const Y_MIN: f64 = 0.0;
pub const Y_MAX: f64 = 180.0;

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    pub label: &'static str,
    pub color: &'static str,
    pub values: Vec<f64>,
}

impl Series {
    /// One block glyph per value, scaled to the fixed 0..180 axis.
    pub fn sparkline(&self) -> String {
        self.values
            .iter()
            .map(|value| {
                let ratio = ((value - Y_MIN) / (Y_MAX - Y_MIN)).clamp(0.0, 1.0);
                let index = (ratio * (SPARK_LEVELS.len() - 1) as f64).round() as usize;
                SPARK_LEVELS[index]
            })
            .collect()
    }
}

/// Real-time knee and hip angle chart.
#[derive(Clone, Debug, PartialEq)]
pub struct JointChart {
    pub labels: Vec<String>,
    pub series: Vec<Series>,
}

impl JointChart {
    pub fn build(snapshot: Option<&StatsSnapshot>) -> Self {
        let graph = snapshot.map(|snapshot| &snapshot.graph_data);
        Self {
            labels: graph.map(|graph| graph.label_strings()).unwrap_or_default(),
            series: vec![
                Series {
                    label: "R. Knee",
                    color: KNEE_COLOR,
                    values: graph.map(|graph| graph.knee.clone()).unwrap_or_default(),
                },
                Series {
                    label: "R. Hip",
                    color: HIP_COLOR,
                    values: graph.map(|graph| graph.hip.clone()).unwrap_or_default(),
                },
            ],
        }
    }

    /// A placeholder is shown instead of the chart until labels arrive.
    pub fn has_data(&self) -> bool {
        !self.labels.is_empty()
    }
}
