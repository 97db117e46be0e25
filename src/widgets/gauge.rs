use crate::stats::StatsSnapshot;

/// Quality band of a technique score.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScoreBand {
    Good,
    Fair,
    Low,
}

impl ScoreBand {
    pub fn for_score(score: f64) -> Self {
        if score >= 80.0 {
            Self::Good
        } else if score >= 60.0 {
            Self::Fair
        } else {
            Self::Low
        }
    }

    /// Gauge arc color on the dashboard.
    pub fn dashboard_color(self) -> &'static str {
        match self {
            Self::Good => "#10B981",
            Self::Fair => "#3B82F6",
            Self::Low => "#F59E0B",
        }
    }

    /// Score color in the PDF report.
    pub fn report_rgb(self) -> (u8, u8, u8) {
        match self {
            Self::Good => (37, 99, 235),
            Self::Fair => (245, 158, 11),
            Self::Low => (239, 68, 68),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoreGauge {
    pub score: f64,
    /// Filled share of the ring, 0..=100.
    pub fill_percent: f64,
    pub band: ScoreBand,
}

impl ScoreGauge {
    pub fn build(snapshot: Option<&StatsSnapshot>) -> Self {
        let score = snapshot.and_then(|snapshot| snapshot.score).unwrap_or(0.0);
        Self {
            score,
            fill_percent: score.clamp(0.0, 100.0),
            band: ScoreBand::for_score(score),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_edges() {
        assert_eq!(ScoreBand::for_score(59.9), ScoreBand::Low);
        assert_eq!(ScoreBand::for_score(60.0), ScoreBand::Fair);
        assert_eq!(ScoreBand::for_score(79.9), ScoreBand::Fair);
        assert_eq!(ScoreBand::for_score(80.0), ScoreBand::Good);
    }

    #[test]
    fn missing_score_reads_as_zero() {
        let gauge = ScoreGauge::build(None);
        assert_eq!(gauge.score, 0.0);
        assert_eq!(gauge.band, ScoreBand::Low);
        let over = StatsSnapshot {
            score: Some(140.0),
            ..StatsSnapshot::default()
        };
        assert_eq!(ScoreGauge::build(Some(&over)).fill_percent, 100.0);
    }
}
