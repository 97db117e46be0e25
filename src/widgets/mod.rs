//! View models for the live dashboard.
//!
//! Every builder here is a pure function of the latest snapshot and the
//! stream state; none of them touch the network. The telestrator is the
//! one stateful piece and is owned by the controller.

mod chart;
mod control_bar;
mod feedback;
pub mod format;
mod gauge;
mod metrics;
mod skeleton;
pub mod telestrator;
mod timeline;

pub use chart::{JointChart, Series};
pub use control_bar::{ControlBarView, ControlButton, ControlKind};
pub use feedback::{FeedbackPanel, accent_color};
pub use gauge::{ScoreBand, ScoreGauge};
pub use metrics::{MetricCard, Tone, metric_cards};
pub use skeleton::{Joint, POSE_CONNECTIONS, SkeletonView};
pub use timeline::{MarkerView, TimelineView};

use crate::live::{LiveBackend, LiveController, Toast};

/// Everything the dashboard page draws for one frame.
#[derive(Clone, Debug)]
pub struct DashboardView {
    pub control_bar: ControlBarView,
    pub timeline: TimelineView,
    pub chart: JointChart,
    pub gauge: ScoreGauge,
    pub metrics: Vec<MetricCard>,
    pub feedback: FeedbackPanel,
    /// Present while the 3-D overlay is switched on.
    pub skeleton: Option<SkeletonView>,
    pub drawing_enabled: bool,
    pub stream_url: Option<String>,
    pub toast: Option<Toast>,
}

impl DashboardView {
    pub fn build<B: LiveBackend>(controller: &LiveController<B>) -> Self {
        let snapshot = controller.snapshot();
        let state = controller.state();
        Self {
            control_bar: ControlBarView::build(state, controller.is_uploading()),
            timeline: TimelineView::build(snapshot, state, controller.markers()),
            chart: JointChart::build(snapshot),
            gauge: ScoreGauge::build(snapshot),
            metrics: metric_cards(snapshot),
            feedback: FeedbackPanel::build(snapshot),
            skeleton: controller.show_3d().then(|| {
                SkeletonView::build(
                    snapshot
                        .map(|snapshot| snapshot.biomechanics.world_landmarks.as_slice())
                        .unwrap_or_default(),
                )
            }),
            drawing_enabled: controller.telestrator().is_active(),
            stream_url: controller.stream_url().map(str::to_string),
            toast: controller.toast().cloned(),
        }
    }
}
