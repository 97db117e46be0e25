use crate::live::{Phase, StreamState};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlKind {
    Start,
    Pause,
    Resume,
    Restart,
    Stop,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ControlButton {
    pub kind: ControlKind,
    pub enabled: bool,
    /// Spinner instead of the icon.
    pub loading: bool,
}

impl ControlButton {
    fn ready(kind: ControlKind) -> Self {
        Self {
            kind,
            enabled: true,
            loading: false,
        }
    }

    pub fn label(&self) -> &'static str {
        match self.kind {
            ControlKind::Start => "Start Analysis",
            ControlKind::Pause => "Pause",
            ControlKind::Resume => "Resume",
            ControlKind::Restart => "Restart",
            ControlKind::Stop => "Stop",
        }
    }
}

/// Transport buttons and the status badge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ControlBarView {
    pub buttons: Vec<ControlButton>,
    pub status: Phase,
}

impl ControlBarView {
    pub fn build(state: &StreamState, uploading: bool) -> Self {
        let phase = state.phase();
        let buttons = match phase {
            Phase::Idle => vec![ControlButton {
                kind: ControlKind::Start,
                enabled: !uploading,
                loading: uploading,
            }],
            Phase::Streaming => vec![
                ControlButton::ready(ControlKind::Pause),
                ControlButton::ready(ControlKind::Restart),
                ControlButton::ready(ControlKind::Stop),
            ],
            Phase::Paused => vec![
                ControlButton::ready(ControlKind::Resume),
                ControlButton::ready(ControlKind::Restart),
                ControlButton::ready(ControlKind::Stop),
            ],
        };
        Self {
            buttons,
            status: phase,
        }
    }

    /// The red "Live" badge.
    pub fn is_live(&self) -> bool {
        self.status == Phase::Streaming
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(view: &ControlBarView) -> Vec<ControlKind> {
        view.buttons.iter().map(|button| button.kind).collect()
    }

    #[test]
    fn idle_shows_start_with_upload_spinner() {
        let view = ControlBarView::build(&StreamState::default(), true);
        assert_eq!(kinds(&view), vec![ControlKind::Start]);
        assert!(view.buttons[0].loading);
        assert!(!view.buttons[0].enabled);
        assert_eq!(view.status.label(), "Ready");
    }

    #[test]
    fn paused_shows_resume() {
        let state = StreamState {
            is_streaming: true,
            is_paused: true,
            source_descriptor: Some("0".into()),
        };
        let view = ControlBarView::build(&state, false);
        assert_eq!(
            kinds(&view),
            vec![ControlKind::Resume, ControlKind::Restart, ControlKind::Stop]
        );
        assert!(!view.is_live());
        assert_eq!(view.status.label(), "Paused");
    }
}
