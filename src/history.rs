//! Session history: table rows, progress chart and coach feedback.

use thiserror::Error;
use tracing::{info, warn};

use crate::api::{ApiClient, ApiError, HistorySession, Role};
use crate::widgets::ScoreBand;
use crate::widgets::format::{fixed, session_date, session_timestamp};

pub const EMPTY_HISTORY: &str = "No sessions found. Start training to see your history!";
pub const EMPTY_CHART: &str = "No session data available yet.";
pub const NO_FEEDBACK_YET: &str = "No feedback provided yet.";
pub const FEEDBACK_SAVE_FAILED: &str = "Failed to save feedback";

/// Calls the history page makes; [`ApiClient`] in production.
pub trait HistoryBackend {
    fn history(&self, user_id: Option<i64>) -> Result<Vec<HistorySession>, ApiError>;
    fn update_feedback(&self, session_id: i64, notes: &str) -> Result<(), ApiError>;
}

impl HistoryBackend for ApiClient {
    fn history(&self, user_id: Option<i64>) -> Result<Vec<HistorySession>, ApiError> {
        ApiClient::history(self, user_id)
    }

    fn update_feedback(&self, session_id: i64, notes: &str) -> Result<(), ApiError> {
        ApiClient::update_feedback(self, session_id, notes)
    }
}

#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("Only coaches can provide feedback")]
    NotCoach,
    #[error("Session {0} is not in this history")]
    UnknownSession(i64),
    #[error("{FEEDBACK_SAVE_FAILED}: {0}")]
    Api(#[from] ApiError),
}

/// What the feedback button of a row says.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeedbackButton {
    View,
    Edit,
    Give,
}

impl FeedbackButton {
    pub fn for_session(role: Role, session: &HistorySession) -> Self {
        if role == Role::Athlete {
            Self::View
        } else if has_notes(session) {
            Self::Edit
        } else {
            Self::Give
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::View => "View Feedback",
            Self::Edit => "Edit Feedback",
            Self::Give => "Give Feedback",
        }
    }
}

/// One display row of the history table.
#[derive(Clone, Debug, PartialEq)]
pub struct HistoryRow {
    pub id: i64,
    pub date: String,
    pub score: String,
    pub band: ScoreBand,
    pub cadence: String,
    pub stride: String,
    pub gct: String,
    pub duration: String,
    pub feedback: FeedbackButton,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    /// Score axis fixed to 0..=100.
    Score,
    /// Free-scaled cadence axis on the right.
    Cadence,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChartSeries {
    pub label: &'static str,
    pub color: &'static str,
    pub axis: Axis,
    pub values: Vec<f64>,
}

/// Training progress across sessions, oldest first.
#[derive(Clone, Debug, PartialEq)]
pub struct ProgressChart {
    pub title: &'static str,
    pub labels: Vec<String>,
    pub series: Vec<ChartSeries>,
}

impl ProgressChart {
    pub fn build(newest_first: &[HistorySession]) -> Self {
        let ordered: Vec<&HistorySession> = newest_first.iter().rev().collect();
        Self {
            title: "Training Progress",
            labels: ordered
                .iter()
                .map(|session| session_date(&session.created_at))
                .collect(),
            series: vec![
                ChartSeries {
                    label: "Technique Score",
                    color: "rgb(59, 130, 246)",
                    axis: Axis::Score,
                    values: ordered.iter().map(|s| s.technique_score).collect(),
                },
                ChartSeries {
                    label: "Avg Cadence",
                    color: "rgb(34, 197, 94)",
                    axis: Axis::Cadence,
                    values: ordered.iter().map(|s| s.avg_cadence).collect(),
                },
            ],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Loaded history of one athlete as the viewer sees it.
#[derive(Clone, Debug)]
pub struct HistoryView {
    viewer: Role,
    target_user: Option<i64>,
    sessions: Vec<HistorySession>,
}

impl HistoryView {
    /// Fetch sessions of `target_user`, or of the viewer when `None`.
    pub fn load(
        backend: &impl HistoryBackend,
        viewer: Role,
        target_user: Option<i64>,
    ) -> Result<Self, ApiError> {
        let sessions = backend.history(target_user)?;
        info!(count = sessions.len(), ?target_user, "History loaded");
        Ok(Self::from_sessions(viewer, target_user, sessions))
    }

    pub fn from_sessions(
        viewer: Role,
        target_user: Option<i64>,
        sessions: Vec<HistorySession>,
    ) -> Self {
        Self {
            viewer,
            target_user,
            sessions,
        }
    }

    pub fn sessions(&self) -> &[HistorySession] {
        &self.sessions
    }

    pub fn target_user(&self) -> Option<i64> {
        self.target_user
    }

    pub fn rows(&self) -> Vec<HistoryRow> {
        self.sessions
            .iter()
            .map(|session| HistoryRow {
                id: session.id,
                date: session_timestamp(&session.created_at),
                score: fixed(session.technique_score, 1),
                band: ScoreBand::for_score(session.technique_score),
                cadence: format!("{} spm", fixed(session.avg_cadence, 0)),
                stride: format!("{} m", fixed(session.avg_stride_length, 2)),
                gct: format!("{} ms", fixed(session.avg_gct, 0)),
                duration: format!("{}s", fixed(session.duration_seconds, 1)),
                feedback: FeedbackButton::for_session(self.viewer, session),
            })
            .collect()
    }

    pub fn chart(&self) -> ProgressChart {
        ProgressChart::build(&self.sessions)
    }

    pub fn can_edit_feedback(&self) -> bool {
        self.viewer == Role::Coach
    }

    /// Feedback text shown in the read-only dialog.
    pub fn feedback_text(&self, session_id: i64) -> Option<String> {
        let session = self.find(session_id)?;
        Some(match session.coach_notes.as_deref() {
            Some(notes) if !notes.is_empty() => format!("\"{notes}\""),
            _ => NO_FEEDBACK_YET.to_string(),
        })
    }

    /// Store coach notes for a session and mirror them into the local row.
    pub fn update_feedback(
        &mut self,
        backend: &impl HistoryBackend,
        session_id: i64,
        notes: &str,
    ) -> Result<(), FeedbackError> {
        if !self.can_edit_feedback() {
            return Err(FeedbackError::NotCoach);
        }
        if self.find(session_id).is_none() {
            return Err(FeedbackError::UnknownSession(session_id));
        }
        if let Err(err) = backend.update_feedback(session_id, notes) {
            warn!(session_id, "Feedback update failed: {err}");
            return Err(err.into());
        }
        if let Some(session) = self.sessions.iter_mut().find(|s| s.id == session_id) {
            session.coach_notes = Some(notes.to_string());
        }
        info!(session_id, "Feedback saved");
        Ok(())
    }

    fn find(&self, session_id: i64) -> Option<&HistorySession> {
        self.sessions.iter().find(|session| session.id == session_id)
    }
}

fn has_notes(session: &HistorySession) -> bool {
    session
        .coach_notes
        .as_deref()
        .is_some_and(|notes| !notes.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct FakeHistory {
        sessions: Vec<HistorySession>,
        fail_update: bool,
        updates: RefCell<Vec<(i64, String)>>,
        requested_user: RefCell<Option<Option<i64>>>,
    }

    impl HistoryBackend for FakeHistory {
        fn history(&self, user_id: Option<i64>) -> Result<Vec<HistorySession>, ApiError> {
            *self.requested_user.borrow_mut() = Some(user_id);
            Ok(self.sessions.clone())
        }

        fn update_feedback(&self, session_id: i64, notes: &str) -> Result<(), ApiError> {
            if self.fail_update {
                return Err(ApiError::Forbidden("Only coaches can provide feedback".into()));
            }
            self.updates.borrow_mut().push((session_id, notes.to_string()));
            Ok(())
        }
    }

    fn session(id: i64, created_at: &str, score: f64, notes: Option<&str>) -> HistorySession {
        HistorySession {
            id,
            user_id: Some(7),
            created_at: created_at.into(),
            duration_seconds: 30.04,
            technique_score: score,
            avg_cadence: 168.0 + id as f64,
            avg_stride_length: 1.2,
            avg_gct: 201.0,
            max_swing_error: 0.0,
            max_hip_error: 0.0,
            video_path: None,
            coach_notes: notes.map(str::to_string),
        }
    }

    fn backend() -> FakeHistory {
        FakeHistory {
            sessions: vec![
                session(3, "2026-10-18T09:00:00", 84.0, Some("Great arm drive")),
                session(2, "2026-10-11T09:00:00", 71.0, None),
                session(1, "2026-10-04T09:00:00", 55.0, Some("")),
            ],
            ..FakeHistory::default()
        }
    }

    #[test]
    fn load_passes_target_user() {
        let backend = backend();
        let view = HistoryView::load(&backend, Role::Coach, Some(7)).unwrap();
        assert_eq!(*backend.requested_user.borrow(), Some(Some(7)));
        assert_eq!(view.target_user(), Some(7));
        assert_eq!(view.sessions().len(), 3);
    }

    #[test]
    fn chart_runs_oldest_to_newest() {
        let view = HistoryView::load(&backend(), Role::Athlete, None).unwrap();
        let chart = view.chart();
        assert_eq!(chart.title, "Training Progress");
        assert_eq!(chart.labels, vec!["10/4/2026", "10/11/2026", "10/18/2026"]);
        assert_eq!(chart.series[0].values, vec![55.0, 71.0, 84.0]);
        assert_eq!(chart.series[1].label, "Avg Cadence");
        assert_eq!(chart.series[1].axis, Axis::Cadence);
        assert!(ProgressChart::build(&[]).is_empty());
    }

    #[test]
    fn rows_format_metrics_and_buttons() {
        let coach = HistoryView::load(&backend(), Role::Coach, Some(7)).unwrap();
        let rows = coach.rows();
        assert_eq!(rows[0].date, "Oct 18, 2026, 09:00");
        assert_eq!(rows[0].score, "84.0");
        assert_eq!(rows[0].band, ScoreBand::Good);
        assert_eq!(rows[0].cadence, "171 spm");
        assert_eq!(rows[0].stride, "1.20 m");
        assert_eq!(rows[0].duration, "30.0s");
        assert_eq!(rows[0].feedback.label(), "Edit Feedback");
        assert_eq!(rows[1].feedback.label(), "Give Feedback");
        assert_eq!(rows[2].feedback, FeedbackButton::Give);

        let athlete = HistoryView::load(&backend(), Role::Athlete, None).unwrap();
        assert!(athlete.rows().iter().all(|row| row.feedback == FeedbackButton::View));
    }

    #[test]
    fn feedback_text_quotes_notes() {
        let view = HistoryView::load(&backend(), Role::Athlete, None).unwrap();
        assert_eq!(view.feedback_text(3).as_deref(), Some("\"Great arm drive\""));
        assert_eq!(view.feedback_text(2).as_deref(), Some(NO_FEEDBACK_YET));
        assert_eq!(view.feedback_text(99), None);
    }

    #[test]
    fn coach_feedback_updates_local_row() {
        let backend = backend();
        let mut view = HistoryView::load(&backend, Role::Coach, Some(7)).unwrap();
        view.update_feedback(&backend, 2, "Lower the hips").unwrap();
        assert_eq!(
            backend.updates.borrow().as_slice(),
            &[(2, "Lower the hips".to_string())]
        );
        assert_eq!(view.sessions()[1].coach_notes.as_deref(), Some("Lower the hips"));
        assert_eq!(view.rows()[1].feedback, FeedbackButton::Edit);
    }

    #[test]
    fn non_coaches_cannot_edit_feedback() {
        let backend = backend();
        for role in [Role::Athlete, Role::Management, Role::Admin] {
            let mut view = HistoryView::load(&backend, role, None).unwrap();
            let err = view.update_feedback(&backend, 2, "note").unwrap_err();
            assert!(matches!(err, FeedbackError::NotCoach));
        }
        assert!(backend.updates.borrow().is_empty());
    }

    #[test]
    fn failed_update_leaves_row_untouched() {
        let backend = FakeHistory {
            fail_update: true,
            ..backend()
        };
        let mut view = HistoryView::load(&backend, Role::Coach, Some(7)).unwrap();
        let err = view.update_feedback(&backend, 2, "note").unwrap_err();
        assert!(err.to_string().starts_with(FEEDBACK_SAVE_FAILED));
        assert_eq!(view.sessions()[1].coach_notes, None);
        assert!(matches!(
            view.update_feedback(&backend, 42, "note"),
            Err(FeedbackError::UnknownSession(42))
        ));
    }
}
