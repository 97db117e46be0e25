//! Plain-text rendering of the view models for the terminal.

use crate::api::UserProfile;
use crate::history::{EMPTY_CHART, EMPTY_HISTORY, HistoryView};
use crate::organization::{
    CoachOverview, ManagementOverview, NO_ATHLETES, NO_RECENT_SESSIONS, RecentRow,
};
use crate::shell::{NavAction, nav_items};
use crate::stats::Sentiment;
use crate::widgets::DashboardView;
use crate::widgets::format::number;

pub fn identity(profile: &UserProfile) -> Vec<String> {
    let mut lines = vec![
        format!("{} <{}>", profile.display_name(), profile.email),
        format!("Role: {}", profile.role.label()),
    ];
    if let Some(height) = profile.height {
        lines.push(format!("Height: {height} cm"));
    }
    if let Some(weight) = profile.weight {
        lines.push(format!("Weight: {weight} kg"));
    }
    if let Some(best) = profile.personal_best.as_deref().filter(|pb| !pb.is_empty()) {
        lines.push(format!("Personal Best (100m): {best}"));
    }
    let nav: Vec<String> = nav_items(profile.role)
        .into_iter()
        .map(|item| match item.action {
            NavAction::Navigate => format!("{} ({})", item.label, item.path),
            NavAction::Logout => item.label.to_string(),
        })
        .collect();
    lines.push(format!("Menu: {}", nav.join(" | ")));
    lines
}

fn sentiment_tag(sentiment: Sentiment) -> &'static str {
    match sentiment {
        Sentiment::Success => "[ok]",
        Sentiment::Warning => "[!!]",
        Sentiment::Error => "[xx]",
        Sentiment::Neutral => "[--]",
    }
}

/// Full dashboard frame.
pub fn dashboard(view: &DashboardView) -> Vec<String> {
    let mut lines = Vec::new();
    let buttons: Vec<String> = view
        .control_bar
        .buttons
        .iter()
        .map(|button| {
            if button.loading {
                format!("{}...", button.label())
            } else {
                button.label().to_string()
            }
        })
        .collect();
    lines.push(format!(
        "[{}] {}",
        view.control_bar.status.label(),
        buttons.join(" / ")
    ));
    if let Some(url) = &view.stream_url {
        lines.push(format!("Stream: {url}"));
    }
    lines.push(format!(
        "Technique score: {} ({:?})",
        number(view.gauge.score),
        view.gauge.band
    ));
    let metrics: Vec<String> = view
        .metrics
        .iter()
        .map(|card| {
            if card.unit.is_empty() {
                format!("{}: {}", card.label, card.value)
            } else {
                format!("{}: {} {}", card.label, card.value, card.unit)
            }
        })
        .collect();
    lines.push(metrics.join(" | "));
    lines.push(format!(
        "Timeline: {}%{}",
        number(view.timeline.progress_percent),
        if view.timeline.markers.is_empty() {
            String::new()
        } else {
            format!(", {} warning marker(s)", view.timeline.markers.len())
        }
    ));
    if view.chart.has_data() {
        for series in &view.chart.series {
            lines.push(format!("{:<8} {}", series.label, series.sparkline()));
        }
    }
    if let Some(skeleton) = &view.skeleton {
        lines.push(format!(
            "3D pose: {} joints, {} bones",
            skeleton.joints.len(),
            skeleton.bones.len()
        ));
    }
    if view.drawing_enabled {
        lines.push("Drawing enabled".to_string());
    }
    lines.push(format!("AI Coach ({})", view.feedback.count()));
    for item in &view.feedback.items {
        lines.push(format!("  {} {}", sentiment_tag(item.sentiment), item.text));
    }
    if let Some(toast) = &view.toast {
        lines.push(format!("{}: {}", toast.kind.title(), toast.message));
    }
    lines
}

/// History table followed by the progress chart series.
pub fn history(view: &HistoryView) -> Vec<String> {
    let rows = view.rows();
    if rows.is_empty() {
        return vec![EMPTY_HISTORY.to_string(), EMPTY_CHART.to_string()];
    }
    let mut lines = vec![format!(
        "{:>5}  {:<20} {:>6} {:>9} {:>7} {:>7} {:>8}  {}",
        "ID", "Date", "Score", "Cadence", "Stride", "GCT", "Duration", "Feedback"
    )];
    for row in rows {
        lines.push(format!(
            "{:>5}  {:<20} {:>6} {:>9} {:>7} {:>7} {:>8}  {}",
            row.id,
            row.date,
            row.score,
            row.cadence,
            row.stride,
            row.gct,
            row.duration,
            row.feedback.label()
        ));
    }
    let chart = view.chart();
    lines.push(String::new());
    lines.push(chart.title.to_string());
    for series in &chart.series {
        let values: Vec<String> = series.values.iter().map(|v| number(*v)).collect();
        lines.push(format!("  {}: {}", series.label, values.join(" -> ")));
    }
    lines
}

pub fn coach(overview: &CoachOverview) -> Vec<String> {
    let mut lines = vec![format!("Active Athletes ({})", overview.registered_label())];
    let athletes = overview.athlete_rows();
    if athletes.is_empty() {
        lines.push(format!("  {NO_ATHLETES}"));
    }
    for row in athletes {
        lines.push(format!(
            "  {:<24} {:<28} {:<8} {}",
            row.name, row.email, row.status, row.history_path
        ));
    }
    lines.push(String::new());
    lines.push("Recent Sessions".to_string());
    lines.extend(recent(&overview.recent_rows(), NO_RECENT_SESSIONS));
    lines
}

pub fn management(overview: &ManagementOverview) -> Vec<String> {
    let mut lines = vec!["Organization Overview".to_string()];
    for card in overview.cards() {
        lines.push(format!("  {}: {}", card.title, card.value));
    }
    lines.push(String::new());
    lines.push("Global Recent Activity".to_string());
    lines.extend(recent(&overview.recent_rows(), "No recent sessions found."));
    lines
}

pub fn recent(rows: &[RecentRow], empty: &str) -> Vec<String> {
    if rows.is_empty() {
        return vec![format!("  {empty}")];
    }
    rows.iter()
        .map(|row| {
            format!(
                "  {:<10} {:<5} {:<24} {:>6} {:>7}  {}",
                row.date, row.time, row.athlete, row.score, row.duration, row.history_path
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{HistorySession, Role};

    fn profile(role: Role) -> UserProfile {
        UserProfile {
            id: 1,
            email: "coach@ssts.dev".into(),
            full_name: Some("Coach Carter".into()),
            role,
            is_active: true,
            height: Some(180),
            weight: None,
            personal_best: None,
        }
    }

    #[test]
    fn identity_lists_role_menu() {
        let lines = identity(&profile(Role::Coach));
        assert_eq!(lines[0], "Coach Carter <coach@ssts.dev>");
        assert_eq!(lines[1], "Role: Coach");
        assert_eq!(lines[2], "Height: 180 cm");
        let menu = lines.last().unwrap();
        assert!(menu.starts_with("Menu: Dashboard (/coach-dashboard)"));
        assert!(menu.ends_with("Logout"));
    }

    #[test]
    fn empty_history_shows_placeholders() {
        let view = HistoryView::from_sessions(Role::Athlete, None, Vec::new());
        assert_eq!(history(&view), vec![EMPTY_HISTORY, EMPTY_CHART]);
    }

    #[test]
    fn history_lists_rows_and_chart() {
        let session = HistorySession {
            id: 8,
            user_id: None,
            created_at: "2026-10-19T08:00:00".into(),
            duration_seconds: 20.0,
            technique_score: 90.0,
            avg_cadence: 180.0,
            avg_stride_length: 1.4,
            avg_gct: 190.0,
            max_swing_error: 0.0,
            max_hip_error: 0.0,
            video_path: None,
            coach_notes: None,
        };
        let view = HistoryView::from_sessions(Role::Athlete, None, vec![session]);
        let lines = history(&view);
        assert!(lines[1].contains("Oct 19, 2026, 08:00"));
        assert!(lines[1].ends_with("View Feedback"));
        assert!(lines.contains(&"Training Progress".to_string()));
        assert!(lines.contains(&"  Technique Score: 90".to_string()));
    }
}
