//! Coach roster and management overview.
//!
//! The coach page and the management overview both need two independent
//! requests; they run side by side on scoped threads.

use std::thread;

use crate::api::{ApiClient, ApiError, OrganizationSummary, RecentSession, UserProfile};
use crate::shell::Route;
use crate::widgets::ScoreBand;
use crate::widgets::format::{fixed, number, parse_timestamp, session_date};

pub const NO_ATHLETES: &str = "No athletes found. Invite them to register!";
pub const NO_RECENT_SESSIONS: &str = "No recent sessions recorded.";

/// Headline counter on the management overview.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KpiCard {
    pub title: &'static str,
    pub value: String,
}

pub fn kpi_cards(summary: &OrganizationSummary) -> Vec<KpiCard> {
    vec![
        KpiCard {
            title: "Total Athletes",
            value: summary.total_athletes.to_string(),
        },
        KpiCard {
            title: "Total Sessions",
            value: summary.total_sessions.to_string(),
        },
        KpiCard {
            title: "Avg Technique Score",
            value: number(summary.avg_system_score),
        },
        KpiCard {
            title: "Active Today",
            value: summary.active_today.to_string(),
        },
    ]
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AthleteRow {
    pub initial: String,
    pub name: String,
    pub email: String,
    pub status: &'static str,
    /// Where "View details" leads.
    pub history_path: String,
}

impl AthleteRow {
    pub fn from_profile(profile: &UserProfile) -> Self {
        let name = profile.display_name().to_string();
        Self {
            initial: name.chars().next().map(String::from).unwrap_or_default(),
            email: profile.email.clone(),
            status: if profile.is_active { "Active" } else { "Inactive" },
            history_path: history_path(profile.id),
            name,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RecentRow {
    pub date: String,
    pub time: String,
    pub athlete: String,
    pub score: String,
    pub band: ScoreBand,
    pub duration: String,
    pub history_path: String,
}

impl RecentRow {
    pub fn from_session(session: &RecentSession) -> Self {
        let time = parse_timestamp(&session.created_at)
            .map(|stamp| format!("{:02}:{:02}", stamp.hour(), stamp.minute()))
            .unwrap_or_default();
        Self {
            date: session_date(&session.created_at),
            time,
            athlete: session
                .athlete_name
                .clone()
                .unwrap_or_else(|| format!("Athlete #{}", session.athlete_id)),
            score: fixed(session.technique_score, 1),
            band: ScoreBand::for_score(session.technique_score),
            duration: format!("{}s", fixed(session.duration_seconds, 1)),
            history_path: history_path(session.athlete_id),
        }
    }
}

fn history_path(user_id: i64) -> String {
    Route::History {
        user_id: Some(user_id),
    }
    .path()
}

/// Data behind the coach dashboard.
#[derive(Clone, Debug, PartialEq)]
pub struct CoachOverview {
    pub athletes: Vec<UserProfile>,
    pub recent: Vec<RecentSession>,
}

impl CoachOverview {
    pub fn load(api: &ApiClient) -> Result<Self, ApiError> {
        let (athletes, recent) = fetch_both(|| api.athletes(), || api.recent_sessions());
        Ok(Self {
            athletes: athletes?,
            recent: recent?,
        })
    }

    pub fn athlete_rows(&self) -> Vec<AthleteRow> {
        self.athletes.iter().map(AthleteRow::from_profile).collect()
    }

    pub fn recent_rows(&self) -> Vec<RecentRow> {
        self.recent.iter().map(RecentRow::from_session).collect()
    }

    /// Badge next to the roster heading.
    pub fn registered_label(&self) -> String {
        format!("{} Registered", self.athletes.len())
    }
}

/// Data behind the management overview.
#[derive(Clone, Debug, PartialEq)]
pub struct ManagementOverview {
    pub summary: OrganizationSummary,
    pub recent: Vec<RecentSession>,
}

impl ManagementOverview {
    pub fn load(api: &ApiClient) -> Result<Self, ApiError> {
        let (summary, recent) =
            fetch_both(|| api.organization_summary(), || api.recent_sessions());
        Ok(Self {
            summary: summary?,
            recent: recent?,
        })
    }

    pub fn cards(&self) -> Vec<KpiCard> {
        kpi_cards(&self.summary)
    }

    pub fn recent_rows(&self) -> Vec<RecentRow> {
        self.recent.iter().map(RecentRow::from_session).collect()
    }
}

fn fetch_both<A, B, FA, FB>(first: FA, second: FB) -> (Result<A, ApiError>, Result<B, ApiError>)
where
    A: Send,
    FA: FnOnce() -> Result<A, ApiError> + Send,
    FB: FnOnce() -> Result<B, ApiError>,
{
    thread::scope(|scope| {
        let handle = scope.spawn(first);
        let second = second();
        let first = handle
            .join()
            .unwrap_or_else(|_| Err(ApiError::Transport("request thread panicked".into())));
        (first, second)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Role;

    fn profile(id: i64, name: Option<&str>, active: bool) -> UserProfile {
        UserProfile {
            id,
            email: format!("athlete{id}@ssts.dev"),
            full_name: name.map(str::to_string),
            role: Role::Athlete,
            is_active: active,
            height: None,
            weight: None,
            personal_best: None,
        }
    }

    #[test]
    fn kpi_cards_follow_overview_order() {
        let summary = OrganizationSummary {
            total_athletes: 12,
            total_sessions: 140,
            avg_system_score: 76.42,
            active_today: 3,
        };
        let cards = kpi_cards(&summary);
        let titles: Vec<&str> = cards.iter().map(|card| card.title).collect();
        assert_eq!(
            titles,
            vec!["Total Athletes", "Total Sessions", "Avg Technique Score", "Active Today"]
        );
        assert_eq!(cards[2].value, "76.42");
    }

    #[test]
    fn athlete_rows_link_to_history() {
        let overview = CoachOverview {
            athletes: vec![profile(5, Some("Sprinter One"), true), profile(6, None, false)],
            recent: Vec::new(),
        };
        let rows = overview.athlete_rows();
        assert_eq!(rows[0].initial, "S");
        assert_eq!(rows[0].status, "Active");
        assert_eq!(rows[0].history_path, "/history?userId=5");
        assert_eq!(rows[1].name, "athlete6@ssts.dev");
        assert_eq!(rows[1].status, "Inactive");
        assert_eq!(overview.registered_label(), "2 Registered");
    }

    #[test]
    fn recent_rows_split_date_and_time() {
        let session = RecentSession {
            id: 1,
            created_at: "2026-10-19T06:45:10".into(),
            technique_score: 59.96,
            duration_seconds: 12.0,
            athlete_name: None,
            athlete_id: 9,
        };
        let row = RecentRow::from_session(&session);
        assert_eq!(row.date, "10/19/2026");
        assert_eq!(row.time, "06:45");
        assert_eq!(row.athlete, "Athlete #9");
        assert_eq!(row.score, "60.0");
        assert_eq!(row.band, ScoreBand::Low);
        assert_eq!(row.duration, "12.0s");
        assert_eq!(row.history_path, "/history?userId=9");
    }

    #[test]
    fn fetch_both_returns_each_result() {
        let (first, second) = fetch_both(
            || Ok::<_, ApiError>(1),
            || Err::<u8, _>(ApiError::Forbidden("nope".into())),
        );
        assert_eq!(first.unwrap(), 1);
        assert!(matches!(second, Err(ApiError::Forbidden(_))));
    }
}
