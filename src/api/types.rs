//! Request and response bodies of the backend REST API.

use serde::{Deserialize, Serialize};

/// Account role; decides landing page and navigation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Admin,
    Coach,
    #[default]
    Athlete,
    Management,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Coach => "coach",
            Self::Athlete => "athlete",
            Self::Management => "management",
        }
    }

    /// Display label used in reports ("Athlete", "Coach", ...).
    pub fn label(self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Coach => "Coach",
            Self::Athlete => "Athlete",
            Self::Management => "Management",
        }
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "admin" => Self::Admin,
            "coach" => Self::Coach,
            "management" => Self::Management,
            _ => Self::Athlete,
        }
    }
}

impl From<Role> for String {
    fn from(value: Role) -> Self {
        value.as_str().to_string()
    }
}

impl std::str::FromStr for Role {
    type Err = std::convert::Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(value.to_string()))
    }
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub(crate) access_token: String,
}

/// The signed-in account as returned by `/users/me`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Centimetres.
    #[serde(default)]
    pub height: Option<i64>,
    /// Kilograms.
    #[serde(default)]
    pub weight: Option<i64>,
    #[serde(default)]
    pub personal_best: Option<String>,
}

fn default_active() -> bool {
    true
}

impl UserProfile {
    /// Name shown in reports and headers.
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.email)
    }
}

/// Body of `POST /users/`.
#[derive(Clone, Debug, Serialize)]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// Body of `PUT /users/me`; unset fields are left unchanged.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personal_best: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct UploadResponse {
    pub(crate) filepath: String,
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct ExportCsvResponse {
    pub(crate) download_url: String,
}

/// Body of `POST /history/save`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionCreate {
    pub duration_seconds: f64,
    pub technique_score: f64,
    pub avg_cadence: f64,
    pub avg_stride_length: f64,
    pub avg_gct: f64,
    pub max_swing_error: f64,
    pub max_hip_error: f64,
    pub video_path: Option<String>,
}

/// A stored analysis session from `/history/`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistorySession {
    pub id: i64,
    #[serde(default)]
    pub user_id: Option<i64>,
    pub created_at: String,
    #[serde(default)]
    pub duration_seconds: f64,
    #[serde(default)]
    pub technique_score: f64,
    #[serde(default)]
    pub avg_cadence: f64,
    #[serde(default)]
    pub avg_stride_length: f64,
    #[serde(default)]
    pub avg_gct: f64,
    #[serde(default)]
    pub max_swing_error: f64,
    #[serde(default)]
    pub max_hip_error: f64,
    #[serde(default)]
    pub video_path: Option<String>,
    #[serde(default)]
    pub coach_notes: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub(crate) struct FeedbackUpdate<'a> {
    pub(crate) coach_notes: &'a str,
}

/// Organization-wide counters for the management overview.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrganizationSummary {
    pub total_athletes: u64,
    pub total_sessions: u64,
    pub avg_system_score: f64,
    pub active_today: u64,
}

/// A session row across all athletes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecentSession {
    pub id: i64,
    pub created_at: String,
    #[serde(default)]
    pub technique_score: f64,
    #[serde(default)]
    pub duration_seconds: f64,
    #[serde(default)]
    pub athlete_name: Option<String>,
    pub athlete_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_role_reads_as_athlete() {
        let profile: UserProfile =
            serde_json::from_str(r#"{"id": 1, "email": "a@b.c", "role": "scout"}"#).unwrap();
        assert_eq!(profile.role, Role::Athlete);
        assert!(profile.is_active);
    }

    #[test]
    fn role_serializes_lowercase() {
        let json = serde_json::to_string(&Role::Management).unwrap();
        assert_eq!(json, "\"management\"");
        let parsed: Role = serde_json::from_str("\"COACH\"").unwrap();
        assert_eq!(parsed, Role::Coach);
    }

    #[test]
    fn display_name_falls_back_to_email() {
        let mut profile: UserProfile = serde_json::from_str(
            r#"{"id": 3, "email": "runner@ssts.dev", "full_name": "  ", "role": "athlete"}"#,
        )
        .unwrap();
        assert_eq!(profile.display_name(), "runner@ssts.dev");
        profile.full_name = Some("Lalu Zohri".into());
        assert_eq!(profile.display_name(), "Lalu Zohri");
    }

    #[test]
    fn profile_update_skips_unset_fields() {
        let update = ProfileUpdate {
            weight: Some(64),
            ..ProfileUpdate::default()
        };
        assert_eq!(serde_json::to_string(&update).unwrap(), r#"{"weight":64}"#);
        assert!(ProfileUpdate::default().is_empty());
    }

    #[test]
    fn history_session_tolerates_missing_metrics() {
        let session: HistorySession =
            serde_json::from_str(r#"{"id": 9, "created_at": "2024-05-01T10:00:00"}"#).unwrap();
        assert_eq!(session.technique_score, 0.0);
        assert_eq!(session.coach_notes, None);
    }
}
