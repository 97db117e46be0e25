//! Profile settings form.

use thiserror::Error;
use tracing::info;

use crate::api::{ProfileUpdate, UserProfile};
use crate::auth::{AuthError, AuthSession};

pub const PROFILE_UPDATED: &str = "Profile updated successfully!";
pub const PROFILE_UPDATE_FAILED: &str = "Failed to update profile.";

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("{field} must be a whole number, got {value:?}")]
    InvalidNumber { field: &'static str, value: String },
    #[error("Nothing to update")]
    Empty,
    #[error("{PROFILE_UPDATE_FAILED} {0}")]
    Auth(#[from] AuthError),
}

/// Editable settings fields as text, the way a form holds them.
///
/// The email is shown but never sent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProfileForm {
    pub full_name: String,
    pub email: String,
    pub height: String,
    pub weight: String,
    pub personal_best: String,
}

impl ProfileForm {
    pub fn from_profile(profile: &UserProfile) -> Self {
        Self {
            full_name: profile.full_name.clone().unwrap_or_default(),
            email: profile.email.clone(),
            height: profile.height.map(|v| v.to_string()).unwrap_or_default(),
            weight: profile.weight.map(|v| v.to_string()).unwrap_or_default(),
            personal_best: profile.personal_best.clone().unwrap_or_default(),
        }
    }

    /// Fields that differ from `current`; blank numbers are left unset.
    pub fn changes_from(&self, current: &UserProfile) -> Result<ProfileUpdate, ProfileError> {
        let height = parse_whole("height", &self.height)?;
        let weight = parse_whole("weight", &self.weight)?;
        let full_name = changed_text(&self.full_name, current.full_name.as_deref());
        let personal_best = changed_text(&self.personal_best, current.personal_best.as_deref());
        Ok(ProfileUpdate {
            full_name,
            height: height.filter(|v| Some(*v) != current.height),
            weight: weight.filter(|v| Some(*v) != current.weight),
            personal_best,
            ..ProfileUpdate::default()
        })
    }
}

fn changed_text(edited: &str, current: Option<&str>) -> Option<String> {
    let edited = edited.trim();
    (!edited.is_empty() && Some(edited) != current).then(|| edited.to_string())
}

fn parse_whole(field: &'static str, raw: &str) -> Result<Option<i64>, ProfileError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<i64>()
        .map(Some)
        .map_err(|_| ProfileError::InvalidNumber {
            field,
            value: raw.to_string(),
        })
}

/// Send `update` and make the returned profile the session identity.
pub fn update_profile(
    session: &mut AuthSession,
    update: &ProfileUpdate,
) -> Result<UserProfile, ProfileError> {
    session.require_identity()?;
    if update.is_empty() {
        return Err(ProfileError::Empty);
    }
    let profile = session.api().update_me(update).map_err(AuthError::from)?;
    info!(user = profile.id, "Profile updated");
    session.replace_identity(profile.clone());
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiClient, Role};
    use crate::auth::TokenStore;
    use crate::config::ServerSettings;

    fn current() -> UserProfile {
        UserProfile {
            id: 2,
            email: "runner@ssts.dev".into(),
            full_name: Some("Runner".into()),
            role: Role::Athlete,
            is_active: true,
            height: Some(175),
            weight: None,
            personal_best: Some("10.90s".into()),
        }
    }

    #[test]
    fn form_round_trips_profile_fields() {
        let form = ProfileForm::from_profile(&current());
        assert_eq!(form.height, "175");
        assert_eq!(form.weight, "");
        assert!(form.changes_from(&current()).unwrap().is_empty());
    }

    #[test]
    fn only_changed_fields_are_sent() {
        let mut form = ProfileForm::from_profile(&current());
        form.weight = " 68 ".into();
        form.personal_best = "10.85s".into();
        form.email = "changed@ssts.dev".into();
        let update = form.changes_from(&current()).unwrap();
        assert_eq!(update.weight, Some(68));
        assert_eq!(update.personal_best.as_deref(), Some("10.85s"));
        assert_eq!(update.email, None);
        assert_eq!(update.height, None);
    }

    #[test]
    fn rejects_non_numeric_height() {
        let mut form = ProfileForm::from_profile(&current());
        form.height = "tall".into();
        let err = form.changes_from(&current()).unwrap_err();
        assert!(matches!(err, ProfileError::InvalidNumber { field: "height", .. }));
    }

    #[test]
    fn update_requires_login() {
        let dir = tempfile::tempdir().unwrap();
        let api = ApiClient::new(&ServerSettings {
            origin: "http://127.0.0.1:9".into(),
            api_prefix: "/api/v1".into(),
        });
        let mut session = AuthSession::new(api, TokenStore::file_only(dir.path()).unwrap());
        let update = ProfileUpdate {
            weight: Some(70),
            ..ProfileUpdate::default()
        };
        let err = update_profile(&mut session, &update).unwrap_err();
        assert!(matches!(err, ProfileError::Auth(AuthError::NotAuthenticated)));
    }
}
