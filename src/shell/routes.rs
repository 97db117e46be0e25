//! URL path → page mapping with the authentication gate.

use crate::api::{Role, UserProfile};

/// Pages reachable by path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    Dashboard,
    CoachDashboard,
    /// `/history`, optionally for another athlete (`?userId=`).
    History { user_id: Option<i64> },
    Compare,
    ManagementDashboard,
    Settings,
    /// `/`; always redirects.
    Root,
    NotFound(String),
}

/// What the shell does for a requested path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    Render(Route),
    Redirect(String),
}

impl Route {
    /// Parse a path with optional query string.
    pub fn parse(path: &str) -> Self {
        let (path, query) = match path.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (path, None),
        };
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };
        match path {
            "/" => Self::Root,
            "/login" => Self::Login,
            "/register" => Self::Register,
            "/dashboard" => Self::Dashboard,
            "/coach-dashboard" => Self::CoachDashboard,
            "/history" => Self::History {
                user_id: query.and_then(user_id_param),
            },
            "/compare" => Self::Compare,
            "/management-dashboard" => Self::ManagementDashboard,
            "/settings" => Self::Settings,
            other => Self::NotFound(other.to_string()),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Self::Login => "/login".into(),
            Self::Register => "/register".into(),
            Self::Dashboard => "/dashboard".into(),
            Self::CoachDashboard => "/coach-dashboard".into(),
            Self::History { user_id: None } => "/history".into(),
            Self::History {
                user_id: Some(user_id),
            } => format!("/history?userId={user_id}"),
            Self::Compare => "/compare".into(),
            Self::ManagementDashboard => "/management-dashboard".into(),
            Self::Settings => "/settings".into(),
            Self::Root => "/".into(),
            Self::NotFound(path) => path.clone(),
        }
    }

    /// Login and registration are the only pages open to anonymous users.
    pub fn is_public(&self) -> bool {
        matches!(self, Self::Login | Self::Register | Self::NotFound(_))
    }
}

fn user_id_param(query: &str) -> Option<i64> {
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "userId")
        .and_then(|(_, value)| value.trim().parse().ok())
}

/// Page an account lands on after login.
pub fn landing_route(role: Role) -> Route {
    match role {
        Role::Management => Route::ManagementDashboard,
        Role::Coach => Route::CoachDashboard,
        Role::Admin | Role::Athlete => Route::Dashboard,
    }
}

/// Apply the auth gate and the root redirect to `path`.
pub fn resolve(path: &str, identity: Option<&UserProfile>) -> Resolution {
    let route = Route::parse(path);
    if identity.is_none() && !route.is_public() {
        return Resolution::Redirect(Route::Login.path());
    }
    match route {
        Route::Root => Resolution::Redirect(Route::Dashboard.path()),
        route => Resolution::Render(route),
    }
}
