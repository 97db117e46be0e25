use crate::api::Role;

use super::routes::{Route, landing_route};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavAction {
    Navigate,
    Logout,
}

/// One sidebar entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavItem {
    pub label: &'static str,
    pub path: String,
    pub action: NavAction,
}

impl NavItem {
    fn link(label: &'static str, route: Route) -> Self {
        Self {
            label,
            path: route.path(),
            action: NavAction::Navigate,
        }
    }

    /// Whether this entry is highlighted for `current_path`.
    pub fn is_active(&self, current_path: &str) -> bool {
        self.action == NavAction::Navigate
            && current_path.split('?').next() == Some(self.path.as_str())
    }
}

/// Sidebar entries for `role`, top to bottom.
pub fn nav_items(role: Role) -> Vec<NavItem> {
    let dashboard_label = match role {
        Role::Management => "Overview",
        _ => "Dashboard",
    };
    let mut items = vec![NavItem::link(dashboard_label, landing_route(role))];
    if matches!(role, Role::Athlete | Role::Coach) {
        items.push(NavItem::link("History", Route::History { user_id: None }));
        items.push(NavItem::link("Compare", Route::Compare));
    }
    items.push(NavItem::link("Settings", Route::Settings));
    items.push(NavItem {
        label: "Logout",
        path: Route::Login.path(),
        action: NavAction::Logout,
    });
    items
}
