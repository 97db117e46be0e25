//! Routing and role-based navigation.

mod nav;
mod routes;

pub use nav::{NavAction, NavItem, nav_items};
pub use routes::{Resolution, Route, landing_route, resolve};
