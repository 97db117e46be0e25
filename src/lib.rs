//! Client library for the Smart Sprint Training System backend.
/// Per-user application directories.
pub mod app_dirs;
/// Tracing setup shared by the binary and tests.
pub mod logging;
/// Shared HTTP agent and bounded body readers.
pub mod http_client;
/// TOML configuration.
pub mod config;
/// Stats snapshots and feedback classification.
pub mod stats;
/// Typed REST client.
pub mod api;
/// Login state and credential storage.
pub mod auth;
/// Routes and navigation.
pub mod shell;
/// Live session controller.
pub mod live;
/// Dashboard view models.
pub mod widgets;
/// CSV links and PDF reports.
pub mod export;
/// Session history page.
pub mod history;
/// Coach and management overviews.
pub mod organization;
/// Profile settings.
pub mod profile;
/// Command-line front end.
pub mod cli;
