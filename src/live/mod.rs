//! Live analysis session: lifecycle, stats polling, timeline markers,
//! toasts and keyboard shortcuts.

mod backend;
mod controller;
mod hotkeys;
mod jobs;
mod poller;
mod source;
mod state;
mod timeline;
mod toast;

pub use backend::LiveBackend;
pub use controller::LiveController;
pub use hotkeys::{FocusTarget, HotkeyAction, KeyCode, action_for, iter_actions};
pub use source::{StartPlan, StreamSource};
pub use state::{Phase, StreamState};
pub use timeline::{MarkerKind, Timeline, TimelineMarker};
pub use toast::{Toast, ToastKind, ToastSlot};
