use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

impl ToastKind {
    pub fn title(self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Error => "Error",
        }
    }
}

/// Short-lived notice shown over the dashboard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    raised_at: Instant,
}

/// Holds at most one toast; a newer one replaces the older.
#[derive(Clone, Debug)]
pub struct ToastSlot {
    current: Option<Toast>,
    lifetime: Duration,
}

impl ToastSlot {
    pub fn new(lifetime: Duration) -> Self {
        Self {
            current: None,
            lifetime,
        }
    }

    pub fn show(&mut self, message: impl Into<String>, kind: ToastKind, now: Instant) {
        self.current = Some(Toast {
            message: message.into(),
            kind,
            raised_at: now,
        });
    }

    /// The toast if it has not expired at `now`.
    pub fn visible_at(&self, now: Instant) -> Option<&Toast> {
        self.current
            .as_ref()
            .filter(|toast| now.saturating_duration_since(toast.raised_at) < self.lifetime)
    }

    /// Drop an expired toast.
    pub fn prune(&mut self, now: Instant) {
        if self.visible_at(now).is_none() {
            self.current = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expires_after_lifetime() {
        let start = Instant::now();
        let mut slot = ToastSlot::new(Duration::from_millis(3_000));
        slot.show("Session Saved Successfully!", ToastKind::Success, start);
        assert!(slot.visible_at(start + Duration::from_millis(2_999)).is_some());
        assert!(slot.visible_at(start + Duration::from_millis(3_000)).is_none());
        slot.prune(start + Duration::from_secs(4));
        assert!(slot.visible_at(start).is_none());
    }

    #[test]
    fn newer_toast_replaces_older() {
        let start = Instant::now();
        let mut slot = ToastSlot::new(Duration::from_secs(3));
        slot.show("first", ToastKind::Success, start);
        slot.show("second", ToastKind::Error, start + Duration::from_secs(2));
        let toast = slot.visible_at(start + Duration::from_secs(4)).unwrap();
        assert_eq!(toast.message, "second");
        assert_eq!(toast.kind.title(), "Error");
    }
}
