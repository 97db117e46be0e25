/// Coarse lifecycle phase derived from [`StreamState`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Streaming,
    Paused,
}

impl Phase {
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "Ready",
            Self::Streaming => "Live",
            Self::Paused => "Paused",
        }
    }
}

/// Local view of the server-managed stream.
///
/// `is_paused` only means something while `is_streaming`; leaving a session
/// always clears both together with the descriptor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StreamState {
    pub is_streaming: bool,
    pub is_paused: bool,
    pub source_descriptor: Option<String>,
}

impl StreamState {
    pub fn phase(&self) -> Phase {
        match (self.is_streaming, self.is_paused) {
            (false, _) => Phase::Idle,
            (true, false) => Phase::Streaming,
            (true, true) => Phase::Paused,
        }
    }

    /// Streaming and not paused.
    pub fn is_live(&self) -> bool {
        self.phase() == Phase::Streaming
    }

    pub(super) fn begin(&mut self, descriptor: String) {
        self.is_streaming = true;
        self.is_paused = false;
        self.source_descriptor = Some(descriptor);
    }

    pub(super) fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paused_flag_is_ignored_when_idle() {
        let state = StreamState {
            is_streaming: false,
            is_paused: true,
            source_descriptor: None,
        };
        assert_eq!(state.phase(), Phase::Idle);
    }

    #[test]
    fn clear_resets_everything() {
        let mut state = StreamState::default();
        state.begin("0".into());
        state.is_paused = true;
        assert_eq!(state.phase(), Phase::Paused);
        state.clear();
        assert_eq!(state, StreamState::default());
    }
}
