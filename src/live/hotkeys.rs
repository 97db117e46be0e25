use super::backend::LiveBackend;
use super::controller::LiveController;

/// Physical keys the dashboard reacts to, named after DOM key codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyCode {
    Space,
    KeyD,
    Digit3,
    KeyR,
}

impl KeyCode {
    /// Parse a DOM `KeyboardEvent.code` value.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "Space" => Some(Self::Space),
            "KeyD" => Some(Self::KeyD),
            "Digit3" => Some(Self::Digit3),
            "KeyR" => Some(Self::KeyR),
            _ => None,
        }
    }

    /// Map a typed character to the key that produces it.
    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            ' ' => Some(Self::Space),
            'd' | 'D' => Some(Self::KeyD),
            '3' => Some(Self::Digit3),
            'r' | 'R' => Some(Self::KeyR),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Space => "Space",
            Self::KeyD => "D",
            Self::Digit3 => "3",
            Self::KeyR => "R",
        }
    }
}

/// Element holding keyboard focus when a key is pressed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FocusTarget {
    #[default]
    Body,
    TextInput,
    TextArea,
    Select,
}

impl FocusTarget {
    /// Shortcuts never fire while the user is typing or choosing.
    pub fn accepts_hotkeys(self) -> bool {
        matches!(self, Self::Body)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum HotkeyCommand {
    TogglePause,
    ToggleDrawing,
    Toggle3d,
    Restart,
}

/// Hotkey metadata surfaced to help screens.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HotkeyAction {
    pub id: &'static str,
    pub label: &'static str,
    pub key: KeyCode,
    command: HotkeyCommand,
}

const HOTKEY_ACTIONS: &[HotkeyAction] = &[
    HotkeyAction {
        id: "toggle-pause",
        label: "Pause / resume",
        key: KeyCode::Space,
        command: HotkeyCommand::TogglePause,
    },
    HotkeyAction {
        id: "toggle-drawing",
        label: "Enable drawing",
        key: KeyCode::KeyD,
        command: HotkeyCommand::ToggleDrawing,
    },
    HotkeyAction {
        id: "toggle-3d",
        label: "Show 3D skeleton",
        key: KeyCode::Digit3,
        command: HotkeyCommand::Toggle3d,
    },
    HotkeyAction {
        id: "restart",
        label: "Restart",
        key: KeyCode::KeyR,
        command: HotkeyCommand::Restart,
    },
];

pub fn iter_actions() -> impl Iterator<Item = HotkeyAction> {
    HOTKEY_ACTIONS.iter().copied()
}

/// Action bound to `key`, unless focus is inside a form control.
pub fn action_for(key: KeyCode, focus: FocusTarget) -> Option<HotkeyAction> {
    if !focus.accepts_hotkeys() {
        return None;
    }
    HOTKEY_ACTIONS.iter().copied().find(|action| action.key == key)
}

impl<B: LiveBackend> LiveController<B> {
    /// Dispatch a key press. Returns whether a shortcut matched.
    ///
    /// Each shortcut runs the same controller method as its button, so the
    /// idle/streaming guards live there.
    pub fn handle_key(&mut self, key: KeyCode, focus: FocusTarget) -> bool {
        let Some(action) = action_for(key, focus) else {
            return false;
        };
        match action.command {
            HotkeyCommand::TogglePause => self.toggle_pause(),
            HotkeyCommand::ToggleDrawing => self.toggle_drawing(),
            HotkeyCommand::Toggle3d => self.toggle_3d(),
            HotkeyCommand::Restart => self.restart(),
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_key_has_one_action() {
        for key in [KeyCode::Space, KeyCode::KeyD, KeyCode::Digit3, KeyCode::KeyR] {
            let matches = iter_actions().filter(|action| action.key == key).count();
            assert_eq!(matches, 1, "{key:?}");
        }
    }

    #[test]
    fn form_focus_blocks_shortcuts() {
        assert!(action_for(KeyCode::Space, FocusTarget::Body).is_some());
        for focus in [FocusTarget::TextInput, FocusTarget::TextArea, FocusTarget::Select] {
            assert!(action_for(KeyCode::Space, focus).is_none());
        }
    }

    #[test]
    fn parses_codes_and_chars() {
        assert_eq!(KeyCode::from_code("Digit3"), Some(KeyCode::Digit3));
        assert_eq!(KeyCode::from_code("KeyX"), None);
        assert_eq!(KeyCode::from_char('R'), Some(KeyCode::KeyR));
        assert_eq!(KeyCode::from_char(' '), Some(KeyCode::Space));
        assert_eq!(KeyCode::from_char('x'), None);
    }
}
