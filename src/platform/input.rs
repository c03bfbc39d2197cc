//! Discrete input events

/// One input delivered by the window/input layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Space: jump while playing, confirm a name, restart after a crash
    Activate,
    /// Enter: confirm a name
    Confirm,
    Backspace,
    /// A typed character (name entry only)
    Char(char),
    Quit,
}

impl InputEvent {
    /// Map a DOM-style key name (`" "`, `"Enter"`, `"a"`...) to an event
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            " " | "Space" | "Spacebar" => Some(InputEvent::Activate),
            "Enter" | "Return" => Some(InputEvent::Confirm),
            "Backspace" => Some(InputEvent::Backspace),
            "Escape" => Some(InputEvent::Quit),
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(InputEvent::Char(c)),
                    _ => None,
                }
            }
        }
    }
}
