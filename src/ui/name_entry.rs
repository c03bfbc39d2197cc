//! Player name prompt

use serde::Serialize;

/// Longest accepted name, in characters
pub const MAX_NAME_LEN: usize = 15;
/// Shortest name that can be confirmed
pub const MIN_NAME_LEN: usize = 2;

/// Name being typed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NameEntry {
    buffer: String,
}

impl NameEntry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a typed character, uppercased. Spaces, control characters and
    /// anything past the length cap are dropped. Returns true if accepted.
    pub fn push(&mut self, c: char) -> bool {
        if c.is_whitespace() || c.is_control() {
            return false;
        }
        let upper: Vec<char> = c.to_uppercase().collect();
        if self.len() + upper.len() > MAX_NAME_LEN {
            return false;
        }
        self.buffer.extend(upper);
        true
    }

    pub fn backspace(&mut self) {
        self.buffer.pop();
    }

    /// Length in characters
    pub fn len(&self) -> usize {
        self.buffer.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn can_confirm(&self) -> bool {
        self.len() >= MIN_NAME_LEN
    }

    /// The finished name, if long enough
    pub fn confirm(&self) -> Option<String> {
        self.can_confirm().then(|| self.buffer.clone())
    }

    /// Apply the typing rules to a name given up front (settings or the
    /// command line). Whitespace is stripped; a name that is too short or
    /// would be cut at the length cap is rejected.
    pub fn accept(raw: &str) -> Option<String> {
        let mut entry = Self::new();
        for c in raw.chars().filter(|c| !c.is_whitespace()) {
            if !entry.push(c) {
                return None;
            }
        }
        entry.confirm()
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    /// Prompt text with a trailing cursor while there is room
    pub fn display(&self) -> String {
        if self.len() < MAX_NAME_LEN {
            format!("{}_", self.buffer)
        } else {
            self.buffer.clone()
        }
    }

    /// Hint under the prompt
    pub fn hint(&self) -> &'static str {
        if self.can_confirm() {
            "Press SPACE or ENTER to confirm"
        } else {
            "2 or more characters required"
        }
    }
}
