//! Key/mouse event payload types routed through the window tree.
//!
//! Pared down from a richer input-service event model to exactly the
//! shapes a window's `on_key`/`on_mouse` callbacks need: no channels, no
//! async sources, no paste or IME staging. A window-tree consumer owns
//! its own input decoding and hands these types to the root.

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct KeyModifiers: u8 {
        const CTRL  = 0b0000_0001;
        const ALT   = 0b0000_0010;
        const SHIFT = 0b0000_0100;
    }
}

/// Normalized logical key identity. `Char` covers ordinary printable
/// input; the named variants cover keys with no textual representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Esc,
    Backspace,
    Tab,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    Delete,
    F(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

/// What a key-routed input actually is: a single logical key press, or a
/// run of already-decoded text (e.g. a paste or an IME commit) that a
/// window may want to insert verbatim rather than interpret key by key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyInput {
    Key(KeyEvent),
    Text(String),
}

impl std::fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}{:?}", self.code, self.mods)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseEventKind {
    Down(MouseButton),
    Up(MouseButton),
    Drag(MouseButton),
    ScrollUp,
    ScrollDown,
    Moved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MouseEvent {
    pub kind: MouseEventKind,
    pub line: u32,
    pub col: u32,
    pub mods: KeyModifiers,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_event_display_shows_code_and_mods() {
        let k = KeyEvent {
            code: KeyCode::Char('x'),
            mods: KeyModifiers::CTRL,
        };
        let s = format!("{k}");
        assert!(s.contains("Char"));
        assert!(s.contains("CTRL"));
    }

    #[test]
    fn key_input_text_variant_holds_string() {
        let input = KeyInput::Text("pasted".to_string());
        match input {
            KeyInput::Text(s) => assert_eq!(s, "pasted"),
            KeyInput::Key(_) => panic!("expected Text variant"),
        }
    }

    #[test]
    fn mouse_event_carries_absolute_coordinates() {
        let m = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            line: 3,
            col: 7,
            mods: KeyModifiers::empty(),
        };
        assert_eq!(m.line, 3);
        assert_eq!(m.col, 7);
    }
}
