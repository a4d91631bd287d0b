//! Core input event types for rill.
//!
//! Events are produced transiently by the input decoder each polling cycle and
//! consumed by the dispatcher; nothing here is retained across cycles except the
//! ordered event lists captured by the macro recorder.
//!
//! Invariants:
//! * Mouse coordinates are 1-based terminal cells exactly as reported by SGR
//!   mouse reporting; conversion to viewport cells happens in the dispatcher.
//! * `KeyCode::Char` never carries a control character; control bytes decode to
//!   a named key or to `Char(letter)` with `KeyModifiers::CTRL`.

use std::fmt;

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct KeyModifiers: u8 {
        const CTRL = 0b0000_0001;
        const ALT  = 0b0000_0010;
        const SHIFT = 0b0000_0100;
    }
}

impl KeyModifiers {
    /// Decode the xterm modifier parameter (`ESC [ 1 ; m X`), where `m - 1` is a
    /// bitmask of shift (1), alt (2) and ctrl (4).
    pub fn from_xterm_param(param: u16) -> Self {
        let bits = param.saturating_sub(1);
        let mut mods = KeyModifiers::empty();
        if bits & 1 != 0 {
            mods |= KeyModifiers::SHIFT;
        }
        if bits & 2 != 0 {
            mods |= KeyModifiers::ALT;
        }
        if bits & 4 != 0 {
            mods |= KeyModifiers::CTRL;
        }
        mods
    }
}

/// Logical key identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Esc,
    Backspace,
    Tab,
    BackTab,
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
    /// Terminals only report presses; kept so synthetic releases stay expressible.
    pub pressed: bool,
}

impl KeyEvent {
    pub fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self {
            code,
            mods,
            pressed: true,
        }
    }

    pub fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::empty())
    }

    /// Character key with shift inferred from uppercase-ness.
    pub fn char(c: char) -> Self {
        let mods = if c.is_uppercase() {
            KeyModifiers::SHIFT
        } else {
            KeyModifiers::empty()
        };
        Self::new(KeyCode::Char(c), mods)
    }

    pub fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CTRL)
    }

    pub fn alt(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::ALT)
    }

    pub fn ctrl_held(&self) -> bool {
        self.mods.contains(KeyModifiers::CTRL)
    }

    pub fn alt_held(&self) -> bool {
        self.mods.contains(KeyModifiers::ALT)
    }

    pub fn shift_held(&self) -> bool {
        self.mods.contains(KeyModifiers::SHIFT)
    }

    /// The printable character carried by this key, if any.
    pub fn text(&self) -> Option<char> {
        match self.code {
            KeyCode::Char(c) => Some(c),
            _ => None,
        }
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl_held() {
            f.write_str("Ctrl+")?;
        }
        if self.alt_held() {
            f.write_str("Alt+")?;
        }
        if self.shift_held() {
            f.write_str("Shift+")?;
        }
        match self.code {
            KeyCode::Char(' ') => f.write_str("Space"),
            KeyCode::Char(c) => write!(f, "{c}"),
            KeyCode::F(n) => write!(f, "F{n}"),
            other => write!(f, "{other:?}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Primary,
    /// Middle button; some terminals report the wheel click here.
    Wheel,
    Secondary,
    WheelUp,
    WheelDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MouseEvent {
    pub button: MouseButton,
    pub pressed: bool,
    /// 1-based column.
    pub x: u16,
    /// 1-based row.
    pub y: u16,
    pub mods: KeyModifiers,
    /// Motion while the button is held.
    pub drag: bool,
}

/// Normalized input events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    /// Terminal resize (columns, rows).
    Resize { width: u16, height: u16 },
}

impl From<KeyEvent> for InputEvent {
    fn from(k: KeyEvent) -> Self {
        InputEvent::Key(k)
    }
}

impl From<MouseEvent> for InputEvent {
    fn from(m: MouseEvent) -> Self {
        InputEvent::Mouse(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn key_event_display() {
        let k = KeyEvent::ctrl('x');
        assert_eq!(k.to_string(), "Ctrl+x");
        assert_eq!(KeyEvent::alt(KeyCode::Left).to_string(), "Alt+Left");
        assert_eq!(KeyEvent::plain(KeyCode::F(7)).to_string(), "F7");
    }

    #[test]
    fn char_infers_shift_from_case() {
        assert!(KeyEvent::char('Q').shift_held());
        assert!(!KeyEvent::char('q').shift_held());
        assert!(!KeyEvent::char('1').shift_held());
    }

    #[test]
    fn xterm_modifier_param() {
        assert_eq!(KeyModifiers::from_xterm_param(1), KeyModifiers::empty());
        assert_eq!(KeyModifiers::from_xterm_param(2), KeyModifiers::SHIFT);
        assert_eq!(KeyModifiers::from_xterm_param(5), KeyModifiers::CTRL);
        assert_eq!(
            KeyModifiers::from_xterm_param(6),
            KeyModifiers::CTRL | KeyModifiers::SHIFT
        );
        assert_eq!(KeyModifiers::from_xterm_param(3), KeyModifiers::ALT);
    }
}
