//! Byte stream to `InputEvent` decoding.
//!
//! `decode_one` looks at the head of a buffer and reports one of: an event and
//! the bytes it used, bytes to drop (unrecognised but complete sequences), or
//! that the head is a valid but unfinished prefix. `decode` and `StreamDecoder`
//! differ only in what they do with an unfinished prefix.

use core_events::{InputEvent, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent};

const ESC: u8 = 0x1b;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    Event(InputEvent, usize),
    Skip(usize),
    Incomplete,
}

/// Decode one read's worth of bytes. No state is kept between calls, so an escape
/// sequence or UTF-8 character split across two reads decodes as its pieces: a
/// truncated `ESC x` becomes Alt+x, a longer truncated sequence becomes Escape
/// followed by its remaining bytes as keys, and a truncated UTF-8 character is
/// dropped.
pub fn decode(bytes: &[u8]) -> Vec<InputEvent> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        match decode_one(&bytes[i..]) {
            Step::Event(ev, n) => {
                out.push(ev);
                i += n;
            }
            Step::Skip(n) => i += n,
            Step::Incomplete => {
                let (ev, n) = truncated(&bytes[i..]);
                out.extend(ev);
                i += n;
            }
        }
    }
    out
}

fn truncated(bytes: &[u8]) -> (Option<InputEvent>, usize) {
    if bytes[0] != ESC {
        tracing::debug!(target: "input.decode", len = bytes.len(), "truncated_utf8");
        return (None, 1);
    }
    if bytes.len() == 2 {
        if let Step::Event(ev, n) = decode_plain(&bytes[1..]) {
            return (Some(with_alt(ev)), n + 1);
        }
    }
    (Some(KeyEvent::plain(KeyCode::Esc).into()), 1)
}

pub(crate) fn decode_one(bytes: &[u8]) -> Step {
    match bytes.first() {
        None => Step::Incomplete,
        Some(&ESC) => decode_escape(bytes),
        Some(_) => decode_plain(bytes),
    }
}

fn with_alt(ev: InputEvent) -> InputEvent {
    match ev {
        InputEvent::Key(mut k) => {
            k.mods |= KeyModifiers::ALT;
            InputEvent::Key(k)
        }
        InputEvent::Mouse(mut m) => {
            m.mods |= KeyModifiers::ALT;
            InputEvent::Mouse(m)
        }
        other => other,
    }
}

/// Prefix one byte to whatever the inner decode produced, adding Alt.
fn alt_prefixed(inner: Step) -> Step {
    match inner {
        Step::Event(ev, n) => Step::Event(with_alt(ev), n + 1),
        Step::Skip(n) => Step::Skip(n + 1),
        Step::Incomplete => Step::Incomplete,
    }
}

fn decode_escape(bytes: &[u8]) -> Step {
    match bytes.get(1) {
        None => Step::Event(KeyEvent::plain(KeyCode::Esc).into(), 1),
        Some(&ESC) => alt_prefixed(decode_escape(&bytes[1..])),
        Some(b'[') => decode_csi(bytes),
        Some(b'O') => decode_ss3(bytes),
        Some(_) => alt_prefixed(decode_plain(&bytes[1..])),
    }
}

fn key(code: KeyCode, mods: KeyModifiers, len: usize) -> Step {
    Step::Event(KeyEvent::new(code, mods).into(), len)
}

fn unrecognized(len: usize) -> Step {
    tracing::debug!(target: "input.decode", len, "unrecognized_sequence");
    Step::Skip(len)
}

/// `ESC O x`: legacy application-mode keys. Cursor keys here are reported by
/// terminals for Ctrl-chorded arrows, so they carry Ctrl.
fn decode_ss3(bytes: &[u8]) -> Step {
    let Some(&b) = bytes.get(2) else {
        return Step::Incomplete;
    };
    let code = match b {
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        b'H' => KeyCode::Home,
        b'F' => KeyCode::End,
        b'P'..=b'S' => return key(KeyCode::F(b - b'P' + 1), KeyModifiers::empty(), 3),
        _ => return unrecognized(3),
    };
    key(code, KeyModifiers::CTRL, 3)
}

/// Numeric parameters of a CSI body, `;`-separated. Empty fields read as 0.
fn params(body: &[u8]) -> Option<Vec<u16>> {
    body.split(|b| *b == b';')
        .map(|field| {
            field.iter().try_fold(0u16, |acc, b| {
                if b.is_ascii_digit() {
                    Some(acc.saturating_mul(10).saturating_add(u16::from(b - b'0')))
                } else {
                    None
                }
            })
        })
        .collect()
}

fn decode_csi(bytes: &[u8]) -> Step {
    if bytes.get(2) == Some(&b'<') {
        return decode_sgr_mouse(bytes);
    }
    // parameter bytes 0x30..=0x3F, then one final byte 0x40..=0x7E
    let mut end = 2;
    loop {
        match bytes.get(end) {
            None => return Step::Incomplete,
            Some(0x30..=0x3f) => end += 1,
            Some(0x40..=0x7e) => break,
            Some(_) => return unrecognized(end + 1),
        }
    }
    let len = end + 1;
    let Some(params) = params(&bytes[2..end]) else {
        return unrecognized(len);
    };
    let mods = params
        .get(1)
        .map_or(KeyModifiers::empty(), |m| KeyModifiers::from_xterm_param(*m));
    let code = match bytes[end] {
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        b'H' => KeyCode::Home,
        b'F' => KeyCode::End,
        b'Z' => return key(KeyCode::BackTab, KeyModifiers::SHIFT, len),
        b @ b'P'..=b'S' => KeyCode::F(b - b'P' + 1),
        b'~' => match params.first().copied().unwrap_or(0) {
            1 | 7 => KeyCode::Home,
            2 => KeyCode::Insert,
            3 => KeyCode::Delete,
            4 | 8 => KeyCode::End,
            5 => KeyCode::PageUp,
            6 => KeyCode::PageDown,
            n @ 11..=15 => KeyCode::F((n - 10) as u8),
            n @ 17..=21 => KeyCode::F((n - 11) as u8),
            23 => KeyCode::F(11),
            24 => KeyCode::F(12),
            _ => return unrecognized(len),
        },
        _ => return unrecognized(len),
    };
    key(code, mods, len)
}

/// `ESC [ < b ; x ; y (M|m)`
fn decode_sgr_mouse(bytes: &[u8]) -> Step {
    let mut end = 3;
    loop {
        match bytes.get(end) {
            None => return Step::Incomplete,
            Some(b'0'..=b'9' | b';') => end += 1,
            Some(b'M' | b'm') => break,
            Some(_) => return unrecognized(end + 1),
        }
    }
    let len = end + 1;
    let pressed = bytes[end] == b'M';
    let Some(&[b, x, y]) = params(&bytes[3..end]).as_deref() else {
        return unrecognized(len);
    };
    let mut mods = KeyModifiers::empty();
    if b & 4 != 0 {
        mods |= KeyModifiers::SHIFT;
    }
    if b & 8 != 0 {
        mods |= KeyModifiers::ALT;
    }
    if b & 16 != 0 {
        mods |= KeyModifiers::CTRL;
    }
    let drag = b & 32 != 0;
    let button = match b & !(4 | 8 | 16 | 32) {
        0 => MouseButton::Primary,
        1 => MouseButton::Wheel,
        2 => MouseButton::Secondary,
        64 => MouseButton::WheelUp,
        65 => MouseButton::WheelDown,
        // motion with no button held, horizontal wheel
        _ => return Step::Skip(len),
    };
    let ev = MouseEvent {
        button,
        pressed,
        x,
        y,
        mods,
        drag,
    };
    Step::Event(ev.into(), len)
}

fn control_key(b: u8) -> KeyEvent {
    match b {
        b'\r' | b'\n' => KeyEvent::plain(KeyCode::Enter),
        b'\t' => KeyEvent::plain(KeyCode::Tab),
        0x7f => KeyEvent::plain(KeyCode::Backspace),
        0x08 => KeyEvent::new(KeyCode::Backspace, KeyModifiers::CTRL),
        0x00 => KeyEvent::ctrl(' '),
        ESC => KeyEvent::plain(KeyCode::Esc),
        0x01..=0x1a => KeyEvent::ctrl(char::from(b'a' + b - 1)),
        // 0x1c..=0x1f
        _ => KeyEvent::ctrl(char::from(b'\\' + (b - 0x1c))),
    }
}

fn utf8_len(lead: u8) -> Option<usize> {
    match lead {
        0xc2..=0xdf => Some(2),
        0xe0..=0xef => Some(3),
        0xf0..=0xf4 => Some(4),
        _ => None,
    }
}

fn decode_plain(bytes: &[u8]) -> Step {
    let b = bytes[0];
    if b < 0x20 || b == 0x7f {
        return Step::Event(control_key(b).into(), 1);
    }
    if b.is_ascii() {
        return Step::Event(KeyEvent::char(char::from(b)).into(), 1);
    }
    let Some(len) = utf8_len(b) else {
        return unrecognized(1);
    };
    let avail = bytes.len().min(len);
    if bytes[1..avail].iter().any(|c| c & 0xc0 != 0x80) {
        return unrecognized(1);
    }
    if avail < len {
        return Step::Incomplete;
    }
    match std::str::from_utf8(&bytes[..len]).ok().and_then(|s| s.chars().next()) {
        Some(c) => Step::Event(KeyEvent::char(c).into(), len),
        None => unrecognized(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn keys(bytes: &[u8]) -> Vec<KeyEvent> {
        decode(bytes)
            .into_iter()
            .map(|ev| match ev {
                InputEvent::Key(k) => k,
                other => panic!("expected key, got {other:?}"),
            })
            .collect()
    }

    #[test]
    fn sgr_mouse_press() {
        assert_eq!(
            decode(b"\x1b[<0;5;10M"),
            vec![InputEvent::Mouse(MouseEvent {
                button: MouseButton::Primary,
                pressed: true,
                x: 5,
                y: 10,
                mods: KeyModifiers::empty(),
                drag: false,
            })]
        );
    }

    #[test]
    fn sgr_mouse_modifiers_wheel_and_release() {
        let evs = decode(b"\x1b[<16;1;2m\x1b[<65;3;4M\x1b[<32;7;8M");
        let InputEvent::Mouse(release) = evs[0] else { panic!() };
        assert!(!release.pressed);
        assert_eq!(release.mods, KeyModifiers::CTRL);
        let InputEvent::Mouse(wheel) = evs[1] else { panic!() };
        assert_eq!(wheel.button, MouseButton::WheelDown);
        let InputEvent::Mouse(drag) = evs[2] else { panic!() };
        assert!(drag.drag);
        assert_eq!((drag.x, drag.y), (7, 8));
    }

    #[test]
    fn two_byte_utf8_is_one_key() {
        assert_eq!(keys("é".as_bytes()), vec![KeyEvent::char('é')]);
        assert_eq!(keys("漢😀".as_bytes()), vec![KeyEvent::char('漢'), KeyEvent::char('😀')]);
    }

    #[test]
    fn navigation_table() {
        assert_eq!(
            keys(b"\x1b[A\x1b[D\x1b[H\x1b[4~\x1b[5~\x1b[3~\x1b[2~"),
            vec![
                KeyEvent::plain(KeyCode::Up),
                KeyEvent::plain(KeyCode::Left),
                KeyEvent::plain(KeyCode::Home),
                KeyEvent::plain(KeyCode::End),
                KeyEvent::plain(KeyCode::PageUp),
                KeyEvent::plain(KeyCode::Delete),
                KeyEvent::plain(KeyCode::Insert),
            ]
        );
    }

    #[test]
    fn function_keys() {
        assert_eq!(
            keys(b"\x1bOP\x1b[15~\x1b[21~\x1b[24~"),
            vec![
                KeyEvent::plain(KeyCode::F(1)),
                KeyEvent::plain(KeyCode::F(5)),
                KeyEvent::plain(KeyCode::F(10)),
                KeyEvent::plain(KeyCode::F(12)),
            ]
        );
    }

    #[test]
    fn legacy_cursor_keys_carry_ctrl() {
        assert_eq!(
            keys(b"\x1bOC"),
            vec![KeyEvent::new(KeyCode::Right, KeyModifiers::CTRL)]
        );
    }

    #[test]
    fn xterm_modifier_parameters() {
        assert_eq!(
            keys(b"\x1b[1;5C\x1b[1;2A\x1b[5;5~\x1b[Z"),
            vec![
                KeyEvent::new(KeyCode::Right, KeyModifiers::CTRL),
                KeyEvent::new(KeyCode::Up, KeyModifiers::SHIFT),
                KeyEvent::new(KeyCode::PageUp, KeyModifiers::CTRL),
                KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT),
            ]
        );
    }

    #[test]
    fn double_escape_sets_alt() {
        assert_eq!(
            keys(b"\x1b\x1b[D"),
            vec![KeyEvent::new(KeyCode::Left, KeyModifiers::ALT)]
        );
    }

    #[test]
    fn escape_then_byte_is_alt_key() {
        assert_eq!(keys(b"\x1bs"), vec![KeyEvent::alt(KeyCode::Char('s'))]);
        assert_eq!(keys(b"\x1b\x7f"), vec![KeyEvent::alt(KeyCode::Backspace)]);
    }

    #[test]
    fn lone_escape() {
        assert_eq!(keys(b"\x1b"), vec![KeyEvent::plain(KeyCode::Esc)]);
    }

    #[test]
    fn control_table() {
        assert_eq!(
            keys(b"\x11\r\n\t\x7f\x08\x00"),
            vec![
                KeyEvent::ctrl('q'),
                KeyEvent::plain(KeyCode::Enter),
                KeyEvent::plain(KeyCode::Enter),
                KeyEvent::plain(KeyCode::Tab),
                KeyEvent::plain(KeyCode::Backspace),
                KeyEvent::new(KeyCode::Backspace, KeyModifiers::CTRL),
                KeyEvent::ctrl(' '),
            ]
        );
    }

    #[test]
    fn uppercase_infers_shift() {
        assert_eq!(keys(b"A"), vec![KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT)]);
    }

    #[test]
    fn split_sequences_decode_as_pieces() {
        assert_eq!(keys(b"\x1b["), vec![KeyEvent::alt(KeyCode::Char('['))]);
        assert_eq!(
            keys(b"\x1b[1;"),
            vec![
                KeyEvent::plain(KeyCode::Esc),
                KeyEvent::char('['),
                KeyEvent::char('1'),
                KeyEvent::char(';'),
            ]
        );
        assert_eq!(keys(&"é".as_bytes()[..1]), Vec::<KeyEvent>::new());
    }

    #[test]
    fn unknown_sequences_are_skipped() {
        assert_eq!(keys(b"\x1b[99~x"), vec![KeyEvent::char('x')]);
        assert_eq!(keys(b"\x1bOzx"), vec![KeyEvent::char('x')]);
    }
}
