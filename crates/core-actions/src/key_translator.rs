//! Keymap: decoded input events to actions.
//!
//! Stateless. While a prompt is open only line-editing keys, Enter and Esc
//! are meaningful; document-level commands are ignored until it closes.
//! Resize events are handled by the runtime and never become actions.

use crate::{Action, EditKind, MotionKind};
use core_events::{InputEvent, KeyCode, KeyEvent, MouseButton, MouseEvent};

/// Lines moved per wheel notch.
pub const WHEEL_LINES: isize = 3;

pub fn translate(event: &InputEvent, prompting: bool) -> Option<Action> {
    match event {
        InputEvent::Key(key) if key.pressed => {
            if prompting {
                translate_prompt_key(key)
            } else {
                translate_key(key)
            }
        }
        InputEvent::Mouse(mouse) if !prompting => translate_mouse(mouse),
        _ => None,
    }
}

fn motion(kind: MotionKind, key: &KeyEvent) -> Option<Action> {
    Some(Action::Motion {
        kind,
        extend: key.shift_held(),
    })
}

fn edit(kind: EditKind) -> Option<Action> {
    Some(Action::Edit(kind))
}

/// Keys shared by the document and the command line.
fn translate_editing_key(key: &KeyEvent) -> Option<Action> {
    let ctrl = key.ctrl_held();
    let alt = key.alt_held();
    match key.code {
        KeyCode::Left if ctrl => motion(MotionKind::WordLeft, key),
        KeyCode::Right if ctrl => motion(MotionKind::WordRight, key),
        KeyCode::Left if !alt => motion(MotionKind::Left, key),
        KeyCode::Right if !alt => motion(MotionKind::Right, key),
        KeyCode::Home if ctrl => motion(MotionKind::DocumentStart, key),
        KeyCode::End if ctrl => motion(MotionKind::DocumentEnd, key),
        KeyCode::Home => motion(MotionKind::LineStart, key),
        KeyCode::End => motion(MotionKind::LineEnd, key),
        KeyCode::Backspace if ctrl => edit(EditKind::DeleteWordBack),
        KeyCode::Backspace => edit(EditKind::Backspace),
        KeyCode::Delete if ctrl => edit(EditKind::DeleteWordForward),
        KeyCode::Delete => edit(EditKind::Delete),
        KeyCode::Char('c') if ctrl => edit(EditKind::Copy),
        KeyCode::Char('x') if ctrl => edit(EditKind::Cut),
        KeyCode::Char('v') if ctrl => edit(EditKind::Paste),
        KeyCode::Char('a') if ctrl => edit(EditKind::SelectAll),
        KeyCode::Char(c) if !ctrl && !alt && !c.is_control() => edit(EditKind::InsertChar(c)),
        _ => None,
    }
}

fn translate_prompt_key(key: &KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Enter => Some(Action::PromptSubmit),
        KeyCode::Esc => Some(Action::Cancel),
        _ => translate_editing_key(key),
    }
}

fn translate_key(key: &KeyEvent) -> Option<Action> {
    if let Some(action) = translate_editing_key(key) {
        return Some(action);
    }
    let ctrl = key.ctrl_held();
    let alt = key.alt_held();
    match key.code {
        KeyCode::Up => motion(MotionKind::Up, key),
        KeyCode::Down => motion(MotionKind::Down, key),
        KeyCode::PageUp if ctrl => Some(Action::SwitchDocument(-1)),
        KeyCode::PageDown if ctrl => Some(Action::SwitchDocument(1)),
        KeyCode::PageUp => motion(MotionKind::PageUp, key),
        KeyCode::PageDown => motion(MotionKind::PageDown, key),
        KeyCode::Left if alt => Some(Action::HistoryBack),
        KeyCode::Right if alt => Some(Action::HistoryForward),
        KeyCode::Enter => edit(EditKind::Newline),
        KeyCode::Tab if alt => edit(EditKind::LiteralTab),
        KeyCode::Tab => edit(EditKind::Tab),
        KeyCode::Esc => Some(Action::Cancel),
        KeyCode::F(3) => Some(Action::FindNext),
        KeyCode::F(7) => Some(Action::ToggleRecording),
        KeyCode::F(8) => Some(Action::PlayMacro),
        KeyCode::F(9) => Some(Action::Build),
        KeyCode::Char(c) if ctrl => match c {
            'n' => Some(Action::NewDocument),
            'o' => Some(Action::OpenPrompt),
            's' => Some(Action::Save),
            'w' => Some(Action::Close),
            'f' => Some(Action::FindPrompt),
            'g' => Some(Action::FindNext),
            'r' => Some(Action::ReplacePrompt { all: false }),
            'l' => Some(Action::GotoLinePrompt),
            'b' => Some(Action::Build),
            'q' => Some(Action::Quit),
            ' ' => Some(Action::Complete { forward: true }),
            _ => None,
        },
        KeyCode::Char(c) if alt => match c {
            's' => Some(Action::SaveAll),
            'r' => Some(Action::ReplacePrompt { all: true }),
            ',' => Some(Action::SwitchDocument(-1)),
            '.' => Some(Action::SwitchDocument(1)),
            '/' => Some(Action::Complete { forward: true }),
            '?' => Some(Action::Complete { forward: false }),
            _ => None,
        },
        _ => None,
    }
}

fn translate_mouse(mouse: &MouseEvent) -> Option<Action> {
    let row = mouse.y.saturating_sub(1) as usize;
    let col = mouse.x.saturating_sub(1) as usize;
    match mouse.button {
        MouseButton::Primary if mouse.pressed && mouse.drag => Some(Action::MouseDrag { row, col }),
        MouseButton::Primary if mouse.pressed => Some(Action::MouseClick {
            row,
            col,
            extend: mouse.mods.contains(core_events::KeyModifiers::SHIFT),
        }),
        MouseButton::WheelUp => Some(Action::Scroll(-WHEEL_LINES)),
        MouseButton::WheelDown => Some(Action::Scroll(WHEEL_LINES)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_events::KeyModifiers;
    use pretty_assertions::assert_eq;

    fn key(code: KeyCode, mods: KeyModifiers) -> InputEvent {
        KeyEvent::new(code, mods).into()
    }

    fn doc_key(code: KeyCode, mods: KeyModifiers) -> Option<Action> {
        translate(&key(code, mods), false)
    }

    #[test]
    fn motions_and_selection_extension() {
        assert_eq!(
            doc_key(KeyCode::Left, KeyModifiers::empty()),
            Some(Action::Motion {
                kind: MotionKind::Left,
                extend: false,
            })
        );
        assert_eq!(
            doc_key(KeyCode::Right, KeyModifiers::CTRL | KeyModifiers::SHIFT),
            Some(Action::Motion {
                kind: MotionKind::WordRight,
                extend: true,
            })
        );
        assert_eq!(
            doc_key(KeyCode::End, KeyModifiers::CTRL),
            Some(Action::Motion {
                kind: MotionKind::DocumentEnd,
                extend: false,
            })
        );
        assert_eq!(doc_key(KeyCode::Left, KeyModifiers::ALT), Some(Action::HistoryBack));
        assert_eq!(doc_key(KeyCode::PageDown, KeyModifiers::CTRL), Some(Action::SwitchDocument(1)));
    }

    #[test]
    fn editing_keys() {
        assert_eq!(
            translate(&KeyEvent::char('Q').into(), false),
            Some(Action::Edit(EditKind::InsertChar('Q')))
        );
        assert_eq!(
            doc_key(KeyCode::Tab, KeyModifiers::ALT),
            Some(Action::Edit(EditKind::LiteralTab))
        );
        assert_eq!(
            doc_key(KeyCode::Backspace, KeyModifiers::CTRL),
            Some(Action::Edit(EditKind::DeleteWordBack))
        );
        assert_eq!(
            translate(&KeyEvent::ctrl('v').into(), false),
            Some(Action::Edit(EditKind::Paste))
        );
    }

    #[test]
    fn commands() {
        assert_eq!(translate(&KeyEvent::ctrl('q').into(), false), Some(Action::Quit));
        assert_eq!(
            translate(&KeyEvent::ctrl(' ').into(), false),
            Some(Action::Complete { forward: true })
        );
        assert_eq!(
            translate(&KeyEvent::alt(KeyCode::Char('?')).into(), false),
            Some(Action::Complete { forward: false })
        );
        assert_eq!(doc_key(KeyCode::F(9), KeyModifiers::empty()), Some(Action::Build));
        assert_eq!(translate(&KeyEvent::ctrl('z').into(), false), None);
    }

    #[test]
    fn prompt_mode_limits_keys() {
        let enter = key(KeyCode::Enter, KeyModifiers::empty());
        assert_eq!(translate(&enter, true), Some(Action::PromptSubmit));
        assert_eq!(translate(&enter, false), Some(Action::Edit(EditKind::Newline)));
        assert_eq!(translate(&KeyEvent::ctrl('s').into(), true), None);
        assert_eq!(
            translate(&KeyEvent::char('x').into(), true),
            Some(Action::Edit(EditKind::InsertChar('x')))
        );
        assert_eq!(translate(&key(KeyCode::Up, KeyModifiers::empty()), true), None);
    }

    #[test]
    fn mouse_events() {
        let mut m = MouseEvent {
            button: MouseButton::Primary,
            pressed: true,
            x: 5,
            y: 10,
            mods: KeyModifiers::empty(),
            drag: false,
        };
        assert_eq!(
            translate(&m.into(), false),
            Some(Action::MouseClick {
                row: 9,
                col: 4,
                extend: false,
            })
        );
        m.drag = true;
        assert_eq!(translate(&m.into(), false), Some(Action::MouseDrag { row: 9, col: 4 }));
        m.pressed = false;
        assert_eq!(translate(&m.into(), false), None);
        m.button = MouseButton::WheelDown;
        assert_eq!(translate(&m.into(), false), Some(Action::Scroll(3)));
        assert_eq!(translate(&m.into(), true), None);
        let resize = InputEvent::Resize {
            width: 1,
            height: 1,
        };
        assert_eq!(translate(&resize, false), None);
    }
}
