//! Actions: what a decoded input event means, and how it changes editor state.
//!
//! `key_translator::translate` maps an `InputEvent` to an `Action` (the keymap);
//! `dispatcher::dispatch` applies an action to `EditorState`. The binary feeds
//! every event through `dispatch_event`, which also records macros, so macro
//! playback re-enters exactly the live input path.

pub mod dispatcher;
pub mod io_ops;
pub mod key_translator;

pub use dispatcher::{DispatchResult, dispatch, dispatch_event, open_path};
pub use key_translator::translate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionKind {
    Left,
    Right,
    Up,
    Down,
    WordLeft,
    WordRight,
    LineStart,
    LineEnd,
    DocumentStart,
    DocumentEnd,
    PageUp,
    PageDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    InsertChar(char),
    Newline,
    /// Tab key: spaces up to the tab width.
    Tab,
    LiteralTab,
    Backspace,
    Delete,
    DeleteWordBack,
    DeleteWordForward,
    Copy,
    Cut,
    Paste,
    SelectAll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// `extend` grows the selection instead of clearing it.
    Motion { kind: MotionKind, extend: bool },
    Edit(EditKind),
    NewDocument,
    OpenPrompt,
    Save,
    SaveAll,
    Close,
    SwitchDocument(isize),
    FindPrompt,
    FindNext,
    ReplacePrompt { all: bool },
    GotoLinePrompt,
    Complete { forward: bool },
    ToggleRecording,
    PlayMacro,
    Build,
    HistoryBack,
    HistoryForward,
    /// Esc: leave a prompt, drop the selection.
    Cancel,
    /// Enter while a prompt is open.
    PromptSubmit,
    Quit,
    /// 0-based text-area coordinates.
    MouseClick {
        row: usize,
        col: usize,
        extend: bool,
    },
    MouseDrag { row: usize, col: usize },
    Scroll(isize),
}

impl Action {
    /// Macro control keys are never recorded into a macro.
    pub fn is_macro_control(&self) -> bool {
        matches!(self, Action::ToggleRecording | Action::PlayMacro)
    }
}
