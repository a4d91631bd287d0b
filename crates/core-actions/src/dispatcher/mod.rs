//! Dispatcher applying `Action` to mutable editor state.
//!
//! Sub-modules:
//! * `motion`   - cursor movement and mouse placement
//! * `edit`     - text mutation on the focused document
//! * `document` - document lifecycle, search, completion and history commands
//! * `command`  - command-line prompts (open, save as, find, replace, go to line)
//!
//! Every action is bracketed by navigation-history observation: the location
//! before and after is offered to `NavigationHistory::observe`, which records
//! it only when it is a jump. History walking itself skips the second
//! observation so it never records the marker it just moved to.

use crate::{Action, translate};
use anyhow::Result;
use core_events::InputEvent;
use core_state::EditorState;
use tracing::{debug, trace};

mod command;
mod document;
mod edit;
mod motion;

pub use command::open_path;

/// Result of dispatching a single `Action`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchResult {
    pub dirty: bool,
    pub quit: bool,
    /// The runtime should suspend the terminal and run the build command.
    pub build: bool,
}

impl DispatchResult {
    pub fn dirty() -> Self {
        Self {
            dirty: true,
            ..Self::default()
        }
    }
    pub fn clean() -> Self {
        Self::default()
    }
    pub fn quit() -> Self {
        Self {
            dirty: true,
            quit: true,
            build: false,
        }
    }
    pub fn build() -> Self {
        Self {
            build: true,
            ..Self::default()
        }
    }
    pub fn changed(changed: bool) -> Self {
        if changed { Self::dirty() } else { Self::clean() }
    }
    /// Union of two results (macro playback dispatches many actions).
    pub fn merge(self, other: Self) -> Self {
        Self {
            dirty: self.dirty || other.dirty,
            quit: self.quit || other.quit,
            build: self.build || other.build,
        }
    }
}

/// Translate and apply one decoded input event. Events are recorded into an
/// active macro before they are applied; macro control keys are not.
pub fn dispatch_event(event: &InputEvent, state: &mut EditorState) -> Result<DispatchResult> {
    let Some(action) = translate(event, state.command_line.is_active()) else {
        trace!(target: "actions", "unmapped_event");
        return Ok(DispatchResult::clean());
    };
    if !action.is_macro_control() {
        state.macros.record(*event);
    }
    dispatch(action, state)
}

/// Apply an action to editor state. Returns `DispatchResult` describing whether
/// a render is needed (`dirty`), the editor should exit (`quit`), or the build
/// command should run (`build`). Errors are fatal file-system failures.
pub fn dispatch(action: Action, state: &mut EditorState) -> Result<DispatchResult> {
    if action != Action::Quit {
        state.quit_armed = false;
    }
    if !matches!(action, Action::Complete { .. }) {
        state.completion = None;
    }
    if !matches!(action, Action::Edit(_)) {
        trace!(target: "actions", ?action, "dispatch");
    }

    let before = state.location();
    state.history.observe(before);
    let result = if state.command_line.is_active() {
        command::handle_prompt_action(action, state)?
    } else {
        handle_action(action, state)?
    };
    if !matches!(action, Action::HistoryBack | Action::HistoryForward) {
        let after = state.location();
        state.history.observe(after);
    }
    Ok(result)
}

fn handle_action(action: Action, state: &mut EditorState) -> Result<DispatchResult> {
    let text_rows = state.last_text_height;
    let result = match action {
        Action::Motion { kind, extend } => {
            DispatchResult::changed(motion::handle_motion(kind, extend, state.doc_mut(), text_rows))
        }
        Action::Edit(kind) => DispatchResult::changed(edit::handle_edit(kind, state)),
        Action::MouseClick { row, col, extend } => {
            let moved = motion::handle_pointer(state.doc_mut(), row, col, text_rows, extend);
            DispatchResult::changed(moved)
        }
        Action::MouseDrag { row, col } => {
            let moved = motion::handle_pointer(state.doc_mut(), row, col, text_rows, true);
            DispatchResult::changed(moved)
        }
        Action::Scroll(delta) => DispatchResult::changed(state.doc_mut().move_line(delta)),
        Action::Cancel => DispatchResult::changed(state.doc_mut().clear_selection()),
        Action::ToggleRecording => {
            if state.macros.toggle_recording() {
                state.message("Recording macro");
            } else {
                let n = state.macros.last_macro().len();
                state.message(format!("Macro recorded ({n} events)"));
            }
            DispatchResult::dirty()
        }
        Action::PlayMacro => play_macro(state)?,
        Action::Build => DispatchResult::build(),
        Action::Quit => quit(state),
        Action::PromptSubmit => DispatchResult::clean(),
        _ => document::handle_document_action(action, state)?,
    };
    Ok(result)
}

fn quit(state: &mut EditorState) -> DispatchResult {
    let modified = state.modified_count();
    if modified == 0 || state.quit_armed {
        debug!(target: "actions", modified, "quit");
        return DispatchResult::quit();
    }
    state.quit_armed = true;
    state.message(format!(
        "{modified} unsaved document(s); press Ctrl+Q again to quit"
    ));
    DispatchResult::dirty()
}

/// Feed the last macro back through `dispatch_event`. Playback always ends,
/// even when an event fails.
fn play_macro(state: &mut EditorState) -> Result<DispatchResult> {
    let Some(events) = state.macros.begin_playback() else {
        if state.macros.is_recording() {
            state.message("Stop recording before playing the macro");
        } else if state.macros.last_macro().is_empty() {
            state.message("No macro recorded");
        }
        return Ok(DispatchResult::dirty());
    };
    debug!(target: "actions", events = events.len(), "macro_play");
    let mut result = DispatchResult::dirty();
    let mut failure = None;
    for event in &events {
        match dispatch_event(event, state) {
            Ok(r) => {
                result = result.merge(r);
                if r.quit {
                    break;
                }
            }
            Err(e) => {
                failure = Some(e);
                break;
            }
        }
    }
    state.macros.end_playback();
    match failure {
        Some(e) => Err(e),
        None => Ok(result),
    }
}
