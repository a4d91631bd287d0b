//! Command-line prompts: open, save as, find, replace, go to line, confirm close.
//!
//! While a prompt is open, motions and edits apply to the one-line
//! command-line document; Enter submits what was typed and Esc abandons it.

use super::DispatchResult;
use super::document::{find_next, save_active};
use super::edit::handle_edit;
use super::motion::handle_motion;
use crate::io_ops::{OpenOutcome, open_document};
use crate::{Action, EditKind};
use anyhow::Result;
use core_state::{EditorState, PromptKind};
use std::path::Path;
use tracing::debug;

pub(crate) fn handle_prompt_action(
    action: Action,
    state: &mut EditorState,
) -> Result<DispatchResult> {
    let Some(prompt) = state.command_line.kind() else {
        return Ok(DispatchResult::clean());
    };
    if prompt == PromptKind::ConfirmClose {
        return Ok(confirm_close(action, state));
    }
    let result = match action {
        Action::Cancel => {
            state.command_line.close();
            DispatchResult::dirty()
        }
        Action::PromptSubmit => submit(prompt, state)?,
        Action::Motion { kind, extend } => {
            DispatchResult::changed(handle_motion(kind, extend, &mut state.command_line.doc, 1))
        }
        Action::Edit(kind) => DispatchResult::changed(handle_edit(kind, state)),
        _ => DispatchResult::clean(),
    };
    Ok(result)
}

/// `y` discards the active document's changes and closes it; anything else keeps it.
fn confirm_close(action: Action, state: &mut EditorState) -> DispatchResult {
    state.command_line.close();
    if matches!(action, Action::Edit(EditKind::InsertChar('y' | 'Y'))) {
        state.close_active();
    }
    DispatchResult::dirty()
}

fn submit(kind: PromptKind, state: &mut EditorState) -> Result<DispatchResult> {
    let input = state.command_line.close();
    debug!(target: "actions", ?kind, len = input.len(), "prompt_submit");
    let result = match kind {
        PromptKind::Open => match input.trim() {
            "" => DispatchResult::dirty(),
            path => open_path(state, Path::new(path))?,
        },
        PromptKind::SaveAs => match input.trim() {
            "" => DispatchResult::dirty(),
            path => save_active(state, Some(Path::new(path)))?,
        },
        PromptKind::Find => {
            if !input.is_empty() {
                state.search.pattern = input;
            }
            find_next(state)
        }
        PromptKind::ReplaceSearch { all } => {
            if !input.is_empty() {
                state.search.pattern = input;
                let initial = state.search.replacement.clone();
                state.open_prompt(PromptKind::ReplaceWith { all }, &initial);
            }
            DispatchResult::dirty()
        }
        PromptKind::ReplaceWith { all } => {
            state.search.replacement = input;
            replace(state, all)
        }
        PromptKind::GotoLine => {
            match input.trim().parse::<usize>() {
                Ok(n) if n > 0 => {
                    let doc = state.doc_mut();
                    doc.clear_selection();
                    doc.move_to_line(n);
                }
                _ => state.message("Invalid line number"),
            }
            DispatchResult::dirty()
        }
        PromptKind::ConfirmClose => DispatchResult::dirty(),
    };
    Ok(result)
}

fn replace(state: &mut EditorState, all: bool) -> DispatchResult {
    let case_sensitive = state.search.case_sensitive();
    let pattern = state.search.pattern.clone();
    let replacement = state.search.replacement.clone();
    if all {
        let n = state.doc_mut().replace_all(&pattern, &replacement, case_sensitive);
        state.message(format!("Replaced {n} occurrence(s)"));
    } else if !state.doc_mut().replace(&pattern, &replacement, case_sensitive) {
        state.message(format!("Not found: {pattern}"));
    }
    DispatchResult::dirty()
}

/// Open `path` as a document, or switch to it when it is already open. A
/// missing file becomes a new document bound to the path; an undecodable one
/// is reported on the status line. Read failures are returned as errors.
pub fn open_path(state: &mut EditorState, path: &Path) -> Result<DispatchResult> {
    if let Some(index) = state.find_by_path(path) {
        state.set_active(index);
        return Ok(DispatchResult::dirty());
    }
    match open_document(path, state.settings.tab_width)? {
        OpenOutcome::Opened(doc) => {
            state.add_or_replace_scratch(doc);
        }
        OpenOutcome::Created(doc) => {
            state.add_or_replace_scratch(doc);
            state.message(format!("New file {}", path.display()));
        }
        OpenOutcome::Undecodable(e) => {
            state.message(format!("Cannot open {}: {e}", path.display()));
        }
    }
    Ok(DispatchResult::dirty())
}
