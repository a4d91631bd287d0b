//! Editor-level commands: document lifecycle, search, completion, history.

use super::DispatchResult;
use crate::Action;
use crate::io_ops::save_document;
use anyhow::Result;
use core_state::{CompletionSession, EditorState, PromptKind};
use std::path::Path;
use tracing::{debug, info};

pub(crate) fn handle_document_action(
    action: Action,
    state: &mut EditorState,
) -> Result<DispatchResult> {
    let result = match action {
        Action::NewDocument => {
            state.new_document();
            DispatchResult::dirty()
        }
        Action::OpenPrompt => prompt(state, PromptKind::Open, ""),
        Action::Save => {
            if state.doc().filename.is_none() {
                prompt(state, PromptKind::SaveAs, "")
            } else {
                save_active(state, None)?
            }
        }
        Action::SaveAll => save_all(state)?,
        Action::Close => {
            if state.doc().is_modified() {
                prompt(state, PromptKind::ConfirmClose, "")
            } else {
                state.close_active();
                DispatchResult::dirty()
            }
        }
        Action::SwitchDocument(delta) => DispatchResult::changed(state.switch_document(delta)),
        Action::FindPrompt => {
            let initial = state.search.pattern.clone();
            prompt(state, PromptKind::Find, &initial)
        }
        Action::FindNext if state.search.pattern.is_empty() => prompt(state, PromptKind::Find, ""),
        Action::FindNext => find_next(state),
        Action::ReplacePrompt { all } => {
            let initial = state.search.pattern.clone();
            prompt(state, PromptKind::ReplaceSearch { all }, &initial)
        }
        Action::GotoLinePrompt => prompt(state, PromptKind::GotoLine, ""),
        Action::Complete { forward } => complete(state, forward),
        Action::HistoryBack => walk_history(state, true),
        Action::HistoryForward => walk_history(state, false),
        _ => DispatchResult::clean(),
    };
    Ok(result)
}

fn prompt(state: &mut EditorState, kind: PromptKind, initial: &str) -> DispatchResult {
    state.open_prompt(kind, initial);
    DispatchResult::dirty()
}

/// Save the active document to `target` (or its own name). An unnamed
/// document with no target opens the save-as prompt instead.
pub(crate) fn save_active(
    state: &mut EditorState,
    target: Option<&Path>,
) -> Result<DispatchResult> {
    let trim = state.settings.trim_trailing_whitespace;
    let open = state.active_doc_mut();
    let Some(bytes) = save_document(&mut open.doc, target, trim)? else {
        return Ok(prompt(state, PromptKind::SaveAs, ""));
    };
    open.reclassify();
    let name = open.doc.display_name();
    state.message(format!("Saved {name} ({bytes} bytes)"));
    Ok(DispatchResult::dirty())
}

/// Save every modified named document. Unnamed ones are skipped and counted.
fn save_all(state: &mut EditorState) -> Result<DispatchResult> {
    let trim = state.settings.trim_trailing_whitespace;
    let mut saved = 0;
    let mut unnamed = 0;
    for open in state.documents.iter_mut().filter(|d| d.doc.is_modified()) {
        match save_document(&mut open.doc, None, trim)? {
            Some(_) => saved += 1,
            None => unnamed += 1,
        }
    }
    info!(target: "io", saved, unnamed, "save_all");
    if unnamed > 0 {
        state.message(format!("Saved {saved} document(s), {unnamed} unnamed skipped"));
    } else {
        state.message(format!("Saved {saved} document(s)"));
    }
    Ok(DispatchResult::dirty())
}

/// Search forward from the cursor for the remembered pattern, wrapping.
pub(crate) fn find_next(state: &mut EditorState) -> DispatchResult {
    let case_sensitive = state.search.case_sensitive();
    let pattern = state.search.pattern.clone();
    if !state.doc_mut().find(&pattern, case_sensitive, true) {
        state.message(format!("Not found: {pattern}"));
    }
    DispatchResult::dirty()
}

fn complete(state: &mut EditorState, forward: bool) -> DispatchResult {
    if state.completion.is_none() {
        state.completion = CompletionSession::start(state.doc());
        if state.completion.is_none() {
            state.message("No completions");
            return DispatchResult::dirty();
        }
    }
    let active = state.active;
    let changed = match state.completion.as_mut() {
        Some(session) => session.cycle(&mut state.documents[active].doc, forward),
        None => false,
    };
    DispatchResult::changed(changed)
}

/// Walk navigation history. When the cursor has drifted from the marker under
/// the pointer (within the jump threshold), "back" first returns to that marker.
fn walk_history(state: &mut EditorState, back: bool) -> DispatchResult {
    let here = state.location();
    let target = match state.history.current() {
        Some(marker) if back && marker != here => Some(marker),
        _ if back => state.history.back(),
        _ => state.history.forward(),
    };
    let Some(loc) = target else {
        return DispatchResult::clean();
    };
    let Some(index) = state.index_of(loc.doc) else {
        return DispatchResult::clean();
    };
    state.set_active(index);
    let doc = state.doc_mut();
    doc.clear_selection();
    doc.move_to_line(loc.line);
    debug!(target: "actions", doc = loc.doc, line = loc.line, back, "history_walk");
    DispatchResult::dirty()
}
