//! Text mutation on the focused document (the command line while prompting).

use crate::EditKind;
use core_state::EditorState;

pub(crate) fn handle_edit(kind: EditKind, state: &mut EditorState) -> bool {
    let single_line = state.command_line.is_active();
    let (doc, clipboard) = state.focus_and_clipboard();
    let changed = match kind {
        EditKind::InsertChar(c) => doc.insert_char(c),
        EditKind::Newline if single_line => false,
        EditKind::Newline => doc.insert_char('\n'),
        EditKind::Tab => doc.insert_char('\t'),
        EditKind::LiteralTab => doc.insert_literal_tab(),
        EditKind::Backspace => doc.delete_char_back(),
        EditKind::Delete => doc.delete_char_forward(),
        EditKind::DeleteWordBack => doc.delete_word_back(),
        EditKind::DeleteWordForward => doc.delete_word_forward(),
        EditKind::Copy => doc.copy_or_cut_selection(true, clipboard),
        EditKind::Cut => doc.copy_or_cut_selection(false, clipboard),
        EditKind::Paste if single_line => {
            let first = clipboard.lines().next().unwrap_or_default();
            doc.paste(first)
        }
        EditKind::Paste => doc.paste(clipboard),
        EditKind::SelectAll => doc.select_all(),
    };
    match kind {
        EditKind::InsertChar(_) => tracing::trace!(target: "actions", changed, "insert_char"),
        _ => tracing::trace!(target: "actions", ?kind, changed, "edit"),
    }
    changed
}
