//! Cursor movement and mouse placement.

use crate::MotionKind;
use core_text::{Direction, Document};

/// Apply a motion; `extend` anchors (or keeps) a selection, otherwise any
/// selection is dropped. Returns whether anything visible changed.
pub(crate) fn handle_motion(
    kind: MotionKind,
    extend: bool,
    doc: &mut Document,
    page_rows: usize,
) -> bool {
    let selection_changed = if extend {
        let had = doc.selection_anchor().is_some();
        doc.begin_selection();
        !had
    } else {
        doc.clear_selection()
    };
    let page = page_rows.max(1) as isize;
    let moved = match kind {
        MotionKind::Left => doc.move_char(Direction::Backward),
        MotionKind::Right => doc.move_char(Direction::Forward),
        MotionKind::Up => doc.move_line(-1),
        MotionKind::Down => doc.move_line(1),
        MotionKind::WordLeft => doc.move_word(Direction::Backward),
        MotionKind::WordRight => doc.move_word(Direction::Forward),
        MotionKind::LineStart => doc.move_to_line_start(),
        MotionKind::LineEnd => doc.move_to_line_end(),
        MotionKind::DocumentStart => doc.move_to_start(),
        MotionKind::DocumentEnd => doc.move_to_end(),
        MotionKind::PageUp => doc.move_page(-page),
        MotionKind::PageDown => doc.move_page(page),
    };
    moved || selection_changed
}

/// Mouse press/drag inside the text area. Rows at or below `text_rows` (the
/// status row) are ignored.
pub(crate) fn handle_pointer(
    doc: &mut Document,
    row: usize,
    col: usize,
    text_rows: usize,
    select: bool,
) -> bool {
    if row >= text_rows {
        return false;
    }
    let selection_changed = if select {
        let had = doc.selection_anchor().is_some();
        doc.begin_selection();
        !had
    } else {
        doc.clear_selection()
    };
    doc.move_to_screen(row, col) || selection_changed
}
