//! Visual column width engine.
//!
//! Every column decision (document line/column, vertical motion, renderer tab
//! expansion, cursor placement) flows through `cell_width` so the document and
//! the screen can never disagree about where a character lands.
//!
//! Rules:
//! * A tab advances to the next multiple of the tab width.
//! * Characters `unicode-width` reports as double width occupy two cells.
//! * Everything else (including zero-width and control characters, which the
//!   renderer substitutes with a visible placeholder) occupies exactly one cell.

use unicode_width::UnicodeWidthChar;

pub const DEFAULT_TAB_WIDTH: usize = 4;
pub const MAX_TAB_WIDTH: usize = 16;

/// Clamp a configured tab width into the supported range.
pub fn clamp_tab_width(width: usize) -> usize {
    width.clamp(1, MAX_TAB_WIDTH)
}

/// Number of cells `c` occupies when it starts at visual column `col`.
#[inline]
pub fn cell_width(c: char, col: usize, tab_width: usize) -> usize {
    if c == '\t' {
        let tab = tab_width.max(1);
        return tab - col % tab;
    }
    match c.width() {
        Some(2) => 2,
        _ => 1,
    }
}

/// True when the character cannot be drawn as-is in a single terminal cell.
pub fn needs_placeholder(c: char) -> bool {
    c != '\t' && matches!(c.width(), None | Some(0))
}

/// Visual column reached after laying out `chars` from column 0.
pub fn visual_width<I: IntoIterator<Item = char>>(chars: I, tab_width: usize) -> usize {
    chars
        .into_iter()
        .fold(0, |col, c| col + cell_width(c, col, tab_width))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tabs_round_up_to_next_stop() {
        assert_eq!(cell_width('\t', 0, 4), 4);
        assert_eq!(cell_width('\t', 1, 4), 3);
        assert_eq!(cell_width('\t', 4, 4), 4);
        assert_eq!(cell_width('\t', 7, 8), 1);
    }

    #[test]
    fn wide_and_narrow_chars() {
        assert_eq!(cell_width('a', 0, 4), 1);
        assert_eq!(cell_width('漢', 0, 4), 2);
        assert_eq!(cell_width('\u{301}', 0, 4), 1);
        assert!(needs_placeholder('\u{301}'));
        assert!(needs_placeholder('\u{7}'));
        assert!(!needs_placeholder('x'));
    }

    #[test]
    fn visual_width_mixed() {
        assert_eq!(visual_width("a\tb".chars(), 4), 5);
        assert_eq!(visual_width("漢字".chars(), 4), 4);
        assert_eq!(clamp_tab_width(0), 1);
        assert_eq!(clamp_tab_width(99), MAX_TAB_WIDTH);
    }
}
