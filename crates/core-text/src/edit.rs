//! Text mutation and clipboard operations.
//!
//! All edits clear the selection (after consuming it where applicable), forget the
//! sticky column and mark the document modified. Deletions at a buffer boundary
//! and pastes of an empty clipboard return `false` without touching anything.

use crate::Document;
use crate::motion::Direction;

impl Document {
    /// Insert `text` at the cursor and advance past it. Replaces a non-empty selection.
    pub fn insert_str(&mut self, text: &str) -> bool {
        let removed = self.delete_selection();
        if text.is_empty() {
            return removed;
        }
        let at = self.position();
        self.text.insert(at, text);
        self.modified = true;
        self.set_position(at + text.chars().count());
        true
    }

    /// Typed character. `\n` copies the current line's leading whitespace; `\t` becomes
    /// `tab_width` spaces (use `insert_literal_tab` for a real tab).
    pub fn insert_char(&mut self, ch: char) -> bool {
        match ch {
            '\n' => {
                self.delete_selection();
                let indent = self.leading_whitespace_before_cursor();
                let mut s = String::with_capacity(indent.len() + 1);
                s.push('\n');
                s.push_str(&indent);
                self.insert_str(&s)
            }
            '\t' => {
                let spaces = " ".repeat(self.tab_width());
                self.insert_str(&spaces)
            }
            c => {
                let mut buf = [0u8; 4];
                self.insert_str(c.encode_utf8(&mut buf))
            }
        }
    }

    pub fn insert_literal_tab(&mut self) -> bool {
        self.insert_str("\t")
    }

    fn leading_whitespace_before_cursor(&self) -> String {
        let start = self.line_start_offset(self.line() - 1);
        self.text
            .slice(start..self.position())
            .chars()
            .take_while(|c| *c == ' ' || *c == '\t')
            .collect()
    }

    /// Remove `[start, end)` and leave the cursor at `start`.
    pub fn delete_range(&mut self, start: usize, end: usize) -> bool {
        let end = end.min(self.len_chars());
        if start >= end {
            return false;
        }
        self.text.remove(start..end);
        self.selection_anchor = None;
        self.modified = true;
        self.set_position(start);
        true
    }

    /// Replace `[start, end)` with `text`, cursor after the inserted text.
    pub fn replace_range(&mut self, start: usize, end: usize, text: &str) -> bool {
        let end = end.min(self.len_chars());
        let start = start.min(end);
        if start == end && text.is_empty() {
            return false;
        }
        if start < end {
            self.text.remove(start..end);
        }
        self.text.insert(start, text);
        self.selection_anchor = None;
        self.modified = true;
        self.set_position(start + text.chars().count());
        true
    }

    /// Delete the selected text, if any.
    pub fn delete_selection(&mut self) -> bool {
        match self.selection() {
            Some((start, end)) => self.delete_range(start, end),
            None => {
                self.selection_anchor = None;
                false
            }
        }
    }

    pub fn delete_char_forward(&mut self) -> bool {
        if self.delete_selection() {
            return true;
        }
        let at = self.position();
        self.delete_range(at, at + 1)
    }

    pub fn delete_char_back(&mut self) -> bool {
        if self.delete_selection() {
            return true;
        }
        let at = self.position();
        if at == 0 {
            return false;
        }
        self.delete_range(at - 1, at)
    }

    pub fn delete_word_forward(&mut self) -> bool {
        if self.delete_selection() {
            return true;
        }
        let at = self.position();
        let end = self.word_target(at, Direction::Forward);
        self.delete_range(at, end)
    }

    pub fn delete_word_back(&mut self) -> bool {
        if self.delete_selection() {
            return true;
        }
        let at = self.position();
        let start = self.word_target(at, Direction::Backward);
        self.delete_range(start, at)
    }

    /// Copy (or cut) the selection into `clipboard`. Without a selection the whole
    /// current line, including its newline, is used. The selection is cleared.
    pub fn copy_or_cut_selection(&mut self, copy: bool, clipboard: &mut String) -> bool {
        let (start, end) = match self.selection() {
            Some(range) => range,
            None => {
                let line_idx = self.line() - 1;
                let start = self.line_start_offset(line_idx);
                let end = if line_idx + 1 < self.line_count() {
                    self.line_start_offset(line_idx + 1)
                } else {
                    self.len_chars()
                };
                (start, end)
            }
        };
        self.selection_anchor = None;
        if start == end {
            return false;
        }
        *clipboard = self.text.slice(start..end).to_string();
        tracing::trace!(target: "text.clipboard", copy, len = clipboard.len(), "clipboard_write");
        if !copy {
            self.delete_range(start, end);
        }
        true
    }

    /// Insert the clipboard at the cursor. Empty clipboard is a no-op.
    pub fn paste(&mut self, clipboard: &str) -> bool {
        if clipboard.is_empty() {
            return false;
        }
        self.insert_str(clipboard)
    }

    /// Identifier-like prefix ending at the cursor: `(start_offset, prefix)`.
    pub fn word_prefix_at_cursor(&self) -> (usize, String) {
        let end = self.position();
        let mut start = end;
        while start > 0 {
            match self.char_at(start - 1) {
                Some(c) if c == '_' || c.is_alphanumeric() => start -= 1,
                _ => break,
            }
        }
        (start, self.text.slice(start..end).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn typed(doc: &mut Document, s: &str) {
        for c in s.chars() {
            doc.insert_char(c);
        }
    }

    #[test]
    fn tab_expands_to_spaces() {
        let mut d = Document::new(4);
        typed(&mut d, "a\tb");
        assert_eq!(d.contents(), "a    b");
        assert!(d.is_modified());
    }

    #[test]
    fn literal_tab_inserts_tab_character() {
        let mut d = Document::new(4);
        d.insert_char('a');
        d.insert_literal_tab();
        d.insert_char('b');
        assert_eq!(d.contents(), "a\tb");
        assert_eq!(d.column(), 6);
    }

    #[test]
    fn newline_copies_leading_whitespace() {
        let mut d = Document::from_text("    if x {", 4);
        d.move_to_line_end();
        d.insert_char('\n');
        assert_eq!(d.contents(), "    if x {\n    ");
        assert_eq!((d.line(), d.column()), (2, 5));
    }

    #[test]
    fn newline_inside_indent_copies_only_prefix() {
        let mut d = Document::from_text("\t\tx", 4);
        d.set_position(1);
        d.insert_char('\n');
        assert_eq!(d.contents(), "\t\n\t\tx");
    }

    #[test]
    fn deletes_are_noops_at_bounds() {
        let mut d = Document::from_text("ab", 4);
        assert!(!d.delete_char_back());
        assert!(!d.delete_word_back());
        d.move_to_end();
        assert!(!d.delete_char_forward());
        assert!(!d.delete_word_forward());
        assert!(!d.is_modified());
    }

    #[test]
    fn backspace_joins_lines() {
        let mut d = Document::from_text("ab\ncd", 4);
        d.set_position(3);
        assert!(d.delete_char_back());
        assert_eq!(d.contents(), "abcd");
        assert_eq!((d.line(), d.column()), (1, 3));
    }

    #[test]
    fn word_deletes() {
        let mut d = Document::from_text("alpha beta gamma", 4);
        d.set_position(6);
        assert!(d.delete_word_forward());
        assert_eq!(d.contents(), "alpha gamma");
        d.move_to_end();
        assert!(d.delete_word_back());
        assert_eq!(d.contents(), "alpha ");
    }

    #[test]
    fn copy_without_selection_takes_whole_line() {
        let mut d = Document::from_text("one\ntwo\nthree", 4);
        d.set_position(5);
        let mut clip = String::new();
        assert!(d.copy_or_cut_selection(true, &mut clip));
        assert_eq!(clip, "two\n");
        assert_eq!(d.contents(), "one\ntwo\nthree");
        assert!(d.copy_or_cut_selection(false, &mut clip));
        assert_eq!(d.contents(), "one\nthree");
        assert_eq!(d.line(), 2);
    }

    #[test]
    fn cut_selection_then_paste() {
        let mut d = Document::from_text("hello world", 4);
        d.set_selection_anchor(Some(0));
        d.set_position(6);
        let mut clip = String::new();
        assert!(d.copy_or_cut_selection(false, &mut clip));
        assert_eq!(clip, "hello ");
        assert_eq!(d.contents(), "world");
        assert_eq!(d.selection_anchor(), None);
        d.move_to_end();
        assert!(d.paste(&clip));
        assert_eq!(d.contents(), "worldhello ");
        assert_eq!(d.position(), 11);
        assert!(!d.paste(""));
    }

    #[test]
    fn typing_replaces_selection() {
        let mut d = Document::from_text("abc", 4);
        d.select_all();
        d.insert_char('x');
        assert_eq!(d.contents(), "x");
    }

    #[test]
    fn word_prefix() {
        let mut d = Document::from_text("let foo_ba", 4);
        d.move_to_end();
        assert_eq!(d.word_prefix_at_cursor(), (4, "foo_ba".to_string()));
        d.set_position(4);
        assert_eq!(d.word_prefix_at_cursor(), (4, String::new()));
    }
}
