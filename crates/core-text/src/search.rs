//! Literal search and replace.
//!
//! Patterns are literal text; case-insensitive matching uses `regex` over an
//! escaped pattern so Unicode case folding matches what users expect. A match
//! leaves the cursor on its first character and anchors the selection at its end,
//! which lets `replace` recognise "the current match" on the next call.

use crate::Document;
use regex::{Regex, RegexBuilder};

fn compile(pattern: &str, case_sensitive: bool) -> Option<Regex> {
    RegexBuilder::new(&regex::escape(pattern))
        .case_insensitive(!case_sensitive)
        .build()
        .map_err(|e| tracing::warn!(target: "text.search", ?e, "pattern_compile_failed"))
        .ok()
}

impl Document {
    /// Search forward from just past the cursor, wrapping to the start when `wrap` is
    /// set. Returns `false` (cursor untouched) for an empty or absent pattern.
    pub fn find(&mut self, pattern: &str, case_sensitive: bool, wrap: bool) -> bool {
        if pattern.is_empty() {
            return false;
        }
        let Some(re) = compile(pattern, case_sensitive) else {
            return false;
        };
        let haystack = self.contents();
        let from_char = (self.position() + 1).min(self.len_chars());
        let from_byte = self.text.char_to_byte(from_char);
        let found = re
            .find_at(&haystack, from_byte)
            .or_else(|| if wrap { re.find(&haystack) } else { None });
        let Some(m) = found else {
            return false;
        };
        let start = self.text.byte_to_char(m.start());
        let end = self.text.byte_to_char(m.end());
        self.set_position(start);
        self.set_selection_anchor(Some(end));
        true
    }

    /// True when the selection is exactly one match of `pattern`.
    fn selection_matches(&self, pattern: &str, case_sensitive: bool) -> bool {
        let Some(selected) = self.selected_text() else {
            return false;
        };
        match compile(pattern, case_sensitive) {
            Some(re) => re
                .find(&selected)
                .is_some_and(|m| m.start() == 0 && m.end() == selected.len()),
            None => false,
        }
    }

    /// Replace the current match (if the selection is one) and move to the next match.
    pub fn replace(&mut self, pattern: &str, replacement: &str, case_sensitive: bool) -> bool {
        if pattern.is_empty() {
            return false;
        }
        let mut changed = false;
        if self.selection_matches(pattern, case_sensitive) {
            if let Some((start, end)) = self.selection() {
                changed = self.replace_range(start, end, replacement);
                // continue searching from the end of the replacement
                let after = self.position();
                self.set_position(after.saturating_sub(1));
            }
        }
        let found = self.find(pattern, case_sensitive, true);
        changed || found
    }

    /// Replace every match; returns the count. The cursor keeps its line/column.
    pub fn replace_all(&mut self, pattern: &str, replacement: &str, case_sensitive: bool) -> usize {
        if pattern.is_empty() {
            return 0;
        }
        let Some(re) = compile(pattern, case_sensitive) else {
            return 0;
        };
        let haystack = self.contents();
        let count = re.find_iter(&haystack).count();
        if count == 0 {
            return 0;
        }
        let replaced = re.replace_all(&haystack, regex::NoExpand(replacement));
        let (line, column) = (self.line(), self.column());
        self.text = ropey::Rope::from_str(&replaced);
        self.selection_anchor = None;
        self.modified = true;
        let pos = self.position_of(line, column);
        self.set_position(pos);
        tracing::debug!(target: "text.search", count, "replace_all");
        count
    }
}
