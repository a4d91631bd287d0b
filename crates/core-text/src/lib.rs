//! Document model: rope-backed text plus cursor, selection and viewport state.
//!
//! Offsets are *character* offsets into the rope. `line` and `column` are 1-based
//! and derived: `column` is a visual column (tabs expand to the next tab stop,
//! wide characters count two cells, see `width`). They are recomputed from
//! `position` after every mutation by `sync_cursor`, so the invariant
//! `0 <= position <= len_chars()` and line/column consistency hold after any
//! public call returns.
//!
//! Line lookup goes through ropey's line index (O(log n)); only the walk within
//! the current line is linear.
//!
//! Boundary conditions (motion past either end, deleting at a buffer edge,
//! pasting an empty clipboard, searching for an empty pattern) are policy no-ops
//! reported through a `false` return value; only decoding a file's bytes can fail.

use ropey::Rope;
use std::path::{Path, PathBuf};

pub mod edit;
pub mod encoding;
pub mod motion;
pub mod search;
pub mod width;

pub use encoding::{DecodedText, Encoding, EncodingError};
pub use motion::Direction;
pub use width::{DEFAULT_TAB_WIDTH, cell_width};

/// One open, editable text buffer plus its view, cursor and selection state.
#[derive(Debug, Clone)]
pub struct Document {
    text: Rope,
    position: usize,
    line: usize,
    column: usize,
    /// Sticky 0-based visual column for vertical motion.
    preferred_column: Option<usize>,
    /// First visible line (0-based).
    pub top: usize,
    /// First visible visual column (0-based).
    pub left: usize,
    selection_anchor: Option<usize>,
    pub filename: Option<PathBuf>,
    pub encoding: Encoding,
    pub has_bom: bool,
    pub uses_crlf: bool,
    modified: bool,
    tab_width: usize,
}

impl Default for Document {
    fn default() -> Self {
        Self::new(DEFAULT_TAB_WIDTH)
    }
}

impl Document {
    /// Empty, unnamed document.
    pub fn new(tab_width: usize) -> Self {
        Self {
            text: Rope::new(),
            position: 0,
            line: 1,
            column: 1,
            preferred_column: None,
            top: 0,
            left: 0,
            selection_anchor: None,
            filename: None,
            encoding: Encoding::Utf8,
            has_bom: false,
            uses_crlf: false,
            modified: false,
            tab_width: width::clamp_tab_width(tab_width),
        }
    }

    /// Document over in-memory text; cursor at the start, unmodified.
    pub fn from_text(text: &str, tab_width: usize) -> Self {
        let mut doc = Self::new(tab_width);
        doc.text = Rope::from_str(text);
        doc
    }

    /// Decode file bytes into a document bound to `filename`.
    pub fn open(
        bytes: &[u8],
        filename: Option<&Path>,
        tab_width: usize,
    ) -> Result<Self, EncodingError> {
        let decoded = encoding::read_text_with_encoding(bytes)?;
        let mut doc = Self::from_text(&decoded.text, tab_width);
        doc.filename = filename.map(Path::to_path_buf);
        doc.encoding = decoded.encoding;
        doc.has_bom = decoded.has_bom;
        doc.uses_crlf = decoded.uses_crlf;
        Ok(doc)
    }

    // ----------------------------------------------------------------------------------------
    // Accessors
    // ----------------------------------------------------------------------------------------

    pub fn text(&self) -> &Rope {
        &self.text
    }

    pub fn contents(&self) -> String {
        self.text.to_string()
    }

    pub fn len_chars(&self) -> usize {
        self.text.len_chars()
    }

    pub fn is_empty(&self) -> bool {
        self.text.len_chars() == 0
    }

    pub fn line_count(&self) -> usize {
        self.text.len_lines()
    }

    /// Content of the 0-based line `idx` without its trailing newline.
    pub fn line_text(&self, idx: usize) -> String {
        if idx >= self.text.len_lines() {
            return String::new();
        }
        let mut s = self.text.line(idx).to_string();
        if s.ends_with('\n') {
            s.pop();
        }
        s
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// 1-based line of the cursor.
    pub fn line(&self) -> usize {
        self.line
    }

    /// 1-based visual column of the cursor.
    pub fn column(&self) -> usize {
        self.column
    }

    pub fn preferred_column(&self) -> Option<usize> {
        self.preferred_column
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn set_modified(&mut self, modified: bool) {
        self.modified = modified;
    }

    pub fn tab_width(&self) -> usize {
        self.tab_width
    }

    pub fn set_tab_width(&mut self, tab_width: usize) {
        self.tab_width = width::clamp_tab_width(tab_width);
        self.sync_cursor();
    }

    /// Base file name for display, `[No Name]` when unnamed.
    pub fn display_name(&self) -> String {
        self.filename
            .as_deref()
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "[No Name]".to_string())
    }

    // ----------------------------------------------------------------------------------------
    // Cursor bookkeeping
    // ----------------------------------------------------------------------------------------

    /// Move the cursor to `pos` (clamped). Horizontal placement: forgets the sticky column.
    pub fn set_position(&mut self, pos: usize) -> bool {
        let pos = pos.min(self.len_chars());
        let changed = pos != self.position;
        self.position = pos;
        self.preferred_column = None;
        self.sync_cursor();
        changed
    }

    pub(crate) fn set_position_keep_column(&mut self, pos: usize) {
        self.position = pos.min(self.len_chars());
        self.sync_cursor();
    }

    /// Recompute the derived line/column from `position`.
    pub(crate) fn sync_cursor(&mut self) {
        if self.position > self.len_chars() {
            self.position = self.len_chars();
        }
        let (line, column) = self.line_col_of(self.position);
        self.line = line;
        self.column = column;
    }

    /// (1-based line, 1-based visual column) of any offset.
    pub fn line_col_of(&self, pos: usize) -> (usize, usize) {
        let pos = pos.min(self.len_chars());
        let line_idx = self.text.char_to_line(pos);
        let start = self.text.line_to_char(line_idx);
        let col = width::visual_width(self.text.slice(start..pos).chars(), self.tab_width);
        (line_idx + 1, col + 1)
    }

    /// Inverse of `line_col_of`: offset for a 1-based (line, visual column), clamped to
    /// the line's end. A column inside a tab or wide character maps to that character.
    pub fn position_of(&self, line: usize, column: usize) -> usize {
        let line_idx = line.saturating_sub(1).min(self.line_count().saturating_sub(1));
        self.offset_for_visual_col(line_idx, column.saturating_sub(1))
    }

    /// Offset on 0-based `line_idx` whose cell span covers visual column `target`.
    pub fn offset_for_visual_col(&self, line_idx: usize, target: usize) -> usize {
        let start = self.line_start_offset(line_idx);
        let mut col = 0;
        let mut pos = start;
        for c in self.text.line(line_idx).chars() {
            if c == '\n' {
                break;
            }
            let w = cell_width(c, col, self.tab_width);
            if col + w > target {
                return pos;
            }
            col += w;
            pos += 1;
        }
        pos
    }

    /// Offset of the first character of 0-based `line_idx`.
    pub fn line_start_offset(&self, line_idx: usize) -> usize {
        let line_idx = line_idx.min(self.line_count().saturating_sub(1));
        self.text.line_to_char(line_idx)
    }

    /// Offset just before the newline ending 0-based `line_idx` (or the buffer end).
    pub fn line_end_offset(&self, line_idx: usize) -> usize {
        let line_idx = line_idx.min(self.line_count().saturating_sub(1));
        if line_idx + 1 < self.line_count() {
            self.text.line_to_char(line_idx + 1) - 1
        } else {
            self.len_chars()
        }
    }

    pub(crate) fn char_at(&self, pos: usize) -> Option<char> {
        if pos < self.len_chars() {
            Some(self.text.char(pos))
        } else {
            None
        }
    }

    // ----------------------------------------------------------------------------------------
    // Selection
    // ----------------------------------------------------------------------------------------

    pub fn selection_anchor(&self) -> Option<usize> {
        self.selection_anchor
    }

    /// Start a selection at the cursor unless one is already anchored.
    pub fn begin_selection(&mut self) {
        if self.selection_anchor.is_none() {
            self.selection_anchor = Some(self.position);
        }
    }

    pub fn set_selection_anchor(&mut self, anchor: Option<usize>) {
        self.selection_anchor = anchor.map(|a| a.min(self.len_chars()));
    }

    pub fn clear_selection(&mut self) -> bool {
        self.selection_anchor.take().is_some()
    }

    /// Ordered, non-empty selected range `[start, end)`.
    pub fn selection(&self) -> Option<(usize, usize)> {
        let anchor = self.selection_anchor?.min(self.len_chars());
        if anchor == self.position {
            return None;
        }
        Some((anchor.min(self.position), anchor.max(self.position)))
    }

    pub fn has_selection(&self) -> bool {
        self.selection().is_some()
    }

    pub fn selected_text(&self) -> Option<String> {
        self.selection()
            .map(|(s, e)| self.text.slice(s..e).to_string())
    }

    pub fn select_all(&mut self) -> bool {
        if self.is_empty() {
            return false;
        }
        self.selection_anchor = Some(0);
        self.set_position(self.len_chars());
        true
    }

    // ----------------------------------------------------------------------------------------
    // Save support
    // ----------------------------------------------------------------------------------------

    /// Text as it will be written: trailing spaces/tabs removed from every line.
    pub fn trimmed_text(&self) -> String {
        let mut out = String::with_capacity(self.text.len_bytes());
        for idx in 0..self.line_count() {
            let line = self.line_text(idx);
            out.push_str(line.trim_end_matches([' ', '\t']));
            if idx + 1 < self.line_count() {
                out.push('\n');
            }
        }
        out
    }

    /// Encode the document for writing. Does not touch in-memory state; call
    /// `finish_save` once the bytes are safely on disk.
    pub fn save(&self, trim_trailing_whitespace: bool) -> (Vec<u8>, String) {
        let text = if trim_trailing_whitespace {
            self.trimmed_text()
        } else {
            self.contents()
        };
        let bytes =
            encoding::write_text_with_encoding(&text, self.encoding, self.has_bom, self.uses_crlf);
        (bytes, text)
    }

    /// Adopt the text that was written and restore the cursor from line/column.
    pub fn finish_save(&mut self, saved_text: &str) {
        let (line, column) = (self.line, self.column);
        if self.text != saved_text {
            self.text = Rope::from_str(saved_text);
            self.selection_anchor = None;
        }
        self.position = self.position_of(line, column);
        self.sync_cursor();
        self.modified = false;
    }
}
