//! Cursor motion.
//!
//! Every motion returns whether `position` changed. Horizontal motions forget the
//! sticky column; vertical motions (`move_line`, `move_to_line`, `move_page`)
//! record it on first use and aim for it on every subsequent line, clamping to
//! the end of shorter lines. The sticky column survives until the next
//! horizontal motion or edit, so moving through a short line and back out
//! restores the original column.
//!
//! Word boundaries are transitions between whitespace and non-whitespace.

use crate::Document;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Document {
    /// Move one character (crossing line breaks).
    pub fn move_char(&mut self, dir: Direction) -> bool {
        match dir {
            Direction::Forward if self.position() < self.len_chars() => {
                self.set_position(self.position() + 1)
            }
            Direction::Backward if self.position() > 0 => self.set_position(self.position() - 1),
            _ => false,
        }
    }

    /// Offset reached by a word motion from `from`.
    pub(crate) fn word_target(&self, from: usize, dir: Direction) -> usize {
        let len = self.len_chars();
        let is_ws = |c: char| c.is_whitespace();
        let mut p = from;
        match dir {
            Direction::Forward => {
                while p < len && !self.char_at(p).is_some_and(is_ws) {
                    p += 1;
                }
                while p < len && self.char_at(p).is_some_and(is_ws) {
                    p += 1;
                }
            }
            Direction::Backward => {
                while p > 0 && self.char_at(p - 1).is_some_and(is_ws) {
                    p -= 1;
                }
                while p > 0 && !self.char_at(p - 1).is_some_and(is_ws) {
                    p -= 1;
                }
            }
        }
        p
    }

    /// Forward: to the start of the next word. Backward: to the start of the current
    /// (or previous) word.
    pub fn move_word(&mut self, dir: Direction) -> bool {
        let target = self.word_target(self.position(), dir);
        self.set_position(target)
    }

    /// Move `delta` lines up (negative) or down, aiming for the sticky column.
    pub fn move_line(&mut self, delta: isize) -> bool {
        let current = self.line() - 1;
        let last = self.line_count() - 1;
        let target = if delta < 0 {
            current.saturating_sub(delta.unsigned_abs())
        } else {
            current.saturating_add(delta as usize).min(last)
        };
        if target == current {
            return false;
        }
        self.jump_to_line_index(target)
    }

    /// Jump to the 1-based line `n` (clamped to the document).
    pub fn move_to_line(&mut self, n: usize) -> bool {
        let target = n.max(1).min(self.line_count()) - 1;
        self.jump_to_line_index(target)
    }

    /// Page motion: same column policy as `move_line`.
    pub fn move_page(&mut self, delta_lines: isize) -> bool {
        self.move_line(delta_lines)
    }

    fn jump_to_line_index(&mut self, line_idx: usize) -> bool {
        let sticky = match self.preferred_column() {
            Some(col) => col,
            None => self.column() - 1,
        };
        let before = self.position();
        let pos = self.offset_for_visual_col(line_idx, sticky);
        self.set_position_keep_column(pos);
        self.set_preferred_column(Some(sticky));
        self.position() != before
    }

    pub(crate) fn set_preferred_column(&mut self, col: Option<usize>) {
        self.preferred_column = col;
    }

    pub fn move_to_line_start(&mut self) -> bool {
        let start = self.line_start_offset(self.line() - 1);
        self.set_position(start)
    }

    pub fn move_to_line_end(&mut self) -> bool {
        let end = self.line_end_offset(self.line() - 1);
        self.set_position(end)
    }

    pub fn move_to_start(&mut self) -> bool {
        self.set_position(0)
    }

    pub fn move_to_end(&mut self) -> bool {
        self.set_position(self.len_chars())
    }

    /// Place the cursor at a viewport cell (0-based row/column relative to `top`/`left`).
    pub fn move_to_screen(&mut self, row: usize, col: usize) -> bool {
        let line_idx = (self.top + row).min(self.line_count() - 1);
        let pos = self.offset_for_visual_col(line_idx, self.left + col);
        self.set_position(pos)
    }
}
