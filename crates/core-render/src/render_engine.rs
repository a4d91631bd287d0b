//! Frame production: scroll, fill the window grid, diff, write runs, swap.

use crate::diff::{Run, diff_runs};
use crate::status::StatusLine;
use crate::style::Style;
use crate::viewport::scroll_into_view;
use crate::writer::Writer;
use crate::{Cell, Grid};
use anyhow::Result;
use core_syntax::{Category, Highlighter, highlight_prefix};
use core_text::Document;
use core_text::width::{cell_width, needs_placeholder, visual_width};
use std::io::Write;
use tracing::debug;

const PLACEHOLDER: char = '?';

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Positioned writes emitted.
    pub runs: usize,
    /// Cells covered by those writes.
    pub cells: usize,
    pub full: bool,
}

pub struct RenderEngine {
    width: u16,
    height: u16,
    /// Frame being built.
    window: Grid,
    /// What the terminal currently shows.
    screen: Grid,
    force_full: bool,
    cursor: (u16, u16),
}

impl RenderEngine {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            window: Grid::new(width, height),
            screen: Grid::new(width, height),
            force_full: true,
            cursor: (0, 0),
        }
    }

    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Rows available to document text (the last row is the status row).
    pub fn text_rows(&self) -> usize {
        self.height.saturating_sub(1) as usize
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.window = Grid::new(width, height);
        self.screen = Grid::new(width, height);
        self.force_full = true;
        debug!(target: "render", width, height, "resize");
    }

    /// Forget what the terminal shows; the next frame clears and repaints.
    pub fn invalidate(&mut self) {
        self.force_full = true;
    }

    /// Last frame as displayed.
    pub fn screen(&self) -> &Grid {
        &self.screen
    }

    /// Terminal cursor placed by the last frame.
    pub fn cursor(&self) -> (u16, u16) {
        self.cursor
    }

    pub fn render<W: Write>(
        &mut self,
        out: &mut W,
        doc: &mut Document,
        highlighter: Option<&mut dyn Highlighter>,
        status: &StatusLine,
    ) -> Result<FrameStats> {
        if self.width == 0 || self.height == 0 {
            return Ok(FrameStats::default());
        }
        let rows = self.text_rows();
        scroll_into_view(doc, self.width as usize, rows);

        self.fill_text(doc, highlighter);
        self.fill_status(status);

        let full = self.force_full;
        if full {
            self.screen = Grid::new(self.width, self.height);
            self.force_full = false;
        }
        let runs = diff_runs(&self.window, &self.screen);
        let cursor = self.cursor_position(doc, status);
        if runs.is_empty() && !full && cursor == self.cursor {
            return Ok(FrameStats::default());
        }

        let mut writer = Writer::new();
        if full {
            writer.clear_all();
        }
        let cells = if runs.is_empty() {
            0
        } else {
            writer.hide_cursor();
            let cells = self.write_runs(&mut writer, &runs);
            writer.show_cursor();
            cells
        };
        self.cursor = cursor;
        writer.move_to(cursor.0, cursor.1);
        writer.flush(out)?;

        std::mem::swap(&mut self.window, &mut self.screen);
        debug!(target: "render", runs = runs.len(), cells, full, "frame");
        Ok(FrameStats {
            runs: runs.len(),
            cells,
            full,
        })
    }

    fn fill_text(&mut self, doc: &Document, highlighter: Option<&mut dyn Highlighter>) {
        let rows = self.text_rows();
        let width = self.width as usize;
        let tab = doc.tab_width();
        let left = doc.left;
        let last_line = (doc.top + rows).min(doc.line_count());

        let categories = match highlighter {
            Some(hl) if last_line > doc.top => {
                let end = doc.line_end_offset(last_line - 1);
                highlight_prefix(hl, doc.text(), end)
            }
            _ => Vec::new(),
        };
        let selection = doc.selection();

        for y in 0..rows {
            let row = y as u16;
            self.window.clear_row(row, Style::PLAIN);
            let line_idx = doc.top + y;
            if line_idx >= last_line {
                continue;
            }
            let mut pos = doc.line_start_offset(line_idx);
            let mut col = 0usize;
            for c in doc.text().line(line_idx).chars() {
                if c == '\n' || col >= left + width {
                    break;
                }
                let w = cell_width(c, col, tab);
                if col + w > left {
                    let category = categories.get(pos).copied().unwrap_or(Category::Default);
                    let mut style = Style::with_category(category);
                    if selection.is_some_and(|(s, e)| pos >= s && pos < e) {
                        style = style.reversed();
                    }
                    self.put_char(row, col, w, left, c, style);
                }
                col += w;
                pos += 1;
            }
        }
    }

    /// Draw a character spanning visual columns `[col, col + w)` with the viewport
    /// starting at `left`. Partially visible wide characters become spaces.
    fn put_char(&mut self, row: u16, col: usize, w: usize, left: usize, c: char, style: Style) {
        let width = self.width as usize;
        let first = col.max(left) - left;
        let last = (col + w).min(left + width) - left;
        if c == '\t' {
            for x in first..last {
                self.window.set(x as u16, row, Cell::new(' ', style));
            }
        } else if w == 2 && last - first == 2 {
            self.window.set(first as u16, row, Cell::new(c, style));
            self.window.set(first as u16 + 1, row, Cell::continuation(style));
        } else if w == 2 {
            self.window.set(first as u16, row, Cell::new(' ', style));
        } else {
            let shown = if needs_placeholder(c) { PLACEHOLDER } else { c };
            self.window.set(first as u16, row, Cell::new(shown, style));
        }
    }

    fn fill_status(&mut self, status: &StatusLine) {
        let row = self.height - 1;
        let width = self.width as usize;
        let style = Style::REVERSED;
        self.window.clear_row(row, style);

        let end = self.put_str(row, 0, width, &status.left, style);
        let right_width = visual_width(status.right.chars(), 1);
        if end + 1 + right_width <= width {
            self.put_str(row, width - right_width, width, &status.right, style);
        }
    }

    /// Write `s` into `row` from column `x`, stopping before `limit`. Returns the end column.
    fn put_str(&mut self, row: u16, mut x: usize, limit: usize, s: &str, style: Style) -> usize {
        for c in s.chars() {
            let w = cell_width(c, x, 1);
            if x + w > limit {
                break;
            }
            if w == 2 {
                self.window.set(x as u16, row, Cell::new(c, style));
                self.window.set(x as u16 + 1, row, Cell::continuation(style));
            } else {
                let shown = if c == '\t' {
                    ' '
                } else if needs_placeholder(c) {
                    PLACEHOLDER
                } else {
                    c
                };
                self.window.set(x as u16, row, Cell::new(shown, style));
            }
            x += w;
        }
        x
    }

    /// Each run becomes one positioned write; style changes are spans inside it.
    fn write_runs(&self, writer: &mut Writer, runs: &[Run]) -> usize {
        let width = self.width as usize;
        let mut cells = 0;
        for run in runs {
            cells += run.len();
            let mut spans: Vec<(Style, String)> = Vec::new();
            for cell in &self.window.cells[run.start..run.end] {
                if cell.is_continuation() {
                    continue;
                }
                match spans.last_mut() {
                    Some((style, text)) if *style == cell.style => text.push(cell.ch),
                    _ => spans.push((cell.style, cell.ch.to_string())),
                }
            }
            writer.run((run.start % width) as u16, (run.start / width) as u16, spans);
        }
        cells
    }

    fn cursor_position(&self, doc: &Document, status: &StatusLine) -> (u16, u16) {
        let status_row = self.height - 1;
        let max_x = self.width as usize - 1;
        if let Some(col) = status.cursor_col {
            return (col.min(max_x) as u16, status_row);
        }
        if self.text_rows() == 0 {
            return (0, status_row);
        }
        let x = (doc.column() - 1).saturating_sub(doc.left).min(max_x);
        let y = (doc.line() - 1).saturating_sub(doc.top).min(self.text_rows() - 1);
        (x as u16, y as u16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CONTINUATION, CellFlags};
    use core_syntax::{DocumentType, highlighter_for};
    use pretty_assertions::assert_eq;

    fn status_for(doc: &Document) -> StatusLine {
        StatusLine {
            left: doc.display_name(),
            right: format!("Ln {}, Col {}", doc.line(), doc.column()),
            cursor_col: None,
        }
    }

    fn frame(engine: &mut RenderEngine, doc: &mut Document) -> (FrameStats, String) {
        let mut out = Vec::new();
        let status = status_for(doc);
        let stats = engine.render(&mut out, doc, None, &status).unwrap();
        (stats, String::from_utf8(out).unwrap())
    }

    #[test]
    fn first_frame_is_full_and_pads_rows() {
        let mut engine = RenderEngine::new(22, 3);
        let mut doc = Document::from_text("hello\nworld", 4);
        let (stats, out) = frame(&mut engine, &mut doc);
        assert!(stats.full);
        assert!(out.contains("\x1b[2J"));
        assert_eq!(engine.screen().row_text(0), format!("{:<22}", "hello"));
        assert_eq!(engine.screen().row_text(1), format!("{:<22}", "world"));
        assert_eq!(engine.screen().row_text(2), "[No Name]  Ln 1, Col 1");
        let status_row = engine.screen().row(2);
        assert!(status_row.iter().all(|c| c.style.flags.contains(CellFlags::REVERSE)));
    }

    #[test]
    fn unchanged_frame_writes_nothing() {
        let mut engine = RenderEngine::new(20, 3);
        let mut doc = Document::from_text("hello", 4);
        frame(&mut engine, &mut doc);
        let (stats, out) = frame(&mut engine, &mut doc);
        assert_eq!(stats, FrameStats::default());
        assert!(out.is_empty());
        assert_eq!(engine.cursor(), (0, 0));
    }

    #[test]
    fn cursor_only_move_writes_just_the_cursor() {
        let mut engine = RenderEngine::new(20, 3);
        let mut doc = Document::from_text("hello", 4);
        frame(&mut engine, &mut doc);
        doc.move_char(core_text::Direction::Forward);
        let status = status_for(&Document::from_text("hello", 4));
        let mut out = Vec::new();
        let stats = engine.render(&mut out, &mut doc, None, &status).unwrap();
        assert_eq!(stats.runs, 0);
        assert_eq!(String::from_utf8(out).unwrap(), "\x1b[1;2H");
        assert_eq!(engine.cursor(), (1, 0));
    }

    #[test]
    fn run_crossing_rows_is_one_positioned_write() {
        let mut engine = RenderEngine::new(4, 3);
        let mut doc = Document::from_text("abc\nxyz", 4);
        let status = StatusLine::default();
        engine.render(&mut Vec::new(), &mut doc, None, &status).unwrap();
        doc.set_position(2);
        doc.delete_char_forward();
        doc.delete_char_forward();
        doc.move_to_start();
        let mut out = Vec::new();
        let stats = engine.render(&mut out, &mut doc, None, &status).unwrap();
        assert_eq!(stats.runs, 1);
        let out = String::from_utf8(out).unwrap();
        // one run move plus the final cursor move
        assert_eq!(out.matches('H').count(), 2);
    }

    #[test]
    fn typing_at_line_end_touches_one_text_cell_and_one_status_cell() {
        let mut engine = RenderEngine::new(24, 3);
        let mut doc = Document::from_text("hello", 4);
        doc.move_to_end();
        frame(&mut engine, &mut doc);
        doc.insert_char('!');
        let (stats, out) = frame(&mut engine, &mut doc);
        assert_eq!((stats.runs, stats.cells), (2, 2));
        assert!(out.contains('!'));
        assert_eq!(engine.cursor(), (6, 0));
    }

    #[test]
    fn tabs_expand_to_tab_stops() {
        let mut engine = RenderEngine::new(10, 2);
        let mut doc = Document::from_text("a\tb", 4);
        doc.insert_literal_tab();
        frame(&mut engine, &mut doc);
        assert_eq!(engine.screen().row_text(0), "    a   b ");
    }

    #[test]
    fn wide_characters_use_continuation_and_clip_to_space() {
        let mut engine = RenderEngine::new(3, 3);
        let mut doc = Document::from_text("a漢b\nab漢", 4);
        frame(&mut engine, &mut doc);
        let row0: Vec<char> = engine.screen().row(0).iter().map(|c| c.ch).collect();
        assert_eq!(row0, vec!['a', '漢', CONTINUATION]);
        assert_eq!(engine.screen().row_text(1), "ab ");
    }

    #[test]
    fn control_characters_render_as_placeholder() {
        let mut engine = RenderEngine::new(5, 2);
        let mut doc = Document::from_text("a\rb", 4);
        frame(&mut engine, &mut doc);
        assert_eq!(engine.screen().row_text(0), "a?b  ");
    }

    #[test]
    fn selection_is_reversed() {
        let mut engine = RenderEngine::new(6, 2);
        let mut doc = Document::from_text("abcd", 4);
        doc.set_position(1);
        doc.begin_selection();
        doc.set_position(3);
        frame(&mut engine, &mut doc);
        let reversed: Vec<bool> = engine.screen().row(0)[..5]
            .iter()
            .map(|c| c.style.flags.contains(CellFlags::REVERSE))
            .collect();
        assert_eq!(reversed, vec![false, true, true, false, false]);
    }

    #[test]
    fn syntax_categories_color_cells() {
        let mut engine = RenderEngine::new(12, 2);
        let mut doc = Document::from_text("fn main() {}", 4);
        let mut hl = highlighter_for(DocumentType::Rust).unwrap();
        let status = status_for(&doc);
        engine
            .render(&mut Vec::new(), &mut doc, Some(hl.as_mut()), &status)
            .unwrap();
        let row = engine.screen().row(0);
        assert_eq!(row[0].style.category, Category::Keyword);
        assert_eq!(row[1].style.category, Category::Keyword);
        assert_eq!(row[3].style.category, Category::Default);
    }

    #[test]
    fn scrolls_to_keep_cursor_visible() {
        let mut engine = RenderEngine::new(8, 5);
        let text = (0..20).map(|i| format!("line{i}")).collect::<Vec<_>>().join("\n");
        let mut doc = Document::from_text(&text, 4);
        doc.move_to_end();
        frame(&mut engine, &mut doc);
        assert_eq!(doc.top, 16);
        assert_eq!(engine.screen().row_text(0), "line16  ");
        assert_eq!(engine.cursor(), (6, 3));
    }

    #[test]
    fn horizontal_scroll_clips_left_columns() {
        let mut engine = RenderEngine::new(4, 2);
        let mut doc = Document::from_text("abcdefgh", 4);
        doc.move_to_end();
        frame(&mut engine, &mut doc);
        assert_eq!(doc.left, 5);
        assert_eq!(engine.screen().row_text(0), "fgh ");
    }

    #[test]
    fn prompt_moves_cursor_to_status_row() {
        let mut engine = RenderEngine::new(20, 3);
        let mut doc = Document::from_text("text", 4);
        let status = StatusLine {
            left: "Find: ab".into(),
            right: "Ln 1, Col 1".into(),
            cursor_col: Some(8),
        };
        engine.render(&mut Vec::new(), &mut doc, None, &status).unwrap();
        assert_eq!(engine.cursor(), (8, 2));
        assert_eq!(engine.screen().row_text(2), "Find: ab Ln 1, Col 1");
    }

    #[test]
    fn status_right_part_dropped_when_it_does_not_fit() {
        let mut engine = RenderEngine::new(10, 2);
        let mut doc = Document::new(4);
        let status = StatusLine {
            left: "long-name.rs".into(),
            right: "Ln 1, Col 1".into(),
            cursor_col: None,
        };
        engine.render(&mut Vec::new(), &mut doc, None, &status).unwrap();
        assert_eq!(engine.screen().row_text(1), "long-name.");
    }

    #[test]
    fn resize_forces_full_repaint() {
        let mut engine = RenderEngine::new(10, 3);
        let mut doc = Document::from_text("abc", 4);
        frame(&mut engine, &mut doc);
        engine.resize(12, 4);
        let (stats, out) = frame(&mut engine, &mut doc);
        assert!(stats.full);
        assert!(out.contains("\x1b[2J"));
        assert_eq!(engine.screen().width, 12);
        assert_eq!(engine.screen().row_text(0), format!("{:<12}", "abc"));
    }
}
