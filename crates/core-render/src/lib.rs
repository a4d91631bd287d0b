//! Diff-based screen rendering.
//!
//! The engine owns two grids of the terminal's size. Each frame fills the
//! *window* grid from the active document (tab expansion, clipping to the
//! viewport, syntax colors, selection, status row), diffs it against the
//! *screen* grid (what the terminal currently shows) and emits one positioned
//! write per run of changed cells. The grids are then swapped, so the frame just
//! drawn becomes the next comparison baseline without copying.
//!
//! Cell invariants:
//! - Leader: any printable character occupying one or two columns.
//! - Continuation: `CONTINUATION` immediately right of a two-column leader in the
//!   same row. It is never printed; a run that starts on one is widened to
//!   include its leader.
//! - A two-column character clipped by either viewport edge is drawn as a space,
//!   so a continuation never appears in column 0 and a leader in the last
//!   column is always one column wide.

pub mod diff;
pub mod render_engine;
pub mod status;
pub mod style;
pub mod viewport;
pub mod writer;

pub use diff::{Run, diff_runs};
pub use render_engine::{FrameStats, RenderEngine};
pub use status::{PromptView, StatusContext, StatusLine, build_status, compose_status};
pub use style::{CellFlags, Style};

/// Marker stored in the cell to the right of a two-column character.
pub const CONTINUATION: char = '\0';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub style: Style,
}

impl Cell {
    #[inline]
    pub fn new(ch: char, style: Style) -> Self {
        Self { ch, style }
    }

    #[inline]
    pub fn continuation(style: Style) -> Self {
        Self {
            ch: CONTINUATION,
            style,
        }
    }

    #[inline]
    pub fn is_continuation(&self) -> bool {
        self.ch == CONTINUATION
    }
}

impl Default for Cell {
    fn default() -> Self {
        // Default is a single space leader cell for blank areas.
        Cell {
            ch: ' ',
            style: Style::default(),
        }
    }
}

/// Row-major cell grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    pub width: u16,
    pub height: u16,
    pub cells: Vec<Cell>,
}

impl Grid {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); width as usize * height as usize],
        }
    }

    #[inline]
    pub fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = cell;
        }
    }

    /// Overwrite every cell of row `y` with blanks in `style`.
    pub fn clear_row(&mut self, y: u16, style: Style) {
        if let Some(start) = self.index(0, y) {
            let end = start + self.width as usize;
            self.cells[start..end].fill(Cell::new(' ', style));
        }
    }

    pub fn row(&self, y: u16) -> &[Cell] {
        match self.index(0, y) {
            Some(start) => &self.cells[start..start + self.width as usize],
            None => &[],
        }
    }

    /// Printable text of a row (continuations skipped). Diagnostics and tests.
    pub fn row_text(&self, y: u16) -> String {
        self.row(y)
            .iter()
            .filter(|c| !c.is_continuation())
            .map(|c| c.ch)
            .collect()
    }
}
