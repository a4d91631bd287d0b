//! Window/screen run diff.
//!
//! One linear pass over the flattened grids with a single "matching" flag:
//! a matching -> changed transition opens a run, the next changed -> matching
//! transition (or the end of the grid) closes it. Runs are half-open flat index
//! ranges and may span row boundaries.

use crate::Grid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub start: usize,
    pub end: usize,
}

impl Run {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }
}

/// Changed runs of `window` relative to `screen`. Grids of different sizes
/// compare as entirely changed.
pub fn diff_runs(window: &Grid, screen: &Grid) -> Vec<Run> {
    let total = window.cells.len();
    if window.width != screen.width || window.height != screen.height {
        return if total == 0 {
            Vec::new()
        } else {
            vec![Run {
                start: 0,
                end: total,
            }]
        };
    }

    let mut runs: Vec<Run> = Vec::new();
    let mut open: Option<usize> = None;
    for (i, (w, s)) in window.cells.iter().zip(&screen.cells).enumerate() {
        match (w == s, open) {
            (false, None) => open = Some(leader_start(window, i)),
            (true, Some(start)) => {
                push_run(&mut runs, start, i);
                open = None;
            }
            _ => {}
        }
    }
    if let Some(start) = open {
        push_run(&mut runs, start, total);
    }
    tracing::trace!(target: "render.diff", runs = runs.len(), "diff_complete");
    runs
}

/// A run may not begin on a continuation cell: back up to its leader.
fn leader_start(window: &Grid, i: usize) -> usize {
    let width = window.width as usize;
    if i % width != 0 && window.cells[i].is_continuation() {
        i - 1
    } else {
        i
    }
}

// Widening a run back onto its leader can touch the previous run; merge them.
fn push_run(runs: &mut Vec<Run>, start: usize, end: usize) {
    match runs.last_mut() {
        Some(last) if last.end >= start => last.end = end,
        _ => runs.push(Run { start, end }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Cell, Style};
    use pretty_assertions::assert_eq;

    fn grid(rows: &[&str]) -> Grid {
        let width = rows[0].chars().count() as u16;
        let mut g = Grid::new(width, rows.len() as u16);
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                let ch = if ch == '~' { crate::CONTINUATION } else { ch };
                g.set(x as u16, y as u16, Cell::new(ch, Style::default()));
            }
        }
        g
    }

    #[test]
    fn equal_grids_have_no_runs() {
        let a = grid(&["abc", "def"]);
        assert!(diff_runs(&a, &a.clone()).is_empty());
    }

    #[test]
    fn single_change_is_single_run() {
        let a = grid(&["abc", "def"]);
        let b = grid(&["abc", "dXf"]);
        assert_eq!(diff_runs(&b, &a), vec![Run { start: 4, end: 5 }]);
    }

    #[test]
    fn separate_changes_make_separate_runs() {
        let a = grid(&["abcdef"]);
        let b = grid(&["Xbcd__"]);
        assert_eq!(
            diff_runs(&b, &a),
            vec![Run { start: 0, end: 1 }, Run { start: 4, end: 6 }]
        );
    }

    #[test]
    fn runs_cross_row_boundaries() {
        let a = grid(&["abc", "def"]);
        let b = grid(&["abX", "Yef"]);
        assert_eq!(diff_runs(&b, &a), vec![Run { start: 2, end: 4 }]);
    }

    #[test]
    fn style_change_counts_as_change() {
        let a = grid(&["abc"]);
        let mut b = a.clone();
        b.cells[1].style = Style::REVERSED;
        assert_eq!(diff_runs(&b, &a), vec![Run { start: 1, end: 2 }]);
    }

    #[test]
    fn run_starting_on_continuation_includes_leader() {
        let mut a = grid(&["x漢~y"]);
        let b = a.clone();
        // Screen differs only under the continuation cell.
        a.cells[2] = Cell::new('z', Style::default());
        assert_eq!(diff_runs(&b, &a), vec![Run { start: 1, end: 3 }]);
    }

    #[test]
    fn size_mismatch_is_full_run() {
        let a = grid(&["abc"]);
        let b = grid(&["abcd"]);
        assert_eq!(diff_runs(&b, &a), vec![Run { start: 0, end: 4 }]);
    }
}
