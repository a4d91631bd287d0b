use tracing::trace;

use crate::DocId;

/// A recorded (document, line) marker. `line` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub doc: DocId,
    pub line: usize,
}

/// Bounded list of jump markers with a back/forward pointer.
///
/// `observe` is fed the cursor location after every ordinary action and records
/// it only when it lies in another document or more than `jump_threshold` lines
/// from the marker under the pointer. Recording drops any forward entries.
/// `back`/`forward` move the pointer and never record; at either end they return
/// `None` and leave the pointer where it is.
#[derive(Debug, Clone)]
pub struct NavigationHistory {
    entries: Vec<Location>,
    pointer: usize,
    capacity: usize,
    jump_threshold: usize,
}

impl NavigationHistory {
    pub fn new(capacity: usize, jump_threshold: usize) -> Self {
        Self {
            entries: Vec::new(),
            pointer: 0,
            capacity: capacity.max(1),
            jump_threshold,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn current(&self) -> Option<Location> {
        self.entries.get(self.pointer).copied()
    }

    /// Record `loc` if it is a jump away from the current marker. Returns whether it was recorded.
    pub fn observe(&mut self, loc: Location) -> bool {
        if let Some(cur) = self.current() {
            let same_doc = cur.doc == loc.doc;
            if same_doc && cur.line.abs_diff(loc.line) <= self.jump_threshold {
                return false;
            }
        }
        if !self.entries.is_empty() {
            self.entries.truncate(self.pointer + 1);
        }
        self.entries.push(loc);
        if self.entries.len() > self.capacity {
            let _ = self.entries.remove(0);
            trace!(target: "state.history", "history_trimmed");
        }
        self.pointer = self.entries.len() - 1;
        trace!(target: "state.history", len = self.entries.len(), line = loc.line, "history_push");
        true
    }

    pub fn back(&mut self) -> Option<Location> {
        if self.pointer == 0 || self.entries.is_empty() {
            return None;
        }
        self.pointer -= 1;
        self.current()
    }

    pub fn forward(&mut self) -> Option<Location> {
        if self.pointer + 1 >= self.entries.len() {
            return None;
        }
        self.pointer += 1;
        self.current()
    }

    /// Drop every marker of a closed document.
    pub fn forget(&mut self, doc: DocId) {
        let before_pointer = self.entries[..self.pointer.min(self.entries.len())]
            .iter()
            .filter(|l| l.doc == doc)
            .count();
        self.entries.retain(|l| l.doc != doc);
        self.pointer = self
            .pointer
            .saturating_sub(before_pointer)
            .min(self.entries.len().saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn at(doc: DocId, line: usize) -> Location {
        Location { doc, line }
    }

    #[test]
    fn small_moves_are_not_recorded() {
        let mut h = NavigationHistory::new(8, 5);
        assert!(h.observe(at(1, 1)));
        assert!(!h.observe(at(1, 6)));
        assert!(h.observe(at(1, 7)));
        assert!(h.observe(at(2, 7)));
        assert_eq!(h.len(), 3);
    }

    #[test]
    fn back_and_forward_stop_at_the_ends() {
        let mut h = NavigationHistory::new(8, 0);
        h.observe(at(1, 1));
        h.observe(at(1, 50));
        h.observe(at(1, 100));
        assert_eq!(h.back(), Some(at(1, 50)));
        assert_eq!(h.back(), Some(at(1, 1)));
        assert_eq!(h.back(), None);
        assert_eq!(h.current(), Some(at(1, 1)));
        assert_eq!(h.forward(), Some(at(1, 50)));
        assert_eq!(h.forward(), Some(at(1, 100)));
        assert_eq!(h.forward(), None);
        assert_eq!(h.len(), 3);
    }

    #[test]
    fn recording_after_back_drops_forward_entries() {
        let mut h = NavigationHistory::new(8, 0);
        h.observe(at(1, 1));
        h.observe(at(1, 50));
        h.observe(at(1, 100));
        h.back();
        h.back();
        h.observe(at(1, 30));
        assert_eq!(h.len(), 2);
        assert_eq!(h.forward(), None);
        assert_eq!(h.back(), Some(at(1, 1)));
    }

    #[test]
    fn capacity_drops_oldest() {
        let mut h = NavigationHistory::new(2, 0);
        h.observe(at(1, 1));
        h.observe(at(1, 2));
        h.observe(at(1, 3));
        assert_eq!(h.len(), 2);
        assert_eq!(h.back(), Some(at(1, 2)));
        assert_eq!(h.back(), None);
    }

    #[test]
    fn forget_removes_closed_document() {
        let mut h = NavigationHistory::new(8, 0);
        h.observe(at(1, 1));
        h.observe(at(2, 1));
        h.observe(at(1, 9));
        h.forget(1);
        assert_eq!(h.len(), 1);
        assert_eq!(h.current(), Some(at(2, 1)));
        h.forget(2);
        assert!(h.is_empty());
        assert_eq!(h.current(), None);
        assert!(h.observe(at(3, 1)));
    }
}
