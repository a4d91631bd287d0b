//! Viewport scrolling.

use core_text::Document;

/// Clamp-scroll one axis: a cursor before the origin becomes the origin; a
/// cursor past the far edge scrolls by exactly the overflow.
pub fn clamp_scroll(origin: usize, cursor: usize, extent: usize) -> usize {
    if cursor < origin {
        cursor
    } else if extent > 0 && cursor >= origin + extent {
        cursor + 1 - extent
    } else {
        origin
    }
}

/// Adjust `doc.top`/`doc.left` so the cursor cell is visible in a `width` x
/// `rows` text area. Returns whether the viewport moved.
pub fn scroll_into_view(doc: &mut Document, width: usize, rows: usize) -> bool {
    let top = clamp_scroll(doc.top, doc.line() - 1, rows);
    let left = clamp_scroll(doc.left, doc.column() - 1, width);
    let moved = top != doc.top || left != doc.left;
    doc.top = top;
    doc.left = left;
    moved
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_scroll_cases() {
        assert_eq!(clamp_scroll(10, 4, 5), 4);
        assert_eq!(clamp_scroll(10, 12, 5), 10);
        assert_eq!(clamp_scroll(10, 15, 5), 11);
        assert_eq!(clamp_scroll(0, 49, 9), 41);
    }

    #[test]
    fn scroll_follows_cursor_both_axes() {
        let text = (0..50).map(|i| format!("{i:>30}")).collect::<Vec<_>>().join("\n");
        let mut doc = Document::from_text(&text, 4);
        doc.move_to_end();
        assert!(scroll_into_view(&mut doc, 20, 9));
        assert_eq!((doc.top, doc.left), (41, 11));
        doc.move_to_start();
        assert!(scroll_into_view(&mut doc, 20, 9));
        assert_eq!((doc.top, doc.left), (0, 0));
        assert!(!scroll_into_view(&mut doc, 20, 9));
    }
}
