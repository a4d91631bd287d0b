//! Word completion from the active document's own identifiers.
//!
//! The document text is segmented on Unicode word boundaries; identifier-like
//! segments are counted, filtered by the prefix under the cursor and ranked by
//! frequency descending, ties by the word in descending order. A session keeps
//! the ranked list and swaps the inserted suffix as the user cycles.

use ahash::AHashMap;
use core_text::Document;
use tracing::trace;
use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub word: String,
    pub rank: usize,
}

fn is_identifier(word: &str) -> bool {
    let mut chars = word.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_alphanumeric())
}

/// Ranked completions for `prefix` drawn from `text`. The prefix itself is never offered.
pub fn suggestions(text: &str, prefix: &str) -> Vec<Suggestion> {
    if prefix.is_empty() {
        return Vec::new();
    }
    let mut counts: AHashMap<&str, usize> = AHashMap::new();
    for word in text.split_word_bounds().filter(|w| is_identifier(w)) {
        *counts.entry(word).or_insert(0) += 1;
    }
    let mut out: Vec<Suggestion> = counts
        .into_iter()
        .filter(|(w, _)| w.len() > prefix.len() && w.starts_with(prefix))
        .map(|(w, rank)| Suggestion {
            word: w.to_string(),
            rank,
        })
        .collect();
    out.sort_by(|a, b| b.rank.cmp(&a.rank).then_with(|| b.word.cmp(&a.word)));
    out
}

/// An in-progress completion: the prefix location and which suggestion is inserted.
#[derive(Debug, Clone)]
pub struct CompletionSession {
    /// Offset just past the typed prefix.
    anchor: usize,
    prefix: String,
    suggestions: Vec<Suggestion>,
    index: Option<usize>,
    /// Characters of the current suffix present in the document after `anchor`.
    inserted: usize,
}

impl CompletionSession {
    /// Session for the word ending at the cursor, or `None` when nothing matches.
    pub fn start(doc: &Document) -> Option<Self> {
        let (start, prefix) = doc.word_prefix_at_cursor();
        let suggestions = suggestions(&doc.contents(), &prefix);
        trace!(
            target: "state.completion",
            prefix_len = prefix.len(),
            candidates = suggestions.len(),
            "completion_start"
        );
        if suggestions.is_empty() {
            return None;
        }
        Some(Self {
            anchor: start + prefix.chars().count(),
            prefix,
            suggestions,
            index: None,
            inserted: 0,
        })
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn selected(&self) -> Option<&Suggestion> {
        self.index.map(|i| &self.suggestions[i])
    }

    /// Replace the inserted suffix with the next (or previous) suggestion's. Wraps.
    pub fn cycle(&mut self, doc: &mut Document, forward: bool) -> bool {
        let n = self.suggestions.len();
        let next = match (self.index, forward) {
            (None, true) => 0,
            (None, false) => n - 1,
            (Some(i), true) => (i + 1) % n,
            (Some(i), false) => (i + n - 1) % n,
        };
        let suffix: String = self.suggestions[next]
            .word
            .chars()
            .skip(self.prefix.chars().count())
            .collect();
        let changed = doc.replace_range(self.anchor, self.anchor + self.inserted, &suffix);
        self.inserted = suffix.chars().count();
        self.index = Some(next);
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn words(s: &[Suggestion]) -> Vec<(&str, usize)> {
        s.iter().map(|s| (s.word.as_str(), s.rank)).collect()
    }

    #[test]
    fn ranks_by_frequency_then_word_descending() {
        let text = "foo_bar fooz foo_bar fob(fooz) fob foa fo";
        let s = suggestions(text, "fo");
        assert_eq!(
            words(&s),
            vec![("fooz", 2), ("foo_bar", 2), ("fob", 2), ("foa", 1)]
        );
    }

    #[test]
    fn non_identifiers_and_the_prefix_are_skipped() {
        let s = suggestions("12ab ab abc a-b abc", "ab");
        assert_eq!(words(&s), vec![("abc", 2)]);
        assert!(suggestions("abc", "").is_empty());
    }

    #[test]
    fn session_cycles_and_replaces_suffix() {
        let mut doc = Document::from_text("alpha alps al", 4);
        doc.move_to_end();
        let mut session = CompletionSession::start(&doc).unwrap();
        assert_eq!(session.prefix(), "al");
        assert!(session.cycle(&mut doc, true));
        assert_eq!(doc.contents(), "alpha alps alps");
        assert!(session.cycle(&mut doc, true));
        assert_eq!(doc.contents(), "alpha alps alpha");
        assert_eq!(doc.position(), doc.len_chars());
        assert!(session.cycle(&mut doc, false));
        assert_eq!(doc.contents(), "alpha alps alps");
        assert_eq!(session.selected().map(|s| s.word.as_str()), Some("alps"));
    }

    #[test]
    fn no_session_without_candidates() {
        let mut doc = Document::from_text("zeta", 4);
        doc.move_to_end();
        assert!(CompletionSession::start(&doc).is_none());
        doc.insert_char(' ');
        assert!(CompletionSession::start(&doc).is_none());
    }
}
