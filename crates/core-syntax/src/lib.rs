//! Character-at-a-time syntax classification.
//!
//! A `Highlighter` is driven by the renderer once per frame: `start_highlighting`
//! resets all state, then `highlight_char` is called for consecutive offsets
//! starting at 0. No state survives between passes, so edits anywhere in the
//! document never leave stale comment/string state behind.
//!
//! Languages are variants selected by `DocumentType`; adding one means adding a
//! word set (or a new engine) and a `highlighter_for` arm. The renderer only ever
//! sees the trait object.

use ropey::Rope;
use std::path::Path;

mod c_family;
mod hash_comment;
mod languages;

pub use c_family::CFamilyHighlighter;
pub use hash_comment::HashCommentHighlighter;

/// Syntax class of one character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Category {
    #[default]
    Default,
    Keyword,
    Type,
    Preprocessor,
    Comment,
    String,
    Number,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DocumentType {
    #[default]
    PlainText,
    C,
    Cpp,
    Rust,
    Shell,
    Python,
    Toml,
}

impl DocumentType {
    pub fn label(self) -> &'static str {
        match self {
            DocumentType::PlainText => "text",
            DocumentType::C => "c",
            DocumentType::Cpp => "c++",
            DocumentType::Rust => "rust",
            DocumentType::Shell => "shell",
            DocumentType::Python => "python",
            DocumentType::Toml => "toml",
        }
    }
}

pub trait Highlighter {
    fn document_type(&self) -> DocumentType;
    /// Reset per-pass state. Must be called before offset 0.
    fn start_highlighting(&mut self);
    /// Classify the character at `pos`. Offsets must be fed consecutively from 0.
    fn highlight_char(&mut self, text: &Rope, pos: usize) -> Category;
}

/// Identify a document by extension, falling back to `#!` sniffing of the first line.
pub fn classify(filename: Option<&Path>, first_line: &str) -> DocumentType {
    let ext = filename
        .and_then(Path::extension)
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let by_ext = match ext.as_deref() {
        Some("c" | "h") => Some(DocumentType::C),
        Some("cc" | "cpp" | "cxx" | "hpp" | "hh" | "hxx" | "inl") => Some(DocumentType::Cpp),
        Some("rs") => Some(DocumentType::Rust),
        Some("sh" | "bash" | "zsh") => Some(DocumentType::Shell),
        Some("py" | "pyw") => Some(DocumentType::Python),
        Some("toml") => Some(DocumentType::Toml),
        _ => None,
    };
    if let Some(t) = by_ext {
        tracing::trace!(target: "syntax", doc_type = t.label(), "classified_by_extension");
        return t;
    }
    let Some(interpreter) = first_line.strip_prefix("#!") else {
        return DocumentType::PlainText;
    };
    // "#!/usr/bin/env python3" or "#!/bin/bash -e"
    let mut parts = interpreter.split_whitespace();
    let mut program = parts.next().unwrap_or("");
    if program.ends_with("/env") {
        program = parts.next().unwrap_or("");
    }
    let name = program.rsplit('/').next().unwrap_or(program);
    let doc_type = if name.starts_with("python") {
        DocumentType::Python
    } else if matches!(name, "sh" | "bash" | "zsh" | "dash" | "ksh") {
        DocumentType::Shell
    } else {
        DocumentType::PlainText
    };
    tracing::trace!(target: "syntax", doc_type = doc_type.label(), "classified_by_shebang");
    doc_type
}

/// Highlighter for a document type; `None` means render everything in the default color.
pub fn highlighter_for(doc_type: DocumentType) -> Option<Box<dyn Highlighter>> {
    match doc_type {
        DocumentType::PlainText => None,
        DocumentType::C => Some(Box::new(CFamilyHighlighter::new(&languages::C))),
        DocumentType::Cpp => Some(Box::new(CFamilyHighlighter::new(&languages::CPP))),
        DocumentType::Rust => Some(Box::new(CFamilyHighlighter::new(&languages::RUST))),
        DocumentType::Shell => Some(Box::new(HashCommentHighlighter::new(&languages::SHELL))),
        DocumentType::Python => Some(Box::new(HashCommentHighlighter::new(&languages::PYTHON))),
        DocumentType::Toml => Some(Box::new(HashCommentHighlighter::new(&languages::TOML))),
    }
}

/// Run one full pass and collect every character's category.
pub fn highlight_all(highlighter: &mut dyn Highlighter, text: &Rope) -> Vec<Category> {
    highlight_prefix(highlighter, text, text.len_chars())
}

/// Categories of the first `end` characters. State always starts at offset 0, so
/// a comment opened above the viewport still colors the visible lines.
pub fn highlight_prefix(
    highlighter: &mut dyn Highlighter,
    text: &Rope,
    end: usize,
) -> Vec<Category> {
    highlighter.start_highlighting();
    (0..end.min(text.len_chars()))
        .map(|pos| highlighter.highlight_char(text, pos))
        .collect()
}

pub(crate) fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

pub(crate) fn is_ident_char(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

/// Length of the run starting at `pos` whose characters satisfy `pred`.
pub(crate) fn run_length(text: &Rope, pos: usize, pred: impl Fn(char) -> bool) -> usize {
    let mut n = 0;
    while let Some(c) = text.get_char(pos + n) {
        if !pred(c) {
            break;
        }
        n += 1;
    }
    n
}
