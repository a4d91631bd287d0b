//! C-family highlighter (C, C++, Rust).
//!
//! Multi-character tokens (identifiers, numbers, comment delimiters, directives,
//! lifetimes) are classified when their first character is seen, by reading ahead
//! in the rope; `lookahead_remaining` then hands the same category to the rest of
//! the token. This gives whole-word results without revisiting earlier offsets.

use crate::languages::CFamilyLanguage;
use crate::{Category, DocumentType, Highlighter, is_ident_char, is_ident_start, run_length};
use ropey::Rope;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Normal,
    LineComment,
    BlockComment,
    Str { quote: char, escaped: bool },
    /// Rust `#[...]`; depth counts open brackets.
    Attribute { depth: usize },
}

pub struct CFamilyHighlighter {
    lang: &'static CFamilyLanguage,
    mode: Mode,
    category: Category,
    lookahead_remaining: usize,
    pending_identifier: String,
    previous_char: Option<char>,
    /// Only whitespace seen so far on the current line.
    at_line_start: bool,
    /// The last directive was `include`; a following `<...>` is a path.
    include_pending: bool,
}

impl CFamilyHighlighter {
    pub fn new(lang: &'static CFamilyLanguage) -> Self {
        Self {
            lang,
            mode: Mode::Normal,
            category: Category::Default,
            lookahead_remaining: 0,
            pending_identifier: String::new(),
            previous_char: None,
            at_line_start: true,
            include_pending: false,
        }
    }

    /// Category for a token of `len` characters starting here.
    fn token(&mut self, category: Category, len: usize) -> Category {
        self.category = category;
        self.lookahead_remaining = len.saturating_sub(1);
        category
    }

    fn classify_word(&self, word: &str) -> Category {
        if self.lang.keywords.contains(&word) {
            Category::Keyword
        } else if self.lang.types.contains(&word) {
            Category::Type
        } else {
            Category::Default
        }
    }

    fn step(&mut self, text: &Rope, pos: usize, c: char) -> Category {
        if self.lookahead_remaining > 0 {
            self.lookahead_remaining -= 1;
            return self.category;
        }
        let next = text.get_char(pos + 1);
        match self.mode {
            Mode::LineComment => {
                if c == '\n' {
                    self.mode = Mode::Normal;
                    return Category::Default;
                }
                Category::Comment
            }
            Mode::BlockComment => {
                if c == '*' && next == Some('/') {
                    self.mode = Mode::Normal;
                    return self.token(Category::Comment, 2);
                }
                Category::Comment
            }
            Mode::Str { quote, escaped } => {
                if escaped {
                    self.mode = Mode::Str { quote, escaped: false };
                } else if c == '\\' && quote != '>' {
                    self.mode = Mode::Str { quote, escaped: true };
                } else if c == quote {
                    self.mode = Mode::Normal;
                } else if c == '\n' && quote != '"' {
                    // character literals and include paths end with the line
                    self.mode = Mode::Normal;
                    return Category::Default;
                }
                Category::String
            }
            Mode::Attribute { depth } => {
                match c {
                    '[' => self.mode = Mode::Attribute { depth: depth + 1 },
                    ']' if depth <= 1 => self.mode = Mode::Normal,
                    ']' => self.mode = Mode::Attribute { depth: depth - 1 },
                    _ => {}
                }
                Category::Preprocessor
            }
            Mode::Normal => self.normal(text, pos, c, next),
        }
    }

    fn normal(&mut self, text: &Rope, pos: usize, c: char, next: Option<char>) -> Category {
        if c == '\n' {
            self.include_pending = false;
            return Category::Default;
        }
        if c == '/' && next == Some('/') {
            self.mode = Mode::LineComment;
            return self.token(Category::Comment, 2);
        }
        if c == '/' && next == Some('*') {
            self.mode = Mode::BlockComment;
            return self.token(Category::Comment, 2);
        }
        if c == '#' {
            if let Some(cat) = self.hash(text, pos, next) {
                return cat;
            }
        }
        if self.include_pending && c == '<' {
            self.include_pending = false;
            self.mode = Mode::Str {
                quote: '>',
                escaped: false,
            };
            return Category::String;
        }
        if !c.is_whitespace() {
            self.include_pending = false;
        }
        if c == '\'' && self.lang.lifetimes {
            let ident = next.is_some_and(is_ident_start);
            if ident && text.get_char(pos + 2) != Some('\'') {
                let len = 1 + run_length(text, pos + 1, is_ident_char);
                return self.token(Category::Type, len);
            }
        }
        if c == '"' || c == '\'' {
            self.mode = Mode::Str {
                quote: c,
                escaped: false,
            };
            return Category::String;
        }
        let after_ident = self.previous_char.is_some_and(is_ident_char);
        if c.is_ascii_digit() && !after_ident {
            let len = run_length(text, pos, |ch| ch.is_alphanumeric() || ch == '.' || ch == '_');
            return self.token(Category::Number, len);
        }
        if is_ident_start(c) && !after_ident {
            let len = run_length(text, pos, is_ident_char);
            self.pending_identifier.clear();
            self.pending_identifier
                .extend(text.slice(pos..pos + len).chars());
            let cat = self.classify_word(&self.pending_identifier);
            return self.token(cat, len);
        }
        Category::Default
    }

    /// `#` starts a Rust attribute or, at line start, a preprocessor directive.
    fn hash(&mut self, text: &Rope, pos: usize, next: Option<char>) -> Option<Category> {
        if self.lang.hash_attributes {
            let bang = next == Some('!');
            let open = if bang { text.get_char(pos + 2) } else { next };
            if open != Some('[') {
                return None;
            }
            self.mode = Mode::Attribute { depth: 0 };
            if bang {
                // '!' is consumed by the lookahead; '[' bumps the depth
                return Some(self.token(Category::Preprocessor, 2));
            }
            return Some(Category::Preprocessor);
        }
        if !self.at_line_start {
            return None;
        }
        let gap = run_length(text, pos + 1, |ch| ch == ' ' || ch == '\t');
        let word_at = pos + 1 + gap;
        let len = run_length(text, word_at, is_ident_char);
        self.pending_identifier.clear();
        self.pending_identifier
            .extend(text.slice(word_at..word_at + len).chars());
        if !self.lang.directives.contains(&self.pending_identifier.as_str()) {
            return None;
        }
        self.include_pending = self.pending_identifier == "include";
        Some(self.token(Category::Preprocessor, 1 + gap + len))
    }
}

impl Highlighter for CFamilyHighlighter {
    fn document_type(&self) -> DocumentType {
        self.lang.doc_type
    }

    fn start_highlighting(&mut self) {
        self.mode = Mode::Normal;
        self.category = Category::Default;
        self.lookahead_remaining = 0;
        self.pending_identifier.clear();
        self.previous_char = None;
        self.at_line_start = true;
        self.include_pending = false;
    }

    fn highlight_char(&mut self, text: &Rope, pos: usize) -> Category {
        let Some(c) = text.get_char(pos) else {
            return Category::Default;
        };
        let cat = self.step(text, pos, c);
        self.previous_char = Some(c);
        if c == '\n' {
            self.at_line_start = true;
        } else if !c.is_whitespace() {
            self.at_line_start = false;
        }
        cat
    }
}
