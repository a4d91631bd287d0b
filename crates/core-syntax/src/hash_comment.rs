//! Highlighter for `#`-comment languages (shell, Python, TOML).

use crate::languages::HashCommentLanguage;
use crate::{Category, DocumentType, Highlighter, is_ident_char, is_ident_start, run_length};
use ropey::Rope;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Normal,
    Comment,
    /// `triple` strings (`"""`/`'''`) may span lines.
    Str {
        quote: char,
        triple: bool,
        escaped: bool,
    },
    TableHeader,
}

pub struct HashCommentHighlighter {
    lang: &'static HashCommentLanguage,
    mode: Mode,
    category: Category,
    lookahead_remaining: usize,
    previous_char: Option<char>,
    at_line_start: bool,
}

impl HashCommentHighlighter {
    pub fn new(lang: &'static HashCommentLanguage) -> Self {
        Self {
            lang,
            mode: Mode::Normal,
            category: Category::Default,
            lookahead_remaining: 0,
            previous_char: None,
            at_line_start: true,
        }
    }

    fn token(&mut self, category: Category, len: usize) -> Category {
        self.category = category;
        self.lookahead_remaining = len.saturating_sub(1);
        category
    }

    fn is_triple(text: &Rope, pos: usize, quote: char) -> bool {
        text.get_char(pos + 1) == Some(quote) && text.get_char(pos + 2) == Some(quote)
    }

    fn step(&mut self, text: &Rope, pos: usize, c: char) -> Category {
        if self.lookahead_remaining > 0 {
            self.lookahead_remaining -= 1;
            return self.category;
        }
        match self.mode {
            Mode::Comment => {
                if c == '\n' {
                    self.mode = Mode::Normal;
                    return Category::Default;
                }
                Category::Comment
            }
            Mode::TableHeader => {
                if c == '\n' {
                    self.mode = Mode::Normal;
                    return Category::Default;
                }
                if c == ']' && text.get_char(pos + 1) != Some(']') {
                    self.mode = Mode::Normal;
                }
                Category::Type
            }
            Mode::Str { quote, triple, escaped } => {
                if escaped {
                    self.mode = Mode::Str { quote, triple, escaped: false };
                } else if c == '\\' {
                    self.mode = Mode::Str { quote, triple, escaped: true };
                } else if c == quote && !triple {
                    self.mode = Mode::Normal;
                } else if c == quote && Self::is_triple(text, pos, quote) {
                    self.mode = Mode::Normal;
                    return self.token(Category::String, 3);
                } else if c == '\n' && !triple {
                    self.mode = Mode::Normal;
                    return Category::Default;
                }
                Category::String
            }
            Mode::Normal => self.normal(text, pos, c),
        }
    }

    fn normal(&mut self, text: &Rope, pos: usize, c: char) -> Category {
        let after_space = self.previous_char.is_none_or(char::is_whitespace);
        // in shell, `$#` and `a#b` are not comments
        if c == '#' && (self.lang.doc_type != DocumentType::Shell || after_space) {
            self.mode = Mode::Comment;
            return Category::Comment;
        }
        if c == '[' && self.at_line_start && self.lang.table_headers {
            self.mode = Mode::TableHeader;
            return Category::Type;
        }
        if c == '"' || c == '\'' {
            let triple = Self::is_triple(text, pos, c);
            self.mode = Mode::Str {
                quote: c,
                triple,
                escaped: false,
            };
            return if triple {
                self.token(Category::String, 3)
            } else {
                Category::String
            };
        }
        let after_ident = self.previous_char.is_some_and(is_ident_char);
        if c.is_ascii_digit() && !after_ident {
            let len = run_length(text, pos, |ch| ch.is_alphanumeric() || ch == '.' || ch == '_');
            return self.token(Category::Number, len);
        }
        if is_ident_start(c) && !after_ident {
            let len = run_length(text, pos, is_ident_char);
            let word: String = text.slice(pos..pos + len).chars().collect();
            let cat = if self.lang.keywords.contains(&word.as_str()) {
                Category::Keyword
            } else {
                Category::Default
            };
            return self.token(cat, len);
        }
        Category::Default
    }
}

impl Highlighter for HashCommentHighlighter {
    fn document_type(&self) -> DocumentType {
        self.lang.doc_type
    }

    fn start_highlighting(&mut self) {
        self.mode = Mode::Normal;
        self.category = Category::Default;
        self.lookahead_remaining = 0;
        self.previous_char = None;
        self.at_line_start = true;
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
