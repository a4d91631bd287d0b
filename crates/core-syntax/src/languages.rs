//! Word sets per language.

use crate::DocumentType;

/// Attributes a C-family engine needs to know about a language.
#[derive(Debug)]
pub struct CFamilyLanguage {
    pub doc_type: DocumentType,
    pub keywords: &'static [&'static str],
    pub types: &'static [&'static str],
    /// Directive names recognised after a line-leading `#`.
    pub directives: &'static [&'static str],
    /// `#[...]` / `#![...]` attributes instead of preprocessor lines.
    pub hash_attributes: bool,
    /// `'a` lifetimes: a quote followed by an identifier that is not closed two
    /// characters later does not open a character literal.
    pub lifetimes: bool,
}

#[derive(Debug)]
pub struct HashCommentLanguage {
    pub doc_type: DocumentType,
    pub keywords: &'static [&'static str],
    /// `[table]` headers at line start are classed as types.
    pub table_headers: bool,
}

const C_KEYWORDS: &[&str] = &[
    "auto", "break", "case", "const", "continue", "default", "do", "else", "enum", "extern",
    "for", "goto", "if", "inline", "register", "restrict", "return", "sizeof", "static",
    "struct", "switch", "typedef", "union", "volatile", "while", "NULL", "true", "false",
];

const C_TYPES: &[&str] = &[
    "bool", "char", "double", "float", "int", "long", "short", "signed", "unsigned", "void",
    "size_t", "ssize_t", "ptrdiff_t", "int8_t", "int16_t", "int32_t", "int64_t", "uint8_t",
    "uint16_t", "uint32_t", "uint64_t", "intptr_t", "uintptr_t", "wchar_t", "FILE",
];

const C_DIRECTIVES: &[&str] = &[
    "include", "define", "undef", "if", "ifdef", "ifndef", "elif", "else", "endif", "error",
    "warning", "pragma", "line",
];

const CPP_KEYWORDS: &[&str] = &[
    "auto", "break", "case", "catch", "class", "const", "constexpr", "const_cast", "continue",
    "decltype", "default", "delete", "do", "dynamic_cast", "else", "enum", "explicit", "export",
    "extern", "final", "for", "friend", "goto", "if", "inline", "mutable", "namespace", "new",
    "noexcept", "nullptr", "operator", "override", "private", "protected", "public",
    "reinterpret_cast", "return", "sizeof", "static", "static_assert", "static_cast", "struct",
    "switch", "template", "this", "throw", "try", "typedef", "typeid", "typename", "union",
    "using", "virtual", "volatile", "while", "true", "false",
];

const CPP_TYPES: &[&str] = &[
    "bool", "char", "char16_t", "char32_t", "double", "float", "int", "long", "short", "signed",
    "unsigned", "void", "wchar_t", "size_t", "int8_t", "int16_t", "int32_t", "int64_t",
    "uint8_t", "uint16_t", "uint32_t", "uint64_t", "string", "vector", "map", "unique_ptr",
    "shared_ptr",
];

const RUST_KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait", "true",
    "type", "unsafe", "use", "where", "while",
];

const RUST_TYPES: &[&str] = &[
    "bool", "char", "str", "u8", "u16", "u32", "u64", "u128", "usize", "i8", "i16", "i32", "i64",
    "i128", "isize", "f32", "f64", "String", "Vec", "Option", "Result", "Box", "Rc", "Arc",
    "Some", "None", "Ok", "Err",
];

pub static C: CFamilyLanguage = CFamilyLanguage {
    doc_type: DocumentType::C,
    keywords: C_KEYWORDS,
    types: C_TYPES,
    directives: C_DIRECTIVES,
    hash_attributes: false,
    lifetimes: false,
};

pub static CPP: CFamilyLanguage = CFamilyLanguage {
    doc_type: DocumentType::Cpp,
    keywords: CPP_KEYWORDS,
    types: CPP_TYPES,
    directives: C_DIRECTIVES,
    hash_attributes: false,
    lifetimes: false,
};

pub static RUST: CFamilyLanguage = CFamilyLanguage {
    doc_type: DocumentType::Rust,
    keywords: RUST_KEYWORDS,
    types: RUST_TYPES,
    directives: &[],
    hash_attributes: true,
    lifetimes: true,
};

pub static SHELL: HashCommentLanguage = HashCommentLanguage {
    doc_type: DocumentType::Shell,
    keywords: &[
        "if", "then", "else", "elif", "fi", "for", "while", "until", "do", "done", "case", "esac",
        "in", "function", "return", "local", "export", "readonly", "exit", "set", "unset",
    ],
    table_headers: false,
};

pub static PYTHON: HashCommentLanguage = HashCommentLanguage {
    doc_type: DocumentType::Python,
    keywords: &[
        "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
        "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
        "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
        "try", "while", "with", "yield", "self",
    ],
    table_headers: false,
};

pub static TOML: HashCommentLanguage = HashCommentLanguage {
    doc_type: DocumentType::Toml,
    keywords: &["true", "false"],
    table_headers: true,
};
