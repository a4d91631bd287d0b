//! Status line composition.
//!
//! Two stages: `compose_status` turns a `StatusContext` into ordered
//! `StatusSegment`s, `format_status` renders them into a `StatusLine` whose
//! left part is drawn from column 0 and whose right part (`Ln X, Col Y`) is
//! right-aligned into the last row. While a prompt is open the left part is
//! the prompt label plus the command-line text and the terminal cursor lives
//! there.

use std::borrow::Cow;
use std::fmt::Write as _;

/// Active prompt: label, command-line text and the cursor's visual column in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptView<'a> {
    pub label: &'a str,
    pub text: &'a str,
    pub cursor_col: usize,
}

/// Everything the status row shows.
#[derive(Debug, Clone, Default)]
pub struct StatusContext<'a> {
    pub name: Cow<'a, str>,
    pub modified: bool,
    pub encoding: &'static str,
    pub bom: bool,
    pub crlf: bool,
    pub doc_type: &'static str,
    /// 0-based index of the active document.
    pub doc_index: usize,
    pub doc_count: usize,
    pub recording: bool,
    pub prompt: Option<PromptView<'a>>,
    pub message: Option<&'a str>,
    /// 1-based cursor line/column of the active document.
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusSegment<'a> {
    FileName { name: Cow<'a, str>, modified: bool },
    Encoding {
        label: &'static str,
        bom: bool,
        crlf: bool,
    },
    DocType(&'static str),
    /// Shown only with more than one open document.
    DocumentIndex { index_1: usize, count: usize },
    Recording,
    Message(&'a str),
    Prompt(PromptView<'a>),
    Position { line_1: usize, col_1: usize },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusLine {
    pub left: String,
    pub right: String,
    /// Visual column of the terminal cursor within `left` while prompting.
    pub cursor_col: Option<usize>,
}

pub fn compose_status<'a>(ctx: &'a StatusContext<'a>) -> Vec<StatusSegment<'a>> {
    let mut out = Vec::with_capacity(8);
    if let Some(prompt) = ctx.prompt {
        out.push(StatusSegment::Prompt(prompt));
    } else {
        out.push(StatusSegment::FileName {
            name: Cow::Borrowed(ctx.name.as_ref()),
            modified: ctx.modified,
        });
        out.push(StatusSegment::Encoding {
            label: ctx.encoding,
            bom: ctx.bom,
            crlf: ctx.crlf,
        });
        out.push(StatusSegment::DocType(ctx.doc_type));
        if ctx.doc_count > 1 {
            out.push(StatusSegment::DocumentIndex {
                index_1: ctx.doc_index + 1,
                count: ctx.doc_count,
            });
        }
        if ctx.recording {
            out.push(StatusSegment::Recording);
        }
        if let Some(msg) = ctx.message {
            out.push(StatusSegment::Message(msg));
        }
    }
    out.push(StatusSegment::Position {
        line_1: ctx.line,
        col_1: ctx.column,
    });
    out
}

pub fn format_status(segments: &[StatusSegment<'_>]) -> StatusLine {
    let mut line = StatusLine::default();
    let left = &mut line.left;
    for seg in segments {
        match seg {
            StatusSegment::Prompt(p) => {
                left.push_str(p.label);
                left.push_str(p.text);
                let label_width = core_text::width::visual_width(p.label.chars(), 1);
                line.cursor_col = Some(label_width + p.cursor_col);
            }
            StatusSegment::FileName { name, modified } => {
                left.push_str(name);
                if *modified {
                    left.push('*');
                }
            }
            StatusSegment::Encoding { label, bom, crlf } => {
                let _ = write!(left, "  [{label}");
                if *bom {
                    left.push_str(" BOM");
                }
                if *crlf {
                    left.push_str(" CRLF");
                }
                left.push(']');
            }
            StatusSegment::DocType(t) => {
                let _ = write!(left, "  {t}");
            }
            StatusSegment::DocumentIndex { index_1, count } => {
                let _ = write!(left, "  [{index_1}/{count}]");
            }
            StatusSegment::Recording => left.push_str("  REC"),
            StatusSegment::Message(m) => {
                let _ = write!(left, "  {m}");
            }
            StatusSegment::Position { line_1, col_1 } => {
                line.right = format!("Ln {line_1}, Col {col_1}");
            }
        }
    }
    line
}

pub fn build_status(ctx: &StatusContext<'_>) -> StatusLine {
    format_status(&compose_status(ctx))
}
