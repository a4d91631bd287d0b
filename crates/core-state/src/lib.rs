//! Editor state: the open documents, command-line pseudo-document, clipboard,
//! navigation history, macro recorder, completion session and status messages.
//!
//! Documents are kept in open order with a stable `DocId` each, so navigation
//! markers survive reordering and can be dropped when their document closes.
//! There is always at least one document: closing the last one leaves a fresh
//! empty buffer.
//!
//! Ephemeral status messages carry an expiry instant; the main loop calls
//! `tick_ephemeral` on idle wake-ups and repaints when one expires.

use core_config::Config;
use core_syntax::{DocumentType, Highlighter, classify, highlighter_for};
use core_text::Document;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::debug;

pub mod completion;
pub mod history;
pub mod macros;

pub use completion::{CompletionSession, Suggestion, suggestions};
pub use history::{Location, NavigationHistory};
pub use macros::MacroRecorder;

pub type DocId = u64;

/// How long a status message stays visible.
pub const EPHEMERAL_TTL: Duration = Duration::from_secs(3);

/// Settings the editor needs from the configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub tab_width: usize,
    pub trim_trailing_whitespace: bool,
    pub build_command: String,
    pub history_capacity: usize,
    pub jump_threshold: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl Settings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            tab_width: config.tab_width(),
            trim_trailing_whitespace: config.file.editor.trim_trailing_whitespace,
            build_command: config.file.build.command.clone(),
            history_capacity: config.file.history.capacity,
            jump_threshold: config.file.history.jump_threshold,
        }
    }
}

/// An open document with its classification and highlighter.
pub struct OpenDocument {
    pub id: DocId,
    pub doc: Document,
    pub doc_type: DocumentType,
    pub highlighter: Option<Box<dyn Highlighter>>,
}

impl OpenDocument {
    pub fn new(id: DocId, doc: Document) -> Self {
        let mut open = Self {
            id,
            doc,
            doc_type: DocumentType::PlainText,
            highlighter: None,
        };
        open.reclassify();
        open
    }

    /// Re-detect the document type (after open or save-as).
    pub fn reclassify(&mut self) {
        let first_line = self.doc.line_text(0);
        let doc_type = classify(self.doc.filename.as_deref(), &first_line);
        if doc_type != self.doc_type || self.highlighter.is_none() {
            self.doc_type = doc_type;
            self.highlighter = highlighter_for(doc_type);
        }
    }

    /// Unnamed, unmodified and empty.
    pub fn is_scratch(&self) -> bool {
        self.doc.filename.is_none() && !self.doc.is_modified() && self.doc.is_empty()
    }
}

impl std::fmt::Debug for OpenDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenDocument")
            .field("id", &self.id)
            .field("name", &self.doc.display_name())
            .field("doc_type", &self.doc_type)
            .finish()
    }
}

/// What the command line is currently asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Open,
    SaveAs,
    Find,
    /// First step of replace: the pattern.
    ReplaceSearch { all: bool },
    /// Second step of replace: the replacement text.
    ReplaceWith { all: bool },
    GotoLine,
    /// Close a modified document without saving?
    ConfirmClose,
}

impl PromptKind {
    pub fn label(self) -> &'static str {
        match self {
            PromptKind::Open => "Open: ",
            PromptKind::SaveAs => "Save as: ",
            PromptKind::Find => "Find: ",
            PromptKind::ReplaceSearch { all: false } => "Replace: ",
            PromptKind::ReplaceSearch { all: true } => "Replace all: ",
            PromptKind::ReplaceWith { .. } => "With: ",
            PromptKind::GotoLine => "Go to line: ",
            PromptKind::ConfirmClose => "Discard changes? (y/n) ",
        }
    }
}

/// The one-line pseudo-document used for prompts. Editing keys apply to it while active.
#[derive(Debug, Clone)]
pub struct CommandLine {
    kind: Option<PromptKind>,
    pub doc: Document,
}

impl Default for CommandLine {
    fn default() -> Self {
        Self {
            kind: None,
            doc: Document::default(),
        }
    }
}

impl CommandLine {
    pub fn is_active(&self) -> bool {
        self.kind.is_some()
    }

    pub fn kind(&self) -> Option<PromptKind> {
        self.kind
    }

    /// Begin a prompt pre-filled with `initial`, cursor at its end.
    pub fn open(&mut self, kind: PromptKind, initial: &str) {
        self.kind = Some(kind);
        self.doc = Document::from_text(initial, self.doc.tab_width());
        self.doc.move_to_end();
    }

    /// End the prompt and return what was typed.
    pub fn close(&mut self) -> String {
        self.kind = None;
        let text = self.doc.contents();
        self.doc = Document::from_text("", self.doc.tab_width());
        text
    }

    pub fn text(&self) -> String {
        self.doc.contents()
    }
}

/// Last find/replace input, reused as prompt defaults and by find-next.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    pub pattern: String,
    pub replacement: String,
}

impl SearchState {
    /// Smart case: a pattern containing an uppercase letter is matched case-sensitively.
    pub fn case_sensitive(&self) -> bool {
        self.pattern.chars().any(char::is_uppercase)
    }
}

#[derive(Debug, Clone)]
pub struct EphemeralMessage {
    pub text: String,
    pub expires_at: Instant,
}

/// Top-level editor state container.
#[derive(Debug)]
pub struct EditorState {
    pub documents: Vec<OpenDocument>,
    pub active: usize,
    next_id: DocId,
    pub settings: Settings,
    pub clipboard: String,
    pub command_line: CommandLine,
    pub search: SearchState,
    pub history: NavigationHistory,
    pub macros: MacroRecorder,
    pub completion: Option<CompletionSession>,
    pub ephemeral_status: Option<EphemeralMessage>,
    /// Set by a Ctrl+Q that was refused because of unsaved changes.
    pub quit_armed: bool,
    /// Text rows of the last frame (page motion and mouse hit-testing).
    pub last_text_height: usize,
}

impl EditorState {
    /// State with a single empty, unnamed document.
    pub fn new(settings: Settings) -> Self {
        let mut state = Self {
            documents: Vec::new(),
            active: 0,
            next_id: 1,
            history: NavigationHistory::new(settings.history_capacity, settings.jump_threshold),
            settings,
            clipboard: String::new(),
            command_line: CommandLine::default(),
            search: SearchState::default(),
            macros: MacroRecorder::new(),
            completion: None,
            ephemeral_status: None,
            quit_armed: false,
            last_text_height: 0,
        };
        state.command_line.doc.set_tab_width(state.settings.tab_width);
        state.new_document();
        state
    }

    pub fn active_doc(&self) -> &OpenDocument {
        &self.documents[self.active]
    }

    pub fn active_doc_mut(&mut self) -> &mut OpenDocument {
        &mut self.documents[self.active]
    }

    /// The document keys currently edit: the command line while a prompt is open.
    pub fn focused_doc_mut(&mut self) -> &mut Document {
        if self.command_line.is_active() {
            &mut self.command_line.doc
        } else {
            &mut self.documents[self.active].doc
        }
    }

    /// Focused document and the clipboard, borrowed together for cut/copy/paste.
    pub fn focus_and_clipboard(&mut self) -> (&mut Document, &mut String) {
        let doc = if self.command_line.is_active() {
            &mut self.command_line.doc
        } else {
            &mut self.documents[self.active].doc
        };
        (doc, &mut self.clipboard)
    }

    pub fn set_last_text_height(&mut self, h: usize) {
        self.last_text_height = h;
    }

    pub fn doc(&self) -> &Document {
        &self.documents[self.active].doc
    }

    pub fn doc_mut(&mut self) -> &mut Document {
        &mut self.documents[self.active].doc
    }

    /// Current cursor as a navigation location.
    pub fn location(&self) -> Location {
        Location {
            doc: self.active_doc().id,
            line: self.doc().line(),
        }
    }

    /// Append an empty document and make it active.
    pub fn new_document(&mut self) -> usize {
        let doc = Document::new(self.settings.tab_width);
        self.add_document(doc)
    }

    /// Append `doc` and make it active. Returns its index.
    pub fn add_document(&mut self, doc: Document) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        self.documents.push(OpenDocument::new(id, doc));
        self.active = self.documents.len() - 1;
        debug!(target: "state", id, count = self.documents.len(), "document_added");
        self.active
    }

    /// Like `add_document`, but a lone untouched scratch document is replaced
    /// instead of kept alongside.
    pub fn add_or_replace_scratch(&mut self, doc: Document) -> usize {
        if self.documents.len() == 1 && self.documents[0].is_scratch() {
            let scratch = self.documents.remove(0);
            self.history.forget(scratch.id);
        }
        self.add_document(doc)
    }

    /// Index of an open document bound to `path`.
    pub fn find_by_path(&self, path: &Path) -> Option<usize> {
        let wanted = normalize(path);
        self.documents
            .iter()
            .position(|d| d.doc.filename.as_deref().map(normalize).as_ref() == Some(&wanted))
    }

    pub fn index_of(&self, id: DocId) -> Option<usize> {
        self.documents.iter().position(|d| d.id == id)
    }

    pub fn set_active(&mut self, index: usize) -> bool {
        if index >= self.documents.len() || index == self.active {
            return false;
        }
        self.active = index;
        true
    }

    /// Cycle the active document by `delta`, wrapping.
    pub fn switch_document(&mut self, delta: isize) -> bool {
        let n = self.documents.len() as isize;
        if n < 2 {
            return false;
        }
        let next = (self.active as isize + delta).rem_euclid(n) as usize;
        self.set_active(next)
    }

    /// Close the active document. The last document is replaced by a fresh one.
    pub fn close_active(&mut self) {
        let closed = self.documents.remove(self.active);
        self.history.forget(closed.id);
        debug!(target: "state", id = closed.id, "document_closed");
        if self.documents.is_empty() {
            self.new_document();
        } else if self.active >= self.documents.len() {
            self.active = self.documents.len() - 1;
        }
    }

    pub fn modified_count(&self) -> usize {
        self.documents.iter().filter(|d| d.doc.is_modified()).count()
    }

    pub fn set_ephemeral<S: Into<String>>(&mut self, msg: S, ttl: Duration) {
        self.ephemeral_status = Some(EphemeralMessage {
            text: msg.into(),
            expires_at: Instant::now() + ttl,
        });
    }

    pub fn message<S: Into<String>>(&mut self, msg: S) {
        self.set_ephemeral(msg, EPHEMERAL_TTL);
    }

    /// Tick ephemeral status; returns true if message expired and was cleared.
    pub fn tick_ephemeral(&mut self) -> bool {
        match &self.ephemeral_status {
            Some(m) if Instant::now() >= m.expires_at => {
                self.ephemeral_status = None;
                true
            }
            _ => false,
        }
    }

    pub fn open_prompt(&mut self, kind: PromptKind, initial: &str) {
        self.completion = None;
        self.command_line.open(kind, initial);
    }
}

fn normalize(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
