//! Main loop: read input, dispatch, repaint.
//!
//! Single-threaded. The only blocking point is `EventSource::read_events`;
//! an empty batch is an idle wake-up used to expire status messages.

use crate::build;
use anyhow::Result;
use core_actions::dispatch_event;
use core_events::InputEvent;
use core_input::EventSource;
use core_render::{PromptView, RenderEngine, StatusContext, StatusLine, build_status};
use core_state::{EditorState, OpenDocument};
use core_syntax::Highlighter;
use core_terminal::{TerminalBackend, TerminalGuard};
use std::borrow::Cow;
use std::io::{BufWriter, Stdout, Write, stdout};
use tracing::{debug, info, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShutdownReason {
    Quit,
    Error,
}

impl ShutdownReason {
    fn as_str(&self) -> &'static str {
        match self {
            ShutdownReason::Quit => "quit",
            ShutdownReason::Error => "error",
        }
    }
}

pub struct EditorRuntime {
    state: EditorState,
    engine: RenderEngine,
    out: BufWriter<Stdout>,
}

impl EditorRuntime {
    pub fn new(state: EditorState, (width, height): (u16, u16)) -> Self {
        Self {
            state,
            engine: RenderEngine::new(width, height),
            out: BufWriter::new(stdout()),
        }
    }

    pub fn run<E: EventSource>(
        &mut self,
        guard: &mut TerminalGuard<'_>,
        input: &mut E,
    ) -> Result<()> {
        self.render()?;
        let outcome = self.event_loop(guard, input);
        let reason = if outcome.is_ok() {
            ShutdownReason::Quit
        } else {
            ShutdownReason::Error
        };
        info!(target: "runtime.shutdown", reason = reason.as_str(), "shutdown");
        outcome
    }

    fn event_loop<E: EventSource>(
        &mut self,
        guard: &mut TerminalGuard<'_>,
        input: &mut E,
    ) -> Result<()> {
        loop {
            let events = input.read_events()?;
            let mut dirty = false;
            if events.is_empty() {
                dirty = self.state.tick_ephemeral();
            }
            for event in &events {
                if let InputEvent::Resize { width, height } = *event {
                    debug!(target: "runtime", width, height, "resize");
                    self.engine.resize(width, height);
                    dirty = true;
                    continue;
                }
                let result = dispatch_event(event, &mut self.state)?;
                if result.quit {
                    return Ok(());
                }
                if result.build {
                    self.run_build(guard, input)?;
                    dirty = true;
                }
                dirty |= result.dirty;
            }
            if dirty {
                self.render()?;
            }
        }
    }

    /// Hand the terminal to the build command, wait for a key, take it back.
    fn run_build<E: EventSource>(
        &mut self,
        guard: &mut TerminalGuard<'_>,
        input: &mut E,
    ) -> Result<()> {
        let backend = guard.backend();
        backend.suspend()?;
        let summary = match build::run_command(&self.state.settings.build_command) {
            Ok(status) => build::summary(status),
            Err(e) => format!("{e:#}"),
        };
        println!("\n{summary}. Press any key to return.");
        crossterm::terminal::enable_raw_mode()?;
        if let Some((width, height)) = wait_for_key(input)? {
            debug!(target: "runtime", width, height, "resize_during_build");
            self.engine.resize(width, height);
        }
        backend.resume()?;
        self.engine.invalidate();
        self.state.message(summary);
        Ok(())
    }

    fn render(&mut self) -> Result<()> {
        self.state.set_last_text_height(self.engine.text_rows());
        let status = status_line(&self.state);
        let active = self.state.active;
        let OpenDocument { doc, highlighter, .. } = &mut self.state.documents[active];
        let highlighter = highlighter.as_mut().map(|h| &mut **h as &mut dyn Highlighter);
        let stats = self.engine.render(&mut self.out, doc, highlighter, &status)?;
        self.out.flush()?;
        trace!(
            target: "render",
            runs = stats.runs,
            cells = stats.cells,
            full = stats.full,
            "frame"
        );
        Ok(())
    }
}

/// Block until a key press. Returns the last terminal size reported meanwhile.
fn wait_for_key<E: EventSource>(input: &mut E) -> Result<Option<(u16, u16)>> {
    let mut size = None;
    loop {
        for event in input.read_events()? {
            match event {
                InputEvent::Resize { width, height } => size = Some((width, height)),
                InputEvent::Key(k) if k.pressed => return Ok(size),
                _ => {}
            }
        }
    }
}

/// Status row for the active document, prompt and message.
pub fn status_line(state: &EditorState) -> StatusLine {
    let open = state.active_doc();
    let doc = &open.doc;
    let prompt_text: String;
    let prompt = match state.command_line.kind() {
        Some(kind) => {
            prompt_text = state.command_line.text();
            Some(PromptView {
                label: kind.label(),
                text: &prompt_text,
                cursor_col: state.command_line.doc.column().saturating_sub(1),
            })
        }
        None => None,
    };
    let ctx = StatusContext {
        name: Cow::Owned(doc.display_name()),
        modified: doc.is_modified(),
        encoding: doc.encoding.label(),
        bom: doc.has_bom,
        crlf: doc.uses_crlf,
        doc_type: open.doc_type.label(),
        doc_index: state.active,
        doc_count: state.documents.len(),
        recording: state.macros.is_recording(),
        prompt,
        message: state.ephemeral_status.as_ref().map(|m| m.text.as_str()),
        line: doc.line(),
        column: doc.column(),
    };
    build_status(&ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_state::{PromptKind, Settings};
    use core_text::Document;
    use pretty_assertions::assert_eq;
    use core_events::{KeyCode, KeyEvent};
    use std::collections::VecDeque;
    use std::path::PathBuf;

    struct Scripted(VecDeque<Vec<InputEvent>>);

    impl EventSource for Scripted {
        fn read_events(&mut self) -> Result<Vec<InputEvent>> {
            Ok(self.0.pop_front().unwrap_or_default())
        }
    }

    #[test]
    fn status_shows_document_and_position() {
        let mut state = EditorState::new(Settings::default());
        let mut doc = Document::from_text("fn main() {}\n", 4);
        doc.filename = Some(PathBuf::from("src/main.rs"));
        state.add_or_replace_scratch(doc);
        state.doc_mut().move_to_line_end();
        state.doc_mut().insert_char('x');
        let status = status_line(&state);
        assert_eq!(status.left, "main.rs*  [UTF-8]  rust");
        assert_eq!(status.right, "Ln 1, Col 14");
        assert_eq!(status.cursor_col, None);
    }

    #[test]
    fn status_shows_prompt_with_cursor() {
        let mut state = EditorState::new(Settings::default());
        state.open_prompt(PromptKind::GotoLine, "12");
        let status = status_line(&state);
        assert!(status.left.starts_with("Go to line: 12"));
        assert_eq!(status.cursor_col, Some("Go to line: 12".len()));
    }

    #[test]
    fn key_wait_reports_resize_seen_before_the_key() {
        let mut input = Scripted(VecDeque::from(vec![
            vec![InputEvent::Resize {
                width: 120,
                height: 40,
            }],
            Vec::new(),
            vec![KeyEvent::plain(KeyCode::Enter).into()],
        ]));
        assert_eq!(wait_for_key(&mut input).unwrap(), Some((120, 40)));
        assert!(input.0.is_empty());
    }

    #[test]
    fn key_wait_without_resize_reports_nothing() {
        let mut input = Scripted(VecDeque::from(vec![vec![
            KeyEvent::char('q').into(),
            InputEvent::Resize {
                width: 80,
                height: 24,
            },
        ]]));
        assert_eq!(wait_for_key(&mut input).unwrap(), None);
    }
}
