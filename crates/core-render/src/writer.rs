//! Terminal writer.
//!
//! A frame is recorded as an ordered list of commands and queued to the output
//! in one go, so the terminal sees a single flush per frame. Positions are
//! absolute, 0-based.

use crate::Style;
use crate::style::{CellFlags, foreground};
use anyhow::Result;
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    queue,
    style::{Attribute, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use std::io::Write;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    HideCursor,
    ShowCursor,
    ClearAll,
    MoveTo(u16, u16),
    /// One positioned write: move once, then print each styled span. Text past
    /// the row end continues on the next row through terminal autowrap.
    Run {
        x: u16,
        y: u16,
        spans: Vec<(Style, String)>,
    },
}

#[derive(Debug, Default)]
pub struct Writer {
    cmds: Vec<Command>,
}

impl Writer {
    pub fn new() -> Self {
        Self { cmds: Vec::new() }
    }

    pub fn hide_cursor(&mut self) {
        self.cmds.push(Command::HideCursor);
    }

    pub fn show_cursor(&mut self) {
        self.cmds.push(Command::ShowCursor);
    }

    pub fn clear_all(&mut self) {
        self.cmds.push(Command::ClearAll);
    }

    pub fn move_to(&mut self, x: u16, y: u16) {
        self.cmds.push(Command::MoveTo(x, y));
    }

    pub fn run(&mut self, x: u16, y: u16, spans: Vec<(Style, String)>) {
        if !spans.is_empty() {
            self.cmds.push(Command::Run { x, y, spans });
        }
    }

    pub fn commands(&self) -> &[Command] {
        &self.cmds
    }

    pub fn flush<W: Write>(self, out: &mut W) -> Result<()> {
        for c in self.cmds {
            match c {
                Command::HideCursor => queue!(out, Hide)?,
                Command::ShowCursor => queue!(out, Show)?,
                Command::ClearAll => {
                    queue!(out, SetAttribute(Attribute::Reset), Clear(ClearType::All))?
                }
                Command::MoveTo(x, y) => queue!(out, MoveTo(x, y))?,
                Command::Run { x, y, spans } => {
                    queue!(out, MoveTo(x, y))?;
                    for (style, text) in spans {
                        queue_style(out, style)?;
                        queue!(out, Print(text))?;
                    }
                }
            }
        }
        out.flush()?;
        Ok(())
    }
}

fn queue_style<W: Write>(out: &mut W, style: Style) -> Result<()> {
    queue!(out, SetAttribute(Attribute::Reset), ResetColor)?;
    if let Some(color) = foreground(style.category) {
        queue!(out, SetForegroundColor(color))?;
    }
    if style.flags.contains(CellFlags::REVERSE) {
        queue!(out, SetAttribute(Attribute::Reverse))?;
    }
    Ok(())
}
