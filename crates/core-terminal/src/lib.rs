//! Terminal mode control and crossterm implementation.
//!
//! Editing runs in raw mode on the alternate screen with SGR mouse reporting.
//! `suspend`/`resume` hand the terminal back in canonical mode around the
//! external build command. Every exit path restores the terminal: the guard
//! leaves on drop and the backend leaves again on its own drop.

use anyhow::Result;
use crossterm::{
    Command,
    cursor::{Hide, Show},
    execute,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, SetTitle, disable_raw_mode, enable_raw_mode,
    },
};
use std::fmt;
use std::io::stdout;

pub trait TerminalBackend {
    fn enter(&mut self) -> Result<()>;
    fn leave(&mut self) -> Result<()>;
    fn set_title(&mut self, title: &str) -> Result<()>;
    /// (columns, rows)
    fn size(&self) -> Result<(u16, u16)>;
    /// Leave raw mode temporarily so a child process can use the terminal.
    fn suspend(&mut self) -> Result<()>;
    fn resume(&mut self) -> Result<()>;
}

/// Button press/release, drag motion and SGR coordinates (`?1000`, `?1002`, `?1006`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseReporting(pub bool);

impl Command for MouseReporting {
    fn write_ansi(&self, f: &mut impl fmt::Write) -> fmt::Result {
        let mode = if self.0 { 'h' } else { 'l' };
        write!(f, "\x1b[?1000{mode}\x1b[?1002{mode}\x1b[?1006{mode}")
    }

    #[cfg(windows)]
    fn execute_winapi(&self) -> std::io::Result<()> {
        Ok(())
    }
}

pub struct CrosstermBackend {
    entered: bool,
    suspended: bool,
}

/// RAII guard ensuring terminal state restoration even if caller early-returns or panics.
pub struct TerminalGuard<'a> {
    backend: &'a mut CrosstermBackend,
    active: bool,
}

impl Default for CrosstermBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CrosstermBackend {
    pub fn new() -> Self {
        Self {
            entered: false,
            suspended: false,
        }
    }

    /// Enter and return a guard that will leave on drop.
    pub fn enter_guard(&mut self) -> Result<TerminalGuard<'_>> {
        self.enter()?;
        Ok(TerminalGuard {
            backend: self,
            active: true,
        })
    }

    fn enter_modes() -> Result<()> {
        enable_raw_mode()?;
        execute!(stdout(), EnterAlternateScreen, Hide, MouseReporting(true))?;
        Ok(())
    }

    fn leave_modes() -> Result<()> {
        execute!(stdout(), MouseReporting(false), LeaveAlternateScreen, Show)?;
        disable_raw_mode()?;
        Ok(())
    }
}

impl TerminalBackend for CrosstermBackend {
    fn enter(&mut self) -> Result<()> {
        if !self.entered {
            Self::enter_modes()?;
            self.entered = true;
            self.suspended = false;
            tracing::debug!(target: "runtime", "terminal_enter");
        }
        Ok(())
    }

    fn leave(&mut self) -> Result<()> {
        if self.entered {
            if self.suspended {
                // the build prompt may have left raw mode on
                disable_raw_mode()?;
            } else {
                Self::leave_modes()?;
            }
            self.entered = false;
            self.suspended = false;
            tracing::debug!(target: "runtime", "terminal_leave");
        }
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> Result<()> {
        execute!(stdout(), SetTitle(title))?;
        Ok(())
    }

    fn size(&self) -> Result<(u16, u16)> {
        Ok(crossterm::terminal::size()?)
    }

    fn suspend(&mut self) -> Result<()> {
        if self.entered && !self.suspended {
            Self::leave_modes()?;
            self.suspended = true;
            tracing::debug!(target: "runtime", "terminal_suspend");
        }
        Ok(())
    }

    fn resume(&mut self) -> Result<()> {
        if self.entered && self.suspended {
            Self::enter_modes()?;
            self.suspended = false;
            tracing::debug!(target: "runtime", "terminal_resume");
        }
        Ok(())
    }
}

impl Drop for CrosstermBackend {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

impl<'a> TerminalGuard<'a> {
    pub fn backend(&mut self) -> &mut CrosstermBackend {
        self.backend
    }
}

impl<'a> Drop for TerminalGuard<'a> {
    fn drop(&mut self) {
        if self.active {
            let _ = self.backend.leave();
        }
    }
}
