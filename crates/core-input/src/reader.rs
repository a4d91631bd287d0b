//! Blocking stdin reader: poll, read, decode, and resize notifications.

use crate::EventSource;
use crate::stream::StreamDecoder;
use anyhow::{Context, Result, bail};
use core_events::InputEvent;
use nix::errno::Errno;
use nix::poll::{PollFd, PollFlags, poll};
use nix::sys::signal::{SaFlags, SigAction, SigHandler, SigSet, Signal, sigaction};
use std::fs::File;
use std::io::{self, ErrorKind, Read};
use std::os::fd::AsFd;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

const READ_CHUNK: usize = 4096;

static RESIZE_PENDING: AtomicBool = AtomicBool::new(false);

extern "C" fn on_sigwinch(_: nix::libc::c_int) {
    RESIZE_PENDING.store(true, Ordering::Relaxed);
}

/// Turn an outstanding resize notification into a `Resize` event.
pub(crate) fn take_resize(
    flag: &AtomicBool,
    size: impl FnOnce() -> io::Result<(u16, u16)>,
) -> Option<InputEvent> {
    if !flag.swap(false, Ordering::Relaxed) {
        return None;
    }
    match size() {
        Ok((width, height)) => Some(InputEvent::Resize { width, height }),
        Err(e) => {
            tracing::warn!(target: "input", ?e, "terminal_size_failed");
            None
        }
    }
}

/// Reads raw terminal bytes from a duplicate of the stdin descriptor, so no
/// userspace buffering sits between `poll` and `read`.
pub struct StdinReader {
    input: File,
    decoder: StreamDecoder,
    escape_timeout: Duration,
    poll_interval: Duration,
    buf: Vec<u8>,
}

impl StdinReader {
    /// Install the SIGWINCH handler and take a private handle on stdin.
    pub fn new(escape_timeout: Duration, poll_interval: Duration) -> Result<Self> {
        let fd = io::stdin()
            .as_fd()
            .try_clone_to_owned()
            .context("duplicate stdin descriptor")?;
        let action = SigAction::new(
            SigHandler::Handler(on_sigwinch),
            SaFlags::empty(),
            SigSet::empty(),
        );
        // SAFETY: the handler only stores to an atomic.
        unsafe { sigaction(Signal::SIGWINCH, &action) }.context("install SIGWINCH handler")?;
        tracing::debug!(
            target: "input",
            escape_timeout_ms = escape_timeout.as_millis() as u64,
            poll_interval_ms = poll_interval.as_millis() as u64,
            "stdin_reader_ready"
        );
        Ok(Self {
            input: File::from(fd),
            decoder: StreamDecoder::new(),
            escape_timeout,
            poll_interval,
            buf: vec![0; READ_CHUNK],
        })
    }

    fn poll_readable(&self, timeout: Duration) -> Result<bool> {
        let fd = self.input.as_fd();
        let mut fds = [PollFd::new(&fd, PollFlags::POLLIN)];
        let ms = i32::try_from(timeout.as_millis()).unwrap_or(i32::MAX);
        match poll(&mut fds, ms) {
            Ok(n) if n > 0 => Ok(fds[0]
                .revents()
                .is_some_and(|r| r.intersects(PollFlags::POLLIN | PollFlags::POLLHUP))),
            Ok(_) => Ok(false),
            // SIGWINCH interrupts the wait
            Err(Errno::EINTR) => Ok(false),
            Err(e) => Err(e).context("poll stdin"),
        }
    }
}

impl EventSource for StdinReader {
    fn read_events(&mut self) -> Result<Vec<InputEvent>> {
        loop {
            let wait = self
                .decoder
                .time_to_flush(self.escape_timeout)
                .unwrap_or(self.poll_interval);
            if self.poll_readable(wait)? {
                let n = match self.input.read(&mut self.buf) {
                    Ok(n) => n,
                    Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e).context("read stdin"),
                };
                if n == 0 {
                    bail!("stdin closed");
                }
                tracing::trace!(target: "input", bytes = n, "read");
                let events = self.decoder.feed(&self.buf[..n]);
                if !events.is_empty() {
                    return Ok(events);
                }
                continue;
            }
            if self.decoder.has_pending() {
                let events = self.decoder.flush();
                if !events.is_empty() {
                    return Ok(events);
                }
            }
            if let Some(ev) = take_resize(&RESIZE_PENDING, crossterm::terminal::size) {
                tracing::debug!(target: "input", ?ev, "resize");
                return Ok(vec![ev]);
            }
            if !self.decoder.has_pending() {
                return Ok(Vec::new());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_is_reported_once_per_notification() {
        let flag = AtomicBool::new(false);
        assert_eq!(take_resize(&flag, || Ok((80, 24))), None);
        flag.store(true, Ordering::Relaxed);
        assert_eq!(
            take_resize(&flag, || Ok((100, 30))),
            Some(InputEvent::Resize {
                width: 100,
                height: 30
            })
        );
        assert_eq!(take_resize(&flag, || Ok((100, 30))), None);
    }

    #[test]
    fn failed_size_query_drops_notification() {
        let flag = AtomicBool::new(true);
        assert_eq!(take_resize(&flag, || Err(io::Error::other("no tty"))), None);
        assert!(!flag.load(Ordering::Relaxed));
    }
}
