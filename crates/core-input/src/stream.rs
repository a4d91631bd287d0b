//! Decoder that carries unfinished sequences across reads.

use crate::decode::{Step, decode, decode_one};
use core_events::InputEvent;
use std::time::{Duration, Instant};

/// Accumulates bytes from successive reads. A tail that is a valid prefix of an
/// escape sequence or UTF-8 character is held back until the next `feed`, or
/// until `flush` gives up on it. A lone ESC at the end of a read is never held
/// back; it is the Escape key.
#[derive(Debug, Default)]
pub struct StreamDecoder {
    pending: Vec<u8>,
    pending_since: Option<Instant>,
}

impl StreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&mut self, bytes: &[u8]) -> Vec<InputEvent> {
        self.pending.extend_from_slice(bytes);
        let mut out = Vec::new();
        let mut i = 0;
        while i < self.pending.len() {
            match decode_one(&self.pending[i..]) {
                Step::Event(ev, n) => {
                    out.push(ev);
                    i += n;
                }
                Step::Skip(n) => i += n,
                Step::Incomplete => break,
            }
        }
        self.pending.drain(..i);
        if self.pending.is_empty() {
            self.pending_since = None;
        } else {
            tracing::trace!(target: "input.decode", held = self.pending.len(), "carry_over");
            self.pending_since.get_or_insert_with(Instant::now);
        }
        out
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Time left before a held tail should be flushed, if any is held.
    pub fn time_to_flush(&self, timeout: Duration) -> Option<Duration> {
        self.pending_since
            .map(|since| timeout.saturating_sub(since.elapsed()))
    }

    /// Give up waiting and decode whatever is held as if the stream ended.
    pub fn flush(&mut self) -> Vec<InputEvent> {
        let out = decode(&self.pending);
        self.pending.clear();
        self.pending_since = None;
        out
    }
}
