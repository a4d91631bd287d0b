//! Terminal input: raw bytes in, `InputEvent`s out.
//!
//! Invariants:
//! * Decoding is deterministic: the same bytes give the same events. With
//!   `decode` this holds per read; `StreamDecoder` extends it across reads
//!   for any chunking that keeps a lone ESC out of the last byte of a read.
//! * Resize events are only produced when no input bytes are waiting.

mod decode;
mod reader;
mod stream;

pub use decode::decode;
pub use reader::StdinReader;
pub use stream::StreamDecoder;

use core_events::InputEvent;

/// Blocking supplier of input events for the main loop.
pub trait EventSource {
    /// Wait for input. An empty batch is an idle wake-up (nothing arrived
    /// within the poll interval), which the main loop uses for timers.
    fn read_events(&mut self) -> anyhow::Result<Vec<InputEvent>>;
}
