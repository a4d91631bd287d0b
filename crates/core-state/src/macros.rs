use core_events::InputEvent;
use tracing::debug;

/// Keyboard macro capture and replay bookkeeping.
///
/// Recording stores raw input events; playback hands them back so they run
/// through the same dispatch path as live input. Playback cannot nest and is
/// refused while recording.
#[derive(Debug, Default, Clone)]
pub struct MacroRecorder {
    recording: bool,
    current: Vec<InputEvent>,
    last: Vec<InputEvent>,
    playing: bool,
}

impl MacroRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn last_macro(&self) -> &[InputEvent] {
        &self.last
    }

    /// Start or stop recording. Stopping keeps the capture as the last macro.
    /// Returns whether recording is now on.
    pub fn toggle_recording(&mut self) -> bool {
        if self.recording {
            self.recording = false;
            self.last = std::mem::take(&mut self.current);
            debug!(target: "state.macro", events = self.last.len(), "macro_recorded");
        } else {
            self.recording = true;
            self.current.clear();
            debug!(target: "state.macro", "macro_recording_started");
        }
        self.recording
    }

    pub fn record(&mut self, event: InputEvent) {
        if self.recording && !self.playing {
            self.current.push(event);
        }
    }

    /// Events to replay, or `None` when already playing, recording, or nothing was captured.
    pub fn begin_playback(&mut self) -> Option<Vec<InputEvent>> {
        if self.playing || self.recording || self.last.is_empty() {
            return None;
        }
        self.playing = true;
        debug!(target: "state.macro", events = self.last.len(), "macro_playback");
        Some(self.last.clone())
    }

    pub fn end_playback(&mut self) {
        self.playing = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_events::KeyEvent;

    #[test]
    fn record_then_play() {
        let mut m = MacroRecorder::new();
        assert!(m.begin_playback().is_none());
        assert!(m.toggle_recording());
        m.record(KeyEvent::char('a').into());
        m.record(KeyEvent::char('b').into());
        assert!(m.begin_playback().is_none());
        assert!(!m.toggle_recording());
        let events = m.begin_playback().unwrap();
        assert_eq!(events.len(), 2);
        assert!(m.is_playing());
        assert!(m.begin_playback().is_none());
        m.end_playback();
        assert!(!m.is_playing());
    }

    #[test]
    fn events_outside_recording_are_ignored() {
        let mut m = MacroRecorder::new();
        m.record(KeyEvent::char('x').into());
        m.toggle_recording();
        m.toggle_recording();
        assert!(m.last_macro().is_empty());
    }
}
