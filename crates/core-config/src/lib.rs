//! Configuration loading and parsing.
//!
//! rill reads an optional `rill.toml` (working directory first, then the
//! platform config dir, or the path in `RILL_CONFIG`). The file is never
//! written. A missing or unparsable file yields defaults; unknown keys are
//! ignored so older binaries tolerate newer files.
//!
//! ```toml
//! [editor]
//! tab_width = 4
//! trim_trailing_whitespace = true
//!
//! [build]
//! command = "make"
//!
//! [history]
//! jump_threshold = 5
//! capacity = 64
//!
//! [input]
//! escape_timeout_ms = 25
//! poll_interval_ms = 100
//! ```

use anyhow::Result;
use core_text::width::{DEFAULT_TAB_WIDTH, clamp_tab_width};
use serde::Deserialize;
use std::time::Duration;
use std::{env, fs, path::PathBuf};
use tracing::{info, warn};

pub const CONFIG_FILE_NAME: &str = "rill.toml";
pub const CONFIG_PATH_ENV: &str = "RILL_CONFIG";

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    #[serde(default = "EditorConfig::default_tab_width")]
    pub tab_width: usize,
    #[serde(default = "EditorConfig::default_trim")]
    pub trim_trailing_whitespace: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            tab_width: Self::default_tab_width(),
            trim_trailing_whitespace: Self::default_trim(),
        }
    }
}

impl EditorConfig {
    const fn default_tab_width() -> usize {
        DEFAULT_TAB_WIDTH
    }
    const fn default_trim() -> bool {
        true
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    /// Run through `sh -c`.
    #[serde(default = "BuildConfig::default_command")]
    pub command: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            command: Self::default_command(),
        }
    }
}

impl BuildConfig {
    fn default_command() -> String {
        "make".to_string()
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct HistoryConfig {
    /// A jump further than this many lines records a navigation marker.
    #[serde(default = "HistoryConfig::default_jump_threshold")]
    pub jump_threshold: usize,
    #[serde(default = "HistoryConfig::default_capacity")]
    pub capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            jump_threshold: Self::default_jump_threshold(),
            capacity: Self::default_capacity(),
        }
    }
}

impl HistoryConfig {
    const fn default_jump_threshold() -> usize {
        5
    }
    const fn default_capacity() -> usize {
        64
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct InputConfig {
    /// How long an unfinished escape sequence may wait for its remaining bytes.
    #[serde(default = "InputConfig::default_escape_timeout_ms")]
    pub escape_timeout_ms: u64,
    /// Idle wake-up interval for resize checks.
    #[serde(default = "InputConfig::default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            escape_timeout_ms: Self::default_escape_timeout_ms(),
            poll_interval_ms: Self::default_poll_interval_ms(),
        }
    }
}

impl InputConfig {
    const fn default_escape_timeout_ms() -> u64 {
        25
    }
    const fn default_poll_interval_ms() -> u64 {
        100
    }

    pub fn escape_timeout(&self) -> Duration {
        Duration::from_millis(self.escape_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub build: BuildConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub input: InputConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>, // original file string (optional)
    pub file: ConfigFile,    // parsed (or default) data
}

/// Config path: `RILL_CONFIG` if set, else `rill.toml` in the working directory if
/// present, else the platform config dir.
pub fn discover() -> PathBuf {
    if let Some(path) = env::var_os(CONFIG_PATH_ENV).filter(|p| !p.is_empty()) {
        return PathBuf::from(path);
    }
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("rill").join(CONFIG_FILE_NAME);
    }
    local
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            info!(target: "config", path = %path.display(), "config_loaded");
            Ok(Config {
                raw: Some(content),
                file,
            })
        }
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed");
            Ok(Config::default())
        }
    }
}

impl Config {
    /// Tab width clamped to the supported range.
    pub fn tab_width(&self) -> usize {
        let raw = self.file.editor.tab_width;
        let clamped = clamp_tab_width(raw);
        if clamped != raw {
            info!(target: "config", raw, clamped, "tab_width_clamped");
        }
        clamped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex, MutexGuard};
    use tracing::Level;
    use tracing::subscriber::with_default;
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone)]
    struct BufferWriter {
        inner: Arc<Mutex<Vec<u8>>>,
    }

    impl BufferWriter {
        fn new() -> (Self, Arc<Mutex<Vec<u8>>>) {
            let buf = Arc::new(Mutex::new(Vec::new()));
            (Self { inner: buf.clone() }, buf)
        }
    }

    struct LockedWriter<'a> {
        guard: MutexGuard<'a, Vec<u8>>,
    }

    impl<'a> Write for LockedWriter<'a> {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.guard.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for BufferWriter {
        type Writer = LockedWriter<'a>;

        fn make_writer(&'a self) -> Self::Writer {
            LockedWriter {
                guard: self.inner.lock().expect("log buffer poisoned"),
            }
        }
    }

    fn write_config(body: &str) -> tempfile::NamedTempFile {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), body).unwrap();
        tmp
    }

    #[test]
    fn default_config_when_missing_file() {
        let cfg = load_from(Some(PathBuf::from("__nonexistent_hopefully__.toml"))).unwrap();
        assert!(cfg.raw.is_none());
        assert_eq!(cfg.file, ConfigFile::default());
        assert_eq!(cfg.tab_width(), 4);
        assert_eq!(cfg.file.build.command, "make");
        assert_eq!(cfg.file.history.jump_threshold, 5);
        assert_eq!(cfg.file.input.escape_timeout(), Duration::from_millis(25));
    }

    #[test]
    fn parses_all_sections() {
        let tmp = write_config(
            "[editor]\ntab_width = 8\ntrim_trailing_whitespace = false\n\
             [build]\ncommand = \"cargo build\"\n\
             [history]\njump_threshold = 10\ncapacity = 4\n\
             [input]\nescape_timeout_ms = 50\npoll_interval_ms = 0\n",
        );
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.tab_width(), 8);
        assert!(!cfg.file.editor.trim_trailing_whitespace);
        assert_eq!(cfg.file.build.command, "cargo build");
        assert_eq!(cfg.file.history.capacity, 4);
        assert_eq!(cfg.file.input.escape_timeout_ms, 50);
        assert_eq!(cfg.file.input.poll_interval(), Duration::from_millis(1));
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let tmp = write_config("[history]\ncapacity = 8\n[unknown]\nx = 1\n");
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.file.history.capacity, 8);
        assert_eq!(cfg.file.history.jump_threshold, 5);
        assert!(cfg.file.editor.trim_trailing_whitespace);
    }

    #[test]
    fn parse_error_falls_back_to_defaults() {
        let tmp = write_config("[editor\ntab_width = ");
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.file, ConfigFile::default());
    }

    #[test]
    fn tab_width_clamp_logs_under_config_target() {
        let tmp = write_config("[editor]\ntab_width = 99\n");
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        let (writer, buffer) = BufferWriter::new();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::INFO)
            .with_target(true)
            .with_ansi(false)
            .without_time()
            .with_writer(writer)
            .finish();

        let width = with_default(subscriber, || cfg.tab_width());

        let log_output = String::from_utf8(buffer.lock().unwrap().clone()).unwrap();
        assert!(log_output.contains("INFO config:"));
        assert!(log_output.contains("tab_width_clamped"));
        assert_eq!(width, 16);
    }
}
