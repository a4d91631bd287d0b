//! rill: a small terminal text editor.

mod build;
mod runtime;

use anyhow::Result;
use clap::Parser;
use core_actions::open_path;
use core_config::load_from;
use core_input::StdinReader;
use core_state::{EditorState, Settings};
use core_terminal::{CrosstermBackend, TerminalBackend};
use runtime::EditorRuntime;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Once;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;

const LOG_FILE: &str = "rill.log";

#[derive(Parser, Debug)]
#[command(name = "rill", version, about = "Terminal text editor")]
struct Args {
    /// File to edit. A missing file is created on first save.
    path: PathBuf,
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    let _log_guard = configure_logging(&args.path);
    install_panic_hook();
    info!(target: "runtime", "startup");

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(target: "runtime", error = %e, "fatal");
            eprintln!("rill: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Everything between startup and exit. The terminal guard is dropped before
/// this returns, so errors are printed on a restored terminal.
fn run(args: &Args) -> Result<()> {
    let config = load_from(None)?;
    let settings = Settings::from_config(&config);
    let mut state = EditorState::new(settings);
    open_path(&mut state, &args.path)?;
    info!(
        target: "runtime.startup",
        tab_width = state.settings.tab_width,
        doc_type = state.active_doc().doc_type.label(),
        "bootstrap_complete"
    );

    let input_cfg = &config.file.input;
    let mut reader = StdinReader::new(input_cfg.escape_timeout(), input_cfg.poll_interval())?;
    let mut backend = CrosstermBackend::new();
    backend.set_title("rill")?;
    let mut guard = backend.enter_guard()?;
    let size = guard.backend().size()?;
    let mut runtime = EditorRuntime::new(state, size);
    runtime.run(&mut guard, &mut reader)
}

/// File logging (`rill.log`, truncated per run) filtered by `RUST_LOG`. The
/// terminal belongs to the renderer, so nothing is logged there. Logging is
/// off when the edited file is the log file itself.
fn configure_logging(edited: &Path) -> Option<WorkerGuard> {
    let log_dir = Path::new(".");
    let log_path = log_dir.join(LOG_FILE);
    if same_file(edited, &log_path) {
        return None;
    }
    if log_path.exists() {
        let _ = std::fs::remove_file(&log_path);
    }

    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    match tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_ansi(false)
        .with_writer(nb_writer)
        .try_init()
    {
        Ok(()) => Some(guard),
        // a global subscriber is already installed
        Err(_) => None,
    }
}

/// Whether two paths name the same file; paths that do not exist yet compare
/// by their absolute form.
fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => match (std::path::absolute(a), std::path::absolute(b)) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        },
    }
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "runtime.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn requires_exactly_one_path() {
        let missing = Args::try_parse_from(["rill"]).unwrap_err();
        assert_eq!(missing.kind(), ErrorKind::MissingRequiredArgument);
        assert!(missing.use_stderr());
        let extra = Args::try_parse_from(["rill", "a.txt", "b.txt"]).unwrap_err();
        assert!(extra.use_stderr());
        let ok = Args::try_parse_from(["rill", "a.txt"]).unwrap();
        assert_eq!(ok.path, PathBuf::from("a.txt"));
    }

    #[test]
    fn help_is_not_an_error_exit() {
        let help = Args::try_parse_from(["rill", "--help"]).unwrap_err();
        assert!(!help.use_stderr());
    }

    #[test]
    fn edited_log_file_is_recognised() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join(LOG_FILE);
        std::fs::write(&log, "keep me").unwrap();
        let dotted = dir.path().join(".").join(LOG_FILE);
        assert!(same_file(&dotted, &log));
        assert!(!same_file(&dir.path().join("notes.txt"), &log));
        assert_eq!(std::fs::read_to_string(&log).unwrap(), "keep me");
    }

    #[test]
    fn missing_files_compare_by_absolute_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("new.log");
        assert!(same_file(&missing, &missing));
        assert!(!same_file(&missing, &dir.path().join("other.log")));
    }
}
