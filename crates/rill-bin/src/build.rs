//! External build command, run through `sh -c` with the terminal handed back.

use anyhow::{Context, Result};
use std::process::{Command, ExitStatus};
use tracing::info;

pub fn run_command(command: &str) -> Result<ExitStatus> {
    info!(target: "build", command_len = command.len(), "build_start");
    let status = Command::new("sh")
        .arg("-c")
        .arg(command)
        .status()
        .with_context(|| format!("cannot run build command `{command}`"))?;
    info!(target: "build", code = status.code(), "build_finished");
    Ok(status)
}

/// One-line outcome for the status row.
pub fn summary(status: ExitStatus) -> String {
    match status.code() {
        Some(0) => "Build succeeded".to_string(),
        Some(code) => format!("Build failed (exit {code})"),
        None => "Build terminated by signal".to_string(),
    }
}
