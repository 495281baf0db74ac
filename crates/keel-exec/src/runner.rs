//! Shell command execution.

use async_trait::async_trait;
use keel_core::{ExecutionResult, KeelError, Result};
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::Instant;
use tokio::process::Command;
use tracing::{debug, info};

/// Runs a command string in a working directory.
///
/// A command that exits non-zero is a normal [`ExecutionResult`]. Only
/// failing to start the shell at all is an error.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, command: &str, working_dir: &Path) -> Result<ExecutionResult>;
}

/// Runs commands through `sh -c` with stderr folded into stdout.
///
/// The command string is handed to the shell verbatim, so pipes, redirects
/// and globs all work. Holding the API key means holding a shell on this
/// host; nothing here narrows that beyond the working directory.
#[derive(Debug, Clone)]
pub struct ShellCommandRunner {
    shell: PathBuf,
}

impl ShellCommandRunner {
    pub fn new() -> Self {
        Self::with_shell("sh")
    }

    pub fn with_shell(shell: impl Into<PathBuf>) -> Self {
        Self {
            shell: shell.into(),
        }
    }
}

impl Default for ShellCommandRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandRunner for ShellCommandRunner {
    async fn run(&self, command: &str, working_dir: &Path) -> Result<ExecutionResult> {
        if !working_dir.is_absolute() {
            return Err(KeelError::invalid_path(format!(
                "Working directory must be absolute: {}",
                working_dir.display()
            )));
        }
        if !tokio::fs::metadata(working_dir)
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false)
        {
            return Err(KeelError::invalid_path(format!(
                "Working directory does not exist: {}",
                working_dir.display()
            )));
        }

        debug!(command, working_dir = %working_dir.display(), "Spawning shell");
        let start = Instant::now();

        let output = Command::new(&self.shell)
            .arg("-c")
            .arg(format!("exec 2>&1; {}", command))
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| KeelError::process_spawn(format!("{}: {}", self.shell.display(), e)))?;

        let duration_ms = (start.elapsed().as_secs_f64() * 1000.0).round() as u64;
        let exit_code = exit_code(output.status);

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stdout = stdout.trim_end_matches(['\n', '\r']).to_string();

        info!(
            command,
            working_dir = %working_dir.display(),
            exit_code,
            duration_ms,
            "Command finished"
        );

        Ok(ExecutionResult::new(stdout, exit_code, duration_ms))
    }
}

#[cfg(unix)]
fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;

    status
        .code()
        .or_else(|| status.signal().map(|signal| 128 + signal))
        .unwrap_or(-1)
}

#[cfg(not(unix))]
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(-1)
}
