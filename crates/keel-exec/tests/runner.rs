//! Shell runner and build detector against a real `sh`.

use async_trait::async_trait;
use keel_core::{ExecutionResult, KeelError, Result};
use keel_exec::{BuildDetector, CommandRunner, ShellCommandRunner};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

#[derive(Default)]
struct RecordingRunner {
    calls: Mutex<Vec<(String, PathBuf)>>,
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn run(&self, command: &str, working_dir: &Path) -> Result<ExecutionResult> {
        self.calls
            .lock()
            .unwrap()
            .push((command.to_string(), working_dir.to_path_buf()));
        Ok(ExecutionResult::new(String::new(), 0, 0))
    }
}

#[tokio::test]
async fn test_nonzero_exit_is_a_result() {
    let dir = TempDir::new().unwrap();
    let result = ShellCommandRunner::new()
        .run("exit 7", dir.path())
        .await
        .unwrap();

    assert!(!result.success);
    assert_eq!(result.exit_code, 7);
    assert_eq!(result.stderr, "");
}

#[tokio::test]
async fn test_stderr_is_merged_into_stdout() {
    let dir = TempDir::new().unwrap();
    let result = ShellCommandRunner::new()
        .run("echo out; echo err 1>&2", dir.path())
        .await
        .unwrap();

    assert!(result.success);
    assert_eq!(result.stdout, "out\nerr");
    assert!(result.stderr.is_empty());
}

#[tokio::test]
async fn test_runs_in_working_directory() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("marker.txt"), "here").unwrap();

    let result = ShellCommandRunner::new()
        .run("cat marker.txt | tr a-z A-Z", dir.path())
        .await
        .unwrap();

    assert_eq!(result.stdout, "HERE");
    assert_eq!(result.exit_code, 0);
}

#[tokio::test]
async fn test_duration_is_measured() {
    let dir = TempDir::new().unwrap();
    let result = ShellCommandRunner::new()
        .run("sleep 0.2", dir.path())
        .await
        .unwrap();

    assert!(result.duration_ms >= 150, "duration was {}", result.duration_ms);
}

#[tokio::test]
async fn test_missing_working_directory_rejected() {
    let dir = TempDir::new().unwrap();
    let err = ShellCommandRunner::new()
        .run("true", &dir.path().join("gone"))
        .await
        .unwrap_err();
    assert!(matches!(err, KeelError::InvalidPath(_)));

    let err = ShellCommandRunner::new()
        .run("true", Path::new("relative/dir"))
        .await
        .unwrap_err();
    assert!(matches!(err, KeelError::InvalidPath(_)));
}

#[tokio::test]
async fn test_missing_shell_is_spawn_error() {
    let dir = TempDir::new().unwrap();
    let err = ShellCommandRunner::with_shell("/nonexistent/shell")
        .run("true", dir.path())
        .await
        .unwrap_err();
    assert!(matches!(err, KeelError::ProcessSpawn(_)));
}

#[tokio::test]
async fn test_build_delegates_detected_command() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("Makefile"), "all:\n").unwrap();

    let runner = Arc::new(RecordingRunner::default());
    let detector = BuildDetector::new(runner.clone());
    detector.build(dir.path()).await.unwrap();

    let calls = runner.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "make");
    assert_eq!(calls[0].1, dir.path());
}

#[tokio::test]
async fn test_build_without_markers_never_runs() {
    let dir = TempDir::new().unwrap();

    let runner = Arc::new(RecordingRunner::default());
    let detector = BuildDetector::new(runner.clone());
    let err = detector.build(dir.path()).await.unwrap_err();

    assert!(matches!(err, KeelError::NoBuildSystemDetected(_)));
    assert!(runner.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_build_script_runs_without_execute_bit() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("build.sh"), "echo built\nexit 3\n").unwrap();

    let detector = BuildDetector::new(Arc::new(ShellCommandRunner::new()));
    let result = detector.build(dir.path()).await.unwrap();

    assert_eq!(result.stdout, "built");
    assert_eq!(result.exit_code, 3);
    assert!(!result.success);
}
