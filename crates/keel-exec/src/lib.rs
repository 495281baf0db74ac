//! Command execution and build detection for keel projects.

pub mod detector;
pub mod runner;

pub use detector::{BuildDetector, BuildSystem, detect};
pub use runner::{CommandRunner, ShellCommandRunner};
