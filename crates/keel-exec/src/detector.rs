//! Presence-based build system detection.

use crate::runner::CommandRunner;
use keel_core::{ExecutionResult, KeelError, Result};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Build systems recognized by their marker file, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildSystem {
    Npm,
    DotNet,
    Make,
    Script,
}

impl BuildSystem {
    /// Detection order; the first present marker wins.
    pub const PRIORITY: [BuildSystem; 4] = [Self::Npm, Self::DotNet, Self::Make, Self::Script];

    pub fn marker(&self) -> &'static str {
        match self {
            Self::Npm => "package.json",
            Self::DotNet => "*.csproj",
            Self::Make => "Makefile",
            Self::Script => "build.sh",
        }
    }

    pub fn command(&self) -> &'static str {
        match self {
            Self::Npm => "npm run build",
            Self::DotNet => "dotnet build",
            Self::Make => "make",
            Self::Script => "sh ./build.sh",
        }
    }

    fn present_in(&self, dir: &Path) -> Result<bool> {
        match self {
            Self::DotNet => {
                let dir = dir.to_str().ok_or_else(|| {
                    KeelError::invalid_path(format!("Non UTF-8 directory: {}", dir.display()))
                })?;
                let pattern = format!("{}/{}", glob::Pattern::escape(dir), self.marker());
                let mut matches = glob::glob(&pattern)
                    .map_err(|e| KeelError::invalid_input(format!("Bad marker pattern: {}", e)))?;
                Ok(matches.any(|entry| entry.is_ok()))
            }
            _ => Ok(dir.join(self.marker()).exists()),
        }
    }
}

impl fmt::Display for BuildSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Npm => "npm",
            Self::DotNet => "dotnet",
            Self::Make => "make",
            Self::Script => "script",
        };
        f.write_str(name)
    }
}

/// Pick the build system for `dir`.
pub fn detect(dir: &Path) -> Result<BuildSystem> {
    for system in BuildSystem::PRIORITY {
        if system.present_in(dir)? {
            debug!(dir = %dir.display(), %system, "Build system detected");
            return Ok(system);
        }
    }
    Err(KeelError::NoBuildSystemDetected(dir.to_path_buf()))
}

/// Detects a project's build system and runs its build command.
#[derive(Clone)]
pub struct BuildDetector {
    runner: Arc<dyn CommandRunner>,
}

impl BuildDetector {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    /// Detect on the blocking pool, then run the build command.
    pub async fn build(&self, dir: &Path) -> Result<ExecutionResult> {
        let owned_dir = dir.to_path_buf();
        let system = tokio::task::spawn_blocking(move || detect(&owned_dir))
            .await
            .map_err(std::io::Error::other)??;
        info!(dir = %dir.display(), %system, command = system.command(), "Running build");
        self.runner.run(system.command(), dir).await
    }
}
