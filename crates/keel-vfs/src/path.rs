//! Project-relative paths.
//!
//! Stored record keys are opaque strings. Before a record is written to disk
//! its key is parsed into a [`ProjectPath`], which can only ever point inside
//! the project directory.

use std::fmt;
use std::path::{Path, PathBuf};

/// A normalized path relative to a project's base directory.
///
/// Leading slashes and `.` segments are dropped and `..` is resolved. The
/// result always names at least one segment and never climbs above the root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectPath {
    segments: Vec<String>,
}

impl ProjectPath {
    pub fn parse(path: &str) -> Result<Self, ProjectPathError> {
        if path.contains('\0') {
            return Err(ProjectPathError::InvalidCharacter('\0'));
        }

        let mut segments: Vec<String> = Vec::new();
        for segment in path.split('/') {
            match segment {
                "" | "." => continue,
                ".." => {
                    if segments.pop().is_none() {
                        return Err(ProjectPathError::EscapesRoot);
                    }
                }
                other => segments.push(other.to_string()),
            }
        }

        if segments.is_empty() {
            return Err(ProjectPathError::Root);
        }

        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn file_name(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    /// Absolute location of this path under `base`.
    pub fn to_physical(&self, base: &Path) -> PathBuf {
        let mut physical = base.to_path_buf();
        for segment in &self.segments {
            physical.push(segment);
        }
        physical
    }
}

impl fmt::Display for ProjectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

/// Reasons a stored key cannot be materialized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProjectPathError {
    #[error("invalid character in path: {0:?}")]
    InvalidCharacter(char),

    #[error("path escapes the project root")]
    EscapesRoot,

    #[error("path resolves to the project root")]
    Root,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let path = ProjectPath::parse("src/main.ts").unwrap();
        assert_eq!(path.segments(), &["src", "main.ts"]);
        assert_eq!(path.to_string(), "src/main.ts");
        assert_eq!(path.file_name(), "main.ts");
    }

    #[test]
    fn test_leading_slash_and_dots_dropped() {
        let path = ProjectPath::parse("/./src//lib/./a.rs").unwrap();
        assert_eq!(path.segments(), &["src", "lib", "a.rs"]);
    }

    #[test]
    fn test_parent_segments_resolved() {
        let path = ProjectPath::parse("src/../lib/a.rs").unwrap();
        assert_eq!(path.segments(), &["lib", "a.rs"]);
    }

    #[test]
    fn test_escape_rejected() {
        assert_eq!(
            ProjectPath::parse("../etc/passwd").unwrap_err(),
            ProjectPathError::EscapesRoot
        );
        assert_eq!(
            ProjectPath::parse("a/../../b").unwrap_err(),
            ProjectPathError::EscapesRoot
        );
    }

    #[test]
    fn test_root_rejected() {
        assert_eq!(ProjectPath::parse("").unwrap_err(), ProjectPathError::Root);
        assert_eq!(ProjectPath::parse("/").unwrap_err(), ProjectPathError::Root);
        assert_eq!(ProjectPath::parse("a/..").unwrap_err(), ProjectPathError::Root);
    }

    #[test]
    fn test_nul_rejected() {
        assert_eq!(
            ProjectPath::parse("a\0b").unwrap_err(),
            ProjectPathError::InvalidCharacter('\0')
        );
    }

    #[test]
    fn test_to_physical() {
        let path = ProjectPath::parse("/src/main.ts").unwrap();
        assert_eq!(
            path.to_physical(Path::new("/srv/web")),
            PathBuf::from("/srv/web/src/main.ts")
        );
    }
}
