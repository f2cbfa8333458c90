//! Error types shared by the skill workflow operations.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::skills::ValidationIssue;

pub type Result<T> = std::result::Result<T, SkillError>;

#[derive(Debug, Error)]
pub enum SkillError {
    #[error("skill directory already exists: {}", path.display())]
    AlreadyExists { path: PathBuf },

    #[error("invalid skill name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("not a directory: {}", path.display())]
    NotADirectory { path: PathBuf },

    #[error("validation failed: {0}")]
    ValidationFailed(ValidationIssue),

    #[error("unsafe archive entry: {}", path.display())]
    UnsafeArchiveEntry { path: PathBuf },

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl SkillError {
    pub(crate) fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        SkillError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

/// Attaches the offending path to a bare `std::io::Result`.
pub(crate) trait IoContext<T> {
    fn at(self, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> IoContext<T> for std::io::Result<T> {
    fn at(self, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|e| SkillError::io(path, e))
    }
}
