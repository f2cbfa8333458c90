use serde::Serialize;
use std::fmt;
use std::path::Path;

use super::manifest::{ManifestField, parse_manifest, read_manifest};
use super::{SKILL_MANIFEST, manifest_path};
use crate::error::{Result, SkillError};

/// Outcome of checking a skill directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "issue", rename_all = "snake_case")]
pub enum Validation {
    Valid,
    Invalid(ValidationIssue),
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Valid)
    }

    pub fn issue(&self) -> Option<&ValidationIssue> {
        match self {
            Validation::Valid => None,
            Validation::Invalid(issue) => Some(issue),
        }
    }
}

/// Why a skill directory was rejected. Only the first problem found is reported.
///
/// Style problems are not rejections; see [`super::lint::Lint`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ValidationIssue {
    MissingManifest,
    MalformedFrontmatter(String),
    MissingField(ManifestField),
    EmptyField(ManifestField),
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::MissingManifest => write!(f, "{} not found", SKILL_MANIFEST),
            ValidationIssue::MalformedFrontmatter(reason) => {
                write!(f, "malformed frontmatter: {}", reason)
            }
            ValidationIssue::MissingField(field) => {
                write!(f, "missing required field '{}'", field)
            }
            ValidationIssue::EmptyField(field) => write!(f, "field '{}' is empty", field),
        }
    }
}

/// Checks that `skill_dir` holds a well-formed manifest.
///
/// Never writes to disk. I/O failures other than a missing manifest are
/// returned as errors rather than folded into the result.
pub fn validate_skill(skill_dir: &Path) -> Result<Validation> {
    if !skill_dir.is_dir() {
        return Err(SkillError::NotADirectory {
            path: skill_dir.to_path_buf(),
        });
    }

    let md_path = manifest_path(skill_dir);
    if !md_path.is_file() {
        tracing::debug!(path = %md_path.display(), "Manifest not found");
        return Ok(Validation::Invalid(ValidationIssue::MissingManifest));
    }

    let validation = match read_manifest(&md_path)? {
        Ok(content) => match parse_manifest(&content) {
            Ok(_) => Validation::Valid,
            Err(issue) => Validation::Invalid(issue),
        },
        Err(issue) => Validation::Invalid(issue),
    };

    tracing::debug!(
        path = %skill_dir.display(),
        valid = validation.is_valid(),
        "Validated skill"
    );

    Ok(validation)
}
