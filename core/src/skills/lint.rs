//! Advisory checks on a manifest that already validates.
//!
//! Lints never change a [`Validation`](super::Validation) result and never
//! block packaging; the CLI prints them as warnings.

use serde::Serialize;
use serde_yaml::Value;
use std::fmt;
use std::path::Path;

use super::manifest::{ManifestField, parse_manifest, read_manifest};
use super::manifest_path;
use super::naming::check_name_style;
use crate::error::Result;

pub const MAX_DESCRIPTION_LEN: usize = 1024;

/// Keys a manifest is expected to use.
pub const KNOWN_KEYS: [&str; 5] = ["name", "description", "license", "allowed-tools", "metadata"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum Lint {
    UnknownKeys(Vec<String>),
    NotAString(ManifestField),
    NameStyle(String),
    DescriptionHasAngleBrackets,
    DescriptionTooLong { len: usize, max: usize },
}

impl fmt::Display for Lint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lint::UnknownKeys(keys) => write!(f, "unknown frontmatter keys: {}", keys.join(", ")),
            Lint::NotAString(field) => write!(f, "field '{}' is not a string", field),
            Lint::NameStyle(reason) => write!(f, "unconventional name: {}", reason),
            Lint::DescriptionHasAngleBrackets => {
                write!(f, "description contains angle brackets")
            }
            Lint::DescriptionTooLong { len, max } => write!(
                f,
                "description is {} characters long, recommended maximum is {}",
                len, max
            ),
        }
    }
}

/// Lints the manifest of `skill_dir`. A missing or invalid manifest yields no lints.
pub fn lint_skill(skill_dir: &Path) -> Result<Vec<Lint>> {
    let md_path = manifest_path(skill_dir);
    if !md_path.is_file() {
        return Ok(Vec::new());
    }

    Ok(match read_manifest(&md_path)? {
        Ok(content) => lint_manifest(&content),
        Err(_) => Vec::new(),
    })
}

/// Lints manifest text, in a fixed order.
pub fn lint_manifest(content: &str) -> Vec<Lint> {
    let Ok(parsed) = parse_manifest(content) else {
        return Vec::new();
    };

    let mut lints = Vec::new();

    let unknown: Vec<String> = parsed
        .mapping
        .keys()
        .map(|key| match key {
            Value::String(s) => s.clone(),
            other => serde_yaml::to_string(other)
                .map(|s| s.trim().to_string())
                .unwrap_or_default(),
        })
        .filter(|key| !KNOWN_KEYS.contains(&key.as_str()))
        .collect();
    if !unknown.is_empty() {
        lints.push(Lint::UnknownKeys(unknown));
    }

    for field in [ManifestField::Name, ManifestField::Description] {
        if !matches!(parsed.mapping.get(field.as_str()), Some(Value::String(_))) {
            lints.push(Lint::NotAString(field));
        }
    }

    if let Err(reason) = check_name_style(&parsed.name) {
        lints.push(Lint::NameStyle(reason));
    }

    if parsed.description.contains('<') || parsed.description.contains('>') {
        lints.push(Lint::DescriptionHasAngleBrackets);
    }

    let len = parsed.description.chars().count();
    if len > MAX_DESCRIPTION_LEN {
        lints.push(Lint::DescriptionTooLong {
            len,
            max: MAX_DESCRIPTION_LEN,
        });
    }

    lints
}
