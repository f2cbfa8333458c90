use serde::Serialize;
use serde_yaml::{Mapping, Value};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use super::validate::ValidationIssue;
use super::{SKILL_MANIFEST, manifest_path};
use crate::error::{IoContext, Result, SkillError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ManifestField {
    Name,
    Description,
}

impl ManifestField {
    pub fn as_str(self) -> &'static str {
        match self {
            ManifestField::Name => "name",
            ManifestField::Description => "description",
        }
    }
}

impl fmt::Display for ManifestField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Skill {
    pub name: String,
    pub description: String,
    pub license: Option<String>,
    #[serde(skip)]
    pub body: String,
    pub location: PathBuf,
}

/// Loads the manifest of `skill_dir`.
///
/// A manifest that is missing, malformed or lacks a required field is
/// reported as [`SkillError::ValidationFailed`].
pub fn load_skill(skill_dir: &Path) -> Result<Skill> {
    let md_path = manifest_path(skill_dir);

    if !md_path.is_file() {
        return Err(SkillError::ValidationFailed(ValidationIssue::MissingManifest));
    }

    let content = read_manifest(&md_path)?.map_err(SkillError::ValidationFailed)?;
    let parsed = parse_manifest(&content).map_err(SkillError::ValidationFailed)?;

    Ok(Skill {
        name: parsed.name,
        description: parsed.description,
        license: parsed.license,
        body: parsed.body.to_string(),
        location: md_path,
    })
}

/// Reads a manifest as text. Undecodable bytes are a manifest problem, not an I/O error.
pub(crate) fn read_manifest(md_path: &Path) -> Result<std::result::Result<String, ValidationIssue>> {
    let bytes = fs::read(md_path).at(md_path)?;

    Ok(String::from_utf8(bytes).map_err(|e| {
        ValidationIssue::MalformedFrontmatter(format!(
            "{} is not valid UTF-8 (invalid byte at offset {})",
            SKILL_MANIFEST,
            e.utf8_error().valid_up_to()
        ))
    }))
}

pub(crate) struct ParsedManifest<'a> {
    pub name: String,
    pub description: String,
    pub license: Option<String>,
    pub mapping: Mapping,
    pub body: &'a str,
}

/// Parses a `SKILL.md` and checks that both required fields are present and non-empty.
///
/// Nothing beyond field presence is enforced here; style rules live in `lint`.
pub(crate) fn parse_manifest(content: &str) -> std::result::Result<ParsedManifest<'_>, ValidationIssue> {
    let (frontmatter, body) = split_frontmatter(content)?;
    let mapping = parse_frontmatter(frontmatter)?;

    let name = required_field(&mapping, ManifestField::Name)?;
    let description = required_field(&mapping, ManifestField::Description)?;

    let license = mapping
        .get("license")
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    Ok(ParsedManifest {
        name,
        description,
        license,
        mapping,
        body,
    })
}

/// Splits a manifest into its frontmatter block and the body that follows it.
///
/// The first line must be `---`; the frontmatter ends at the next line that
/// is exactly `---` (surrounding whitespace ignored).
pub(crate) fn split_frontmatter(content: &str) -> std::result::Result<(&str, &str), ValidationIssue> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let mut lines = content.split_inclusive('\n');
    let first = lines.next().unwrap_or("");
    if first.trim() != "---" {
        return Err(ValidationIssue::MalformedFrontmatter(format!(
            "{} must start with a '---' line",
            SKILL_MANIFEST
        )));
    }

    let start = first.len();
    let mut offset = start;
    for line in lines {
        if line.trim() == "---" {
            let frontmatter = &content[start..offset];
            let body = &content[offset + line.len()..];
            return Ok((frontmatter, body));
        }
        offset += line.len();
    }

    Err(ValidationIssue::MalformedFrontmatter(
        "missing closing '---' line".to_string(),
    ))
}

fn parse_frontmatter(frontmatter: &str) -> std::result::Result<Mapping, ValidationIssue> {
    if frontmatter.trim().is_empty() {
        return Ok(Mapping::new());
    }

    match serde_yaml::from_str::<Value>(frontmatter) {
        Ok(Value::Mapping(mapping)) => Ok(mapping),
        Ok(Value::Null) => Ok(Mapping::new()),
        Ok(_) => Err(ValidationIssue::MalformedFrontmatter(
            "frontmatter must be a YAML mapping".to_string(),
        )),
        Err(e) => Err(ValidationIssue::MalformedFrontmatter(format!(
            "invalid YAML: {}",
            e
        ))),
    }
}

fn required_field(mapping: &Mapping, field: ManifestField) -> std::result::Result<String, ValidationIssue> {
    let value = mapping
        .get(field.as_str())
        .ok_or(ValidationIssue::MissingField(field))?;

    let text = match value {
        Value::Null => String::new(),
        Value::String(s) => s.trim().to_string(),
        Value::Sequence(seq) if seq.is_empty() => String::new(),
        Value::Mapping(map) if map.is_empty() => String::new(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    };

    if text.is_empty() {
        Err(ValidationIssue::EmptyField(field))
    } else {
        Ok(text)
    }
}
