use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::naming::is_unsafe_path_segment;
use super::validate::{Validation, validate_skill};
use crate::error::{IoContext, Result};

#[derive(Debug, Clone, Serialize)]
pub struct SkillEntry {
    pub name: String,
    pub path: PathBuf,
    pub validation: Validation,
}

/// Every skill directory directly under a root, with its validation result.
#[derive(Debug, Clone, Default)]
pub struct SkillRegistry {
    skills: BTreeMap<String, SkillEntry>,
}

impl SkillRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scan(root: &Path) -> Result<Self> {
        let mut registry = Self::new();
        registry.load_skills(root)?;
        Ok(registry)
    }

    pub fn load_skills(&mut self, root: &Path) -> Result<()> {
        if !root.exists() {
            tracing::debug!("Skills directory does not exist: {}", root.display());
            return Ok(());
        }

        let entries = fs::read_dir(root).at(root)?;

        let mut loaded = 0;
        let mut skipped = 0;

        for entry in entries {
            let entry = entry.at(root)?;
            let path = entry.path();

            if !path.is_dir() {
                continue;
            }

            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                tracing::warn!("Skipping non UTF-8 directory: {}", path.display());
                skipped += 1;
                continue;
            };

            if is_unsafe_path_segment(name) || name.starts_with('.') {
                tracing::debug!("Skipping directory: {}", name);
                skipped += 1;
                continue;
            }

            match validate_skill(&path) {
                Ok(validation) => {
                    self.skills.insert(
                        name.to_string(),
                        SkillEntry {
                            name: name.to_string(),
                            path: path.clone(),
                            validation,
                        },
                    );
                    loaded += 1;
                }
                Err(e) => {
                    tracing::warn!("Failed to check skill '{}': {}", name, e);
                    skipped += 1;
                }
            }
        }

        tracing::info!(
            loaded,
            skipped,
            path = %root.display(),
            "Skills scanned"
        );

        Ok(())
    }

    pub fn list(&self) -> Vec<&SkillEntry> {
        self.skills.values().collect()
    }

    pub fn valid(&self) -> impl Iterator<Item = &SkillEntry> {
        self.skills.values().filter(|e| e.validation.is_valid())
    }

    pub fn get(&self, name: &str) -> Option<&SkillEntry> {
        self.skills.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.skills.contains_key(name)
    }

    pub fn count(&self) -> usize {
        self.skills.len()
    }
}
