use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{IoContext, Result, SkillError};

const SKILLKIT_DIR: &str = ".skillkit";

pub const DEFAULT_EXTENSION: &str = "skill";
pub const DEFAULT_COMPRESSION: u32 = 6;

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct InitConfig {
    pub with_examples: bool,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PackageConfig {
    pub output_dir: Option<PathBuf>,
    pub extension: String,
    pub compression: u32,
}

impl Default for PackageConfig {
    fn default() -> Self {
        PackageConfig {
            output_dir: None,
            extension: DEFAULT_EXTENSION.to_string(),
            compression: DEFAULT_COMPRESSION,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub init: InitConfig,
    pub package: PackageConfig,
}

impl Config {
    /// Loads the config at `path`, falling back to defaults when the file is absent.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            load_config(path)
        } else {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            Ok(Config::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.package.compression > 9 {
            return Err(SkillError::Config(format!(
                "package.compression must be between 0 and 9, got {}",
                self.package.compression
            )));
        }

        let ext = self.package.extension.trim();
        if ext.is_empty() || ext.contains(['/', '\\', '.']) {
            return Err(SkillError::Config(format!(
                "package.extension must be a bare extension, got '{}'",
                self.package.extension
            )));
        }

        Ok(())
    }
}

pub fn get_skillkit_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(SKILLKIT_DIR)
}

pub fn get_config_path() -> PathBuf {
    get_skillkit_dir().join("config.toml")
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path).at(path)?;

    let config: Config = toml::from_str(&content).map_err(|e| {
        SkillError::Config(format!("failed to parse {}: {}", path.display(), e))
    })?;
    config.validate()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = Config::load_or_default(&tmp.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.package.extension, "skill");
        assert_eq!(config.package.compression, 6);
        assert!(!config.init.with_examples);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[package]\noutput_dir = \"dist\"\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.package.output_dir, Some(PathBuf::from("dist")));
        assert_eq!(config.package.extension, "skill");
        assert!(!config.init.with_examples);
    }

    #[test]
    fn rejects_out_of_range_compression() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[package]\ncompression = 12\n").unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, SkillError::Config(_)));
    }

    #[test]
    fn rejects_dotted_extension() {
        let mut config = Config::default();
        config.package.extension = ".tar.gz".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_malformed_toml() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[package\n").unwrap();

        assert!(matches!(load_config(&path), Err(SkillError::Config(_))));
    }
}
