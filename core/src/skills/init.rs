use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::naming::{check_path_segment, title_case};
use super::templates::{self, EXAMPLE_ASSET, EXAMPLE_REFERENCE, EXAMPLE_SCRIPT, SKILL_TEMPLATE};
use super::{ASSETS_DIR, REFERENCES_DIR, RESOURCE_DIRS, SCRIPTS_DIR, manifest_path};
use crate::config::InitConfig;
use crate::error::{IoContext, Result, SkillError};

#[derive(Debug, Clone, Copy, Default)]
pub struct InitOptions {
    /// Also drop a placeholder file into each resource directory.
    pub with_examples: bool,
}

impl From<&InitConfig> for InitOptions {
    fn from(config: &InitConfig) -> Self {
        InitOptions {
            with_examples: config.with_examples,
        }
    }
}

/// Creates `<parent>/<name>` with a manifest template and the resource directories.
///
/// Any name that is a single safe directory name is accepted; naming style is
/// left to the lints.
///
/// Nothing that already exists is touched: an occupied target fails with
/// [`SkillError::AlreadyExists`]. If writing the skeleton fails part way, the
/// half-built directory is removed again.
pub fn init_skill(name: &str, parent: &Path, options: InitOptions) -> Result<PathBuf> {
    check_path_segment(name).map_err(|reason| SkillError::InvalidName {
        name: name.to_string(),
        reason,
    })?;

    let skill_dir = parent.join(name);
    if skill_dir.symlink_metadata().is_ok() {
        return Err(SkillError::AlreadyExists { path: skill_dir });
    }

    fs::create_dir_all(parent).at(parent)?;
    match fs::create_dir(&skill_dir) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            return Err(SkillError::AlreadyExists { path: skill_dir });
        }
        Err(e) => return Err(SkillError::io(&skill_dir, e)),
    }

    if let Err(e) = write_skeleton(&skill_dir, name, options) {
        if let Err(cleanup) = fs::remove_dir_all(&skill_dir) {
            tracing::warn!(
                path = %skill_dir.display(),
                error = %cleanup,
                "Failed to remove partially initialized skill"
            );
        }
        return Err(e);
    }

    tracing::info!(name, path = %skill_dir.display(), "Skill initialized");
    Ok(skill_dir)
}

fn write_skeleton(skill_dir: &Path, name: &str, options: InitOptions) -> Result<()> {
    let title = title_case(name);

    let md_path = manifest_path(skill_dir);
    fs::write(&md_path, templates::render(SKILL_TEMPLATE, name, &title)).at(&md_path)?;

    for dir in RESOURCE_DIRS {
        let path = skill_dir.join(dir);
        fs::create_dir(&path).at(&path)?;
    }

    if options.with_examples {
        let script = skill_dir.join(SCRIPTS_DIR).join("example.py");
        fs::write(&script, templates::render(EXAMPLE_SCRIPT, name, &title)).at(&script)?;
        make_executable(&script)?;

        let reference = skill_dir.join(REFERENCES_DIR).join("api_reference.md");
        fs::write(&reference, templates::render(EXAMPLE_REFERENCE, name, &title))
            .at(&reference)?;

        let asset = skill_dir.join(ASSETS_DIR).join("example_asset.txt");
        fs::write(&asset, EXAMPLE_ASSET).at(&asset)?;
    }

    Ok(())
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = fs::metadata(path).at(path)?.permissions();
    perms.set_mode(perms.mode() | 0o755);
    fs::set_permissions(path, perms).at(path)
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}
