pub mod init;
pub mod lint;
pub mod manifest;
pub mod naming;
pub mod package;
pub mod registry;
pub mod templates;
pub mod validate;

pub use init::{InitOptions, init_skill};
pub use lint::{Lint, lint_manifest, lint_skill};
pub use manifest::{ManifestField, Skill, load_skill};
pub use naming::{check_name_style, check_path_segment, title_case};
pub use package::{PackageOptions, PackageSummary, package_skill, package_skill_with_summary, unpack_skill};
pub use registry::{SkillEntry, SkillRegistry};
pub use validate::{Validation, ValidationIssue, validate_skill};

use std::path::{Path, PathBuf};

/// Manifest file name, always at the root of a skill directory.
pub const SKILL_MANIFEST: &str = "SKILL.md";

pub const SCRIPTS_DIR: &str = "scripts";
pub const REFERENCES_DIR: &str = "references";
pub const ASSETS_DIR: &str = "assets";

pub const RESOURCE_DIRS: [&str; 3] = [SCRIPTS_DIR, REFERENCES_DIR, ASSETS_DIR];

pub fn manifest_path(skill_dir: &Path) -> PathBuf {
    skill_dir.join(SKILL_MANIFEST)
}
