use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

use super::validate::{Validation, validate_skill};
use crate::config::{DEFAULT_COMPRESSION, DEFAULT_EXTENSION, PackageConfig};
use crate::error::{IoContext, Result, SkillError};

#[derive(Debug, Clone)]
pub struct PackageOptions {
    pub extension: String,
    pub compression: u32,
}

impl Default for PackageOptions {
    fn default() -> Self {
        PackageOptions {
            extension: DEFAULT_EXTENSION.to_string(),
            compression: DEFAULT_COMPRESSION,
        }
    }
}

impl From<&PackageConfig> for PackageOptions {
    fn from(config: &PackageConfig) -> Self {
        PackageOptions {
            extension: config.extension.clone(),
            compression: config.compression,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PackageSummary {
    pub path: PathBuf,
    pub files: usize,
    pub bytes: u64,
    pub sha256: String,
}

/// Packages `skill_dir` and returns the path of the written archive.
pub fn package_skill(
    skill_dir: &Path,
    output_dir: Option<&Path>,
    options: &PackageOptions,
) -> Result<PathBuf> {
    package_skill_with_summary(skill_dir, output_dir, options).map(|summary| summary.path)
}

/// Validates `skill_dir` and writes `<dir-name>.<extension>` into `output_dir`
/// (the current directory when `None`).
///
/// The archive is a gzip-compressed tar whose entries all live under
/// `<dir-name>/`. It is staged in a temporary file next to its final location
/// and only renamed into place once complete, so a failed run leaves no
/// artifact behind. The source directory is never written to.
pub fn package_skill_with_summary(
    skill_dir: &Path,
    output_dir: Option<&Path>,
    options: &PackageOptions,
) -> Result<PackageSummary> {
    if !skill_dir.is_dir() {
        return Err(SkillError::NotADirectory {
            path: skill_dir.to_path_buf(),
        });
    }

    if let Validation::Invalid(issue) = validate_skill(skill_dir)? {
        tracing::warn!(path = %skill_dir.display(), %issue, "Refusing to package invalid skill");
        return Err(SkillError::ValidationFailed(issue));
    }

    let skill_dir = skill_dir.canonicalize().at(skill_dir)?;
    let dir_name = skill_dir
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| SkillError::InvalidName {
            name: skill_dir.display().to_string(),
            reason: "skill directory has no usable name".to_string(),
        })?;

    let output_dir = match output_dir {
        Some(dir) => dir.to_path_buf(),
        None => std::env::current_dir().at(".")?,
    };
    fs::create_dir_all(&output_dir).at(&output_dir)?;
    let output_dir = output_dir.canonicalize().at(&output_dir)?;

    let archive_path = output_dir.join(format!("{}.{}", dir_name, options.extension));

    let mut staged = tempfile::Builder::new()
        .prefix(".skillkit-")
        .suffix(".tmp")
        .tempfile_in(&output_dir)
        .at(&output_dir)?;

    let skip = [staged.path().to_path_buf(), archive_path.clone()];
    let files = write_archive(
        &skill_dir,
        &dir_name,
        staged.as_file_mut(),
        options.compression,
        &skip,
    )?;
    staged.as_file().sync_all().at(staged.path())?;

    staged
        .persist(&archive_path)
        .map_err(|e| SkillError::io(&archive_path, e.error))?;

    let (bytes, sha256) = digest_file(&archive_path)?;

    tracing::info!(
        path = %archive_path.display(),
        files,
        bytes,
        "Skill packaged"
    );

    Ok(PackageSummary {
        path: archive_path,
        files,
        bytes,
        sha256,
    })
}

fn write_archive<W: Write>(
    skill_dir: &Path,
    root: &str,
    writer: W,
    compression: u32,
    skip: &[PathBuf],
) -> Result<usize> {
    let encoder = GzEncoder::new(writer, Compression::new(compression));
    let mut builder = tar::Builder::new(encoder);
    builder.follow_symlinks(false);

    let mut files = 0;

    for entry in WalkDir::new(skill_dir).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| skill_dir.to_path_buf());
            SkillError::io(path, e.into())
        })?;
        let path = entry.path();

        if skip.iter().any(|s| s == path) {
            continue;
        }

        let Ok(relative) = path.strip_prefix(skill_dir) else {
            continue;
        };
        let name = Path::new(root).join(relative);
        let file_type = entry.file_type();

        if file_type.is_symlink() {
            tracing::warn!(path = %path.display(), "Skipping symlink");
        } else if file_type.is_dir() {
            builder.append_dir(&name, path).at(path)?;
        } else if file_type.is_file() {
            builder.append_path_with_name(path, &name).at(path)?;
            tracing::debug!(entry = %name.display(), "Added");
            files += 1;
        }
    }

    let encoder = builder.into_inner().at(skill_dir)?;
    encoder.finish().at(skill_dir)?;

    Ok(files)
}

fn digest_file(path: &Path) -> Result<(u64, String)> {
    let mut file = File::open(path).at(path)?;
    let mut context = ring::digest::Context::new(&ring::digest::SHA256);
    let mut buf = [0u8; 8192];
    let mut total = 0u64;

    loop {
        let n = file.read(&mut buf).at(path)?;
        if n == 0 {
            break;
        }
        context.update(&buf[..n]);
        total += n as u64;
    }

    let hex: String = context
        .finish()
        .as_ref()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect();

    Ok((total, hex))
}

/// Extracts a packaged skill into `dest` and returns the extracted skill directory.
///
/// Entries with `..`, absolute paths, or link types are refused, as is an
/// archive whose skill directory already exists under `dest`. Extraction runs
/// in a hidden staging directory inside `dest`; the skill directory only
/// appears once every entry has been accepted and written.
pub fn unpack_skill(archive_path: &Path, dest: &Path) -> Result<PathBuf> {
    let file = File::open(archive_path).at(archive_path)?;
    let mut archive = tar::Archive::new(GzDecoder::new(file));

    fs::create_dir_all(dest).at(dest)?;
    let staging = tempfile::Builder::new()
        .prefix(".skillkit-unpack-")
        .tempdir_in(dest)
        .at(dest)?;

    let root = extract_entries(&mut archive, archive_path, dest, staging.path())?;

    let skill_dir = dest.join(&root);
    if skill_dir.symlink_metadata().is_ok() {
        return Err(SkillError::AlreadyExists { path: skill_dir });
    }
    fs::rename(staging.path().join(&root), &skill_dir).at(&skill_dir)?;

    tracing::info!(path = %skill_dir.display(), "Skill unpacked");
    Ok(skill_dir)
}

/// Writes every entry under `staging` and returns the archive's top-level directory name.
fn extract_entries<R: Read>(
    archive: &mut tar::Archive<R>,
    archive_path: &Path,
    dest: &Path,
    staging: &Path,
) -> Result<PathBuf> {
    let mut root: Option<PathBuf> = None;

    for entry in archive.entries().at(archive_path)? {
        let mut entry = entry.at(archive_path)?;
        let path = entry.path().at(archive_path)?.into_owned();
        let entry_type = entry.header().entry_type();

        if entry_type.is_symlink() || entry_type.is_hard_link() {
            return Err(SkillError::UnsafeArchiveEntry { path });
        }

        let Some(relative) = sanitize_entry_path(&path)? else {
            continue;
        };

        let top = match relative.components().next() {
            Some(Component::Normal(top)) => PathBuf::from(top),
            _ => continue,
        };
        match &root {
            Some(existing) if *existing != top => {
                return Err(SkillError::UnsafeArchiveEntry { path });
            }
            Some(_) => {}
            None => {
                let target_root = dest.join(&top);
                if target_root.symlink_metadata().is_ok() {
                    return Err(SkillError::AlreadyExists { path: target_root });
                }
                root = Some(top);
            }
        }

        let target = staging.join(&relative);
        if entry_type.is_dir() {
            fs::create_dir_all(&target).at(&target)?;
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).at(parent)?;
        }
        entry.unpack(&target).at(&target)?;
        tracing::debug!(entry = %relative.display(), "Extracted");
    }

    root.ok_or_else(|| {
        SkillError::io(
            archive_path,
            io::Error::new(io::ErrorKind::InvalidData, "archive contains no entries"),
        )
    })
}

fn sanitize_entry_path(path: &Path) -> Result<Option<PathBuf>> {
    let mut clean = PathBuf::new();

    for component in path.components() {
        match component {
            Component::Normal(part) => clean.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(SkillError::UnsafeArchiveEntry {
                    path: path.to_path_buf(),
                });
            }
        }
    }

    if clean.as_os_str().is_empty() {
        Ok(None)
    } else {
        Ok(Some(clean))
    }
}
