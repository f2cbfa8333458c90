use anyhow::{Context, Result};
use console::style;
use std::ffi::OsStr;
use std::path::PathBuf;
use std::process::Command;

const SEMVER_CHECKS_BIN: &str = "cargo-semver-checks";

#[derive(clap::Args, Clone, Debug)]
pub struct SemverArgs {
    /// Fail instead of running `cargo install` when cargo-semver-checks is missing
    #[arg(long)]
    pub no_install: bool,

    /// Arguments forwarded to `cargo semver-checks`
    #[arg(last = true)]
    pub args: Vec<String>,
}

/// Runs `cargo semver-checks`, installing it first if needed, and returns its exit code.
pub fn run(args: &SemverArgs) -> Result<i32> {
    println!("{} Checking for {}...", style("→").cyan(), SEMVER_CHECKS_BIN);

    match find_semver_checks(std::env::var_os("PATH")) {
        Some(bin) => tracing::debug!(path = %bin.display(), "Found cargo-semver-checks"),
        None if args.no_install => anyhow::bail!(
            "{} not found. Install it with `cargo install {}`",
            SEMVER_CHECKS_BIN,
            SEMVER_CHECKS_BIN
        ),
        None => {
            println!(
                "{} {} not found, installing...",
                style("!").yellow(),
                SEMVER_CHECKS_BIN
            );
            let status = Command::new("cargo")
                .args(["install", SEMVER_CHECKS_BIN])
                .status()
                .context("Failed to run cargo install")?;

            if !status.success() {
                anyhow::bail!("Failed to install {}: {}", SEMVER_CHECKS_BIN, status);
            }
        }
    }

    println!("{} Running SemVer compatibility checks...", style("→").cyan());

    let status = Command::new("cargo")
        .arg("semver-checks")
        .args(&args.args)
        .status()
        .context("Failed to run cargo semver-checks")?;

    tracing::info!(%status, "cargo semver-checks finished");

    Ok(status.code().unwrap_or(1))
}

/// Looks up an executable `cargo-semver-checks` on `path_var`.
fn find_semver_checks<P: AsRef<OsStr>>(path_var: Option<P>) -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    which::which_in(SEMVER_CHECKS_BIN, path_var, cwd).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    fn write_bin(dir: &Path, executable: bool) -> PathBuf {
        let bin = dir.join(format!("{}{}", SEMVER_CHECKS_BIN, std::env::consts::EXE_SUFFIX));
        std::fs::write(&bin, "#!/bin/sh\n").unwrap();

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = if executable { 0o755 } else { 0o644 };
            std::fs::set_permissions(&bin, std::fs::Permissions::from_mode(mode)).unwrap();
        }
        #[cfg(not(unix))]
        let _ = executable;

        bin
    }

    fn canonical(path: Option<PathBuf>) -> Option<PathBuf> {
        path.map(|p| p.canonicalize().unwrap())
    }

    #[test]
    fn finds_binary_on_path() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        let bin = write_bin(second.path(), true);

        let path_var = std::env::join_paths([first.path(), second.path()]).unwrap();
        assert_eq!(canonical(find_semver_checks(Some(&path_var))), canonical(Some(bin)));
    }

    #[cfg(unix)]
    #[test]
    fn skips_non_executable_files() {
        let shadow = TempDir::new().unwrap();
        let real = TempDir::new().unwrap();
        write_bin(shadow.path(), false);
        let bin = write_bin(real.path(), true);

        let only_shadow = std::env::join_paths([shadow.path()]).unwrap();
        assert_eq!(find_semver_checks(Some(&only_shadow)), None);

        let both = std::env::join_paths([shadow.path(), real.path()]).unwrap();
        assert_eq!(canonical(find_semver_checks(Some(&both))), canonical(Some(bin)));
    }

    #[test]
    fn missing_binary() {
        let dir = TempDir::new().unwrap();
        let path_var = std::env::join_paths([dir.path()]).unwrap();
        assert_eq!(find_semver_checks(Some(&path_var)), None);
        assert_eq!(find_semver_checks(Some(OsStr::new(""))), None);
    }
}
