use anyhow::{Context, Result};
use console::style;
use dialoguer::Input;
use skillkit_core::config::Config;
use serde::Serialize;
use skillkit_core::skills::{self, InitOptions, Lint, PackageOptions, SkillRegistry, Validation};
use std::path::{Path, PathBuf};

#[derive(clap::Subcommand, Clone, Debug)]
pub enum SkillsCommands {
    /// Create a new skill directory from the template
    Init {
        /// Skill name, also used as the directory name; prompted for when omitted
        name: Option<String>,
        /// Directory the skill folder is created in
        #[arg(long)]
        path: PathBuf,
        /// Add placeholder files to scripts/, references/ and assets/
        #[arg(long)]
        with_examples: bool,
    },
    /// Check a skill directory's SKILL.md
    Validate {
        path: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Validate a skill and bundle it into a .skill archive
    Package {
        path: PathBuf,
        /// Directory to write the archive to (default: config, then current directory)
        output: Option<PathBuf>,
    },
    /// Extract a packaged skill
    Unpack {
        archive: PathBuf,
        /// Destination directory (default: current directory)
        dest: Option<PathBuf>,
    },
    /// List the skills under a directory
    List {
        dir: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
}

pub fn handle_command(command: SkillsCommands, config: &Config) -> Result<()> {
    match command {
        SkillsCommands::Init {
            name,
            path,
            with_examples,
        } => {
            let name = match name {
                Some(name) => name,
                None => prompt_name()?,
            };
            let mut options = InitOptions::from(&config.init);
            options.with_examples |= with_examples;
            init_skill(&name, &path, options)
        }
        SkillsCommands::Validate { path, json } => validate_skill(&path, json),
        SkillsCommands::Package { path, output } => {
            let output = output.or_else(|| config.package.output_dir.clone());
            package_skill(&path, output.as_deref(), &PackageOptions::from(&config.package))
        }
        SkillsCommands::Unpack { archive, dest } => {
            unpack_skill(&archive, dest.as_deref().unwrap_or(Path::new(".")))
        }
        SkillsCommands::List { dir, json } => {
            list_skills(dir.as_deref().unwrap_or(Path::new(".")), json)
        }
    }
}

fn prompt_name() -> Result<String> {
    Input::<String>::new()
        .with_prompt("Skill name")
        .validate_with(|input: &String| skills::check_path_segment(input))
        .interact_text()
        .context("Failed to read skill name")
}

fn init_skill(name: &str, parent: &Path, options: InitOptions) -> Result<()> {
    println!("{} Initializing skill: {}", style("→").cyan(), name);

    let dir = skills::init_skill(name, parent, options)?;

    if let Err(reason) = skills::check_name_style(name) {
        println!("{} {}", style("!").yellow(), reason);
    }

    println!(
        "{} Created {}",
        style("✓").green(),
        style(dir.join(skills::SKILL_MANIFEST).display()).cyan()
    );
    for sub in skills::RESOURCE_DIRS {
        println!("  {} - {}/", style("  ").dim(), sub);
    }
    println!();
    println!(
        "{} Skill '{}' initialized at {}",
        style("✓").green().bold(),
        name,
        dir.display()
    );
    println!();
    println!("Next steps:");
    println!("  1. Fill in the description and instructions in SKILL.md");
    println!("  2. Add scripts, references or assets, delete the folders you don't need");
    println!("  3. skillkit validate {}", dir.display());

    Ok(())
}

#[derive(Serialize)]
struct ValidationReport<'a> {
    #[serde(flatten)]
    validation: &'a Validation,
    warnings: &'a [Lint],
}

fn validate_skill(path: &Path, json: bool) -> Result<()> {
    let validation = skills::validate_skill(path)?;
    let warnings = skills::lint_skill(path)?;

    if json {
        let report = ValidationReport {
            validation: &validation,
            warnings: &warnings,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        match &validation {
            Validation::Valid => {
                println!("{} Skill is valid: {}", style("✓").green().bold(), path.display());
            }
            Validation::Invalid(issue) => {
                println!(
                    "{} {}: {}",
                    style("✗").red().bold(),
                    path.display(),
                    issue
                );
            }
        }
        print_warnings(&warnings);
    }

    match validation {
        Validation::Valid => Ok(()),
        Validation::Invalid(issue) => anyhow::bail!("Validation failed: {}", issue),
    }
}

fn print_warnings(warnings: &[Lint]) {
    for warning in warnings {
        println!("  {} {}", style("!").yellow(), warning);
    }
}

fn package_skill(path: &Path, output: Option<&Path>, options: &PackageOptions) -> Result<()> {
    println!("{} Packaging skill: {}", style("→").cyan(), path.display());

    let summary = skills::package_skill_with_summary(path, output, options).map_err(|e| {
        if let skillkit_core::SkillError::ValidationFailed(issue) = &e {
            eprintln!("{} Validation failed: {}", style("✗").red().bold(), issue);
            eprintln!("  Fix the validation errors before packaging.");
        }
        e
    })?;

    print_warnings(&skills::lint_skill(path)?);
    println!(
        "{} Packaged {} files to {}",
        style("✓").green().bold(),
        summary.files,
        style(summary.path.display()).cyan()
    );
    println!(
        "  {} {} bytes, sha256 {}",
        style("  ").dim(),
        summary.bytes,
        summary.sha256
    );

    Ok(())
}

fn unpack_skill(archive: &Path, dest: &Path) -> Result<()> {
    println!("{} Unpacking: {}", style("→").cyan(), archive.display());

    let dir = skills::unpack_skill(archive, dest)?;
    println!("{} Extracted to {}", style("✓").green().bold(), dir.display());

    if let Validation::Invalid(issue) = skills::validate_skill(&dir)? {
        println!(
            "{} Extracted skill does not validate: {}",
            style("!").yellow(),
            issue
        );
    }

    Ok(())
}

fn list_skills(dir: &Path, json: bool) -> Result<()> {
    let registry = SkillRegistry::scan(dir)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&registry.list())?);
        return Ok(());
    }

    if registry.count() == 0 {
        println!("{} No skills found in {}", style("!").yellow(), dir.display());
        println!();
        println!("Create one:");
        println!("  skillkit init my-skill --path {}", dir.display());
        return Ok(());
    }

    println!(
        "{} Skills in {} ({}, {} valid)",
        style("✓").green().bold(),
        dir.display(),
        registry.count(),
        registry.valid().count()
    );
    println!();

    for entry in registry.list() {
        match &entry.validation {
            Validation::Valid => match skills::load_skill(&entry.path) {
                Ok(skill) => println!(
                    "  {} — {}",
                    style(&skill.name).white().bold(),
                    skill.description
                ),
                Err(e) => println!("  {} {}", style(&entry.name).white().bold(), e),
            },
            Validation::Invalid(issue) => println!(
                "  {} {}",
                style(&entry.name).red().bold(),
                style(issue).dim()
            ),
        }
    }

    Ok(())
}
