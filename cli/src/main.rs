use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use skillkit_core::config::{self, Config};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod semver;
mod skills;

#[derive(Parser)]
#[command(name = "skillkit")]
#[command(about = "skillkit - create, validate and package agent skills", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Config file to use instead of ~/.skillkit/config.toml
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Skills(skills::SkillsCommands),
    /// Run cargo-semver-checks against the current crate
    Semver(semver::SemverArgs),
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(explicit: Option<PathBuf>) -> Result<Config> {
    match explicit {
        Some(path) => config::load_config(&path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => {
            let path = config::get_config_path();
            Config::load_or_default(&path)
                .with_context(|| format!("Failed to load config from {}", path.display()))
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Skills(command) => {
            let config = load_config(cli.config)?;
            skills::handle_command(command, &config)
        }
        Commands::Semver(args) => {
            let code = semver::run(&args)?;
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skills::SkillsCommands;

    #[test]
    fn parses_init() {
        let cli = Cli::try_parse_from(["skillkit", "init", "my-skill", "--path", "skills"]).unwrap();
        match cli.command {
            Commands::Skills(SkillsCommands::Init {
                name,
                path,
                with_examples,
            }) => {
                assert_eq!(name.as_deref(), Some("my-skill"));
                assert_eq!(path, PathBuf::from("skills"));
                assert!(!with_examples);
            }
            _ => panic!("expected init"),
        }
    }

    #[test]
    fn init_requires_path() {
        assert!(Cli::try_parse_from(["skillkit", "init", "my-skill"]).is_err());
    }

    #[test]
    fn parses_package_with_optional_output() {
        let cli = Cli::try_parse_from(["skillkit", "-vv", "package", "skills/demo"]).unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Skills(SkillsCommands::Package { path, output }) => {
                assert_eq!(path, PathBuf::from("skills/demo"));
                assert!(output.is_none());
            }
            _ => panic!("expected package"),
        }

        let cli = Cli::try_parse_from(["skillkit", "package", "demo", "dist"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Skills(SkillsCommands::Package { output: Some(_), .. })
        ));
    }

    #[test]
    fn parses_semver_passthrough() {
        let cli = Cli::try_parse_from(["skillkit", "semver", "--no-install", "--", "--baseline-rev", "v1.0.0"])
            .unwrap();
        match cli.command {
            Commands::Semver(args) => {
                assert!(args.no_install);
                assert_eq!(args.args, ["--baseline-rev", "v1.0.0"]);
            }
            _ => panic!("expected semver"),
        }
    }

    #[test]
    fn global_config_flag() {
        let cli = Cli::try_parse_from(["skillkit", "list", "--config", "custom.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
    }
}
