mod completions;
mod generate;
mod remove;
mod watch;

use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use completions::CompletionsCommand;
use eyre::{Context, Result};
use generate::GenerateCommand;
use mimic_source::Config;
use remove::RemoveCommand;
use watch::WatchCommand;

/// Exit code for argument-shape errors.
const USAGE_EXIT_CODE: i32 = 2;

/// Extension trait for exiting on mimic errors with pretty formatting
pub(crate) trait UnwrapOrExit<T> {
    fn unwrap_or_exit(self) -> T;
}

impl<T> UnwrapOrExit<T> for mimic_source::Result<T> {
    fn unwrap_or_exit(self) -> T {
        match self {
            Ok(v) => v,
            Err(e) => {
                let usage = e.is_usage_error();
                eprintln!("{:?}", miette::Report::new(*e));
                if usage {
                    eprintln!("{}", generate_usage());
                    std::process::exit(USAGE_EXIT_CODE);
                }
                std::process::exit(1);
            }
        }
    }
}

fn generate_usage() -> String {
    let mut cmd = Cli::command();
    cmd.build();
    cmd.find_subcommand_mut("generate")
        .map(|sub| sub.render_usage().to_string())
        .unwrap_or_default()
}

/// Configuration for the current directory.
pub(crate) fn load_config() -> Result<(PathBuf, Config)> {
    let cwd = std::env::current_dir().wrap_err("Failed to read the current directory")?;
    let config = Config::discover(&cwd).unwrap_or_exit();
    Ok((cwd, config))
}

#[derive(Parser)]
#[command(name = "mimic")]
#[command(version)]
#[command(about = "Generate mocks for Go interfaces")]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Generate(cmd) => cmd.run(),
            Commands::Watch(cmd) => cmd.run(),
            Commands::Remove(cmd) => cmd.run(),
            Commands::Completions(cmd) => cmd.run(),
        }
    }

    /// Whether debug logging was asked for.
    pub fn debug(&self) -> bool {
        match &self.command {
            Commands::Generate(cmd) => cmd.args.debug,
            _ => false,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate mocks for interfaces of a package or a Go file
    Generate(GenerateCommand),

    /// Keep mocks listed in interfaces_to_mock files up to date
    Watch(WatchCommand),

    /// Delete the interfaces_to_mock files created by watch
    Remove(RemoveCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}
