//! mbnavadjust - command-line front end for navigation adjustment projects.

mod commands;
mod error;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use mbnavadjust::logging::{init_logging, LogLevel, LoggingConfig};

use crate::commands::fix::FixAction;
use crate::error::CliError;

#[derive(Debug, Parser)]
#[command(name = "mbnavadjust")]
#[command(version, about = "Manage swath navigation adjustment projects", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Defaults file for new projects (default: ~/.config/mbnavadjust/config.ini)
    #[arg(long, global = true, value_name = "INI")]
    config: Option<PathBuf>,

    /// Also write log events to this file
    #[arg(long, global = true, value_name = "FILE")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create an empty project using the configured defaults
    New {
        /// Project path, with or without the .nvh suffix
        path: PathBuf,
    },
    /// Show project statistics
    Info {
        path: PathBuf,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Discover crossings between overlapping sections and save
    Crossings { path: PathBuf },
    /// Recompute the overlap of every crossing and save
    Overlaps { path: PathBuf },
    /// Check stored per-fix tie counts against the ties
    Check {
        path: PathBuf,
        /// Print mismatches as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write the datalist, route files and offset vectors
    Export { path: PathBuf },
    /// Mark a file's navigation as fixed
    Fix { path: PathBuf, file_id: usize },
    /// Return a fixed file to good navigation
    Unfix { path: PathBuf, file_id: usize },
}

fn main() {
    let cli = Cli::parse();

    let _guard = init_logging(&LoggingConfig {
        level: LogLevel::from_verbosity(cli.verbose),
        file: cli.log_file.clone(),
    });

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::New { path } => commands::new::run(&path, cli.config.as_deref()),
        Commands::Info { path, json } => commands::info::run(&path, json),
        Commands::Crossings { path } => commands::crossings::run(&path),
        Commands::Overlaps { path } => commands::overlaps::run(&path),
        Commands::Check { path, json } => commands::check::run(&path, json),
        Commands::Export { path } => commands::export::run(&path),
        Commands::Fix { path, file_id } => commands::fix::run(&path, file_id, FixAction::Fix),
        Commands::Unfix { path, file_id } => commands::fix::run(&path, file_id, FixAction::Unfix),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["mbnavadjust", "info", "survey.nvh", "-vv", "--json"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Info { json: true, .. }));
    }

    #[test]
    fn test_parse_fix() {
        let cli = Cli::try_parse_from(["mbnavadjust", "fix", "survey", "3"]).unwrap();
        match cli.command {
            Commands::Fix { path, file_id } => {
                assert_eq!(path, PathBuf::from("survey"));
                assert_eq!(file_id, 3);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parse_config_path() {
        let cli = Cli::try_parse_from(["mbnavadjust", "--config", "/tmp/d.ini", "new", "p"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/d.ini")));
    }

    #[test]
    fn test_rejects_negative_file_id() {
        assert!(Cli::try_parse_from(["mbnavadjust", "unfix", "survey", "-1"]).is_err());
    }
}
