//! CLI error type and exit codes.

use std::fmt;

use mbnavadjust::config::ConfigError;
use mbnavadjust::ProjectError;

/// Errors surfaced to the user by a command.
#[derive(Debug)]
pub enum CliError {
    /// Loading, editing or saving the project failed.
    Project(ProjectError),
    /// The defaults file could not be used.
    Config(String),
    /// A command argument does not name anything in the project.
    InvalidArgument(String),
    /// Stored tie counts disagree with the ties in this many sections.
    Inconsistent(usize),
    /// Report output could not be produced.
    Output(String),
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Inconsistent(_) => 2,
            _ => 1,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Project(e) => write!(f, "{}", e),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::InvalidArgument(msg) => write!(f, "{}", msg),
            CliError::Inconsistent(n) => write!(f, "{} section(s) have inconsistent tie counts", n),
            CliError::Output(msg) => write!(f, "Failed to write output: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Project(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ProjectError> for CliError {
    fn from(e: ProjectError) -> Self {
        CliError::Project(e)
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}
