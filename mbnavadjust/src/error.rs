//! Error types for project operations.
//!
//! Every fallible library operation returns [`ProjectResult`]. Read
//! failures are all-or-nothing and model mutations leave the project
//! unchanged when they fail.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::codec::FormatVersion;
use crate::model::{CrossingId, FileId, SectionRef, SnavIndex, TieId};

/// Result type for project operations.
pub type ProjectResult<T> = Result<T, ProjectError>;

/// Errors that can occur while loading, editing or saving a project.
#[derive(Debug, Error)]
pub enum ProjectError {
    /// Growing an arena was refused by the allocator.
    #[error("cannot allocate {count} {what}")]
    Memory { what: &'static str, count: usize },

    /// A file could not be opened or read.
    #[error("failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The project file is malformed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A file could not be written.
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A model operation would break a project invariant.
    #[error(transparent)]
    Invariant(#[from] InvariantViolation),

    /// The project path cannot be interpreted.
    #[error("invalid project path: {0}")]
    InvalidPath(String),

    /// Creating a project would overwrite existing data.
    #[error("{} already exists", .0.display())]
    AlreadyExists(PathBuf),

    /// An existing project is incomplete on disk.
    #[error("{} does not exist", .0.display())]
    Missing(PathBuf),
}

impl ProjectError {
    pub(crate) fn memory(what: &'static str, count: usize) -> Self {
        ProjectError::Memory { what, count }
    }
}

/// A structurally malformed project file line.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("line {line}{}: {reason}: `{content}`", version_suffix(.version))]
pub struct ParseError {
    /// Format version, once the header has declared it.
    pub version: Option<FormatVersion>,
    /// One-based line number, one past the last line at end of input.
    pub line: usize,
    /// The raw offending line.
    pub content: String,
    pub reason: String,
}

fn version_suffix(version: &Option<FormatVersion>) -> String {
    match version {
        Some(v) => format!(" (format {})", v),
        None => String::new(),
    }
}

/// A rejected model mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("no file with id {0}")]
    UnknownFile(FileId),

    #[error("no section {0}")]
    UnknownSection(SectionRef),

    #[error("no crossing with id {0}")]
    UnknownCrossing(CrossingId),

    #[error("crossing {crossing} has no tie {tie}")]
    UnknownTie { crossing: CrossingId, tie: TieId },

    #[error("snav {snav} is out of range for section {section} with {count} fixes")]
    SnavOutOfRange {
        section: SectionRef,
        snav: SnavIndex,
        count: usize,
    },

    #[error("crossing {crossing} already holds the maximum of {limit} ties")]
    TooManyTies { crossing: CrossingId, limit: usize },

    #[error("section has {count} fixes, the maximum is {limit}")]
    TooManySnavs { count: usize, limit: usize },

    #[error("section {0} cannot cross itself")]
    SelfCrossing(SectionRef),

    #[error("sections {first} and {second} already form crossing {existing}")]
    DuplicateCrossing {
        first: SectionRef,
        second: SectionRef,
        existing: CrossingId,
    },
}
