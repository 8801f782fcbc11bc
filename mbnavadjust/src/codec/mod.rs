//! Project file codec.
//!
//! Reading happens in two passes. [`reader`] walks the lines against the
//! version-gated layouts in [`layout`] and produces raw records; then
//! [`normalize`] applies defaults and load-time repairs to build a
//! consistent [`Project`]. Any failure aborts the read and no project is
//! returned.
//!
//! Writing always produces the current format, see [`serialize_project`].

mod layout;
mod lines;
mod normalize;
mod raw;
mod reader;
mod version;
mod writer;

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{ProjectError, ProjectResult};
use crate::model::{Project, ProjectPaths};

pub use version::FormatVersion;
pub use writer::{serialize_project, Provenance, MB_SYSTEM_VERSION, PROGRAM_VERSION};

/// First line of every project file.
pub const PROJECT_MAGIC: &str = "##MBNAVADJUST PROJECT";

/// Suffix of the backup copy made before a project file is overwritten.
pub const BACKUP_SUFFIX: &str = ".save";

/// Parses project text, taking locations from its header.
pub fn parse_project(text: &str) -> ProjectResult<Project> {
    let raw = reader::parse_raw(text)?;
    normalize::build_project(raw, None)
}

/// Reads a project home file.
///
/// Locations are derived from `path` itself rather than from the header, so
/// a project directory that has been moved still opens correctly.
pub fn read_project(path: &Path) -> ProjectResult<Project> {
    let paths = ProjectPaths::from_project_path(path)?;
    let text = fs::read_to_string(path).map_err(|source| ProjectError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let raw = reader::parse_raw(&text)?;
    let project = normalize::build_project(raw, Some(paths))?;
    info!(
        path = %path.display(),
        files = project.summary().num_files,
        crossings = project.summary().num_crossings,
        ties = project.summary().num_ties,
        "Read project"
    );
    Ok(project)
}

/// Writes a project to `path` in the current format.
///
/// An existing file at `path` is first copied to `path` + `.save`. The copy
/// is best effort; a failed backup is logged and the write goes ahead.
pub fn write_project(project: &Project, path: &Path) -> ProjectResult<()> {
    write_project_with(project, path, &Provenance::current())
}

/// Like [`write_project`] with explicit provenance.
pub fn write_project_with(project: &Project, path: &Path, provenance: &Provenance) -> ProjectResult<()> {
    if path.exists() {
        let mut backup = path.as_os_str().to_os_string();
        backup.push(BACKUP_SUFFIX);
        match fs::copy(path, &backup) {
            Ok(_) => debug!(backup = ?backup, "Saved previous project file"),
            Err(e) => tracing::warn!(backup = ?backup, error = %e, "Could not save previous project file"),
        }
    }

    let text = serialize_project(project, provenance);
    fs::write(path, text).map_err(|source| ProjectError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "Wrote project");
    Ok(())
}
