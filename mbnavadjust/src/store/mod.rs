//! Project lifecycle on disk.
//!
//! A project lives as a home file `<name>.nvh` next to a data directory
//! `<name>.dir` holding the project log. These functions keep the two in
//! step and record each lifecycle event in the log.

mod log;

use std::fs;
use std::path::Path;

use tracing::info;

use crate::codec::{self, Provenance};
use crate::error::{ProjectError, ProjectResult};
use crate::model::{Project, ProjectParameters, ProjectPaths};

pub use log::ProjectLog;

/// Creates a new empty project at `path`.
///
/// Fails with [`ProjectError::AlreadyExists`] if either the home file or
/// the data directory is already present.
pub fn create_project(path: &Path, params: ProjectParameters) -> ProjectResult<Project> {
    let paths = ProjectPaths::from_project_path(path)?;
    for existing in [&paths.home, &paths.datadir] {
        if existing.exists() {
            return Err(ProjectError::AlreadyExists(existing.clone()));
        }
    }

    fs::create_dir(&paths.datadir).map_err(|source| ProjectError::Write {
        path: paths.datadir.clone(),
        source,
    })?;

    let project = Project::new(paths, params);
    codec::write_project(&project, &project.paths.home)?;
    ProjectLog::for_project(&project).start(&project)?;
    info!(name = %project.paths.name, home = %project.paths.home.display(), "Created project");
    Ok(project)
}

/// Opens an existing project.
///
/// Both the home file and the data directory must exist.
pub fn open_project(path: &Path) -> ProjectResult<Project> {
    let paths = ProjectPaths::from_project_path(path)?;
    for required in [&paths.home, &paths.datadir] {
        if !required.exists() {
            return Err(ProjectError::Missing(required.clone()));
        }
    }

    let project = codec::read_project(&paths.home)?;
    ProjectLog::for_project(&project).opened(&project)?;
    Ok(project)
}

/// Writes a project back to its home file.
pub fn save_project(project: &Project) -> ProjectResult<()> {
    save_project_with(project, &Provenance::current())
}

/// Like [`save_project`] with explicit provenance.
pub fn save_project_with(project: &Project, provenance: &Provenance) -> ProjectResult<()> {
    codec::write_project_with(project, &project.paths.home, provenance)?;
    ProjectLog::for_project(project).note(
        &format!("Project saved: {}", project.paths.name),
        provenance,
    )
}
