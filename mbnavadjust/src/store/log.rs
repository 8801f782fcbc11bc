//! The human-readable project log kept in the data directory.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::codec::Provenance;
use crate::error::{ProjectError, ProjectResult};
use crate::model::Project;

/// Append-only text log at `<name>.dir/log.txt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLog {
    path: PathBuf,
}

impl ProjectLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The log of an existing project.
    pub fn for_project(project: &Project) -> Self {
        Self::new(&project.paths.logfile)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the log, discarding any previous content, with its first entry.
    pub fn start(&self, project: &Project) -> ProjectResult<()> {
        let mut file = File::create(&self.path).map_err(|e| self.write_error(e))?;
        write!(
            file,
            "New project initialized: {}\n > Project home: {}\n",
            project.paths.name,
            project.paths.home.display()
        )
        .map_err(|e| self.write_error(e))
    }

    /// Records that a project was opened, with its current counts.
    pub fn opened(&self, project: &Project) -> ProjectResult<()> {
        let summary = project.summary();
        self.append(&format!(
            "Project opened: {}\n > Project home: {}\n > Number of Files: {}\n > Number of Crossings Found: {}\n > Number of Crossings Analyzed: {}\n > Number of Navigation Ties: {}\n",
            project.paths.name,
            project.paths.home.display(),
            summary.num_files,
            summary.num_crossings,
            summary.num_crossings_analyzed,
            summary.num_ties
        ))
    }

    /// Appends a message followed by a user, host and time tag.
    pub fn note(&self, message: &str, provenance: &Provenance) -> ProjectResult<()> {
        let mut text = message.to_string();
        if !text.ends_with('\n') {
            text.push('\n');
        }
        text.push_str(&format!(
            " > User <{}> on cpu <{}> at <{}>\n",
            provenance.user, provenance.host, provenance.timestamp
        ));
        self.append(&text)
    }

    fn append(&self, text: &str) -> ProjectResult<()> {
        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .map_err(|e| self.write_error(e))?;
        file.write_all(text.as_bytes()).map_err(|e| self.write_error(e))
    }

    fn write_error(&self, source: std::io::Error) -> ProjectError {
        ProjectError::Write {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ProjectParameters, ProjectPaths};
    use tempfile::TempDir;

    fn provenance() -> Provenance {
        Provenance {
            user: "analyst".to_string(),
            host: "ship".to_string(),
            timestamp: "Sat Oct 17 12:00:00 2026".to_string(),
        }
    }

    #[test]
    fn test_start_then_append() {
        let dir = TempDir::new().unwrap();
        let project = Project::new(ProjectPaths::new(dir.path(), "survey"), ProjectParameters::default());
        let log = ProjectLog::new(dir.path().join("log.txt"));

        log.start(&project).unwrap();
        log.opened(&project).unwrap();
        log.note("Fixed file 3", &provenance()).unwrap();

        let text = std::fs::read_to_string(log.path()).unwrap();
        assert!(text.starts_with("New project initialized: survey\n"));
        assert!(text.contains("Project opened: survey\n"));
        assert!(text.contains(" > Number of Navigation Ties: 0\n"));
        assert!(text.ends_with("Fixed file 3\n > User <analyst> on cpu <ship> at <Sat Oct 17 12:00:00 2026>\n"));
    }

    #[test]
    fn test_start_truncates() {
        let dir = TempDir::new().unwrap();
        let project = Project::new(ProjectPaths::new(dir.path(), "survey"), ProjectParameters::default());
        let log = ProjectLog::new(dir.path().join("log.txt"));
        log.note("old entry", &provenance()).unwrap();
        log.start(&project).unwrap();
        let text = std::fs::read_to_string(log.path()).unwrap();
        assert!(!text.contains("old entry"));
    }

    #[test]
    fn test_missing_directory_is_write_error() {
        let dir = TempDir::new().unwrap();
        let log = ProjectLog::new(dir.path().join("absent").join("log.txt"));
        let err = log.note("x", &provenance()).unwrap_err();
        assert!(matches!(err, ProjectError::Write { .. }));
    }
}
