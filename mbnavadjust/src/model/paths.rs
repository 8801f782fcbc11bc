//! Filesystem locations of a project.

use std::path::{Path, PathBuf};

use crate::error::{ProjectError, ProjectResult};

/// Extension of the project home file.
pub const HOME_EXTENSION: &str = "nvh";

/// Suffix of the project data directory.
pub const DATADIR_EXTENSION: &str = "dir";

/// Name of the project log inside the data directory.
pub const LOG_FILE_NAME: &str = "log.txt";

/// Paths derived from a project name and directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPaths {
    /// Project name, without extension.
    pub name: String,
    /// Directory holding the home file and data directory.
    pub directory: PathBuf,
    /// `<directory>/<name>.nvh`
    pub home: PathBuf,
    /// `<directory>/<name>.dir`
    pub datadir: PathBuf,
    /// `<datadir>/log.txt`
    pub logfile: PathBuf,
}

impl ProjectPaths {
    /// Builds the standard layout for `name` inside `directory`.
    pub fn new(directory: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        let directory = directory.into();
        let name = name.into();
        let home = directory.join(format!("{}.{}", name, HOME_EXTENSION));
        let datadir = directory.join(format!("{}.{}", name, DATADIR_EXTENSION));
        let logfile = datadir.join(LOG_FILE_NAME);
        Self {
            name,
            directory,
            home,
            datadir,
            logfile,
        }
    }

    /// Interprets a user-supplied project path.
    ///
    /// A trailing `.nvh` is stripped. A bare name is placed in the current
    /// working directory.
    ///
    /// # Example
    ///
    /// ```
    /// use mbnavadjust::model::ProjectPaths;
    /// use std::path::Path;
    ///
    /// let paths = ProjectPaths::from_project_path(Path::new("/data/survey.nvh")).unwrap();
    /// assert_eq!(paths.name, "survey");
    /// assert_eq!(paths.datadir, Path::new("/data/survey.dir"));
    /// ```
    pub fn from_project_path(path: &Path) -> ProjectResult<Self> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ProjectError::InvalidPath(path.display().to_string()))?;

        let suffix = format!(".{}", HOME_EXTENSION);
        let name = file_name.strip_suffix(&suffix).unwrap_or(file_name);
        if name.is_empty() {
            return Err(ProjectError::InvalidPath(path.display().to_string()));
        }

        let directory = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => std::env::current_dir()
                .map_err(|e| ProjectError::InvalidPath(format!("{}: {}", path.display(), e)))?,
        };

        Ok(Self::new(directory, name))
    }

    /// Resolves a stored file path against the project directory.
    pub fn resolve(&self, stored: &str) -> PathBuf {
        let stored_path = Path::new(stored);
        if stored_path.is_absolute() {
            stored_path.to_path_buf()
        } else {
            self.directory.join(stored_path)
        }
    }

    /// Directory text as written to the `PATH` header, with trailing separator.
    pub fn directory_with_separator(&self) -> String {
        let text = self.directory.display().to_string();
        if text.ends_with('/') {
            text
        } else {
            format!("{}/", text)
        }
    }

    /// A sibling of the home file with an extra suffix, e.g. `.save`.
    pub fn home_with_suffix(&self, suffix: &str) -> PathBuf {
        let mut name = self.home.as_os_str().to_os_string();
        name.push(suffix);
        PathBuf::from(name)
    }

    /// A file in the project directory named `<name><suffix>`.
    pub fn sibling(&self, suffix: &str) -> PathBuf {
        self.directory.join(format!("{}{}", self.name, suffix))
    }
}
