//! Fixing and unfixing file navigation.

use std::path::Path;

use mbnavadjust::codec::Provenance;
use mbnavadjust::manager::{fix_file, unfix_file};
use mbnavadjust::model::FileId;
use mbnavadjust::store::{open_project, save_project_with, ProjectLog};

use crate::error::CliError;

/// Which way to change a file's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixAction {
    Fix,
    Unfix,
}

/// Change the navigation status of one file, log it and save.
pub fn run(path: &Path, file_id: usize, action: FixAction) -> Result<(), CliError> {
    let mut project = open_project(path)?;
    let id = FileId(file_id);
    let Some(file) = project.file(id) else {
        return Err(CliError::InvalidArgument(format!(
            "project {} has no file {} ({} files)",
            project.paths.name,
            file_id,
            project.files().len()
        )));
    };
    let file_path = file.path.clone();

    let verb = match action {
        FixAction::Fix => {
            fix_file(&mut project, id)?;
            "fixed"
        }
        FixAction::Unfix => {
            unfix_file(&mut project, id)?;
            "unfixed"
        }
    };

    let provenance = Provenance::current();
    ProjectLog::for_project(&project).note(&format!("Set file {} {}: {}", id, verb, file_path), &provenance)?;
    save_project_with(&project, &provenance)?;

    println!("File {} ({}) {}", id, file_path, verb);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::two_track_project;
    use mbnavadjust::model::FileStatus;
    use tempfile::TempDir;

    #[test]
    fn test_fix_then_unfix() {
        let dir = TempDir::new().unwrap();
        let home = two_track_project(dir.path());

        run(&home, 1, FixAction::Fix).unwrap();
        let project = open_project(&home).unwrap();
        assert_eq!(project.file(FileId(1)).unwrap().status, FileStatus::FixedNav);

        run(&home, 1, FixAction::Unfix).unwrap();
        let project = open_project(&home).unwrap();
        assert_eq!(project.file(FileId(1)).unwrap().status, FileStatus::GoodNav);

        let log = std::fs::read_to_string(dir.path().join("survey.dir").join("log.txt")).unwrap();
        assert!(log.contains("Set file 1 fixed: north.mb88"));
        assert!(log.contains("Set file 1 unfixed: north.mb88"));
    }

    #[test]
    fn test_unknown_file_is_rejected() {
        let dir = TempDir::new().unwrap();
        let home = two_track_project(dir.path());
        let result = run(&home, 7, FixAction::Fix);
        assert!(matches!(result, Err(CliError::InvalidArgument(_))));
    }
}
