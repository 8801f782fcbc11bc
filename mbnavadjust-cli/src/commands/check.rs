//! Tie count consistency check.

use std::path::Path;

use mbnavadjust::manager::{verify_tie_counts, TieCountMismatch};
use mbnavadjust::store::open_project;

use crate::error::CliError;

/// Compare per-fix tie counts with the ties of a project.
///
/// Mismatches are reported and turned into a non-zero exit status.
pub fn run(path: &Path, json: bool) -> Result<(), CliError> {
    let project = open_project(path)?;
    let mismatches = verify_tie_counts(&project);

    if json {
        let text =
            serde_json::to_string_pretty(&mismatches).map_err(|e| CliError::Output(e.to_string()))?;
        println!("{}", text);
    } else if mismatches.is_empty() {
        println!("Tie counts consistent in {} section(s)", project.summary().num_sections);
    } else {
        print!("{}", render_mismatches(&mismatches));
    }
    outcome(&mismatches)
}

fn render_mismatches(mismatches: &[TieCountMismatch]) -> String {
    mismatches
        .iter()
        .map(|m| format!("Section {}: stored {:?}, ties give {:?}\n", m.section, m.stored, m.derived))
        .collect()
}

fn outcome(mismatches: &[TieCountMismatch]) -> Result<(), CliError> {
    if mismatches.is_empty() {
        Ok(())
    } else {
        Err(CliError::Inconsistent(mismatches.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::two_track_project;
    use mbnavadjust::model::SectionRef;
    use tempfile::TempDir;

    #[test]
    fn test_consistent_project_passes() {
        let dir = TempDir::new().unwrap();
        let home = two_track_project(dir.path());
        assert!(run(&home, false).is_ok());
        assert!(run(&home, true).is_ok());
    }

    #[test]
    fn test_mismatch_is_reported_and_fails() {
        let mismatches = vec![TieCountMismatch {
            section: SectionRef::new(1, 4),
            stored: vec![1, 0, 0],
            derived: vec![0, 0, 0],
        }];
        assert_eq!(
            render_mismatches(&mismatches),
            "Section 1:4: stored [1, 0, 0], ties give [0, 0, 0]\n"
        );
        assert!(matches!(outcome(&mismatches), Err(CliError::Inconsistent(1))));
    }
}
