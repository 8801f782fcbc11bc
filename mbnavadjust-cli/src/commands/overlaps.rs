//! Overlap recomputation.

use std::path::Path;

use mbnavadjust::manager::refresh_overlaps;
use mbnavadjust::store::{open_project, save_project};

use crate::error::CliError;

/// Recompute the overlap of every crossing and save the project.
pub fn run(path: &Path) -> Result<(), CliError> {
    let mut project = open_project(path)?;
    let updated = refresh_overlaps(&mut project);
    save_project(&project)?;

    let summary = project.summary();
    println!("Recomputed {} crossing overlap(s)", updated);
    println!("  >=50%: {}", summary.num_bettercrossings);
    println!("  >=25%: {}", summary.num_goodcrossings);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::two_track_project;
    use mbnavadjust::manager::find_crossings;
    use mbnavadjust::model::FileId;
    use tempfile::TempDir;

    #[test]
    fn test_overlaps_are_saved() {
        let dir = TempDir::new().unwrap();
        let home = two_track_project(dir.path());
        let mut project = open_project(&home).unwrap();
        // Discovery pairs a file with earlier ones, so search from the second.
        let found = find_crossings(&mut project, FileId(1)).unwrap();
        assert_eq!(found.len(), 1);
        let expected = project.crossings()[0].overlap;
        save_project(&project).unwrap();

        run(&home).unwrap();
        let reopened = open_project(&home).unwrap();
        assert_eq!(reopened.crossings()[0].overlap, expected);
        assert!(dir.path().join("survey.nvh.save").exists());
    }
}
