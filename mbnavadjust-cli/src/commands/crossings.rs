//! Crossing discovery.

use std::path::Path;

use mbnavadjust::manager::find_crossings;
use mbnavadjust::model::FileId;
use mbnavadjust::store::{open_project, save_project};
use tracing::info;

use crate::error::CliError;

/// Search every file for new crossings, refresh their overlaps and save.
pub fn run(path: &Path) -> Result<(), CliError> {
    let mut project = open_project(path)?;

    let mut added = Vec::new();
    for file in 0..project.files().len() {
        added.extend(find_crossings(&mut project, FileId(file))?);
    }
    info!(added = added.len(), "Crossing search finished");

    if !added.is_empty() {
        save_project(&project)?;
    }

    let summary = project.summary();
    println!("New crossings:  {}", added.len());
    println!("Total:          {}", summary.num_crossings);
    println!("True crossings: {}", summary.num_truecrossings);
    Ok(())
}
