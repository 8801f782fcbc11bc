//! Derived view export.

use std::path::Path;

use mbnavadjust::codec::Provenance;
use mbnavadjust::export::write_all_exports;
use mbnavadjust::store::open_project;

use crate::error::CliError;

/// Write the datalist, route files and, after a current inversion, the
/// offset vectors next to the project home.
pub fn run(path: &Path) -> Result<(), CliError> {
    let project = open_project(path)?;
    let written = write_all_exports(&project, &Provenance::current())?;

    println!("Datalist: {}", written.datalist.display());
    println!("Routes:");
    for route in &written.routes {
        println!("  {}", route.display());
    }
    match &written.offsets {
        Some((dx, dy)) => {
            println!("Offsets:");
            println!("  {}", dx.display());
            println!("  {}", dy.display());
        }
        None => println!("Offsets:  none (no current inversion)"),
    }
    Ok(())
}
