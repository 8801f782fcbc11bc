//! MB-System datalist of the project's survey files.

use std::fmt::Write as _;
use std::path::PathBuf;

use tracing::debug;

use super::write_text;
use crate::error::ProjectResult;
use crate::model::Project;

/// Suffix of the datalist written next to the home file.
pub const DATALIST_SUFFIX: &str = ".mb-1";

/// One `path format` line per file, in file order.
pub fn render_datalist(project: &Project) -> String {
    let mut out = String::new();
    for file in project.files() {
        let _ = writeln!(out, "{} {}", file.path, file.format);
    }
    out
}

/// Writes `<name>.mb-1` in the project directory.
pub fn write_datalist(project: &Project) -> ProjectResult<PathBuf> {
    let path = project.paths.sibling(DATALIST_SUFFIX);
    write_text(&path, &render_datalist(project))?;
    debug!(path = %path.display(), files = project.files().len(), "Wrote datalist");
    Ok(path)
}
