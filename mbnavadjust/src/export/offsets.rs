//! Offset vector files produced after an inversion.

use std::fmt::Write as _;
use std::path::PathBuf;

use tracing::debug;

use super::write_text;
use crate::error::ProjectResult;
use crate::model::{InversionStatus, Project};

/// Horizontal component written to an offset file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffsetAxis {
    /// East offsets, `_dx.txt`.
    X,
    /// North offsets, `_dy.txt`.
    Y,
}

impl OffsetAxis {
    fn suffix(self) -> &'static str {
        match self {
            OffsetAxis::X => "_dx.txt",
            OffsetAxis::Y => "_dy.txt",
        }
    }
}

/// One `lon lat meters` line per fix of every section, in project order.
///
/// Offsets are converted to meters with the scale at each section's
/// mid latitude.
pub fn render_offsets(project: &Project, axis: OffsetAxis) -> String {
    let mut out = String::new();
    for (_, section) in project.sections() {
        let scale = section.local_scale();
        for fix in &section.snavs {
            let meters = match axis {
                OffsetAxis::X => scale.lon_to_meters(fix.offset.lon),
                OffsetAxis::Y => scale.lat_to_meters(fix.offset.lat),
            };
            let _ = writeln!(out, "{:.10} {:.10} {:.10}", fix.lon, fix.lat, meters);
        }
    }
    out
}

/// Writes `_dx.txt` and `_dy.txt` when the inversion is current.
///
/// Returns `None` without touching the filesystem otherwise.
pub fn write_offset_vectors(project: &Project) -> ProjectResult<Option<(PathBuf, PathBuf)>> {
    if project.inversion_status != InversionStatus::Current {
        return Ok(None);
    }
    let dx = project.paths.sibling(OffsetAxis::X.suffix());
    let dy = project.paths.sibling(OffsetAxis::Y.suffix());
    write_text(&dx, &render_offsets(project, OffsetAxis::X))?;
    write_text(&dy, &render_offsets(project, OffsetAxis::Y))?;
    debug!(dx = %dx.display(), dy = %dy.display(), "Wrote offset vectors");
    Ok(Some((dx, dy)))
}
