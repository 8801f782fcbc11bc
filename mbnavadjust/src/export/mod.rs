//! Derived views of a project for external tools.
//!
//! Everything here is write-only and regenerated from the model on demand:
//! the datalist consumed by MB-System processing programs, route files for
//! display in mbgrdviz, and offset vector files after an inversion.

mod datalist;
mod offsets;
mod route;

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::codec::Provenance;
use crate::error::{ProjectError, ProjectResult};
use crate::model::Project;

pub use datalist::{render_datalist, write_datalist, DATALIST_SUFFIX};
pub use offsets::{render_offsets, write_offset_vectors, OffsetAxis};
pub use route::{
    collect_routes, render_route_file, write_route_files, Route, RouteCategory, RouteColor,
    ROUTE_VERSION,
};

/// Paths written by [`write_all_exports`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExportSummary {
    pub datalist: PathBuf,
    pub routes: Vec<PathBuf>,
    /// `_dx` and `_dy` files, present only for a current inversion.
    pub offsets: Option<(PathBuf, PathBuf)>,
}

/// Regenerates every derived file of a project.
pub fn write_all_exports(project: &Project, provenance: &Provenance) -> ProjectResult<ExportSummary> {
    let datalist = write_datalist(project)?;
    let routes = write_route_files(project, provenance)?;
    let offsets = write_offset_vectors(project)?;
    info!(
        project = %project.paths.name,
        routes = routes.len(),
        offsets = offsets.is_some(),
        "Exported derived files"
    );
    Ok(ExportSummary {
        datalist,
        routes,
        offsets,
    })
}

pub(crate) fn write_text(path: &Path, text: &str) -> ProjectResult<()> {
    fs::write(path, text).map_err(|source| ProjectError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::coord::GeoBounds;
    use crate::mask::CoverageMask;
    use crate::model::{
        ErrorEllipsoid, NavOffset, Project, ProjectParameters, ProjectPaths, Section, SectionRef,
        Snav, SnavIndex, SurveyFile,
    };

    pub fn section(lon: f64, lat: f64) -> Section {
        let mut s = Section::new(GeoBounds::new(lon, lon + 0.5, lat, lat + 0.5))
            .with_coverage(CoverageMask::full());
        for k in 0..3 {
            s = s.with_snav(Snav::new(k * 10, 0.0, 100.0 + k as f64, lon + 0.25 * k as f64, lat + 0.25));
        }
        s
    }

    /// Three files: 0 and 1 cross with one tie, 2 overlaps 0 and is untouched.
    pub fn project(directory: &std::path::Path) -> Project {
        let mut p = Project::new(ProjectPaths::new(directory, "survey"), ProjectParameters::default());
        p.add_file(SurveyFile::new("a.mb88", 88).with_section(section(-122.0, 36.0)))
            .unwrap();
        p.add_file(SurveyFile::new("b.mb88", 88).with_section(section(-122.0, 36.0)))
            .unwrap();
        p.add_file(SurveyFile::new("/abs/c.mb59", 59).with_section(section(-121.75, 36.0)))
            .unwrap();
        let c = p.add_crossing(SectionRef::new(0, 0), SectionRef::new(1, 0)).unwrap();
        p.add_tie(c, SnavIndex(0), SnavIndex(2), NavOffset::ZERO, ErrorEllipsoid::default())
            .unwrap();
        p.add_crossing(SectionRef::new(0, 0), SectionRef::new(2, 0)).unwrap();
        crate::manager::refresh_overlaps(&mut p);
        p
    }
}
