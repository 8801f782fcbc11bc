//! Crossing and tie management over a [`Project`].
//!
//! The model enforces its own invariants; this module layers the analysis
//! operations on top: overlap computation, crossing discovery, true
//! crossing detection and consistency checks.

mod consistency;
mod discovery;

use tracing::debug;

use crate::coord::{GeoBounds, GeoOffset};
use crate::error::ProjectResult;
use crate::mask::{compute_overlap, overlap_bounds};
use crate::model::{CrossingId, FileId, FileStatus, Project, Section};

pub use consistency::{tie_counts_for, verify_tie_counts, TieCountMismatch};
pub use discovery::{detect_true_crossing, find_crossings};

/// Offset of the second section relative to the first under the current
/// navigation adjustments, taken at each section's mid fix.
pub fn section_offset(first: &Section, second: &Section) -> GeoOffset {
    second.mid_offset() - first.mid_offset()
}

/// Recomputes and stores the overlap of one crossing.
pub fn recompute_overlap(project: &mut Project, id: CrossingId) -> ProjectResult<u8> {
    let crossing = project.require_crossing(id)?;
    let first = project.require_section(crossing.first())?;
    let second = project.require_section(crossing.second())?;
    let overlap = compute_overlap(
        first.footprint(),
        second.footprint(),
        section_offset(first, second),
    );

    if let Some(crossing) = project.crossing_mut(id) {
        crossing.overlap = overlap;
    }
    project.refresh_summary();
    Ok(overlap)
}

/// Computes the overlap of every crossing that has none yet.
///
/// Returns the number of crossings updated.
pub fn recompute_all_overlaps(project: &mut Project) -> usize {
    recompute_where(project, |overlap| overlap == 0)
}

/// Recomputes the overlap of every crossing.
pub fn refresh_overlaps(project: &mut Project) -> usize {
    recompute_where(project, |_| true)
}

fn recompute_where(project: &mut Project, stale: impl Fn(u8) -> bool) -> usize {
    let mut updated = 0;
    for i in 0..project.crossings.len() {
        let crossing = &project.crossings[i];
        if !stale(crossing.overlap) {
            continue;
        }
        let (Some(first), Some(second)) = (
            project.section(crossing.first()),
            project.section(crossing.second()),
        ) else {
            continue;
        };
        let overlap = compute_overlap(
            first.footprint(),
            second.footprint(),
            section_offset(first, second),
        );
        project.crossings[i].overlap = overlap;
        updated += 1;
    }
    if updated > 0 {
        debug!(count = updated, "Recomputed crossing overlaps");
        project.refresh_summary();
    }
    updated
}

/// Region where a crossing's two footprints overlap, in the frame of the
/// first section.
pub fn crossing_overlap_bounds(project: &Project, id: CrossingId) -> ProjectResult<Option<GeoBounds>> {
    let crossing = project.require_crossing(id)?;
    let first = project.require_section(crossing.first())?;
    let second = project.require_section(crossing.second())?;
    Ok(overlap_bounds(
        first.footprint(),
        second.footprint(),
        section_offset(first, second),
    ))
}

/// Puts one crossing into canonical endpoint order.
///
/// Returns true if the endpoints were swapped.
pub fn canonicalize_crossing(project: &mut Project, id: CrossingId) -> ProjectResult<bool> {
    project.require_crossing(id)?;
    Ok(project
        .crossing_mut(id)
        .map(|c| c.canonicalize())
        .unwrap_or(false))
}

/// Holds a file's navigation fixed.
pub fn fix_file(project: &mut Project, file: FileId) -> ProjectResult<()> {
    project.set_file_status(file, FileStatus::FixedNav)
}

/// Returns a file's navigation to adjustable.
pub fn unfix_file(project: &mut Project, file: FileId) -> ProjectResult<()> {
    project.set_file_status(file, FileStatus::GoodNav)
}

/// Envelope of every section of files whose navigation is adjustable.
///
/// Sections with non-finite bounds are ignored. Returns `None` when no
/// section qualifies.
pub fn project_bounds(project: &Project) -> Option<GeoBounds> {
    project
        .files()
        .iter()
        .filter(|f| f.status != FileStatus::FixedNav)
        .flat_map(|f| f.sections.iter())
        .map(|s| s.bounds)
        .filter(GeoBounds::is_finite)
        .reduce(|acc, b| acc.union(&b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mask::CoverageMask;
    use crate::model::{NavOffset, ProjectParameters, ProjectPaths, SectionRef, Snav, SnavIndex, SurveyFile};

    fn section(lon: f64) -> Section {
        let mut s = Section::new(GeoBounds::new(lon, lon + 1.0, 36.0, 37.0)).with_coverage(CoverageMask::full());
        for k in 0..3 {
            s = s.with_snav(Snav::new(k, 0.0, 1000.0 + k as f64, lon + 0.5 * k as f64, 36.5));
        }
        s
    }

    fn project() -> Project {
        let mut p = Project::new(ProjectPaths::new("/data", "survey"), ProjectParameters::default());
        p.add_file(SurveyFile::new("a", 88).with_section(section(-122.0))).unwrap();
        p.add_file(SurveyFile::new("b", 88).with_section(section(-121.5))).unwrap();
        p.add_file(SurveyFile::new("c", 88).with_section(section(-122.0))).unwrap();
        p
    }

    #[test]
    fn test_recompute_overlap_half_shift() {
        let mut p = project();
        let c = p.add_crossing(SectionRef::new(0, 0), SectionRef::new(1, 0)).unwrap();
        let overlap = recompute_overlap(&mut p, c).unwrap();
        assert!((50..=52).contains(&overlap), "overlap {}", overlap);
        assert_eq!(p.crossing(c).unwrap().overlap, overlap);
        assert_eq!(p.summary().num_goodcrossings, 1);
        assert_eq!(p.summary().num_bettercrossings, usize::from(overlap >= 50));
    }

    #[test]
    fn test_recompute_overlap_follows_fix_offsets() {
        let mut p = project();
        let c = p.add_crossing(SectionRef::new(0, 0), SectionRef::new(1, 0)).unwrap();
        // Shifting the second section's mid fix west by half a degree
        // lines the two footprints up.
        p.set_snav_offset(SectionRef::new(1, 0), SnavIndex(1), NavOffset::new(-0.5, 0.0, 0.0))
            .unwrap();
        assert_eq!(recompute_overlap(&mut p, c).unwrap(), 100);
    }

    #[test]
    fn test_recompute_all_only_touches_stale() {
        let mut p = project();
        let a = p.add_crossing(SectionRef::new(0, 0), SectionRef::new(1, 0)).unwrap();
        let b = p.add_crossing(SectionRef::new(0, 0), SectionRef::new(2, 0)).unwrap();
        p.crossing_mut(a).unwrap().overlap = 7;

        assert_eq!(recompute_all_overlaps(&mut p), 1);
        assert_eq!(p.crossing(a).unwrap().overlap, 7);
        assert_eq!(p.crossing(b).unwrap().overlap, 100);

        assert_eq!(refresh_overlaps(&mut p), 2);
        assert_ne!(p.crossing(a).unwrap().overlap, 7);
    }

    #[test]
    fn test_crossing_overlap_bounds() {
        let p = {
            let mut p = project();
            p.add_crossing(SectionRef::new(0, 0), SectionRef::new(1, 0)).unwrap();
            p
        };
        let c = CrossingId(0);
        let bounds = crossing_overlap_bounds(&p, c).unwrap().unwrap();
        assert!((bounds.lon_min - -121.5).abs() < 1e-9);
        assert!((bounds.lon_max - -121.0).abs() < 1e-9);
        assert!(crossing_overlap_bounds(&p, CrossingId(9)).is_err());
    }

    #[test]
    fn test_fix_and_unfix() {
        let mut p = project();
        fix_file(&mut p, FileId(1)).unwrap();
        assert_eq!(p.file(FileId(1)).unwrap().status, FileStatus::FixedNav);
        unfix_file(&mut p, FileId(1)).unwrap();
        assert_eq!(p.file(FileId(1)).unwrap().status, FileStatus::GoodNav);
        assert!(fix_file(&mut p, FileId(5)).is_err());
    }

    #[test]
    fn test_project_bounds_skips_fixed_and_non_finite() {
        let mut p = project();
        let mut bad = section(0.0);
        bad.bounds.lon_min = f64::NAN;
        p.add_file(SurveyFile::new("d", 88).with_section(bad)).unwrap();
        fix_file(&mut p, FileId(1)).unwrap();

        let bounds = project_bounds(&p).unwrap();
        assert_eq!(bounds, GeoBounds::new(-122.0, -121.0, 36.0, 37.0));
    }

    #[test]
    fn test_project_bounds_empty() {
        let p = Project::new(ProjectPaths::new("/data", "empty"), ProjectParameters::default());
        assert!(project_bounds(&p).is_none());
    }
}
