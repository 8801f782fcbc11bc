//! Discovery of new crossings and true crossing detection.

use tracing::{debug, info};

use super::section_offset;
use crate::coord::{polylines_intersect, GeoOffset};
use crate::error::ProjectResult;
use crate::mask::{any_overlap, compute_overlap};
use crate::model::{Crossing, CrossingId, FileId, Project, Section, SectionRef};

/// True if the effective tracks of two sections intersect.
pub fn detect_true_crossing(first: &Section, second: &Section) -> bool {
    let track_1 = first.effective_track();
    let track_2 = second.effective_track();
    polylines_intersect(&track_1, &track_2)
}

/// Finds and records crossings between the sections of `file` and every
/// section of the same or earlier files.
///
/// A pair is a candidate when the two footprints share a populated cell at
/// zero offset. Within one file only earlier sections are considered, and a
/// section is never paired with the section it continues. Pairs already
/// recorded are skipped. Each new crossing gets its overlap and true
/// crossing flag computed. Returns the ids of the new crossings.
pub fn find_crossings(project: &mut Project, file: FileId) -> ProjectResult<Vec<CrossingId>> {
    let num_sections = project.require_file(file)?.num_sections();

    let mut found: Vec<(SectionRef, SectionRef)> = Vec::new();
    for j in 0..num_sections {
        let current_ref = SectionRef {
            file,
            section: j.into(),
        };
        let Some(current) = project.section(current_ref) else {
            continue;
        };
        for (other_ref, other) in project.sections() {
            if other_ref.file > file || (other_ref.file == file && other_ref.section.0 >= j) {
                continue;
            }
            if continues(project, other_ref, current_ref, current) {
                continue;
            }
            if project.find_crossing(other_ref, current_ref).is_some() {
                continue;
            }
            if any_overlap(other.footprint(), current.footprint(), GeoOffset::ZERO) {
                found.push((other_ref, current_ref));
            }
        }
    }

    project
        .crossings
        .try_reserve(found.len())
        .map_err(|_| crate::error::ProjectError::memory("crossings", project.crossings.len() + found.len()))?;

    let mut added = Vec::with_capacity(found.len());
    for (a, b) in found {
        let (Some(first), Some(second)) = (project.section(a), project.section(b)) else {
            continue;
        };
        let mut crossing = Crossing::new(a, b);
        crossing.overlap = compute_overlap(first.footprint(), second.footprint(), section_offset(first, second));
        crossing.truecrossing = detect_true_crossing(first, second);
        debug!(
            first = %a,
            second = %b,
            overlap = crossing.overlap,
            truecrossing = crossing.truecrossing,
            "Found crossing"
        );
        let id = CrossingId(project.crossings.len());
        project.crossings.push(crossing);
        added.push(id);
    }

    project.refresh_summary();
    info!(file = %file, count = added.len(), "Crossing search complete");
    Ok(added)
}

/// True when `current` directly continues `previous` along the track.
fn continues(project: &Project, previous: SectionRef, current: SectionRef, section: &Section) -> bool {
    if !section.continuity {
        return false;
    }
    if previous.file == current.file {
        return previous.section.0 + 1 == current.section.0;
    }
    current.section.0 == 0
        && previous.file.0 + 1 == current.file.0
        && project
            .file(previous.file)
            .map(|f| f.num_sections() == previous.section.0 + 1)
            .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::GeoBounds;
    use crate::mask::CoverageMask;
    use crate::model::{ProjectParameters, ProjectPaths, Snav, SurveyFile};

    fn line(lon: (f64, f64), lat: (f64, f64)) -> Section {
        let pad = 0.05;
        let bounds = GeoBounds::new(
            lon.0.min(lon.1) - pad,
            lon.0.max(lon.1) + pad,
            lat.0.min(lat.1) - pad,
            lat.0.max(lat.1) + pad,
        );
        Section::new(bounds)
            .with_coverage(CoverageMask::full())
            .with_snav(Snav::new(0, 0.0, 0.0, lon.0, lat.0))
            .with_snav(Snav::new(1, 0.0, 1.0, lon.1, lat.1))
    }

    #[test]
    fn test_detect_true_crossing() {
        let ew = line((-122.0, -121.0), (36.5, 36.5));
        let ns = line((-121.5, -121.5), (36.0, 37.0));
        let parallel = line((-122.0, -121.0), (36.6, 36.6));
        assert!(detect_true_crossing(&ew, &ns));
        assert!(!detect_true_crossing(&ew, &parallel));
    }

    #[test]
    fn test_find_crossings_between_files() {
        let mut p = Project::new(ProjectPaths::new("/data", "survey"), ProjectParameters::default());
        p.add_file(SurveyFile::new("a", 88).with_section(line((-122.0, -121.0), (36.4, 36.6))))
            .unwrap();
        p.add_file(SurveyFile::new("b", 88).with_section(line((-121.5, -121.5), (36.0, 37.0))))
            .unwrap();
        p.add_file(SurveyFile::new("c", 88).with_section(line((-100.0, -99.0), (10.0, 11.0))))
            .unwrap();

        let found = find_crossings(&mut p, FileId(1)).unwrap();
        assert_eq!(found.len(), 1);
        let c = p.crossing(found[0]).unwrap();
        assert_eq!(c.first(), SectionRef::new(0, 0));
        assert_eq!(c.second(), SectionRef::new(1, 0));
        assert!(c.truecrossing);
        assert!(c.overlap >= 1);

        // Already recorded pairs are not added again
        assert!(find_crossings(&mut p, FileId(1)).unwrap().is_empty());
        assert!(find_crossings(&mut p, FileId(2)).unwrap().is_empty());
        assert_eq!(p.summary().num_truecrossings, 1);
    }

    #[test]
    fn test_find_crossings_skips_continuing_section() {
        let first = line((-122.0, -121.0), (36.0, 37.0));
        let next = line((-121.5, -120.5), (36.0, 37.0)).with_continuity(true);
        let gap = line((-121.2, -120.2), (36.0, 37.0));
        let mut p = Project::new(ProjectPaths::new("/data", "survey"), ProjectParameters::default());
        p.add_file(SurveyFile::new("a", 88).with_section(first).with_section(next).with_section(gap))
            .unwrap();

        let found = find_crossings(&mut p, FileId(0)).unwrap();
        let pairs: Vec<_> = found
            .iter()
            .map(|&id| {
                let c = p.crossing(id).unwrap();
                (c.first().section.0, c.second().section.0)
            })
            .collect();
        assert_eq!(pairs, vec![(0, 2), (1, 2)]);
    }

    #[test]
    fn test_find_crossings_skips_continuation_across_files() {
        let mut p = Project::new(ProjectPaths::new("/data", "survey"), ProjectParameters::default());
        p.add_file(SurveyFile::new("a", 88).with_section(line((-122.0, -121.0), (36.0, 37.0))))
            .unwrap();
        p.add_file(
            SurveyFile::new("b", 88).with_section(line((-121.5, -120.5), (36.0, 37.0)).with_continuity(true)),
        )
        .unwrap();
        assert!(find_crossings(&mut p, FileId(1)).unwrap().is_empty());
    }

    #[test]
    fn test_find_crossings_unknown_file() {
        let mut p = Project::new(ProjectPaths::new("/data", "survey"), ProjectParameters::default());
        assert!(find_crossings(&mut p, FileId(0)).is_err());
    }
}
