//! Subcommand implementations.

pub mod check;
pub mod crossings;
pub mod export;
pub mod fix;
pub mod info;
pub mod new;
pub mod overlaps;

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::{Path, PathBuf};

    use mbnavadjust::coord::GeoBounds;
    use mbnavadjust::mask::CoverageMask;
    use mbnavadjust::model::{ProjectParameters, Section, Snav, SurveyFile};
    use mbnavadjust::store::{create_project, save_project};

    fn track(lon: f64, lat: f64, heading_east: bool) -> Section {
        let mut section = Section::new(GeoBounds::new(lon - 0.5, lon + 0.5, lat - 0.5, lat + 0.5))
            .with_coverage(CoverageMask::full())
            .with_pings(300, 101)
            .with_times(0.0, 2.0);
        for k in 0..3 {
            let d = (k as f64 - 1.0) * 0.4;
            let (x, y) = if heading_east { (lon + d, lat) } else { (lon, lat + d) };
            section = section.with_snav(Snav::new(k * 150, k as f64, k as f64, x, y));
        }
        section
    }

    /// Saves a project with two crossing tracks and returns its home path.
    pub fn two_track_project(dir: &Path) -> PathBuf {
        let home = dir.join("survey.nvh");
        let mut project = create_project(&home, ProjectParameters::default()).unwrap();
        project
            .add_file(SurveyFile::new("east.mb88", 88).with_section(track(-121.5, 36.5, true)))
            .unwrap();
        project
            .add_file(SurveyFile::new("north.mb88", 88).with_section(track(-121.5, 36.5, false)))
            .unwrap();
        save_project(&project).unwrap();
        home
    }
}
