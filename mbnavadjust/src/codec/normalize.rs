//! Conversion of raw records into a consistent project.
//!
//! All version-dependent defaults and load-time repairs live here:
//!
//! - parameters absent from older headers take their defaults;
//! - fix offsets from files older than 3.00 are negated;
//! - block ids are derived from continuity breaks before 3.06;
//! - global ties at 3.04 take their status from the fix index;
//! - tie fix indices past the section's fixes are remapped;
//! - implausible inversion offsets are discarded;
//! - crossings are put in canonical order;
//! - tie times and meter offsets are rederived from the sections;
//! - missing overlaps are computed and tie counts rebuilt.

use std::path::PathBuf;

use tracing::{debug, warn};

use super::raw::{RawCrossing, RawFile, RawGlobalTie, RawSection, RawTie};
use super::reader::RawProject;
use crate::error::{ParseError, ProjectResult};
use crate::manager;
use crate::model::{
    Crossing, GlobalTie, Project, ProjectParameters, ProjectPaths, Section, SectionRef, Snav,
    SnavIndex, SourceInfo, SurveyFile, Tie, TieOffset, TieStatus, MAX_SNAVS, SIGMA_MINIMUM,
};

/// Builds a project from raw records.
///
/// `paths` overrides the locations recorded in the header, which is what
/// happens when a project is opened from disk.
pub(crate) fn build_project(raw: RawProject, paths: Option<ProjectPaths>) -> ProjectResult<Project> {
    let RawProject {
        header,
        files,
        crossings,
    } = raw;
    let version = header.version;

    let paths = paths.unwrap_or_else(|| {
        let datadir = PathBuf::from(&header.datadir);
        ProjectPaths {
            name: header.name.clone(),
            directory: PathBuf::from(&header.path),
            home: PathBuf::from(&header.home),
            logfile: datadir.join(crate::model::LOG_FILE_NAME),
            datadir,
        }
    });

    let defaults = ProjectParameters::default();
    let params = ProjectParameters {
        section_length: header.section_length,
        section_soundings: header.section_soundings.unwrap_or(defaults.section_soundings),
        decimation: header.decimation,
        contour_interval: header.contour_interval,
        color_interval: header.color_interval,
        tick_interval: header.tick_interval,
        precision: if version.at_least(301) {
            SIGMA_MINIMUM
        } else {
            header.precision.unwrap_or(SIGMA_MINIMUM)
        },
        smoothing: header.smoothing.unwrap_or(defaults.smoothing),
        zoffset_width: header.zoffset_width.unwrap_or(defaults.zoffset_width),
    };

    let mut project = Project::new(paths, params);
    project.source = SourceInfo {
        mb_system_version: header.mb_system_version.clone(),
        program_version: header.program_version.clone(),
        file_version: header.file_version.clone(),
        origin: header.origin.clone(),
    };
    project.inversion_status = header.inversion;
    project.grid_status = header.grid_status.unwrap_or_default();

    let negate_offsets = !version.at_least(300);
    for raw_file in files {
        let file = build_file(raw_file, &project.paths, negate_offsets)?;
        project.files.push(file);
    }

    if version.at_least(306) {
        let used = project.files.iter().map(|f| f.block + 1).max().unwrap_or(0);
        project.num_blocks = header.num_blocks.unwrap_or(used).max(used);
    } else {
        project.num_blocks = assign_blocks(&mut project.files);
        debug!(blocks = project.num_blocks, "Derived blocks from continuity");
    }

    project.crossings.reserve(crossings.len());
    let mut reordered = 0;
    for raw_crossing in crossings {
        let (crossing, swapped) = build_crossing(&project, raw_crossing)?;
        if swapped {
            reordered += 1;
        }
        project.crossings.push(crossing);
    }
    if reordered > 0 {
        debug!(count = reordered, "Reordered crossing endpoints");
    }

    project.rebuild_tie_counts();
    let computed = manager::recompute_all_overlaps(&mut project);
    if computed > 0 {
        debug!(count = computed, "Computed missing crossing overlaps");
    }
    project.refresh_summary();
    Ok(project)
}

fn build_file(raw: RawFile, paths: &ProjectPaths, negate_offsets: bool) -> Result<SurveyFile, ParseError> {
    let mut file = SurveyFile::new(raw.path, raw.format).with_status(raw.status);
    file.block = raw.block.unwrap_or(0);
    file.block_offset = raw.block_offset.unwrap_or_default();
    file.heading_bias_import = raw.heading_bias_import;
    file.roll_bias_import = raw.roll_bias_import;
    file.heading_bias = raw.heading_bias;
    file.roll_bias = raw.roll_bias;
    file.output_id = raw.output_id;
    file.resolved_path = paths.resolve(&file.path);

    file.sections.reserve(raw.sections.len());
    for raw_section in raw.sections {
        file.sections.push(build_section(raw_section, negate_offsets)?);
    }
    Ok(file)
}

fn build_section(raw: RawSection, negate_offsets: bool) -> Result<Section, ParseError> {
    let mut section = Section::new(raw.bounds)
        .with_coverage(raw.coverage)
        .with_pings(raw.num_pings, raw.num_beams)
        .with_continuity(raw.continuity)
        .with_times(raw.btime_d, raw.etime_d);
    section.distance = raw.distance;
    section.depth_min = raw.depth_min;
    section.depth_max = raw.depth_max;
    section.contours_up_to_date = raw.contours_up_to_date.unwrap_or(false);

    for s in raw.snavs {
        let offset = if negate_offsets {
            s.offset.negated()
        } else {
            s.offset
        };
        section
            .snavs
            .push(Snav::new(s.ping_id, s.distance, s.time_d, s.lon, s.lat).with_offset(offset));
    }

    if let Some(tie) = raw.global_tie {
        section.global_tie = build_global_tie(tie, &section)?;
    }
    Ok(section)
}

fn build_global_tie(raw: RawGlobalTie, section: &Section) -> Result<Option<GlobalTie>, ParseError> {
    let status = raw.status.unwrap_or(if raw.snav >= 0 {
        TieStatus::Xyz
    } else {
        TieStatus::None
    });
    if status == TieStatus::None {
        return Ok(None);
    }
    if raw.snav < 0 || raw.snav as usize >= section.num_snavs() {
        return Err(raw.source.error(format!(
            "global tie references fix {} of a section with {} fixes",
            raw.snav,
            section.num_snavs()
        )));
    }
    Ok(Some(GlobalTie::new(
        status,
        SnavIndex(raw.snav as usize),
        raw.offset,
        raw.sigmas,
        section.local_scale(),
    )))
}

/// Assigns block ids from continuity breaks, returning the block count.
fn assign_blocks(files: &mut [SurveyFile]) -> usize {
    let mut num_blocks = 0;
    for (i, file) in files.iter_mut().enumerate() {
        if i == 0 || !file.continues_previous() {
            num_blocks += 1;
        }
        file.block = num_blocks - 1;
        file.block_offset = Default::default();
    }
    num_blocks
}

fn build_crossing(project: &Project, raw: RawCrossing) -> Result<(Crossing, bool), ParseError> {
    let first = project
        .section(raw.first)
        .ok_or_else(|| raw.source.error(format!("crossing references unknown section {}", raw.first)))?;
    let second = project
        .section(raw.second)
        .ok_or_else(|| raw.source.error(format!("crossing references unknown section {}", raw.second)))?;
    if raw.first == raw.second {
        return Err(raw.source.error("crossing joins a section to itself"));
    }

    let mut ties = Vec::with_capacity(raw.ties.len());
    for raw_tie in raw.ties {
        ties.push(build_tie(raw_tie, (raw.first, first), (raw.second, second))?);
    }

    let mut crossing = Crossing::from_stored(raw.first, raw.second, ties);
    crossing.status = raw.status;
    crossing.truecrossing = raw.truecrossing.unwrap_or(false);
    crossing.overlap = raw.overlap.map(|o| o.clamp(0, 100) as u8).unwrap_or(0);
    let swapped = crossing.canonicalize();

    // Times and meters follow the sections, whatever the stored values were
    let first = project.section(crossing.first()).unwrap_or(first);
    let second = project.section(crossing.second()).unwrap_or(second);
    let scale = project.crossing_scale(first, second);
    for tie in &mut crossing.ties {
        if let Some(fix) = first.snav(tie.snav_1) {
            tie.snav_1_time_d = fix.time_d;
        }
        if let Some(fix) = second.snav(tie.snav_2) {
            tie.snav_2_time_d = fix.time_d;
        }
        tie.offset.rescale(scale);
        tie.inversion_offset.rescale(scale);
    }
    Ok((crossing, swapped))
}

fn build_tie(
    raw: RawTie,
    (first_ref, first): (SectionRef, &Section),
    (second_ref, second): (SectionRef, &Section),
) -> Result<Tie, ParseError> {
    let snav_1 = repair_snav_index(&raw, raw.snav_1, first_ref, first)?;
    let snav_2 = repair_snav_index(&raw, raw.snav_2, second_ref, second)?;

    let mut inversion_status = raw.inversion_status;
    let mut inversion_offset = TieOffset {
        x: raw.inversion_offset.lon,
        y: raw.inversion_offset.lat,
        x_m: 0.0,
        y_m: 0.0,
        z_m: raw.inversion_offset.z,
    };
    if inversion_offset.is_outrageous() {
        warn!(
            line = raw.source.number,
            x = inversion_offset.x,
            y = inversion_offset.y,
            z = inversion_offset.z_m,
            "Discarding implausible tie inversion offset"
        );
        inversion_offset = TieOffset::default();
        inversion_status = crate::model::InversionStatus::Old;
    }

    Ok(Tie {
        status: raw.status.unwrap_or(TieStatus::Xyz),
        snav_1,
        snav_1_time_d: raw.snav_1_time_d,
        snav_2,
        snav_2_time_d: raw.snav_2_time_d,
        offset: TieOffset {
            x: raw.offset.lon,
            y: raw.offset.lat,
            x_m: 0.0,
            y_m: 0.0,
            z_m: raw.offset.z,
        },
        sigma: raw.sigma.map(|s| s.floored()).unwrap_or_default(),
        inversion_status,
        inversion_offset,
    })
}

/// Maps a stored fix index into range.
///
/// Very old projects stored ping numbers rather than fix indices; those are
/// scaled onto the fix grid.
fn repair_snav_index(
    raw: &RawTie,
    stored: usize,
    section_ref: SectionRef,
    section: &Section,
) -> Result<SnavIndex, ParseError> {
    let count = section.num_snavs();
    if stored < count {
        return Ok(SnavIndex(stored));
    }
    if count == 0 {
        return Err(raw
            .source
            .error(format!("tie references section {} which has no fixes", section_ref)));
    }
    let scaled = if section.num_pings > 0 {
        (stored as f64 / section.num_pings as f64 * (MAX_SNAVS - 1) as f64) as usize
    } else {
        count - 1
    };
    let repaired = scaled.min(count - 1);
    warn!(
        line = raw.source.number,
        section = %section_ref,
        stored,
        repaired,
        "Remapped out-of-range tie fix index"
    );
    Ok(SnavIndex(repaired))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assign_blocks_from_continuity() {
        let continuous = Section::new(Default::default()).with_continuity(true);
        let broken = Section::new(Default::default()).with_continuity(false);
        let mut files = vec![
            SurveyFile::new("a", 88).with_section(continuous.clone()),
            SurveyFile::new("b", 88).with_section(continuous.clone()),
            SurveyFile::new("c", 88).with_section(broken),
            SurveyFile::new("d", 88).with_section(continuous),
            SurveyFile::new("e", 88),
        ];
        let blocks = assign_blocks(&mut files);
        let ids: Vec<_> = files.iter().map(|f| f.block).collect();
        assert_eq!(blocks, 3);
        assert_eq!(ids, vec![0, 0, 1, 1, 2]);
    }
}
