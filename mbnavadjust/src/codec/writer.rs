//! Canonical project writer.
//!
//! Always emits the current format. Field widths and precisions are fixed
//! so that older tools can still read the output with their scanners.

use std::fmt::Write as _;

use chrono::Local;

use super::FormatVersion;
use super::PROJECT_MAGIC;
use crate::mask::MASK_DIM;
use crate::model::{Project, Section, SurveyFile, TieStatus};

/// MB-System release recorded in headers of projects without one.
pub const MB_SYSTEM_VERSION: &str = "5.7.5";

/// Program identifier recorded in every written header.
pub const PROGRAM_VERSION: &str = concat!("mbnavadjust-rs ", env!("CARGO_PKG_VERSION"));

/// Who wrote a project file and when, for the `ORIGIN` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provenance {
    pub user: String,
    pub host: String,
    pub timestamp: String,
}

impl Provenance {
    /// Provenance of the running process at the current local time.
    pub fn current() -> Self {
        let user = std::env::var("USER")
            .or_else(|_| std::env::var("LOGNAME"))
            .unwrap_or_else(|_| "unknown".to_string());
        let host = std::env::var("HOSTNAME").unwrap_or_else(|_| "unknown".to_string());
        Self {
            user,
            host,
            timestamp: Local::now().format("%a %b %e %H:%M:%S %Y").to_string(),
        }
    }

    fn origin(&self) -> String {
        format!(
            "Generated by user <{}> on cpu <{}> at <{}>",
            self.user, self.host, self.timestamp
        )
    }
}

/// Renders a project in the current format.
pub fn serialize_project(project: &Project, provenance: &Provenance) -> String {
    let mut out = String::with_capacity(estimate_size(project));
    // Writing into a String cannot fail
    let _ = write_header(&mut out, project, provenance);
    for (i, file) in project.files().iter().enumerate() {
        let _ = write_file(&mut out, i, file);
    }
    for (i, crossing) in project.crossings().iter().enumerate() {
        let first = crossing.first();
        let second = crossing.second();
        let _ = writeln!(
            out,
            "CROSSING {:5} {} {} {:3} {:5} {:3} {:5} {:3} {:2}",
            i,
            crossing.status.code(),
            crossing.truecrossing as i32,
            crossing.overlap,
            first.file.0,
            first.section.0,
            second.file.0,
            second.section.0,
            crossing.num_ties()
        );
        for (j, tie) in crossing.ties().iter().enumerate() {
            let _ = writeln!(
                out,
                "TIE {:5} {} {:5} {:16.6} {:5} {:16.6} {:13.8} {:13.8} {:13.8} {} {:13.8} {:13.8} {:13.8}",
                j,
                tie.status.code(),
                tie.snav_1.0,
                tie.snav_1_time_d,
                tie.snav_2.0,
                tie.snav_2_time_d,
                tie.offset.x,
                tie.offset.y,
                tie.offset.z_m,
                tie.inversion_status.code(),
                tie.inversion_offset.x,
                tie.inversion_offset.y,
                tie.inversion_offset.z_m
            );
            out.push_str("COV");
            for axis in &tie.sigma.axes {
                let _ = write!(
                    out,
                    " {:13.8} {:13.8} {:13.8} {:13.8}",
                    axis.sigma, axis.direction[0], axis.direction[1], axis.direction[2]
                );
            }
            out.push('\n');
        }
    }
    out
}

fn estimate_size(project: &Project) -> usize {
    let summary = project.summary();
    1024 + summary.num_files * 128
        + summary.num_sections * (160 + MASK_DIM * (MASK_DIM + 1))
        + summary.num_snavs * 112
        + summary.num_crossings * 48
        + summary.num_ties * 360
}

fn write_header(out: &mut String, project: &Project, provenance: &Provenance) -> std::fmt::Result {
    let params = &project.params;
    let mb_system_version = if project.source.mb_system_version.is_empty() {
        MB_SYSTEM_VERSION
    } else {
        project.source.mb_system_version.as_str()
    };
    writeln!(out, "{}", PROJECT_MAGIC)?;
    writeln!(out, "MB-SYSTEM_VERSION\t{}", mb_system_version)?;
    writeln!(out, "PROGRAM_VERSION\t{}", PROGRAM_VERSION)?;
    writeln!(out, "FILE_VERSION\t{}", FormatVersion::CURRENT)?;
    writeln!(out, "ORIGIN\t{}", provenance.origin())?;
    writeln!(out, "NAME\t{}", project.paths.name)?;
    writeln!(out, "PATH\t{}", project.paths.directory_with_separator())?;
    writeln!(out, "HOME\t{}", project.paths.home.display())?;
    writeln!(out, "DATADIR\t{}", project.paths.datadir.display())?;
    writeln!(out, "NUMFILES\t{}", project.files().len())?;
    writeln!(out, "NUMBLOCKS\t{}", project.num_blocks())?;
    writeln!(out, "NUMCROSSINGS\t{}", project.crossings().len())?;
    writeln!(out, "SECTIONLENGTH\t{:.6}", params.section_length)?;
    writeln!(out, "SECTIONSOUNDINGS\t{}", params.section_soundings)?;
    writeln!(out, "DECIMATION\t{}", params.decimation)?;
    writeln!(out, "CONTOURINTERVAL\t{:.6}", params.contour_interval)?;
    writeln!(out, "COLORINTERVAL\t{:.6}", params.color_interval)?;
    writeln!(out, "TICKINTERVAL\t{:.6}", params.tick_interval)?;
    writeln!(out, "INVERSION\t{}", project.inversion_status.code())?;
    writeln!(out, "GRIDSTATUS\t{}", project.grid_status.code())?;
    writeln!(out, "SMOOTHING\t{:.6}", params.smoothing)?;
    writeln!(out, "ZOFFSETWIDTH\t{:.6}", params.zoffset_width)?;
    Ok(())
}

fn write_file(out: &mut String, index: usize, file: &SurveyFile) -> std::fmt::Result {
    writeln!(
        out,
        "FILE {:4} {:4} {:4} {:4} {:4} {:13.8} {:13.8} {:13.8} {:4.1} {:4.1} {:4.1} {:4.1} {:4} {:4} {}",
        index,
        file.status.code(),
        index,
        file.format,
        file.block,
        file.block_offset.x,
        file.block_offset.y,
        file.block_offset.z,
        file.heading_bias_import,
        file.roll_bias_import,
        file.heading_bias,
        file.roll_bias,
        file.num_sections(),
        file.output_id,
        file.path
    )?;
    for (j, section) in file.sections.iter().enumerate() {
        write_section(out, j, section)?;
    }
    Ok(())
}

fn write_section(out: &mut String, index: usize, section: &Section) -> std::fmt::Result {
    let b = &section.bounds;
    writeln!(
        out,
        "SECTION {:4} {:5} {:5} {} {} {:10.6} {:16.6} {:16.6} {:13.8} {:13.8} {:13.8} {:13.8} {:9.3} {:9.3} {}",
        index,
        section.num_pings,
        section.num_beams,
        section.num_snavs(),
        section.continuity as i32,
        section.distance,
        section.btime_d,
        section.etime_d,
        b.lon_min,
        b.lon_max,
        b.lat_min,
        b.lat_max,
        section.depth_min,
        section.depth_max,
        section.contours_up_to_date as i32
    )?;

    for row in section.coverage.to_rows() {
        writeln!(out, "{}", row)?;
    }

    for (k, fix) in section.snavs.iter().enumerate() {
        writeln!(
            out,
            "SNAV {:4} {:5} {:10.6} {:16.6} {:13.8} {:13.8} {:13.8} {:13.8} {:13.8}",
            k,
            fix.ping_id,
            fix.distance,
            fix.time_d,
            fix.lon,
            fix.lat,
            fix.offset.lon,
            fix.offset.lat,
            fix.offset.z
        )?;
    }

    match &section.global_tie {
        Some(tie) => writeln!(
            out,
            "GLOBALTIE {:2} {:4} {:13.8} {:13.8} {:13.8} {:13.8} {:13.8} {:13.8}",
            tie.status.code(),
            tie.snav.0,
            tie.offset_x,
            tie.offset_y,
            tie.offset_z_m,
            tie.sigma_x,
            tie.sigma_y,
            tie.sigma_z
        ),
        None => writeln!(
            out,
            "GLOBALTIE {:2} {:4} {:13.8} {:13.8} {:13.8} {:13.8} {:13.8} {:13.8}",
            TieStatus::None.code(),
            -1,
            0.0,
            0.0,
            0.0,
            0.0,
            0.0,
            0.0
        ),
    }
}
