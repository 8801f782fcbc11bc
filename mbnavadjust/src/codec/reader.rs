//! Structural parse of a project file into raw records.

use tracing::debug;

use super::layout::{
    HeaderSlot, COV_LAYOUT, CROSSING_LAYOUT, FILE_LAYOUT, GLOBALTIE_LAYOUT, HEADER_LAYOUT,
    SECTION_LAYOUT, SNAV_LAYOUT, TIE_LAYOUT, shapes_for,
};
use super::lines::{Line, LineCursor};
use super::raw::{decode_cov, RawCrossing, RawFile, RawGlobalTie, RawHeader, RawSection, RawSnav, RawTie};
use super::{FormatVersion, PROJECT_MAGIC};
use crate::error::{ParseError, ProjectError, ProjectResult};
use crate::mask::MASK_DIM;
use crate::model::{GridStatus, InversionStatus, MAX_SNAVS, MAX_TIES};

/// Every record of a project file, as stored.
#[derive(Debug, Clone)]
pub(crate) struct RawProject {
    pub header: RawHeader,
    pub files: Vec<RawFile>,
    pub crossings: Vec<RawCrossing>,
}

pub(crate) fn parse_raw(text: &str) -> ProjectResult<RawProject> {
    let mut cursor = LineCursor::new(text);
    let header = read_header(&mut cursor)?;

    let mut files = Vec::new();
    files
        .try_reserve(header.num_files)
        .map_err(|_| ProjectError::memory("files", header.num_files))?;
    for _ in 0..header.num_files {
        files.push(read_file(&mut cursor)?);
    }

    let mut crossings = Vec::new();
    crossings
        .try_reserve(header.num_crossings)
        .map_err(|_| ProjectError::memory("crossings", header.num_crossings))?;
    for _ in 0..header.num_crossings {
        crossings.push(read_crossing(&mut cursor)?);
    }

    if let Some(extra) = cursor.next_non_blank() {
        return Err(extra.error("unexpected content after the last crossing").into());
    }

    debug!(
        version = %header.version,
        files = files.len(),
        crossings = crossings.len(),
        "Parsed project records"
    );
    Ok(RawProject {
        header,
        files,
        crossings,
    })
}

fn read_header(cursor: &mut LineCursor<'_>) -> Result<RawHeader, ParseError> {
    let first = cursor.next_line("project header")?;
    if first.text.trim_end() != PROJECT_MAGIC {
        return Err(first.error("not an mbnavadjust project file"));
    }

    let mb_system_version = cursor.next_line("MB-SYSTEM_VERSION")?;
    let mb_system_version = mb_system_version.header_value("MB-SYSTEM_VERSION")?.to_string();
    let program_version = cursor.next_line("PROGRAM_VERSION")?;
    let program_version = program_version.header_value("PROGRAM_VERSION")?.to_string();

    let version_line = cursor.next_line("FILE_VERSION")?;
    let version_text = version_line.header_value("FILE_VERSION")?;
    let version = FormatVersion::parse(version_text)
        .ok_or_else(|| version_line.error(format!("invalid format version `{}`", version_text)))?;
    if version > FormatVersion::CURRENT {
        return Err(version_line.error(format!(
            "format {} is newer than the supported {}",
            version,
            FormatVersion::CURRENT
        )));
    }
    cursor.version = Some(version);

    let mut header = RawHeader::new(version);
    header.mb_system_version = mb_system_version;
    header.program_version = program_version;
    header.file_version = version_text.to_string();

    for entry in HEADER_LAYOUT.iter().filter(|e| e.applies_to(version)) {
        let line = cursor.next_line(entry.key)?;
        let value = line.header_value(entry.key)?;
        apply_header(&mut header, entry.slot, &line, value)?;
    }
    Ok(header)
}

fn apply_header(
    header: &mut RawHeader,
    slot: HeaderSlot,
    line: &Line<'_>,
    value: &str,
) -> Result<(), ParseError> {
    match slot {
        HeaderSlot::Origin => header.origin = Some(value.to_string()),
        HeaderSlot::Name => header.name = value.to_string(),
        HeaderSlot::Path => header.path = value.to_string(),
        HeaderSlot::Home => header.home = value.to_string(),
        HeaderSlot::DataDir => header.datadir = value.to_string(),
        HeaderSlot::NumFiles => header.num_files = line.number("file count", value)?,
        HeaderSlot::NumBlocks => header.num_blocks = Some(line.number("block count", value)?),
        HeaderSlot::NumCrossings => header.num_crossings = line.number("crossing count", value)?,
        HeaderSlot::SectionLength => header.section_length = line.number("section length", value)?,
        HeaderSlot::SectionSoundings => {
            header.section_soundings = Some(line.number("section soundings", value)?)
        }
        HeaderSlot::Decimation => header.decimation = line.number("decimation", value)?,
        HeaderSlot::ContourInterval => header.contour_interval = line.number("contour interval", value)?,
        HeaderSlot::ColorInterval => header.color_interval = line.number("color interval", value)?,
        HeaderSlot::TickInterval => header.tick_interval = line.number("tick interval", value)?,
        HeaderSlot::Inversion => {
            let code = line.number::<i32>("inversion status", value)?;
            header.inversion = InversionStatus::from_code(code)
                .ok_or_else(|| line.error(format!("unknown inversion status {}", code)))?;
        }
        HeaderSlot::GridStatus => {
            let code = line.number::<i32>("grid status", value)?;
            header.grid_status = Some(
                GridStatus::from_code(code)
                    .ok_or_else(|| line.error(format!("unknown grid status {}", code)))?,
            );
        }
        HeaderSlot::Smoothing => header.smoothing = Some(line.number("smoothing", value)?),
        HeaderSlot::Precision => header.precision = Some(line.number("precision", value)?),
        HeaderSlot::ZOffsetWidth => header.zoffset_width = Some(line.number("z offset width", value)?),
    }
    Ok(())
}

fn read_file(cursor: &mut LineCursor<'_>) -> ProjectResult<RawFile> {
    let line = cursor.next_line("FILE record")?;
    let fields = line.record("FILE", FILE_LAYOUT)?;
    let mut file = RawFile::decode(&line, &fields)?;

    file.sections
        .try_reserve(file.num_sections)
        .map_err(|_| ProjectError::memory("sections", file.num_sections))?;
    for _ in 0..file.num_sections {
        file.sections.push(read_section(cursor)?);
    }
    Ok(file)
}

fn read_section(cursor: &mut LineCursor<'_>) -> Result<RawSection, ParseError> {
    let line = cursor.next_line("SECTION record")?;
    let fields = line.record("SECTION", SECTION_LAYOUT)?;
    let mut section = RawSection::decode(&line, &fields)?;
    if section.num_snav > MAX_SNAVS {
        return Err(line.error(format!(
            "section has {} fixes, the maximum is {}",
            section.num_snav, MAX_SNAVS
        )));
    }

    for k in (0..MASK_DIM).rev() {
        let mask_line = cursor.next_line("coverage mask row")?;
        section
            .coverage
            .decode_row(k, mask_line.text)
            .map_err(|e| mask_line.error(e.to_string()))?;
    }

    for _ in 0..section.num_snav {
        let line = cursor.next_line("SNAV record")?;
        let fields = line.record("SNAV", SNAV_LAYOUT)?;
        section.snavs.push(RawSnav::decode(&line, &fields)?);
    }

    if let Some(version) = cursor.version {
        if !shapes_for(GLOBALTIE_LAYOUT, version).is_empty() {
            let line = cursor.next_line("GLOBALTIE record")?;
            let fields = line.record("GLOBALTIE", GLOBALTIE_LAYOUT)?;
            section.global_tie = Some(RawGlobalTie::decode(&line, &fields)?);
        }
    }
    Ok(section)
}

fn read_crossing(cursor: &mut LineCursor<'_>) -> Result<RawCrossing, ParseError> {
    let line = cursor.next_line("CROSSING record")?;
    let fields = line.record("CROSSING", CROSSING_LAYOUT)?;
    let mut crossing = RawCrossing::decode(&line, &fields)?;
    if crossing.num_ties > MAX_TIES {
        return Err(line.error(format!(
            "crossing has {} ties, the maximum is {}",
            crossing.num_ties, MAX_TIES
        )));
    }
    if let Some(overlap) = crossing.overlap {
        if overlap > 100 {
            return Err(line.error(format!("overlap {} exceeds 100", overlap)));
        }
    }

    let has_cov = cursor
        .version
        .map(|v| !shapes_for(COV_LAYOUT, v).is_empty())
        .unwrap_or(false);
    for _ in 0..crossing.num_ties {
        let line = cursor.next_line("TIE record")?;
        let fields = line.record("TIE", TIE_LAYOUT)?;
        let mut tie = RawTie::decode(&line, &fields)?;
        if has_cov {
            let line = cursor.next_line("COV record")?;
            let fields = line.record("COV", COV_LAYOUT)?;
            tie.sigma = Some(decode_cov(&line, &fields)?);
        }
        crossing.ties.push(tie);
    }
    Ok(crossing)
}
