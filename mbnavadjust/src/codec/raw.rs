//! Records as stored, before normalization.
//!
//! Fields a version does not carry are `None`; normalization decides their
//! values in one place.

use super::layout::{
    CovField, CrossingField, FileField, GlobalTieField, SectionField, SnavField, TieField,
};
use super::lines::Line;
use super::FormatVersion;
use crate::coord::GeoBounds;
use crate::error::ParseError;
use crate::mask::CoverageMask;
use crate::model::{
    BlockOffset, CrossingStatus, ErrorEllipsoid, FileStatus, GridStatus, InversionStatus,
    NavOffset, SectionRef, SigmaAxis, TieStatus,
};

/// Position of a record in the source, for errors raised after parsing.
#[derive(Debug, Clone)]
pub(crate) struct SourceLine {
    pub number: usize,
    pub content: String,
    pub version: Option<FormatVersion>,
}

impl SourceLine {
    pub fn of(line: &Line<'_>) -> Self {
        Self {
            number: line.number,
            content: line.text.to_string(),
            version: line.version,
        }
    }

    pub fn error(&self, reason: impl Into<String>) -> ParseError {
        ParseError {
            version: self.version,
            line: self.number,
            content: self.content.clone(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct RawHeader {
    pub version: FormatVersion,
    pub mb_system_version: String,
    pub program_version: String,
    pub file_version: String,
    pub origin: Option<String>,
    pub name: String,
    pub path: String,
    pub home: String,
    pub datadir: String,
    pub num_files: usize,
    pub num_blocks: Option<usize>,
    pub num_crossings: usize,
    pub section_length: f64,
    pub section_soundings: Option<i32>,
    pub decimation: i32,
    pub contour_interval: f64,
    pub color_interval: f64,
    pub tick_interval: f64,
    pub inversion: InversionStatus,
    pub grid_status: Option<GridStatus>,
    pub smoothing: Option<f64>,
    pub precision: Option<f64>,
    pub zoffset_width: Option<f64>,
}

impl RawHeader {
    pub fn new(version: FormatVersion) -> Self {
        Self {
            version,
            mb_system_version: String::new(),
            program_version: String::new(),
            file_version: version.to_string(),
            origin: None,
            name: String::new(),
            path: String::new(),
            home: String::new(),
            datadir: String::new(),
            num_files: 0,
            num_blocks: None,
            num_crossings: 0,
            section_length: 0.0,
            section_soundings: None,
            decimation: 1,
            contour_interval: 0.0,
            color_interval: 0.0,
            tick_interval: 0.0,
            inversion: InversionStatus::None,
            grid_status: None,
            smoothing: None,
            precision: None,
            zoffset_width: None,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct RawFile {
    pub status: FileStatus,
    pub format: i32,
    pub block: Option<usize>,
    pub block_offset: Option<BlockOffset>,
    pub heading_bias_import: f64,
    pub roll_bias_import: f64,
    pub heading_bias: f64,
    pub roll_bias: f64,
    pub num_sections: usize,
    pub output_id: i32,
    pub path: String,
    pub sections: Vec<RawSection>,
}

impl RawFile {
    pub fn decode(line: &Line<'_>, fields: &[(FileField, &str)]) -> Result<Self, ParseError> {
        let mut file = RawFile {
            status: FileStatus::default(),
            format: 0,
            block: None,
            block_offset: None,
            heading_bias_import: 0.0,
            roll_bias_import: 0.0,
            heading_bias: 0.0,
            roll_bias: 0.0,
            num_sections: 0,
            output_id: 0,
            path: String::new(),
            sections: Vec::new(),
        };
        let mut offset = BlockOffset::default();
        let mut has_offset = false;

        for &(field, text) in fields {
            match field {
                FileField::Index | FileField::Id => {
                    line.number::<i64>("file index", text)?;
                }
                FileField::Status => {
                    let code = line.number::<i32>("file status", text)?;
                    file.status = FileStatus::from_code(code)
                        .ok_or_else(|| line.error(format!("unknown file status {}", code)))?;
                }
                FileField::Format => file.format = line.number("format", text)?,
                FileField::Block => file.block = Some(line.number("block", text)?),
                FileField::BlockOffsetX => {
                    offset.x = line.number("block offset x", text)?;
                    has_offset = true;
                }
                FileField::BlockOffsetY => offset.y = line.number("block offset y", text)?,
                FileField::BlockOffsetZ => offset.z = line.number("block offset z", text)?,
                FileField::HeadingBiasImport => {
                    file.heading_bias_import = line.number("heading bias", text)?
                }
                FileField::RollBiasImport => file.roll_bias_import = line.number("roll bias", text)?,
                FileField::HeadingBias => file.heading_bias = line.number("heading bias", text)?,
                FileField::RollBias => file.roll_bias = line.number("roll bias", text)?,
                FileField::NumSections => file.num_sections = line.number("section count", text)?,
                FileField::OutputId => file.output_id = line.number("output id", text)?,
                FileField::Path => file.path = text.to_string(),
            }
        }
        if has_offset {
            file.block_offset = Some(offset);
        }
        Ok(file)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct RawSection {
    pub num_pings: i32,
    pub num_beams: i32,
    pub num_snav: usize,
    pub continuity: bool,
    pub distance: f64,
    pub btime_d: f64,
    pub etime_d: f64,
    pub bounds: GeoBounds,
    pub depth_min: f64,
    pub depth_max: f64,
    pub contours_up_to_date: Option<bool>,
    pub coverage: CoverageMask,
    pub snavs: Vec<RawSnav>,
    pub global_tie: Option<RawGlobalTie>,
}

impl RawSection {
    pub fn decode(line: &Line<'_>, fields: &[(SectionField, &str)]) -> Result<Self, ParseError> {
        let mut s = RawSection {
            num_pings: 0,
            num_beams: 0,
            num_snav: 0,
            continuity: false,
            distance: 0.0,
            btime_d: 0.0,
            etime_d: 0.0,
            bounds: GeoBounds::default(),
            depth_min: 0.0,
            depth_max: 0.0,
            contours_up_to_date: None,
            coverage: CoverageMask::empty(),
            snavs: Vec::new(),
            global_tie: None,
        };
        for &(field, text) in fields {
            match field {
                SectionField::Index => {
                    line.number::<i64>("section index", text)?;
                }
                SectionField::NumPings => s.num_pings = line.number("ping count", text)?,
                SectionField::NumBeams => s.num_beams = line.number("beam count", text)?,
                SectionField::NumSnav => s.num_snav = line.number("snav count", text)?,
                SectionField::Continuity => s.continuity = line.flag("continuity", text)?,
                SectionField::Distance => s.distance = line.number("distance", text)?,
                SectionField::BeginTime => s.btime_d = line.number("begin time", text)?,
                SectionField::EndTime => s.etime_d = line.number("end time", text)?,
                SectionField::LonMin => s.bounds.lon_min = line.number("lonmin", text)?,
                SectionField::LonMax => s.bounds.lon_max = line.number("lonmax", text)?,
                SectionField::LatMin => s.bounds.lat_min = line.number("latmin", text)?,
                SectionField::LatMax => s.bounds.lat_max = line.number("latmax", text)?,
                SectionField::DepthMin => s.depth_min = line.number("depthmin", text)?,
                SectionField::DepthMax => s.depth_max = line.number("depthmax", text)?,
                SectionField::ContoursUpToDate => {
                    s.contours_up_to_date = Some(line.flag("contour flag", text)?)
                }
            }
        }
        Ok(s)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct RawSnav {
    pub ping_id: i32,
    pub distance: f64,
    pub time_d: f64,
    pub lon: f64,
    pub lat: f64,
    pub offset: NavOffset,
}

impl RawSnav {
    pub fn decode(line: &Line<'_>, fields: &[(SnavField, &str)]) -> Result<Self, ParseError> {
        let mut s = RawSnav {
            ping_id: 0,
            distance: 0.0,
            time_d: 0.0,
            lon: 0.0,
            lat: 0.0,
            offset: NavOffset::ZERO,
        };
        for &(field, text) in fields {
            match field {
                SnavField::Index => {
                    line.number::<i64>("snav index", text)?;
                }
                SnavField::PingId => s.ping_id = line.number("ping id", text)?,
                SnavField::Distance => s.distance = line.number("distance", text)?,
                SnavField::Time => s.time_d = line.number("time", text)?,
                SnavField::Lon => s.lon = line.number("lon", text)?,
                SnavField::Lat => s.lat = line.number("lat", text)?,
                SnavField::LonOffset => s.offset.lon = line.number("lon offset", text)?,
                SnavField::LatOffset => s.offset.lat = line.number("lat offset", text)?,
                SnavField::ZOffset => s.offset.z = line.number("z offset", text)?,
            }
        }
        Ok(s)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct RawGlobalTie {
    pub source: SourceLine,
    pub status: Option<TieStatus>,
    pub snav: i64,
    pub offset: NavOffset,
    pub sigmas: [f64; 3],
}

impl RawGlobalTie {
    pub fn decode(line: &Line<'_>, fields: &[(GlobalTieField, &str)]) -> Result<Self, ParseError> {
        let mut g = RawGlobalTie {
            source: SourceLine::of(line),
            status: None,
            snav: -1,
            offset: NavOffset::ZERO,
            sigmas: [0.0; 3],
        };
        for &(field, text) in fields {
            match field {
                GlobalTieField::Status => {
                    let code = line.number::<i32>("global tie status", text)?;
                    g.status = Some(
                        TieStatus::from_code(code)
                            .ok_or_else(|| line.error(format!("unknown tie status {}", code)))?,
                    );
                }
                GlobalTieField::Snav => g.snav = line.number("global tie snav", text)?,
                GlobalTieField::OffsetX => g.offset.lon = line.number("offset x", text)?,
                GlobalTieField::OffsetY => g.offset.lat = line.number("offset y", text)?,
                GlobalTieField::OffsetZ => g.offset.z = line.number("offset z", text)?,
                GlobalTieField::SigmaX => g.sigmas[0] = line.number("sigma x", text)?,
                GlobalTieField::SigmaY => g.sigmas[1] = line.number("sigma y", text)?,
                GlobalTieField::SigmaZ => g.sigmas[2] = line.number("sigma z", text)?,
            }
        }
        Ok(g)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct RawCrossing {
    pub source: SourceLine,
    pub status: CrossingStatus,
    pub truecrossing: Option<bool>,
    pub overlap: Option<i32>,
    pub first: SectionRef,
    pub second: SectionRef,
    pub num_ties: usize,
    pub ties: Vec<RawTie>,
}

impl RawCrossing {
    pub fn decode(line: &Line<'_>, fields: &[(CrossingField, &str)]) -> Result<Self, ParseError> {
        let mut c = RawCrossing {
            source: SourceLine::of(line),
            status: CrossingStatus::None,
            truecrossing: None,
            overlap: None,
            first: SectionRef::new(0, 0),
            second: SectionRef::new(0, 0),
            num_ties: 0,
            ties: Vec::new(),
        };
        for &(field, text) in fields {
            match field {
                CrossingField::Index => {
                    line.number::<i64>("crossing index", text)?;
                }
                CrossingField::Status => {
                    let code = line.number::<i32>("crossing status", text)?;
                    c.status = CrossingStatus::from_code(code)
                        .ok_or_else(|| line.error(format!("unknown crossing status {}", code)))?;
                }
                CrossingField::TrueCrossing => c.truecrossing = Some(line.flag("truecrossing", text)?),
                CrossingField::Overlap => c.overlap = Some(line.number("overlap", text)?),
                CrossingField::File1 => c.first.file.0 = line.number("file id", text)?,
                CrossingField::Section1 => c.first.section.0 = line.number("section id", text)?,
                CrossingField::File2 => c.second.file.0 = line.number("file id", text)?,
                CrossingField::Section2 => c.second.section.0 = line.number("section id", text)?,
                CrossingField::NumTies => c.num_ties = line.number("tie count", text)?,
            }
        }
        Ok(c)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct RawTie {
    pub source: SourceLine,
    pub status: Option<TieStatus>,
    pub snav_1: usize,
    pub snav_1_time_d: f64,
    pub snav_2: usize,
    pub snav_2_time_d: f64,
    pub offset: NavOffset,
    pub inversion_status: InversionStatus,
    pub inversion_offset: NavOffset,
    pub sigma: Option<ErrorEllipsoid>,
}

impl RawTie {
    pub fn decode(line: &Line<'_>, fields: &[(TieField, &str)]) -> Result<Self, ParseError> {
        let mut t = RawTie {
            source: SourceLine::of(line),
            status: None,
            snav_1: 0,
            snav_1_time_d: 0.0,
            snav_2: 0,
            snav_2_time_d: 0.0,
            offset: NavOffset::ZERO,
            inversion_status: InversionStatus::None,
            inversion_offset: NavOffset::ZERO,
            sigma: None,
        };
        for &(field, text) in fields {
            match field {
                TieField::Index => {
                    line.number::<i64>("tie index", text)?;
                }
                TieField::Status => {
                    let code = line.number::<i32>("tie status", text)?;
                    t.status = Some(
                        TieStatus::from_code(code)
                            .ok_or_else(|| line.error(format!("unknown tie status {}", code)))?,
                    );
                }
                TieField::Snav1 => t.snav_1 = line.number("snav", text)?,
                TieField::Time1 => t.snav_1_time_d = line.number("snav time", text)?,
                TieField::Snav2 => t.snav_2 = line.number("snav", text)?,
                TieField::Time2 => t.snav_2_time_d = line.number("snav time", text)?,
                TieField::OffsetX => t.offset.lon = line.number("offset x", text)?,
                TieField::OffsetY => t.offset.lat = line.number("offset y", text)?,
                TieField::OffsetZ => t.offset.z = line.number("offset z", text)?,
                TieField::InversionStatus => {
                    let code = line.number::<i32>("inversion status", text)?;
                    t.inversion_status = InversionStatus::from_code(code)
                        .ok_or_else(|| line.error(format!("unknown inversion status {}", code)))?;
                }
                TieField::InversionX => t.inversion_offset.lon = line.number("inversion x", text)?,
                TieField::InversionY => t.inversion_offset.lat = line.number("inversion y", text)?,
                TieField::InversionZ => t.inversion_offset.z = line.number("inversion z", text)?,
            }
        }
        Ok(t)
    }
}

/// Decodes a COV record into an error ellipsoid.
pub(crate) fn decode_cov(line: &Line<'_>, fields: &[(CovField, &str)]) -> Result<ErrorEllipsoid, ParseError> {
    let axis = SigmaAxis {
        sigma: 0.0,
        direction: [0.0; 3],
    };
    let mut ellipsoid = ErrorEllipsoid { axes: [axis; 3] };
    for &(field, text) in fields {
        match field {
            CovField::Sigma(a) => ellipsoid.axes[a].sigma = line.number("sigma", text)?,
            CovField::Direction(a, c) => {
                ellipsoid.axes[a].direction[c] = line.number("sigma direction", text)?
            }
        }
    }
    Ok(ellipsoid)
}
