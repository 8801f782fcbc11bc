//! Version-gated record layouts.
//!
//! Each record kind has one table ordered by the first format version that
//! introduced a layout. The layout in effect for a file is the last entry
//! whose `since` does not exceed the file's version. A layout lists the
//! accepted field sequences; a line matches the first sequence whose
//! length equals its token count. A sequence ending in a text field
//! matches any line with at least that many tokens, and the text field
//! takes the rest of the line.

use super::FormatVersion;

/// A field of a record layout.
pub(crate) trait RecordField: Copy + std::fmt::Debug + 'static {
    /// True if the field consumes the remainder of the line.
    fn is_text(self) -> bool {
        false
    }
}

/// Accepted field sequences from a version onwards.
pub(crate) struct RecordLayout<F: 'static> {
    pub since: u32,
    pub shapes: &'static [&'static [F]],
}

/// Returns the field sequences in effect for `version`.
///
/// An empty result means the record kind does not exist in that version.
pub(crate) fn shapes_for<F>(
    table: &'static [RecordLayout<F>],
    version: FormatVersion,
) -> &'static [&'static [F]] {
    table
        .iter()
        .rev()
        .find(|layout| version.at_least(layout.since))
        .map(|layout| layout.shapes)
        .unwrap_or(&[])
}

// =============================================================================
// Header
// =============================================================================

/// A header value slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HeaderSlot {
    Origin,
    Name,
    Path,
    Home,
    DataDir,
    NumFiles,
    NumBlocks,
    NumCrossings,
    SectionLength,
    SectionSoundings,
    Decimation,
    ContourInterval,
    ColorInterval,
    TickInterval,
    Inversion,
    GridStatus,
    Smoothing,
    Precision,
    ZOffsetWidth,
}

/// A `KEY<tab>VALUE` header line present in `[since, until)`.
pub(crate) struct HeaderEntry {
    pub key: &'static str,
    pub since: u32,
    pub until: Option<u32>,
    pub slot: HeaderSlot,
}

impl HeaderEntry {
    pub fn applies_to(&self, version: FormatVersion) -> bool {
        version.at_least(self.since) && self.until.map_or(true, |u| version.id() < u)
    }
}

const fn header(key: &'static str, since: u32, until: Option<u32>, slot: HeaderSlot) -> HeaderEntry {
    HeaderEntry {
        key,
        since,
        until,
        slot,
    }
}

/// Header lines following `FILE_VERSION`, in file order.
pub(crate) const HEADER_LAYOUT: &[HeaderEntry] = &[
    header("ORIGIN", 302, None, HeaderSlot::Origin),
    header("NAME", 0, None, HeaderSlot::Name),
    header("PATH", 0, None, HeaderSlot::Path),
    header("HOME", 0, None, HeaderSlot::Home),
    header("DATADIR", 0, None, HeaderSlot::DataDir),
    header("NUMFILES", 0, None, HeaderSlot::NumFiles),
    header("NUMBLOCKS", 306, None, HeaderSlot::NumBlocks),
    header("NUMCROSSINGS", 0, None, HeaderSlot::NumCrossings),
    header("SECTIONLENGTH", 0, None, HeaderSlot::SectionLength),
    header("SECTIONSOUNDINGS", 101, None, HeaderSlot::SectionSoundings),
    header("DECIMATION", 0, None, HeaderSlot::Decimation),
    header("CONTOURINTERVAL", 0, None, HeaderSlot::ContourInterval),
    header("COLORINTERVAL", 0, None, HeaderSlot::ColorInterval),
    header("TICKINTERVAL", 0, None, HeaderSlot::TickInterval),
    header("INVERSION", 0, None, HeaderSlot::Inversion),
    header("GRIDSTATUS", 307, None, HeaderSlot::GridStatus),
    header("SMOOTHING", 301, None, HeaderSlot::Smoothing),
    header("PRECISION", 103, Some(301), HeaderSlot::Precision),
    header("ZOFFSETWIDTH", 105, None, HeaderSlot::ZOffsetWidth),
];

// =============================================================================
// FILE
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FileField {
    Index,
    Status,
    Id,
    Format,
    Block,
    BlockOffsetX,
    BlockOffsetY,
    BlockOffsetZ,
    HeadingBiasImport,
    RollBiasImport,
    HeadingBias,
    RollBias,
    NumSections,
    OutputId,
    Path,
}

impl RecordField for FileField {
    fn is_text(self) -> bool {
        self == FileField::Path
    }
}

pub(crate) const FILE_LAYOUT: &[RecordLayout<FileField>] = {
    use FileField::*;
    &[
        RecordLayout {
            since: 0,
            shapes: &[&[
                Index,
                Status,
                Id,
                Format,
                HeadingBiasImport,
                RollBiasImport,
                HeadingBias,
                RollBias,
                NumSections,
                OutputId,
                Path,
            ]],
        },
        RecordLayout {
            since: 306,
            shapes: &[&[
                Index,
                Status,
                Id,
                Format,
                Block,
                BlockOffsetX,
                BlockOffsetY,
                BlockOffsetZ,
                HeadingBiasImport,
                RollBiasImport,
                HeadingBias,
                RollBias,
                NumSections,
                OutputId,
                Path,
            ]],
        },
    ]
};

// =============================================================================
// SECTION
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SectionField {
    Index,
    NumPings,
    NumBeams,
    NumSnav,
    Continuity,
    Distance,
    BeginTime,
    EndTime,
    LonMin,
    LonMax,
    LatMin,
    LatMax,
    DepthMin,
    DepthMax,
    ContoursUpToDate,
}

impl RecordField for SectionField {}

pub(crate) const SECTION_LAYOUT: &[RecordLayout<SectionField>] = {
    use SectionField::*;
    &[RecordLayout {
        since: 0,
        shapes: &[
            &[
                Index,
                NumPings,
                NumBeams,
                NumSnav,
                Continuity,
                Distance,
                BeginTime,
                EndTime,
                LonMin,
                LonMax,
                LatMin,
                LatMax,
                DepthMin,
                DepthMax,
                ContoursUpToDate,
            ],
            &[
                Index, NumPings, NumBeams, NumSnav, Continuity, Distance, BeginTime, EndTime,
                LonMin, LonMax, LatMin, LatMax, DepthMin, DepthMax,
            ],
        ],
    }]
};

// =============================================================================
// SNAV
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SnavField {
    Index,
    PingId,
    Distance,
    Time,
    Lon,
    Lat,
    LonOffset,
    LatOffset,
    ZOffset,
}

impl RecordField for SnavField {}

pub(crate) const SNAV_LAYOUT: &[RecordLayout<SnavField>] = {
    use SnavField::*;
    &[RecordLayout {
        since: 0,
        shapes: &[
            &[Index, PingId, Distance, Time, Lon, Lat, LonOffset, LatOffset, ZOffset],
            &[Index, PingId, Distance, Time, Lon, Lat, LonOffset, LatOffset],
            &[Index, PingId, Distance, Time, Lon, Lat],
        ],
    }]
};

// =============================================================================
// GLOBALTIE
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GlobalTieField {
    Status,
    Snav,
    OffsetX,
    OffsetY,
    OffsetZ,
    SigmaX,
    SigmaY,
    SigmaZ,
}

impl RecordField for GlobalTieField {}

pub(crate) const GLOBALTIE_LAYOUT: &[RecordLayout<GlobalTieField>] = {
    use GlobalTieField::*;
    &[
        RecordLayout {
            since: 0,
            shapes: &[],
        },
        RecordLayout {
            since: 304,
            shapes: &[&[Snav, OffsetX, OffsetY, OffsetZ, SigmaX, SigmaY, SigmaZ]],
        },
        RecordLayout {
            since: 305,
            shapes: &[&[Status, Snav, OffsetX, OffsetY, OffsetZ, SigmaX, SigmaY, SigmaZ]],
        },
    ]
};

// =============================================================================
// CROSSING
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CrossingField {
    Index,
    Status,
    TrueCrossing,
    Overlap,
    File1,
    Section1,
    File2,
    Section2,
    NumTies,
}

impl RecordField for CrossingField {}

pub(crate) const CROSSING_LAYOUT: &[RecordLayout<CrossingField>] = {
    use CrossingField::*;
    &[
        RecordLayout {
            since: 0,
            shapes: &[&[Index, Status, File1, Section1, File2, Section2, NumTies]],
        },
        RecordLayout {
            since: 102,
            shapes: &[&[Index, Status, TrueCrossing, File1, Section1, File2, Section2, NumTies]],
        },
        RecordLayout {
            since: 106,
            shapes: &[&[
                Index,
                Status,
                TrueCrossing,
                Overlap,
                File1,
                Section1,
                File2,
                Section2,
                NumTies,
            ]],
        },
    ]
};

// =============================================================================
// TIE
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TieField {
    Index,
    Status,
    Snav1,
    Time1,
    Snav2,
    Time2,
    OffsetX,
    OffsetY,
    OffsetZ,
    InversionStatus,
    InversionX,
    InversionY,
    InversionZ,
}

impl RecordField for TieField {}

pub(crate) const TIE_LAYOUT: &[RecordLayout<TieField>] = {
    use TieField::*;
    &[
        RecordLayout {
            since: 0,
            shapes: &[&[
                Index,
                Snav1,
                Time1,
                Snav2,
                Time2,
                OffsetX,
                OffsetY,
                InversionStatus,
                InversionX,
                InversionY,
            ]],
        },
        RecordLayout {
            since: 104,
            shapes: &[&[
                Index,
                Snav1,
                Time1,
                Snav2,
                Time2,
                OffsetX,
                OffsetY,
                OffsetZ,
                InversionStatus,
                InversionX,
                InversionY,
                InversionZ,
            ]],
        },
        RecordLayout {
            since: 302,
            shapes: &[&[
                Index,
                Status,
                Snav1,
                Time1,
                Snav2,
                Time2,
                OffsetX,
                OffsetY,
                OffsetZ,
                InversionStatus,
                InversionX,
                InversionY,
                InversionZ,
            ]],
        },
    ]
};

// =============================================================================
// COV
// =============================================================================

/// `Sigma(axis)` or `Direction(axis, component)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CovField {
    Sigma(usize),
    Direction(usize, usize),
}

impl RecordField for CovField {}

pub(crate) const COV_LAYOUT: &[RecordLayout<CovField>] = {
    use CovField::*;
    &[
        RecordLayout {
            since: 0,
            shapes: &[],
        },
        RecordLayout {
            since: 200,
            shapes: &[&[
                Sigma(0),
                Direction(0, 0),
                Direction(0, 1),
                Direction(0, 2),
                Sigma(1),
                Direction(1, 0),
                Direction(1, 1),
                Direction(1, 2),
                Sigma(2),
                Direction(2, 0),
                Direction(2, 1),
                Direction(2, 2),
            ]],
        },
    ]
};

#[cfg(test)]
mod tests {
    use super::*;

    fn field_count<F>(table: &'static [RecordLayout<F>], id: u32) -> Vec<usize> {
        shapes_for(table, FormatVersion::from_id(id))
            .iter()
            .map(|s| s.len())
            .collect()
    }

    #[test]
    fn test_file_layout_by_version() {
        assert_eq!(field_count(FILE_LAYOUT, 100), vec![11]);
        assert_eq!(field_count(FILE_LAYOUT, 305), vec![11]);
        assert_eq!(field_count(FILE_LAYOUT, 306), vec![15]);
        assert_eq!(field_count(FILE_LAYOUT, 307), vec![15]);
    }

    #[test]
    fn test_crossing_layout_by_version() {
        assert_eq!(field_count(CROSSING_LAYOUT, 100), vec![7]);
        assert_eq!(field_count(CROSSING_LAYOUT, 102), vec![8]);
        assert_eq!(field_count(CROSSING_LAYOUT, 105), vec![8]);
        assert_eq!(field_count(CROSSING_LAYOUT, 106), vec![9]);
    }

    #[test]
    fn test_tie_layout_by_version() {
        assert_eq!(field_count(TIE_LAYOUT, 103), vec![10]);
        assert_eq!(field_count(TIE_LAYOUT, 104), vec![12]);
        assert_eq!(field_count(TIE_LAYOUT, 301), vec![12]);
        assert_eq!(field_count(TIE_LAYOUT, 302), vec![13]);
    }

    #[test]
    fn test_optional_records() {
        assert!(field_count(GLOBALTIE_LAYOUT, 303).is_empty());
        assert_eq!(field_count(GLOBALTIE_LAYOUT, 304), vec![7]);
        assert_eq!(field_count(GLOBALTIE_LAYOUT, 305), vec![8]);
        assert!(field_count(COV_LAYOUT, 106).is_empty());
        assert_eq!(field_count(COV_LAYOUT, 200), vec![12]);
    }

    #[test]
    fn test_snav_and_section_accept_variants() {
        assert_eq!(field_count(SNAV_LAYOUT, 307), vec![9, 8, 6]);
        assert_eq!(field_count(SECTION_LAYOUT, 307), vec![15, 14]);
    }

    #[test]
    fn test_header_gating() {
        let keys = |id: u32| -> Vec<&'static str> {
            HEADER_LAYOUT
                .iter()
                .filter(|e| e.applies_to(FormatVersion::from_id(id)))
                .map(|e| e.key)
                .collect()
        };
        let v100 = keys(100);
        assert!(!v100.contains(&"SECTIONSOUNDINGS"));
        assert!(!v100.contains(&"PRECISION"));
        assert!(!v100.contains(&"ORIGIN"));

        let v300 = keys(300);
        assert!(v300.contains(&"PRECISION"));
        assert!(!v300.contains(&"SMOOTHING"));

        let v307 = keys(307);
        assert_eq!(v307.first(), Some(&"ORIGIN"));
        assert!(v307.contains(&"GRIDSTATUS"));
        assert!(v307.contains(&"NUMBLOCKS"));
        assert!(!v307.contains(&"PRECISION"));
        assert_eq!(v307.last(), Some(&"ZOFFSETWIDTH"));
    }
}
