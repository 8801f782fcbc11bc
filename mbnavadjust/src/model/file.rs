//! Survey files.

use std::path::PathBuf;

use serde::Serialize;

use super::section::Section;
use super::status::FileStatus;

/// Navigation offset shared by every file of a block.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct BlockOffset {
    /// Longitude offset (degrees).
    pub x: f64,
    /// Latitude offset (degrees).
    pub y: f64,
    /// Depth offset (meters).
    pub z: f64,
}

/// One source survey line and its sections.
#[derive(Debug, Clone, PartialEq)]
pub struct SurveyFile {
    pub status: FileStatus,
    /// Swath data format id.
    pub format: i32,
    /// Cohort of contiguous files sharing a block offset.
    pub block: usize,
    pub block_offset: BlockOffset,
    pub heading_bias_import: f64,
    pub roll_bias_import: f64,
    pub heading_bias: f64,
    pub roll_bias: f64,
    pub output_id: i32,
    /// Path as written in the project file, possibly relative.
    pub path: String,
    /// Absolute path, resolved against the project directory.
    pub resolved_path: PathBuf,
    pub sections: Vec<Section>,
}

impl SurveyFile {
    pub fn new(path: impl Into<String>, format: i32) -> Self {
        let path = path.into();
        Self {
            status: FileStatus::default(),
            format,
            block: 0,
            block_offset: BlockOffset::default(),
            heading_bias_import: 0.0,
            roll_bias_import: 0.0,
            heading_bias: 0.0,
            roll_bias: 0.0,
            output_id: 0,
            resolved_path: PathBuf::from(&path),
            path,
            sections: Vec::new(),
        }
    }

    pub fn with_status(mut self, status: FileStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_block(mut self, block: usize) -> Self {
        self.block = block;
        self
    }

    pub fn with_section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    pub fn num_sections(&self) -> usize {
        self.sections.len()
    }

    /// True if the first section continues the previous file.
    pub fn continues_previous(&self) -> bool {
        self.sections.first().map(|s| s.continuity).unwrap_or(false)
    }
}
