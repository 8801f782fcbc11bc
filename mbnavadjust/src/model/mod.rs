//! Project entity model
//!
//! Files own sections, the project owns files and crossings, crossings own
//! ties. Cross references use the typed indices in [`ids`].

mod crossing;
mod file;
mod ids;
mod paths;
mod project;
mod section;
mod status;

pub use crossing::{
    Crossing, ErrorEllipsoid, SigmaAxis, Tie, TieOffset, BETTER_OVERLAP, GOOD_OVERLAP,
    OUTRAGEOUS_OFFSET, SIGMA_HORIZONTAL_MIN, SIGMA_VERTICAL_MIN,
};
pub use file::{BlockOffset, SurveyFile};
pub use ids::{CrossingId, FileId, SectionId, SectionRef, SnavIndex, TieId};
pub use paths::{ProjectPaths, DATADIR_EXTENSION, HOME_EXTENSION, LOG_FILE_NAME};
pub use project::{
    Project, ProjectParameters, ProjectSummary, SourceInfo, SIGMA_MINIMUM, SMOOTHING_DEFAULT,
    ZOFFSET_WIDTH_DEFAULT,
};
pub use section::{GlobalTie, NavOffset, Section, Snav};
pub use status::{CrossingStatus, FileStatus, GridStatus, InversionStatus, TieStatus};

/// Maximum navigation fixes per section.
pub const MAX_SNAVS: usize = 11;

/// Maximum ties per crossing.
pub const MAX_TIES: usize = MAX_SNAVS;
