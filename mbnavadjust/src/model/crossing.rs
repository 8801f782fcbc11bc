//! Crossings between sections and the ties recorded on them.
//!
//! A crossing is an unordered pair of sections, stored in canonical order:
//! the first endpoint is always the smaller `(file, section)` pair. Tie
//! offsets point from the first endpoint to the second, so reordering the
//! endpoints also swaps each tie's fix references and negates its offsets.

use super::ids::{FileId, SectionRef, SnavIndex, TieId};
use super::section::NavOffset;
use super::status::{CrossingStatus, InversionStatus, TieStatus};
use crate::coord::LocalScale;

/// Largest offset magnitude accepted from a stored inversion result.
pub const OUTRAGEOUS_OFFSET: f64 = 10_000.0;

/// Overlap percent at which a crossing counts as good.
pub const GOOD_OVERLAP: u8 = 25;

/// Overlap percent at which a crossing counts as better than good.
pub const BETTER_OVERLAP: u8 = 50;

/// A tie offset in degrees with derived meter components.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TieOffset {
    /// Longitude offset (degrees).
    pub x: f64,
    /// Latitude offset (degrees).
    pub y: f64,
    pub x_m: f64,
    pub y_m: f64,
    pub z_m: f64,
}

impl TieOffset {
    pub fn from_nav(offset: NavOffset, scale: LocalScale) -> Self {
        Self {
            x: offset.lon,
            y: offset.lat,
            x_m: scale.lon_to_meters(offset.lon),
            y_m: scale.lat_to_meters(offset.lat),
            z_m: offset.z,
        }
    }

    /// Recomputes the meter components from the degree components.
    pub fn rescale(&mut self, scale: LocalScale) {
        self.x_m = scale.lon_to_meters(self.x);
        self.y_m = scale.lat_to_meters(self.y);
    }

    pub fn negate(&mut self) {
        self.x = -self.x;
        self.y = -self.y;
        self.x_m = -self.x_m;
        self.y_m = -self.y_m;
        self.z_m = -self.z_m;
    }

    /// True if any stored component is implausibly large.
    pub fn is_outrageous(&self) -> bool {
        [self.x, self.y, self.x_m, self.y_m, self.z_m]
            .iter()
            .any(|v| v.abs() > OUTRAGEOUS_OFFSET)
    }
}

/// One principal axis of a tie's error ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SigmaAxis {
    /// Standard deviation along the axis (meters).
    pub sigma: f64,
    /// Unit direction vector (east, north, up).
    pub direction: [f64; 3],
}

/// Error ellipsoid of a tie as three principal axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorEllipsoid {
    pub axes: [SigmaAxis; 3],
}

/// Smallest horizontal sigma kept (meters).
pub const SIGMA_HORIZONTAL_MIN: f64 = 0.1;

/// Smallest vertical sigma kept (meters).
pub const SIGMA_VERTICAL_MIN: f64 = 0.001;

impl ErrorEllipsoid {
    /// An axis-aligned ellipsoid with equal sigmas.
    pub fn isotropic(sigma: f64) -> Self {
        Self {
            axes: [
                SigmaAxis {
                    sigma,
                    direction: [1.0, 0.0, 0.0],
                },
                SigmaAxis {
                    sigma,
                    direction: [0.0, 1.0, 0.0],
                },
                SigmaAxis {
                    sigma,
                    direction: [0.0, 0.0, 1.0],
                },
            ],
        }
    }

    /// Applies the minimum sigma floors.
    pub fn floored(mut self) -> Self {
        self.axes[0].sigma = self.axes[0].sigma.max(SIGMA_HORIZONTAL_MIN);
        self.axes[1].sigma = self.axes[1].sigma.max(SIGMA_HORIZONTAL_MIN);
        self.axes[2].sigma = self.axes[2].sigma.max(SIGMA_VERTICAL_MIN);
        self
    }
}

impl Default for ErrorEllipsoid {
    fn default() -> Self {
        Self::isotropic(100.0)
    }
}

/// A correspondence between one fix in each section of a crossing.
#[derive(Debug, Clone, PartialEq)]
pub struct Tie {
    pub status: TieStatus,
    /// Fix in the first section.
    pub snav_1: SnavIndex,
    pub snav_1_time_d: f64,
    /// Fix in the second section.
    pub snav_2: SnavIndex,
    pub snav_2_time_d: f64,
    /// Measured offset from the first fix to the second.
    pub offset: TieOffset,
    pub sigma: ErrorEllipsoid,
    pub inversion_status: InversionStatus,
    /// Offset implied by the last inversion.
    pub inversion_offset: TieOffset,
}

impl Tie {
    /// Flips the tie to the opposite endpoint order.
    pub(crate) fn reverse(&mut self) {
        std::mem::swap(&mut self.snav_1, &mut self.snav_2);
        std::mem::swap(&mut self.snav_1_time_d, &mut self.snav_2_time_d);
        self.offset.negate();
        self.inversion_offset.negate();
    }
}

/// A pair of sections whose footprints overlap.
#[derive(Debug, Clone, PartialEq)]
pub struct Crossing {
    pub status: CrossingStatus,
    /// True when the two tracks actually intersect.
    pub truecrossing: bool,
    /// Overlap percent, 0 when not yet computed.
    pub overlap: u8,
    first: SectionRef,
    second: SectionRef,
    pub(crate) ties: Vec<Tie>,
}

impl Crossing {
    /// Creates a crossing with endpoints in canonical order.
    pub fn new(a: SectionRef, b: SectionRef) -> Self {
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        Self {
            status: CrossingStatus::None,
            truecrossing: false,
            overlap: 0,
            first,
            second,
            ties: Vec::new(),
        }
    }

    /// Builds a crossing exactly as stored, without reordering.
    pub(crate) fn from_stored(first: SectionRef, second: SectionRef, ties: Vec<Tie>) -> Self {
        Self {
            status: CrossingStatus::None,
            truecrossing: false,
            overlap: 0,
            first,
            second,
            ties,
        }
    }

    #[inline]
    pub fn first(&self) -> SectionRef {
        self.first
    }

    #[inline]
    pub fn second(&self) -> SectionRef {
        self.second
    }

    pub fn ties(&self) -> &[Tie] {
        &self.ties
    }

    pub fn tie(&self, id: TieId) -> Option<&Tie> {
        self.ties.get(id.0)
    }

    pub fn num_ties(&self) -> usize {
        self.ties.len()
    }

    pub fn involves_file(&self, file: FileId) -> bool {
        self.first.file == file || self.second.file == file
    }

    pub fn connects(&self, a: SectionRef, b: SectionRef) -> bool {
        (self.first == a && self.second == b) || (self.first == b && self.second == a)
    }

    pub fn is_canonical(&self) -> bool {
        self.first <= self.second
    }

    pub fn is_good(&self) -> bool {
        self.overlap >= GOOD_OVERLAP
    }

    pub fn is_better(&self) -> bool {
        self.overlap >= BETTER_OVERLAP
    }

    /// Reorders endpoints into canonical order.
    ///
    /// Returns true if a swap was performed.
    pub fn canonicalize(&mut self) -> bool {
        if self.is_canonical() {
            return false;
        }
        std::mem::swap(&mut self.first, &mut self.second);
        for tie in &mut self.ties {
            tie.reverse();
        }
        true
    }
}
