//! Sections, navigation fixes and global ties.

use serde::Serialize;

use super::ids::SnavIndex;
use super::status::TieStatus;
use crate::coord::{GeoBounds, GeoOffset, GeoPoint, LocalScale};
use crate::mask::{CoverageMask, Footprint};

/// A navigation adjustment: degrees east, degrees north, meters up.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct NavOffset {
    pub lon: f64,
    pub lat: f64,
    pub z: f64,
}

impl NavOffset {
    pub const ZERO: NavOffset = NavOffset {
        lon: 0.0,
        lat: 0.0,
        z: 0.0,
    };

    pub const fn new(lon: f64, lat: f64, z: f64) -> Self {
        Self { lon, lat, z }
    }

    /// The horizontal part of the offset.
    pub fn horizontal(&self) -> GeoOffset {
        GeoOffset::new(self.lon, self.lat)
    }

    pub fn negated(self) -> Self {
        Self::new(-self.lon, -self.lat, -self.z)
    }
}

impl std::ops::Sub for NavOffset {
    type Output = NavOffset;

    fn sub(self, rhs: Self) -> Self::Output {
        NavOffset::new(self.lon - rhs.lon, self.lat - rhs.lat, self.z - rhs.z)
    }
}

/// A navigation fix sampled along a section.
#[derive(Debug, Clone, PartialEq)]
pub struct Snav {
    /// Ping number within the section.
    pub ping_id: i32,
    /// Along-track distance (km).
    pub distance: f64,
    /// Epoch seconds.
    pub time_d: f64,
    /// Raw longitude.
    pub lon: f64,
    /// Raw latitude.
    pub lat: f64,
    /// Current adjustment applied to the raw position.
    pub offset: NavOffset,
    /// Ties referencing this fix. Maintained by the project.
    pub tie_count: u32,
}

impl Snav {
    pub fn new(ping_id: i32, distance: f64, time_d: f64, lon: f64, lat: f64) -> Self {
        Self {
            ping_id,
            distance,
            time_d,
            lon,
            lat,
            offset: NavOffset::ZERO,
            tie_count: 0,
        }
    }

    pub fn with_offset(mut self, offset: NavOffset) -> Self {
        self.offset = offset;
        self
    }

    /// Raw position plus the current offset.
    pub fn effective_position(&self) -> GeoPoint {
        GeoPoint::new(self.lon + self.offset.lon, self.lat + self.offset.lat)
    }
}

/// An absolute navigation constraint on a single section.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalTie {
    pub status: TieStatus,
    pub snav: SnavIndex,
    /// Longitude offset (degrees).
    pub offset_x: f64,
    /// Latitude offset (degrees).
    pub offset_y: f64,
    pub offset_x_m: f64,
    pub offset_y_m: f64,
    pub offset_z_m: f64,
    pub sigma_x: f64,
    pub sigma_y: f64,
    pub sigma_z: f64,
}

impl GlobalTie {
    /// Builds a global tie, deriving meter offsets with the given scale.
    pub fn new(
        status: TieStatus,
        snav: SnavIndex,
        offset: NavOffset,
        sigmas: [f64; 3],
        scale: LocalScale,
    ) -> Self {
        Self {
            status,
            snav,
            offset_x: offset.lon,
            offset_y: offset.lat,
            offset_x_m: scale.lon_to_meters(offset.lon),
            offset_y_m: scale.lat_to_meters(offset.lat),
            offset_z_m: offset.z,
            sigma_x: sigmas[0],
            sigma_y: sigmas[1],
            sigma_z: sigmas[2],
        }
    }

    /// Recomputes the meter offsets from the degree offsets.
    pub fn rescale(&mut self, scale: LocalScale) {
        self.offset_x_m = scale.lon_to_meters(self.offset_x);
        self.offset_y_m = scale.lat_to_meters(self.offset_y);
    }
}

/// A bounded segment of a survey file's track.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub num_pings: i32,
    pub num_beams: i32,
    /// True when this section continues the previous one without a gap.
    pub continuity: bool,
    /// Along-track length (km).
    pub distance: f64,
    pub btime_d: f64,
    pub etime_d: f64,
    pub bounds: GeoBounds,
    pub depth_min: f64,
    pub depth_max: f64,
    pub contours_up_to_date: bool,
    pub coverage: CoverageMask,
    pub snavs: Vec<Snav>,
    pub global_tie: Option<GlobalTie>,
}

impl Section {
    /// Creates an empty section covering `bounds`.
    pub fn new(bounds: GeoBounds) -> Self {
        Self {
            num_pings: 0,
            num_beams: 0,
            continuity: false,
            distance: 0.0,
            btime_d: 0.0,
            etime_d: 0.0,
            bounds,
            depth_min: 0.0,
            depth_max: 0.0,
            contours_up_to_date: false,
            coverage: CoverageMask::empty(),
            snavs: Vec::new(),
            global_tie: None,
        }
    }

    pub fn with_coverage(mut self, coverage: CoverageMask) -> Self {
        self.coverage = coverage;
        self
    }

    pub fn with_snav(mut self, snav: Snav) -> Self {
        self.snavs.push(snav);
        self
    }

    pub fn with_continuity(mut self, continuity: bool) -> Self {
        self.continuity = continuity;
        self
    }

    pub fn with_times(mut self, btime_d: f64, etime_d: f64) -> Self {
        self.btime_d = btime_d;
        self.etime_d = etime_d;
        self
    }

    pub fn with_pings(mut self, num_pings: i32, num_beams: i32) -> Self {
        self.num_pings = num_pings;
        self.num_beams = num_beams;
        self
    }

    #[inline]
    pub fn num_snavs(&self) -> usize {
        self.snavs.len()
    }

    pub fn snav(&self, index: SnavIndex) -> Option<&Snav> {
        self.snavs.get(index.0)
    }

    /// The fix halfway along the section, used to represent it as a whole.
    pub fn mid_snav(&self) -> Option<&Snav> {
        self.snavs.get(self.snavs.len() / 2)
    }

    /// Horizontal offset of the mid fix, zero for a section without fixes.
    pub fn mid_offset(&self) -> GeoOffset {
        self.mid_snav()
            .map(|s| s.offset.horizontal())
            .unwrap_or(GeoOffset::ZERO)
    }

    /// Effective position of the mid fix, or the bounds center.
    pub fn mid_position(&self) -> GeoPoint {
        self.mid_snav()
            .map(Snav::effective_position)
            .unwrap_or_else(|| self.bounds.center())
    }

    /// Effective track through all fixes.
    pub fn effective_track(&self) -> Vec<GeoPoint> {
        self.snavs.iter().map(Snav::effective_position).collect()
    }

    pub fn footprint(&self) -> Footprint<'_> {
        Footprint::new(&self.bounds, &self.coverage)
    }

    pub fn local_scale(&self) -> LocalScale {
        LocalScale::for_bounds(&self.bounds)
    }

    /// Stored per-fix tie counts.
    pub fn snav_tie_counts(&self) -> Vec<u32> {
        self.snavs.iter().map(|s| s.tie_count).collect()
    }
}
