//! Geographic coordinate helpers
//!
//! Provides the local metric scale used to convert between degree offsets
//! and meters, plus the small set of planar geometry types shared by the
//! coverage mask, the project model and the exporters.

mod types;

pub use types::{GeoBounds, GeoOffset, GeoPoint};

/// Degrees-to-radians factor.
const DTR: f64 = std::f64::consts::PI / 180.0;

// Ellipsoid series coefficients for meters per degree of longitude.
const C1: f64 = 111_412.84;
const C2: f64 = -93.5;
const C3: f64 = 0.118;

// Ellipsoid series coefficients for meters per degree of latitude.
const C4: f64 = 111_132.92;
const C5: f64 = -559.82;
const C6: f64 = 1.175;
const C7: f64 = 0.0023;

/// Local conversion factors between meters and degrees.
///
/// `mtodeglon` and `mtodeglat` are degrees per meter at a reference
/// latitude, so a longitude offset in degrees divided by `mtodeglon` gives
/// meters east.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalScale {
    /// Degrees of longitude per meter.
    pub mtodeglon: f64,
    /// Degrees of latitude per meter.
    pub mtodeglat: f64,
}

impl LocalScale {
    /// Computes the scale at the given latitude (degrees).
    ///
    /// # Example
    ///
    /// ```
    /// use mbnavadjust::coord::LocalScale;
    ///
    /// let scale = LocalScale::at_latitude(0.0);
    /// // One degree of longitude at the equator is a little over 111 km.
    /// assert!((1.0 / scale.mtodeglon - 111_319.5).abs() < 1.0);
    /// ```
    #[inline]
    pub fn at_latitude(lat: f64) -> Self {
        let radlat = lat * DTR;
        let mtodeglon =
            1.0 / (C1 * radlat.cos() + C2 * (3.0 * radlat).cos() + C3 * (5.0 * radlat).cos()).abs();
        let mtodeglat = 1.0
            / (C4
                + C5 * (2.0 * radlat).cos()
                + C6 * (4.0 * radlat).cos()
                + C7 * (6.0 * radlat).cos())
            .abs();
        Self {
            mtodeglon,
            mtodeglat,
        }
    }

    /// Scale at the middle latitude of a bounding box.
    #[inline]
    pub fn for_bounds(bounds: &GeoBounds) -> Self {
        Self::at_latitude(bounds.mid_latitude())
    }

    /// Converts a longitude difference in degrees to meters east.
    #[inline]
    pub fn lon_to_meters(&self, dlon: f64) -> f64 {
        dlon / self.mtodeglon
    }

    /// Converts a latitude difference in degrees to meters north.
    #[inline]
    pub fn lat_to_meters(&self, dlat: f64) -> f64 {
        dlat / self.mtodeglat
    }

    /// Converts meters east to degrees of longitude.
    #[inline]
    pub fn meters_to_lon(&self, meters: f64) -> f64 {
        meters * self.mtodeglon
    }

    /// Converts meters north to degrees of latitude.
    #[inline]
    pub fn meters_to_lat(&self, meters: f64) -> f64 {
        meters * self.mtodeglat
    }
}

/// Returns true if segment `p1-p2` and segment `q1-q2` intersect.
///
/// Touching endpoints and collinear overlap both count as intersecting.
pub fn segments_intersect(p1: GeoPoint, p2: GeoPoint, q1: GeoPoint, q2: GeoPoint) -> bool {
    fn orient(a: GeoPoint, b: GeoPoint, c: GeoPoint) -> f64 {
        (b.lon - a.lon) * (c.lat - a.lat) - (b.lat - a.lat) * (c.lon - a.lon)
    }

    fn on_segment(a: GeoPoint, b: GeoPoint, c: GeoPoint) -> bool {
        c.lon >= a.lon.min(b.lon)
            && c.lon <= a.lon.max(b.lon)
            && c.lat >= a.lat.min(b.lat)
            && c.lat <= a.lat.max(b.lat)
    }

    let d1 = orient(q1, q2, p1);
    let d2 = orient(q1, q2, p2);
    let d3 = orient(p1, p2, q1);
    let d4 = orient(p1, p2, q2);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    (d1 == 0.0 && on_segment(q1, q2, p1))
        || (d2 == 0.0 && on_segment(q1, q2, p2))
        || (d3 == 0.0 && on_segment(p1, p2, q1))
        || (d4 == 0.0 && on_segment(p1, p2, q2))
}

/// Returns true if the two polylines share at least one point.
pub fn polylines_intersect(a: &[GeoPoint], b: &[GeoPoint]) -> bool {
    a.windows(2).any(|sa| {
        b.windows(2)
            .any(|sb| segments_intersect(sa[0], sa[1], sb[0], sb[1]))
    })
}
