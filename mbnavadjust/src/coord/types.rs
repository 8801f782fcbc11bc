//! Planar geographic types in degrees.

use serde::Serialize;

/// A longitude/latitude position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    #[inline]
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Returns the point shifted by an offset.
    #[inline]
    pub fn shifted(self, offset: GeoOffset) -> Self {
        Self::new(self.lon + offset.lon, self.lat + offset.lat)
    }
}

/// A horizontal displacement in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct GeoOffset {
    pub lon: f64,
    pub lat: f64,
}

impl GeoOffset {
    pub const ZERO: GeoOffset = GeoOffset { lon: 0.0, lat: 0.0 };

    #[inline]
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

impl std::ops::Neg for GeoOffset {
    type Output = GeoOffset;

    fn neg(self) -> Self::Output {
        GeoOffset::new(-self.lon, -self.lat)
    }
}

impl std::ops::Sub for GeoOffset {
    type Output = GeoOffset;

    fn sub(self, rhs: Self) -> Self::Output {
        GeoOffset::new(self.lon - rhs.lon, self.lat - rhs.lat)
    }
}

/// An axis-aligned geographic rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct GeoBounds {
    pub lon_min: f64,
    pub lon_max: f64,
    pub lat_min: f64,
    pub lat_max: f64,
}

impl GeoBounds {
    #[inline]
    pub const fn new(lon_min: f64, lon_max: f64, lat_min: f64, lat_max: f64) -> Self {
        Self {
            lon_min,
            lon_max,
            lat_min,
            lat_max,
        }
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.lon_max - self.lon_min
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.lat_max - self.lat_min
    }

    #[inline]
    pub fn mid_latitude(&self) -> f64 {
        0.5 * (self.lat_min + self.lat_max)
    }

    #[inline]
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            0.5 * (self.lon_min + self.lon_max),
            self.mid_latitude(),
        )
    }

    /// True when every edge is a finite number.
    pub fn is_finite(&self) -> bool {
        self.lon_min.is_finite()
            && self.lon_max.is_finite()
            && self.lat_min.is_finite()
            && self.lat_max.is_finite()
    }

    /// Strict rectangle intersection: shared edges do not count.
    #[inline]
    pub fn intersects(&self, other: &GeoBounds) -> bool {
        self.lon_min < other.lon_max
            && self.lon_max > other.lon_min
            && self.lat_min < other.lat_max
            && self.lat_max > other.lat_min
    }

    /// The overlapping rectangle, if the two strictly intersect.
    pub fn intersection(&self, other: &GeoBounds) -> Option<GeoBounds> {
        if !self.intersects(other) {
            return None;
        }
        Some(GeoBounds::new(
            self.lon_min.max(other.lon_min),
            self.lon_max.min(other.lon_max),
            self.lat_min.max(other.lat_min),
            self.lat_max.min(other.lat_max),
        ))
    }

    /// The smallest rectangle enclosing both.
    pub fn union(&self, other: &GeoBounds) -> GeoBounds {
        GeoBounds::new(
            self.lon_min.min(other.lon_min),
            self.lon_max.max(other.lon_max),
            self.lat_min.min(other.lat_min),
            self.lat_max.max(other.lat_max),
        )
    }

    /// Returns the rectangle translated by an offset.
    pub fn translated(&self, offset: GeoOffset) -> GeoBounds {
        GeoBounds::new(
            self.lon_min + offset.lon,
            self.lon_max + offset.lon,
            self.lat_min + offset.lat,
            self.lat_max + offset.lat,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_intersection_excludes_shared_edge() {
        let a = GeoBounds::new(0.0, 1.0, 0.0, 1.0);
        let b = GeoBounds::new(1.0, 2.0, 0.0, 1.0);
        assert!(!a.intersects(&b));
        assert!(a.intersection(&b).is_none());
    }

    #[test]
    fn test_intersection_rectangle() {
        let a = GeoBounds::new(0.0, 2.0, 0.0, 2.0);
        let b = GeoBounds::new(1.0, 3.0, -1.0, 1.5);
        assert_eq!(a.intersection(&b), Some(GeoBounds::new(1.0, 2.0, 0.0, 1.5)));
    }

    #[test]
    fn test_union_and_translate() {
        let a = GeoBounds::new(0.0, 1.0, 0.0, 1.0);
        let b = a.translated(GeoOffset::new(2.0, -1.0));
        assert_eq!(b, GeoBounds::new(2.0, 3.0, -1.0, 0.0));
        assert_eq!(a.union(&b), GeoBounds::new(0.0, 3.0, -1.0, 1.0));
    }

    #[test]
    fn test_center_and_finiteness() {
        let a = GeoBounds::new(-122.0, -121.0, 36.0, 37.0);
        assert_eq!(a.center(), GeoPoint::new(-121.5, 36.5));
        assert!(a.is_finite());
        assert!(!GeoBounds::new(f64::NAN, 0.0, 0.0, 0.0).is_finite());
    }

    #[test]
    fn test_offset_arithmetic() {
        let a = GeoOffset::new(0.5, -0.25);
        let b = GeoOffset::new(0.25, 0.25);
        assert_eq!(a - b, GeoOffset::new(0.25, -0.5));
        assert_eq!(-a, GeoOffset::new(-0.5, 0.25));
        assert_eq!(
            GeoPoint::new(1.0, 1.0).shifted(a),
            GeoPoint::new(1.5, 0.75)
        );
    }
}
