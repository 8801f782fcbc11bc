//! Project file format versions.

use std::fmt;

/// A project file format version, `major.minor`.
///
/// Ordered by the integer id `100 * major + minor`, which is what every
/// record layout is gated on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FormatVersion(u32);

impl FormatVersion {
    /// The version every project is written as.
    pub const CURRENT: FormatVersion = FormatVersion(307);

    pub const fn new(major: u32, minor: u32) -> Self {
        Self(100 * major + minor)
    }

    pub const fn from_id(id: u32) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn id(self) -> u32 {
        self.0
    }

    pub const fn major(self) -> u32 {
        self.0 / 100
    }

    pub const fn minor(self) -> u32 {
        self.0 % 100
    }

    /// Parses the `FILE_VERSION` value, e.g. `3.07`.
    pub fn parse(text: &str) -> Option<Self> {
        let (major, minor) = text.trim().split_once('.')?;
        let major: u32 = major.parse().ok()?;
        let minor: u32 = minor.parse().ok()?;
        if minor >= 100 {
            return None;
        }
        Some(Self::new(major, minor))
    }

    /// True if this version is at least `id`.
    #[inline]
    pub const fn at_least(self, id: u32) -> bool {
        self.0 >= id
    }
}

impl fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.major(), self.minor())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let v = FormatVersion::parse("3.07").unwrap();
        assert_eq!(v.id(), 307);
        assert_eq!(v.to_string(), "3.07");
        assert_eq!(v, FormatVersion::CURRENT);
    }

    #[test]
    fn test_parse_single_digit_minor() {
        assert_eq!(FormatVersion::parse("1.0").unwrap().id(), 100);
        assert_eq!(FormatVersion::parse("2.00").unwrap().id(), 200);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(FormatVersion::parse("3").is_none());
        assert!(FormatVersion::parse("x.07").is_none());
        assert!(FormatVersion::parse("3.100").is_none());
    }

    #[test]
    fn test_ordering() {
        assert!(FormatVersion::new(1, 6) < FormatVersion::new(2, 0));
        assert!(FormatVersion::new(3, 6).at_least(306));
        assert!(!FormatVersion::new(3, 5).at_least(306));
    }
}
