//! Typed indices into the project arenas.

use std::fmt;

use serde::Serialize;

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
        #[serde(transparent)]
        pub struct $name(pub usize);

        impl $name {
            #[inline]
            pub const fn index(self) -> usize {
                self.0
            }
        }

        impl From<usize> for $name {
            fn from(value: usize) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

arena_id!(
    /// Index of a file in `Project::files`.
    FileId
);
arena_id!(
    /// Index of a section within its file.
    SectionId
);
arena_id!(
    /// Index of a crossing in `Project::crossings`.
    CrossingId
);
arena_id!(
    /// Index of a tie within its crossing.
    TieId
);
arena_id!(
    /// Index of a navigation fix within its section.
    SnavIndex
);

/// Fully qualified reference to a section.
///
/// Ordering is lexicographic on `(file, section)`, which is the canonical
/// endpoint order of a crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SectionRef {
    pub file: FileId,
    pub section: SectionId,
}

impl SectionRef {
    #[inline]
    pub const fn new(file: usize, section: usize) -> Self {
        Self {
            file: FileId(file),
            section: SectionId(section),
        }
    }
}

impl fmt::Display for SectionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.section)
    }
}
