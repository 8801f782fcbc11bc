//! Status enumerations and their persisted integer codes.

use serde::Serialize;

macro_rules! coded_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $code:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// Integer code written to the project file.
            pub const fn code(self) -> i32 {
                match self {
                    $( $name::$variant => $code, )+
                }
            }

            /// Decodes a persisted integer code.
            pub fn from_code(code: i32) -> Option<Self> {
                match code {
                    $( $code => Some($name::$variant), )+
                    _ => None,
                }
            }
        }
    };
}

coded_enum! {
    /// Navigation quality of a survey file.
    pub enum FileStatus {
        PoorNav = 1,
        GoodNav = 2,
        /// Navigation treated as ground truth in all three axes.
        FixedNav = 3,
        FixedXyNav = 4,
        FixedZNav = 5,
    }
}

impl FileStatus {
    /// True for any of the fixed states.
    pub fn is_fixed(self) -> bool {
        matches!(
            self,
            FileStatus::FixedNav | FileStatus::FixedXyNav | FileStatus::FixedZNav
        )
    }
}

impl Default for FileStatus {
    fn default() -> Self {
        FileStatus::GoodNav
    }
}

coded_enum! {
    /// Analysis state of a crossing.
    pub enum CrossingStatus {
        None = 0,
        Set = 1,
        Skip = 2,
    }
}

impl Default for CrossingStatus {
    fn default() -> Self {
        CrossingStatus::None
    }
}

coded_enum! {
    /// Which axes a tie constrains.
    pub enum TieStatus {
        None = 0,
        Xyz = 1,
        Xy = 2,
        Z = 3,
    }
}

impl Default for TieStatus {
    fn default() -> Self {
        TieStatus::Xyz
    }
}

coded_enum! {
    /// Freshness of an inversion result.
    pub enum InversionStatus {
        None = 0,
        Old = 1,
        Current = 2,
    }
}

impl InversionStatus {
    /// Demotes a current inversion to old; other states are unchanged.
    pub fn demote(&mut self) {
        if *self == InversionStatus::Current {
            *self = InversionStatus::Old;
        }
    }
}

impl Default for InversionStatus {
    fn default() -> Self {
        InversionStatus::None
    }
}

coded_enum! {
    /// Freshness of the project's gridded products.
    pub enum GridStatus {
        None = 0,
        Current = 1,
        Old = 2,
    }
}

impl Default for GridStatus {
    fn default() -> Self {
        GridStatus::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_status_codes() {
        assert_eq!(FileStatus::PoorNav.code(), 1);
        assert_eq!(FileStatus::FixedZNav.code(), 5);
        assert_eq!(FileStatus::from_code(3), Some(FileStatus::FixedNav));
        assert_eq!(FileStatus::from_code(0), None);
        assert_eq!(FileStatus::from_code(6), None);
    }

    #[test]
    fn test_fixed_states() {
        assert!(!FileStatus::GoodNav.is_fixed());
        assert!(FileStatus::FixedNav.is_fixed());
        assert!(FileStatus::FixedXyNav.is_fixed());
        assert!(FileStatus::FixedZNav.is_fixed());
    }

    #[test]
    fn test_roundtrip_every_code() {
        for code in 0..=2 {
            let status = CrossingStatus::from_code(code).unwrap();
            assert_eq!(status.code(), code);
            let inv = InversionStatus::from_code(code).unwrap();
            assert_eq!(inv.code(), code);
            let grid = GridStatus::from_code(code).unwrap();
            assert_eq!(grid.code(), code);
        }
        for code in 0..=3 {
            assert_eq!(TieStatus::from_code(code).unwrap().code(), code);
        }
    }

    #[test]
    fn test_inversion_demote() {
        let mut status = InversionStatus::Current;
        status.demote();
        assert_eq!(status, InversionStatus::Old);

        let mut none = InversionStatus::None;
        none.demote();
        assert_eq!(none, InversionStatus::None);
    }
}
