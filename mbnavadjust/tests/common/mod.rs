//! Hand-built project files in each historical layout.

#![allow(dead_code)]

use std::fmt::Write as _;

/// Versions whose layouts differ in at least one record.
pub const VERSIONS: [u32; 12] = [100, 102, 104, 106, 200, 300, 301, 302, 304, 305, 306, 307];

/// Offsets (lon degrees, lat degrees, z meters) of a fixture global tie.
pub const GLOBAL_TIE_OFFSET: [f64; 3] = [0.001, -0.002, 0.5];

/// Sigmas written on every fixture global tie line.
pub const GLOBAL_TIE_SIGMAS: [f64; 3] = [1.0, 2.0, 3.0];

/// Knobs for a two file, one crossing, one tie fixture.
#[derive(Debug, Clone)]
pub struct Fixture {
    pub version: u32,
    /// Store the crossing with its endpoints in descending order.
    pub descending: bool,
    pub tie_snavs: (usize, usize),
    pub inversion_x: f64,
    /// Global tie `(status, snav)` on the first file's section, for
    /// formats that carry one. Format 3.04 stores no status; a
    /// non-negative fix there implies an XYZ tie.
    pub global_tie: Option<(i32, i64)>,
}

impl Fixture {
    pub fn new(version: u32) -> Self {
        Self {
            version,
            descending: false,
            tie_snavs: (1, 1),
            inversion_x: 0.0,
            global_tie: None,
        }
    }

    pub fn version_text(&self) -> String {
        format!("{}.{:02}", self.version / 100, self.version % 100)
    }

    pub fn render(&self) -> String {
        let v = self.version;
        let mut out = String::from("##MBNAVADJUST PROJECT\n");
        let mut header = |key: &str, value: &str| {
            let _ = writeln!(out, "{}\t{}", key, value);
        };

        header("MB-SYSTEM_VERSION", "5.1.0");
        header("PROGRAM_VERSION", "fixture");
        header("FILE_VERSION", &self.version_text());
        if v >= 302 {
            header("ORIGIN", "Generated by user <tester> on cpu <bench> at <Mon Jan  1 00:00:00 2018>");
        }
        header("NAME", "legacy");
        header("PATH", "/survey/");
        header("HOME", "/survey/legacy.nvh");
        header("DATADIR", "/survey/legacy.dir");
        header("NUMFILES", "2");
        if v >= 306 {
            header("NUMBLOCKS", "1");
        }
        header("NUMCROSSINGS", "1");
        header("SECTIONLENGTH", "10.000000");
        if v >= 101 {
            header("SECTIONSOUNDINGS", "50000");
        }
        header("DECIMATION", "2");
        header("CONTOURINTERVAL", "50.000000");
        header("COLORINTERVAL", "200.000000");
        header("TICKINTERVAL", "150.000000");
        header("INVERSION", "0");
        if v >= 307 {
            header("GRIDSTATUS", "0");
        }
        if v >= 301 {
            header("SMOOTHING", "3.000000");
        }
        if (103..301).contains(&v) {
            header("PRECISION", "0.500000");
        }
        if v >= 105 {
            header("ZOFFSETWIDTH", "7.000000");
        }

        for (i, path) in ["lines/a.mb88", "lines/b.mb88"].iter().enumerate() {
            if v >= 306 {
                let _ = writeln!(
                    out,
                    "FILE {:4} {:4} {:4} {:4} {:4} {:13.8} {:13.8} {:13.8} {:4.1} {:4.1} {:4.1} {:4.1} {:4} {:4} {}",
                    i, 2, i, 88, 0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1, i, path
                );
            } else {
                let _ = writeln!(
                    out,
                    "FILE {:4} {:4} {:4} {:4} {:4.1} {:4.1} {:4.1} {:4.1} {:4} {:4} {}",
                    i, 2, i, 88, 0.0, 0.0, 0.0, 0.0, 1, i, path
                );
            }
            self.render_section(&mut out, i);
        }

        let (first, second) = if self.descending { (1, 0) } else { (0, 1) };
        let _ = match v {
            0..=101 => writeln!(out, "CROSSING {:5} {} {:5} {:3} {:5} {:3} {:2}", 0, 1, first, 0, second, 0, 1),
            102..=105 => writeln!(out, "CROSSING {:5} {} {} {:5} {:3} {:5} {:3} {:2}", 0, 1, 0, first, 0, second, 0, 1),
            _ => writeln!(
                out,
                "CROSSING {:5} {} {} {:3} {:5} {:3} {:5} {:3} {:2}",
                0, 1, 0, 100, first, 0, second, 0, 1
            ),
        };

        let (s1, s2) = self.tie_snavs;
        let (t1, t2) = (1000.0 + s1 as f64, 1000.0 + s2 as f64);
        let _ = match v {
            0..=103 => writeln!(
                out,
                "TIE {:5} {:5} {:16.6} {:5} {:16.6} {:13.8} {:13.8} {} {:13.8} {:13.8}",
                0, s1, t1, s2, t2, 0.0001, -0.0002, 0, self.inversion_x, 0.0
            ),
            104..=301 => writeln!(
                out,
                "TIE {:5} {:5} {:16.6} {:5} {:16.6} {:13.8} {:13.8} {:13.8} {} {:13.8} {:13.8} {:13.8}",
                0, s1, t1, s2, t2, 0.0001, -0.0002, 1.5, 0, self.inversion_x, 0.0, 0.0
            ),
            _ => writeln!(
                out,
                "TIE {:5} {} {:5} {:16.6} {:5} {:16.6} {:13.8} {:13.8} {:13.8} {} {:13.8} {:13.8} {:13.8}",
                0, 1, s1, t1, s2, t2, 0.0001, -0.0002, 1.5, 0, self.inversion_x, 0.0, 0.0
            ),
        };
        if v >= 200 {
            out.push_str("COV");
            for (sigma, dir) in [(0.05, [1.0, 0.0, 0.0]), (2.0, [0.0, 1.0, 0.0]), (0.0005, [0.0, 0.0, 1.0])] {
                let _ = write!(out, " {:13.8} {:13.8} {:13.8} {:13.8}", sigma, dir[0], dir[1], dir[2]);
            }
            out.push('\n');
        }
        out
    }

    fn render_section(&self, out: &mut String, file: usize) {
        let v = self.version;
        let _ = writeln!(
            out,
            "SECTION {:4} {:5} {:5} {} {} {:10.6} {:16.6} {:16.6} {:13.8} {:13.8} {:13.8} {:13.8} {:9.3} {:9.3}{}",
            0,
            100,
            101,
            3,
            0,
            1.5,
            1000.0,
            1002.0,
            -122.0,
            -121.875,
            36.0,
            36.125,
            -1200.0,
            -800.0,
            if v >= 300 { " 0" } else { "" }
        );
        for _ in 0..25 {
            out.push_str("1111111111111111111111111\n");
        }
        let lon_offset = if file == 1 { 0.001 } else { 0.0 };
        for k in 0..3 {
            let lon = -122.0 + 0.0625 * k as f64;
            let time = 1000.0 + k as f64;
            let _ = match v {
                100 => writeln!(out, "SNAV {:4} {:5} {:10.6} {:16.6} {:13.8} {:13.8}", k, k * 50, 0.5 * k as f64, time, lon, 36.0625),
                102 => writeln!(
                    out,
                    "SNAV {:4} {:5} {:10.6} {:16.6} {:13.8} {:13.8} {:13.8} {:13.8}",
                    k, k * 50, 0.5 * k as f64, time, lon, 36.0625, lon_offset, 0.0
                ),
                _ => writeln!(
                    out,
                    "SNAV {:4} {:5} {:10.6} {:16.6} {:13.8} {:13.8} {:13.8} {:13.8} {:13.8}",
                    k, k * 50, 0.5 * k as f64, time, lon, 36.0625, lon_offset, 0.0, 0.0
                ),
            };
        }
        let (status, snav, offset) = match self.global_tie {
            Some((status, snav)) if file == 0 => (status, snav, GLOBAL_TIE_OFFSET),
            _ => (0, -1, [0.0; 3]),
        };
        let [sx, sy, sz] = GLOBAL_TIE_SIGMAS;
        if v == 304 {
            let _ = writeln!(
                out,
                "GLOBALTIE {:4} {:13.8} {:13.8} {:13.8} {:13.8} {:13.8} {:13.8}",
                snav, offset[0], offset[1], offset[2], sx, sy, sz
            );
        } else if v >= 305 {
            let _ = writeln!(
                out,
                "GLOBALTIE {:2} {:4} {:13.8} {:13.8} {:13.8} {:13.8} {:13.8} {:13.8}",
                status, snav, offset[0], offset[1], offset[2], sx, sy, sz
            );
        }
    }
}
