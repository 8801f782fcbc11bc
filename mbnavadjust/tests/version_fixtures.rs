//! Reading every historical project format.

mod common;

use common::{Fixture, GLOBAL_TIE_OFFSET, GLOBAL_TIE_SIGMAS, VERSIONS};
use mbnavadjust::codec::{parse_project, serialize_project, Provenance};
use mbnavadjust::manager::verify_tie_counts;
use mbnavadjust::model::{
    CrossingStatus, FileId, InversionStatus, ProjectParameters, SectionRef, SnavIndex, TieStatus,
    SIGMA_MINIMUM,
};
use mbnavadjust::{Project, ProjectError};

fn provenance() -> Provenance {
    Provenance {
        user: "tester".to_string(),
        host: "bench".to_string(),
        timestamp: "Sat Oct 17 12:00:00 2026".to_string(),
    }
}

fn load(fixture: &Fixture) -> Project {
    parse_project(&fixture.render())
        .unwrap_or_else(|e| panic!("format {} failed: {}", fixture.version_text(), e))
}

// =============================================================================
// Structure
// =============================================================================

#[test]
fn test_every_version_loads() {
    for version in VERSIONS {
        let p = load(&Fixture::new(version));
        let summary = p.summary();
        assert_eq!(summary.num_files, 2, "format {}", version);
        assert_eq!(summary.num_sections, 2, "format {}", version);
        assert_eq!(summary.num_snavs, 6, "format {}", version);
        assert_eq!(summary.num_crossings, 1, "format {}", version);
        assert_eq!(summary.num_ties, 1, "format {}", version);
        assert_eq!(summary.num_crossings_analyzed, 1, "format {}", version);
        assert_eq!(p.crossings()[0].status, CrossingStatus::Set);
        assert!(verify_tie_counts(&p).is_empty(), "format {}", version);
        assert_eq!(p.source.file_version, Fixture::new(version).version_text());
    }
}

#[test]
fn test_header_defaults_by_version() {
    for version in VERSIONS {
        let p = load(&Fixture::new(version));
        let params = &p.params;

        let soundings = if version >= 101 { 50_000 } else { 100_000 };
        assert_eq!(params.section_soundings, soundings, "format {}", version);

        let precision = if (103..301).contains(&version) { 0.5 } else { SIGMA_MINIMUM };
        assert_eq!(params.precision, precision, "format {}", version);

        let smoothing = if version >= 301 { 3.0 } else { 2.0 };
        assert_eq!(params.smoothing, smoothing, "format {}", version);

        let zoffset = if version >= 105 { 7.0 } else { 5.0 };
        assert_eq!(params.zoffset_width, zoffset, "format {}", version);

        assert_eq!(params.decimation, 2);
        assert_eq!(params.contour_interval, 50.0);
        assert_eq!(p.inversion_status, InversionStatus::None);
    }
}

#[test]
fn test_origin_only_from_302() {
    assert!(load(&Fixture::new(301)).source.origin.is_none());
    let origin = load(&Fixture::new(302)).source.origin.unwrap();
    assert!(origin.contains("<tester>"));
}

// =============================================================================
// Records
// =============================================================================

#[test]
fn test_snav_offsets_flip_before_300() {
    for version in VERSIONS {
        let p = load(&Fixture::new(version));
        let fix = &p.section(SectionRef::new(1, 0)).unwrap().snavs[1];
        let expected = match version {
            100 => 0.0,
            v if v < 300 => -0.001,
            _ => 0.001,
        };
        assert!(
            (fix.offset.lon - expected).abs() < 1e-12,
            "format {}: offset {}",
            version,
            fix.offset.lon
        );
    }
}

#[test]
fn test_tie_fields_by_version() {
    for version in VERSIONS {
        let p = load(&Fixture::new(version));
        let tie = &p.crossings()[0].ties()[0];

        assert_eq!(tie.status, TieStatus::Xyz);
        assert_eq!(tie.snav_1, SnavIndex(1));
        assert_eq!(tie.snav_1_time_d, 1001.0);
        assert!((tie.offset.x - 0.0001).abs() < 1e-12);
        assert!(tie.offset.x_m > 8.0 && tie.offset.x_m < 10.0, "x_m {}", tie.offset.x_m);

        let z = if version >= 104 { 1.5 } else { 0.0 };
        assert_eq!(tie.offset.z_m, z, "format {}", version);

        let sigmas: Vec<f64> = tie.sigma.axes.iter().map(|a| a.sigma).collect();
        if version >= 200 {
            assert_eq!(sigmas, vec![0.1, 2.0, 0.001], "format {}", version);
        } else {
            assert_eq!(sigmas, vec![100.0, 100.0, 100.0], "format {}", version);
        }
    }
}

#[test]
fn test_overlap_computed_when_not_stored() {
    for version in VERSIONS {
        let p = load(&Fixture::new(version));
        let overlap = p.crossings()[0].overlap;
        if version >= 106 {
            assert_eq!(overlap, 100, "format {}", version);
        } else {
            assert!((1..=100).contains(&overlap), "format {}: {}", version, overlap);
        }
    }
}

#[test]
fn test_blocks_by_version() {
    for version in VERSIONS {
        let p = load(&Fixture::new(version));
        // Neither file continues its predecessor, so older formats derive
        // one block per file; 3.06 stores a shared block.
        let (blocks, second) = if version >= 306 { (1, 0) } else { (2, 1) };
        assert_eq!(p.num_blocks(), blocks, "format {}", version);
        assert_eq!(p.file(FileId(1)).unwrap().block, second, "format {}", version);
    }
}

#[test]
fn test_global_tie_read_by_version() {
    // 3.04 has no status field, so any fix implies XYZ.
    for (version, status, expected) in [(304, 2, TieStatus::Xyz), (305, 2, TieStatus::Xy), (307, 3, TieStatus::Z)] {
        let fixture = Fixture {
            global_tie: Some((status, 1)),
            ..Fixture::new(version)
        };
        let p = load(&fixture);
        let tie = p
            .section(SectionRef::new(0, 0))
            .unwrap()
            .global_tie
            .clone()
            .unwrap_or_else(|| panic!("format {}: no global tie", version));

        assert_eq!(tie.status, expected, "format {}", version);
        assert_eq!(tie.snav, SnavIndex(1));
        assert!((tie.offset_x - GLOBAL_TIE_OFFSET[0]).abs() < 1e-9);
        assert!((tie.offset_y - GLOBAL_TIE_OFFSET[1]).abs() < 1e-9);
        assert_eq!(tie.offset_z_m, GLOBAL_TIE_OFFSET[2]);
        assert!(tie.offset_x_m > 80.0 && tie.offset_x_m < 100.0, "x_m {}", tie.offset_x_m);
        assert!(tie.offset_y_m < -200.0 && tie.offset_y_m > -240.0, "y_m {}", tie.offset_y_m);
        assert_eq!([tie.sigma_x, tie.sigma_y, tie.sigma_z], GLOBAL_TIE_SIGMAS);
        assert!(p.section(SectionRef::new(1, 0)).unwrap().global_tie.is_none());
    }
}

#[test]
fn test_global_tie_survives_upgrade() {
    for version in [304, 305, 307] {
        let fixture = Fixture {
            global_tie: Some((2, 2)),
            ..Fixture::new(version)
        };
        let p = load(&fixture);
        let text = serialize_project(&p, &provenance());
        let again = parse_project(&text).unwrap();

        let before = p.section(SectionRef::new(0, 0)).unwrap().global_tie.clone();
        let after = again.section(SectionRef::new(0, 0)).unwrap().global_tie.clone();
        assert!(before.is_some(), "format {}", version);
        assert_eq!(after, before, "format {}", version);
    }
}

#[test]
fn test_global_tie_with_status_none_is_dropped() {
    let fixture = Fixture {
        global_tie: Some((0, 1)),
        ..Fixture::new(307)
    };
    assert!(load(&fixture).section(SectionRef::new(0, 0)).unwrap().global_tie.is_none());
}

#[test]
fn test_global_tie_fix_out_of_range() {
    for version in [304, 305, 307] {
        let fixture = Fixture {
            global_tie: Some((1, 7)),
            ..Fixture::new(version)
        };
        let text = fixture.render();
        let line = text.lines().position(|l| l.starts_with("GLOBALTIE")).unwrap() + 1;
        match parse_project(&text) {
            Err(ProjectError::Parse(e)) => {
                assert_eq!(e.line, line, "format {}", version);
                assert!(e.content.starts_with("GLOBALTIE"));
            }
            other => panic!("format {}: unexpected {:?}", version, other.map(|_| ())),
        }
    }
}

#[test]
fn test_global_tie_absent() {
    for version in [304, 305, 307] {
        let p = load(&Fixture::new(version));
        assert!(p.section(SectionRef::new(0, 0)).unwrap().global_tie.is_none());
    }
}

// =============================================================================
// Load-time repairs
// =============================================================================

#[test]
fn test_descending_crossing_is_reordered() {
    for version in [106, 307] {
        let fixture = Fixture {
            descending: true,
            tie_snavs: (0, 2),
            ..Fixture::new(version)
        };
        let p = load(&fixture);
        let crossing = &p.crossings()[0];
        assert_eq!(crossing.first(), SectionRef::new(0, 0), "format {}", version);
        assert_eq!(crossing.second(), SectionRef::new(1, 0));

        let tie = &crossing.ties()[0];
        assert_eq!(tie.snav_1, SnavIndex(2));
        assert_eq!(tie.snav_2, SnavIndex(0));
        assert_eq!(tie.snav_1_time_d, 1002.0);
        assert_eq!(tie.snav_2_time_d, 1000.0);
        assert!((tie.offset.x + 0.0001).abs() < 1e-12);
        assert!((tie.offset.y - 0.0002).abs() < 1e-12);
        assert!(verify_tie_counts(&p).is_empty());
    }
}

#[test]
fn test_out_of_range_tie_fix_is_remapped() {
    let fixture = Fixture {
        tie_snavs: (1, 50),
        ..Fixture::new(307)
    };
    let p = load(&fixture);
    let tie = &p.crossings()[0].ties()[0];
    assert_eq!(tie.snav_2, SnavIndex(2));
    assert_eq!(tie.snav_2_time_d, 1002.0);
}

#[test]
fn test_outrageous_inversion_offset_is_discarded() {
    let fixture = Fixture {
        inversion_x: 20_000.0,
        ..Fixture::new(307)
    };
    let p = load(&fixture);
    let tie = &p.crossings()[0].ties()[0];
    assert_eq!(tie.inversion_offset.x, 0.0);
    assert_eq!(tie.inversion_status, InversionStatus::Old);
}

#[test]
fn test_truncated_fixture_reports_line() {
    for version in VERSIONS {
        let text = Fixture::new(version).render();
        let kept: Vec<&str> = text.lines().collect();
        let cut = kept[..kept.len() - 1].join("\n");
        match parse_project(&cut) {
            Err(ProjectError::Parse(e)) => {
                assert_eq!(e.line, kept.len(), "format {}", version);
                assert_eq!(e.version.map(|v| v.id()), Some(version));
            }
            other => panic!("format {}: unexpected {:?}", version, other.map(|_| ())),
        }
    }
}

// =============================================================================
// Upgrade
// =============================================================================

#[test]
fn test_every_version_upgrades_to_current() {
    for version in VERSIONS {
        let p = load(&Fixture::new(version));
        let text = serialize_project(&p, &provenance());
        assert!(text.contains("FILE_VERSION\t3.07\n"));
        let again = parse_project(&text).unwrap();

        assert_eq!(again.files(), p.files(), "format {}", version);
        assert_eq!(again.summary(), p.summary(), "format {}", version);
        // PRECISION is no longer written, so it reverts to the floor
        let expected = ProjectParameters {
            precision: SIGMA_MINIMUM,
            ..p.params.clone()
        };
        assert_eq!(again.params, expected, "format {}", version);
        assert_eq!(serialize_project(&again, &provenance()), text, "format {}", version);
    }
}
