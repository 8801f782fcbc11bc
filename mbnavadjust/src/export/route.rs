//! mbgrdviz route files marking crossings and ties.
//!
//! Each route is a two point line. Crossing routes join the effective mid
//! fixes of the two sections, tie routes join the two tied fixes. Crossings
//! are split into exclusive categories: any crossing touching a fixed file
//! is "fixed"; the rest are binned as true crossings, then by overlap.
//! A true crossing therefore never also appears in an overlap file, so
//! each file holds exactly the routes its header counts.

use std::fmt::Write as _;
use std::path::PathBuf;

use tracing::debug;

use super::write_text;
use crate::codec::{Provenance, MB_SYSTEM_VERSION, PROGRAM_VERSION};
use crate::coord::GeoPoint;
use crate::error::ProjectResult;
use crate::model::{Crossing, CrossingStatus, FileStatus, Project, SectionRef};

/// Version of the route file layout.
pub const ROUTE_VERSION: &str = "1.00";

const OUTPUT_PROGRAM: &str = "mbnavadjust";

/// Display colors understood by mbgrdviz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteColor {
    Black = 0,
    Red = 1,
    Yellow = 2,
    Green = 3,
    BlueGreen = 4,
    Blue = 5,
    Purple = 6,
}

/// The route files written for a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteCategory {
    TrueCrossings,
    /// Overlap of at least 50 percent.
    BetterCrossings,
    /// Overlap of at least 25 but under 50 percent.
    GoodCrossings,
    PoorCrossings,
    FixedCrossings,
    UnfixedTies,
    FixedTies,
}

impl RouteCategory {
    pub const ALL: [RouteCategory; 7] = [
        RouteCategory::TrueCrossings,
        RouteCategory::BetterCrossings,
        RouteCategory::GoodCrossings,
        RouteCategory::PoorCrossings,
        RouteCategory::FixedCrossings,
        RouteCategory::UnfixedTies,
        RouteCategory::FixedTies,
    ];

    /// File name suffix appended to the project name.
    pub fn suffix(self) -> &'static str {
        match self {
            RouteCategory::TrueCrossings => "_truecrossing.rte",
            RouteCategory::BetterCrossings => "_gt50crossing.rte",
            RouteCategory::GoodCrossings => "_gt25crossing.rte",
            RouteCategory::PoorCrossings => "_lt25crossing.rte",
            RouteCategory::FixedCrossings => "_fixedcrossing.rte",
            RouteCategory::UnfixedTies => "_unfixedties.rte",
            RouteCategory::FixedTies => "_fixedties.rte",
        }
    }

    fn is_ties(self) -> bool {
        matches!(self, RouteCategory::UnfixedTies | RouteCategory::FixedTies)
    }
}

/// A named two point route.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub name: String,
    pub color: RouteColor,
    pub points: [GeoPoint; 2],
}

fn touches_fixed(project: &Project, crossing: &Crossing) -> bool {
    [crossing.first().file, crossing.second().file]
        .iter()
        .any(|&f| project.file(f).map(|f| f.status) == Some(FileStatus::FixedNav))
}

fn crossing_category(project: &Project, crossing: &Crossing) -> RouteCategory {
    if touches_fixed(project, crossing) {
        RouteCategory::FixedCrossings
    } else if crossing.truecrossing {
        RouteCategory::TrueCrossings
    } else if crossing.is_better() {
        RouteCategory::BetterCrossings
    } else if crossing.is_good() {
        RouteCategory::GoodCrossings
    } else {
        RouteCategory::PoorCrossings
    }
}

fn status_char(status: CrossingStatus) -> char {
    match status {
        CrossingStatus::None => 'U',
        CrossingStatus::Set => '*',
        CrossingStatus::Skip => '-',
    }
}

fn crossing_label(project: &Project, index: usize, crossing: &Crossing) -> String {
    let block = |r: SectionRef| project.file(r.file).map(|f| f.block).unwrap_or(0);
    let (a, b) = (crossing.first(), crossing.second());
    format!(
        "{}{} {:4} {:02}:{:03}:{:03} {:02}:{:03}:{:03} {:3}",
        status_char(crossing.status),
        if crossing.truecrossing { 'X' } else { ' ' },
        index,
        block(a),
        a.file.0,
        a.section.0,
        block(b),
        b.file.0,
        b.section.0,
        crossing.overlap
    )
}

/// Routes belonging to one category, in crossing order.
pub fn collect_routes(project: &Project, category: RouteCategory) -> Vec<Route> {
    let mut routes = Vec::new();
    for (i, crossing) in project.crossings().iter().enumerate() {
        let (Some(first), Some(second)) = (
            project.section(crossing.first()),
            project.section(crossing.second()),
        ) else {
            continue;
        };

        if !category.is_ties() {
            if crossing_category(project, crossing) != category {
                continue;
            }
            let color = match crossing.status {
                CrossingStatus::None => RouteColor::Yellow,
                CrossingStatus::Set => RouteColor::Green,
                CrossingStatus::Skip => RouteColor::Red,
            };
            routes.push(Route {
                name: format!("{} {:2}", crossing_label(project, i, crossing), crossing.num_ties()),
                color,
                points: [first.mid_position(), second.mid_position()],
            });
            continue;
        }

        if crossing.status != CrossingStatus::Set {
            continue;
        }
        let fixed = touches_fixed(project, crossing);
        let color = match (category, fixed) {
            (RouteCategory::FixedTies, true) => RouteColor::Red,
            (RouteCategory::UnfixedTies, false) => RouteColor::BlueGreen,
            _ => continue,
        };
        for (j, tie) in crossing.ties().iter().enumerate() {
            let (Some(s1), Some(s2)) = (first.snav(tie.snav_1), second.snav(tie.snav_2)) else {
                continue;
            };
            routes.push(Route {
                name: format!(
                    "Tie: {} {:2} of {:2}",
                    crossing_label(project, i, crossing),
                    j,
                    crossing.num_ties()
                ),
                color,
                points: [s1.effective_position(), s2.effective_position()],
            });
        }
    }
    routes
}

/// Renders a complete route file.
pub fn render_route_file(routes: &[Route], project: &Project, provenance: &Provenance) -> String {
    let mb_system_version = if project.source.mb_system_version.is_empty() {
        MB_SYSTEM_VERSION
    } else {
        project.source.mb_system_version.as_str()
    };

    let mut out = String::new();
    let _ = writeln!(out, "## Route File Version {}", ROUTE_VERSION);
    let _ = writeln!(out, "## Output by Program {}", OUTPUT_PROGRAM);
    let _ = writeln!(out, "## Program Version {}", PROGRAM_VERSION);
    let _ = writeln!(out, "## MB-System Version {}", mb_system_version);
    let _ = writeln!(
        out,
        "## Run by user <{}> on cpu <{}> at <{}>",
        provenance.user, provenance.host, provenance.timestamp
    );
    let _ = writeln!(out, "## Number of routes: {}", routes.len());
    out.push_str("## Route point format:\n");
    out.push_str("##   <longitude (deg)> <latitude (deg)> <topography (m)> <waypoint (boolean)>\n");

    for route in routes {
        let _ = writeln!(out, "## ROUTENAME {}", route.name);
        out.push_str("## ROUTESIZE 1\n");
        let _ = writeln!(out, "## ROUTECOLOR {}", route.color as i32);
        out.push_str("## ROUTEPOINTS 2\n");
        out.push_str("## ROUTEEDITMODE 0\n");
        out.push_str("> ## STARTROUTE\n");
        for p in &route.points {
            let _ = writeln!(out, "{:.10} {:.10} 0.00 1", p.lon, p.lat);
        }
        out.push_str(">\n");
    }
    out
}

/// Writes one route file per category, returning their paths.
pub fn write_route_files(project: &Project, provenance: &Provenance) -> ProjectResult<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(RouteCategory::ALL.len());
    for category in RouteCategory::ALL {
        let routes = collect_routes(project, category);
        let path = project.paths.sibling(category.suffix());
        write_text(&path, &render_route_file(&routes, project, provenance))?;
        debug!(path = %path.display(), routes = routes.len(), "Wrote route file");
        written.push(path);
    }
    Ok(written)
}
