//! Project statistics.

use std::path::Path;

use mbnavadjust::model::{InversionStatus, ProjectParameters, ProjectSummary};
use mbnavadjust::store::open_project;
use mbnavadjust::Project;
use serde::Serialize;

use crate::error::CliError;

#[derive(Debug, Serialize)]
struct InfoReport<'a> {
    name: &'a str,
    home: &'a Path,
    file_version: &'a str,
    inversion: &'static str,
    params: &'a ProjectParameters,
    summary: &'a ProjectSummary,
}

impl<'a> InfoReport<'a> {
    fn new(project: &'a Project) -> Self {
        Self {
            name: &project.paths.name,
            home: &project.paths.home,
            file_version: &project.source.file_version,
            inversion: inversion_label(project.inversion_status),
            params: &project.params,
            summary: project.summary(),
        }
    }
}

fn inversion_label(status: InversionStatus) -> &'static str {
    match status {
        InversionStatus::None => "none",
        InversionStatus::Old => "old",
        InversionStatus::Current => "current",
    }
}

/// Print counts and parameters of a project.
pub fn run(path: &Path, json: bool) -> Result<(), CliError> {
    let project = open_project(path)?;
    let report = InfoReport::new(&project);

    if json {
        let text = serde_json::to_string_pretty(&report).map_err(|e| CliError::Output(e.to_string()))?;
        println!("{}", text);
    } else {
        print!("{}", render_text(&report));
    }
    Ok(())
}

fn render_text(report: &InfoReport<'_>) -> String {
    let s = report.summary;
    let p = report.params;
    let mut lines = vec![
        format!("Project: {}", report.name),
        format!("  Home:           {}", report.home.display()),
        format!("  Format:         {}", report.file_version),
        format!("  Inversion:      {}", report.inversion),
        String::new(),
        format!("  Files:          {} in {} block(s)", s.num_files, s.num_blocks),
        format!("  Sections:       {}", s.num_sections),
        format!("  Nav fixes:      {}", s.num_snavs),
        format!("  Crossings:      {} ({} analyzed)", s.num_crossings, s.num_crossings_analyzed),
        format!("    >=50% overlap: {}", s.num_bettercrossings),
        format!("    >=25% overlap: {}", s.num_goodcrossings),
        format!(
            "    true:          {} ({} analyzed)",
            s.num_truecrossings, s.num_truecrossings_analyzed
        ),
        format!("  Ties:           {}", s.num_ties),
        String::new(),
        format!("  Section length: {} km", p.section_length),
        format!("  Soundings:      {}", p.section_soundings),
        format!("  Decimation:     {}", p.decimation),
        format!("  Smoothing:      {}", p.smoothing),
        format!("  Z offset width: {}", p.zoffset_width),
    ];
    lines.push(String::new());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::two_track_project;
    use tempfile::TempDir;

    #[test]
    fn test_text_report() {
        let dir = TempDir::new().unwrap();
        let home = two_track_project(dir.path());
        let project = open_project(&home).unwrap();

        let text = render_text(&InfoReport::new(&project));
        assert!(text.starts_with("Project: survey\n"));
        assert!(text.contains("  Files:          2 in 1 block(s)\n"));
        assert!(text.contains("  Format:         3.07\n"));
    }

    #[test]
    fn test_json_report_has_summary() {
        let dir = TempDir::new().unwrap();
        let home = two_track_project(dir.path());
        let project = open_project(&home).unwrap();

        let value = serde_json::to_value(InfoReport::new(&project)).unwrap();
        assert_eq!(value["name"], "survey");
        assert_eq!(value["summary"]["num_files"], 2);
        assert_eq!(value["summary"]["num_crossings"], 0);
        assert_eq!(value["inversion"], "none");
    }

    #[test]
    fn test_missing_project() {
        let dir = TempDir::new().unwrap();
        let result = run(&dir.path().join("nothing.nvh"), false);
        assert!(matches!(result, Err(CliError::Project(_))));
    }
}
