//! The project aggregate.
//!
//! # Overview
//!
//! A [`Project`] owns its files (and through them their sections) and its
//! crossings in plain vectors. Everything else refers to them by typed
//! index. All mutation goes through methods on `Project` so that the
//! invariants hold after every call:
//!
//! - every crossing references existing sections, in canonical order;
//! - a crossing holds at most [`MAX_TIES`] ties, and every tie's fix
//!   indices are valid for its sections;
//! - each fix's `tie_count` equals the number of ties referencing it;
//! - the cached [`ProjectSummary`] matches the arrays.
//!
//! Mutations validate first and only then modify, so a failed call leaves
//! the project untouched.

use serde::Serialize;
use tracing::debug;

use super::crossing::{Crossing, ErrorEllipsoid, Tie, TieOffset};
use super::file::SurveyFile;
use super::ids::{CrossingId, FileId, SectionId, SectionRef, SnavIndex, TieId};
use super::paths::ProjectPaths;
use super::section::{GlobalTie, NavOffset, Section};
use super::status::{CrossingStatus, FileStatus, GridStatus, InversionStatus, TieStatus};
use super::{MAX_SNAVS, MAX_TIES};
use crate::coord::LocalScale;
use crate::error::{InvariantViolation, ProjectError, ProjectResult};

/// Default horizontal sigma floor carried as the project precision.
pub const SIGMA_MINIMUM: f64 = 0.1;

/// Default inversion smoothing weight.
pub const SMOOTHING_DEFAULT: f64 = 2.0;

/// Default z-offset display width (meters).
pub const ZOFFSET_WIDTH_DEFAULT: f64 = 5.0;

/// Survey-wide processing parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectParameters {
    /// Target section length (km).
    pub section_length: f64,
    /// Target soundings per section.
    pub section_soundings: i32,
    pub decimation: i32,
    pub contour_interval: f64,
    pub color_interval: f64,
    pub tick_interval: f64,
    pub precision: f64,
    pub smoothing: f64,
    pub zoffset_width: f64,
}

impl Default for ProjectParameters {
    fn default() -> Self {
        Self {
            section_length: 10.0,
            section_soundings: 100_000,
            decimation: 1,
            contour_interval: 25.0,
            color_interval: 100.0,
            tick_interval: 100.0,
            precision: SIGMA_MINIMUM,
            smoothing: SMOOTHING_DEFAULT,
            zoffset_width: ZOFFSET_WIDTH_DEFAULT,
        }
    }
}

/// Version strings recorded in the header the project was read from.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SourceInfo {
    pub mb_system_version: String,
    pub program_version: String,
    pub file_version: String,
    pub origin: Option<String>,
}

/// Derived counters, recomputable from the arrays at any time.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ProjectSummary {
    pub num_files: usize,
    pub num_blocks: usize,
    pub num_sections: usize,
    pub num_snavs: usize,
    pub num_crossings: usize,
    pub num_crossings_analyzed: usize,
    pub num_goodcrossings: usize,
    pub num_bettercrossings: usize,
    pub num_truecrossings: usize,
    pub num_truecrossings_analyzed: usize,
    pub num_ties: usize,
}

/// Root aggregate of a navigation adjustment project.
#[derive(Debug, Clone)]
pub struct Project {
    pub paths: ProjectPaths,
    pub source: SourceInfo,
    pub params: ProjectParameters,
    pub inversion_status: InversionStatus,
    pub grid_status: GridStatus,
    pub(crate) files: Vec<SurveyFile>,
    pub(crate) crossings: Vec<Crossing>,
    pub(crate) num_blocks: usize,
    summary: ProjectSummary,
}

impl Project {
    /// Creates an empty project.
    pub fn new(paths: ProjectPaths, params: ProjectParameters) -> Self {
        Self {
            paths,
            source: SourceInfo::default(),
            params,
            inversion_status: InversionStatus::None,
            grid_status: GridStatus::None,
            files: Vec::new(),
            crossings: Vec::new(),
            num_blocks: 0,
            summary: ProjectSummary::default(),
        }
    }

    // =========================================================================
    // Read access
    // =========================================================================

    pub fn files(&self) -> &[SurveyFile] {
        &self.files
    }

    pub fn file(&self, id: FileId) -> Option<&SurveyFile> {
        self.files.get(id.0)
    }

    pub fn crossings(&self) -> &[Crossing] {
        &self.crossings
    }

    pub fn crossing(&self, id: CrossingId) -> Option<&Crossing> {
        self.crossings.get(id.0)
    }

    pub fn section(&self, r: SectionRef) -> Option<&Section> {
        self.files.get(r.file.0)?.sections.get(r.section.0)
    }

    pub fn num_blocks(&self) -> usize {
        self.num_blocks
    }

    pub fn summary(&self) -> &ProjectSummary {
        &self.summary
    }

    /// Iterates every section with its reference, in file order.
    pub fn sections(&self) -> impl Iterator<Item = (SectionRef, &Section)> + '_ {
        self.files.iter().enumerate().flat_map(|(i, file)| {
            file.sections
                .iter()
                .enumerate()
                .map(move |(j, s)| (SectionRef::new(i, j), s))
        })
    }

    /// Finds the crossing joining two sections, in either order.
    pub fn find_crossing(&self, a: SectionRef, b: SectionRef) -> Option<CrossingId> {
        self.crossings
            .iter()
            .position(|c| c.connects(a, b))
            .map(CrossingId)
    }

    /// Scale at the mid-latitude of two sections' combined bounds.
    pub fn crossing_scale(&self, first: &Section, second: &Section) -> LocalScale {
        LocalScale::for_bounds(&first.bounds.union(&second.bounds))
    }

    pub(crate) fn require_file(&self, id: FileId) -> Result<&SurveyFile, InvariantViolation> {
        self.files.get(id.0).ok_or(InvariantViolation::UnknownFile(id))
    }

    pub(crate) fn require_section(&self, r: SectionRef) -> Result<&Section, InvariantViolation> {
        self.require_file(r.file)?;
        self.section(r).ok_or(InvariantViolation::UnknownSection(r))
    }

    pub(crate) fn require_crossing(&self, id: CrossingId) -> Result<&Crossing, InvariantViolation> {
        self.crossings
            .get(id.0)
            .ok_or(InvariantViolation::UnknownCrossing(id))
    }

    pub(crate) fn section_mut(&mut self, r: SectionRef) -> Option<&mut Section> {
        self.files.get_mut(r.file.0)?.sections.get_mut(r.section.0)
    }

    pub(crate) fn crossing_mut(&mut self, id: CrossingId) -> Option<&mut Crossing> {
        self.crossings.get_mut(id.0)
    }

    // =========================================================================
    // Files and sections
    // =========================================================================

    /// Appends a file with its sections.
    ///
    /// Stored tie counts on the incoming fixes are reset; they are owned by
    /// the project. The stored path is resolved against the project
    /// directory.
    pub fn add_file(&mut self, mut file: SurveyFile) -> ProjectResult<FileId> {
        for section in &file.sections {
            validate_section(section)?;
        }
        self.files
            .try_reserve(1)
            .map_err(|_| ProjectError::memory("files", self.files.len() + 1))?;

        for section in &mut file.sections {
            reset_tie_counts(section);
        }
        file.resolved_path = self.paths.resolve(&file.path);

        let id = FileId(self.files.len());
        self.num_blocks = self.num_blocks.max(file.block + 1);
        debug!(file = %id, path = %file.path, sections = file.sections.len(), "Added file");
        self.files.push(file);
        self.refresh_summary();
        Ok(id)
    }

    /// Appends a section to an existing file.
    pub fn add_section(&mut self, file_id: FileId, mut section: Section) -> ProjectResult<SectionId> {
        self.require_file(file_id)?;
        validate_section(&section)?;
        reset_tie_counts(&mut section);

        let file = &mut self.files[file_id.0];
        file.sections
            .try_reserve(1)
            .map_err(|_| ProjectError::memory("sections", file.sections.len() + 1))?;
        let id = SectionId(file.sections.len());
        file.sections.push(section);
        self.refresh_summary();
        Ok(id)
    }

    /// Changes a file's navigation status.
    ///
    /// Fixing a file to [`FileStatus::FixedNav`] skips every unskipped
    /// crossing it shares with another fully fixed file, since there is
    /// nothing left to adjust between them. Any status change makes a
    /// current inversion old.
    pub fn set_file_status(&mut self, file_id: FileId, status: FileStatus) -> ProjectResult<()> {
        self.require_file(file_id)?;
        self.files[file_id.0].status = status;

        if status == FileStatus::FixedNav {
            for i in 0..self.crossings.len() {
                let crossing = &self.crossings[i];
                if !crossing.involves_file(file_id) || crossing.status == CrossingStatus::Skip {
                    continue;
                }
                let other = if crossing.first().file == file_id {
                    crossing.second().file
                } else {
                    crossing.first().file
                };
                let other_fixed = self
                    .files
                    .get(other.0)
                    .map(|f| f.status == FileStatus::FixedNav)
                    .unwrap_or(false);
                if other_fixed {
                    self.crossings[i].status = CrossingStatus::Skip;
                    debug!(crossing = i, "Skipped crossing between fixed files");
                }
            }
        }

        self.inversion_status.demote();
        self.refresh_summary();
        Ok(())
    }

    /// Installs or replaces the global tie of a section.
    ///
    /// A tie with status [`TieStatus::None`] clears it instead.
    pub fn set_global_tie(&mut self, section_ref: SectionRef, tie: GlobalTie) -> ProjectResult<()> {
        let section = self.require_section(section_ref)?;
        if tie.snav.0 >= section.num_snavs() {
            return Err(InvariantViolation::SnavOutOfRange {
                section: section_ref,
                snav: tie.snav,
                count: section.num_snavs(),
            }
            .into());
        }
        let scale = section.local_scale();

        if let Some(section) = self.section_mut(section_ref) {
            if tie.status == TieStatus::None {
                section.global_tie = None;
            } else {
                let mut tie = tie;
                tie.rescale(scale);
                section.global_tie = Some(tie);
            }
        }
        self.inversion_status.demote();
        Ok(())
    }

    /// Removes the global tie of a section, returning it.
    pub fn clear_global_tie(&mut self, section_ref: SectionRef) -> ProjectResult<Option<GlobalTie>> {
        self.require_section(section_ref)?;
        let removed = self
            .section_mut(section_ref)
            .and_then(|s| s.global_tie.take());
        if removed.is_some() {
            self.inversion_status.demote();
        }
        Ok(removed)
    }

    /// Replaces the adjustment of one navigation fix.
    pub fn set_snav_offset(
        &mut self,
        section_ref: SectionRef,
        snav: SnavIndex,
        offset: NavOffset,
    ) -> ProjectResult<()> {
        let section = self.require_section(section_ref)?;
        if snav.0 >= section.num_snavs() {
            return Err(InvariantViolation::SnavOutOfRange {
                section: section_ref,
                snav,
                count: section.num_snavs(),
            }
            .into());
        }
        if let Some(fix) = self
            .section_mut(section_ref)
            .and_then(|s| s.snavs.get_mut(snav.0))
        {
            fix.offset = offset;
        }
        Ok(())
    }

    // =========================================================================
    // Crossings and ties
    // =========================================================================

    /// Records a crossing between two sections, in canonical order.
    pub fn add_crossing(&mut self, a: SectionRef, b: SectionRef) -> ProjectResult<CrossingId> {
        self.require_section(a)?;
        self.require_section(b)?;
        if a == b {
            return Err(InvariantViolation::SelfCrossing(a).into());
        }
        if let Some(existing) = self.find_crossing(a, b) {
            return Err(InvariantViolation::DuplicateCrossing {
                first: a.min(b),
                second: a.max(b),
                existing,
            }
            .into());
        }
        self.crossings
            .try_reserve(1)
            .map_err(|_| ProjectError::memory("crossings", self.crossings.len() + 1))?;

        let id = CrossingId(self.crossings.len());
        self.crossings.push(Crossing::new(a, b));
        debug!(crossing = %id, first = %a.min(b), second = %a.max(b), "Added crossing");
        self.refresh_summary();
        Ok(id)
    }

    /// Adds a tie between fix `snav_1` of the crossing's first section and
    /// fix `snav_2` of its second section.
    ///
    /// `offset` is the measured displacement from the first fix to the
    /// second. The crossing becomes [`CrossingStatus::Set`], the tie's
    /// inversion offset starts at the current difference of the two fix
    /// adjustments, and a current inversion becomes old.
    pub fn add_tie(
        &mut self,
        crossing_id: CrossingId,
        snav_1: SnavIndex,
        snav_2: SnavIndex,
        offset: NavOffset,
        sigma: ErrorEllipsoid,
    ) -> ProjectResult<TieId> {
        let crossing = self.require_crossing(crossing_id)?;
        if crossing.num_ties() >= MAX_TIES {
            return Err(InvariantViolation::TooManyTies {
                crossing: crossing_id,
                limit: MAX_TIES,
            }
            .into());
        }
        let (first_ref, second_ref) = (crossing.first(), crossing.second());
        let first = self.require_section(first_ref)?;
        let second = self.require_section(second_ref)?;
        let fix_1 = first.snav(snav_1).ok_or(InvariantViolation::SnavOutOfRange {
            section: first_ref,
            snav: snav_1,
            count: first.num_snavs(),
        })?;
        let fix_2 = second.snav(snav_2).ok_or(InvariantViolation::SnavOutOfRange {
            section: second_ref,
            snav: snav_2,
            count: second.num_snavs(),
        })?;

        let scale = self.crossing_scale(first, second);
        let tie = Tie {
            status: TieStatus::Xyz,
            snav_1,
            snav_1_time_d: fix_1.time_d,
            snav_2,
            snav_2_time_d: fix_2.time_d,
            offset: TieOffset::from_nav(offset, scale),
            sigma,
            inversion_status: InversionStatus::None,
            inversion_offset: TieOffset::from_nav(fix_2.offset - fix_1.offset, scale),
        };

        let crossing = &mut self.crossings[crossing_id.0];
        crossing
            .ties
            .try_reserve(1)
            .map_err(|_| ProjectError::memory("ties", crossing.ties.len() + 1))?;
        let tie_id = TieId(crossing.ties.len());
        crossing.ties.push(tie);
        crossing.status = CrossingStatus::Set;

        self.adjust_tie_count(first_ref, snav_1, 1);
        self.adjust_tie_count(second_ref, snav_2, 1);
        self.inversion_status.demote();
        self.refresh_summary();
        debug!(crossing = %crossing_id, tie = %tie_id, "Added tie");
        Ok(tie_id)
    }

    /// Removes a tie, returning it.
    ///
    /// Removing the last tie of a crossing marks the crossing skipped.
    pub fn remove_tie(&mut self, crossing_id: CrossingId, tie_id: TieId) -> ProjectResult<Tie> {
        let crossing = self.require_crossing(crossing_id)?;
        if tie_id.0 >= crossing.num_ties() {
            return Err(InvariantViolation::UnknownTie {
                crossing: crossing_id,
                tie: tie_id,
            }
            .into());
        }
        let (first_ref, second_ref) = (crossing.first(), crossing.second());

        let crossing = &mut self.crossings[crossing_id.0];
        let tie = crossing.ties.remove(tie_id.0);
        if crossing.ties.is_empty() {
            crossing.status = CrossingStatus::Skip;
        }

        self.adjust_tie_count(first_ref, tie.snav_1, -1);
        self.adjust_tie_count(second_ref, tie.snav_2, -1);
        self.inversion_status.demote();
        self.refresh_summary();
        debug!(crossing = %crossing_id, tie = %tie_id, "Removed tie");
        Ok(tie)
    }

    /// Changes which axes a tie constrains.
    pub fn set_tie_status(
        &mut self,
        crossing_id: CrossingId,
        tie_id: TieId,
        status: TieStatus,
    ) -> ProjectResult<()> {
        self.require_crossing(crossing_id)?;
        let tie = self.crossings[crossing_id.0]
            .ties
            .get_mut(tie_id.0)
            .ok_or(InvariantViolation::UnknownTie {
                crossing: crossing_id,
                tie: tie_id,
            })?;
        tie.status = status;
        self.inversion_status.demote();
        Ok(())
    }

    /// Drops every tie of a crossing and marks it skipped.
    pub fn skip_crossing(&mut self, crossing_id: CrossingId) -> ProjectResult<()> {
        let crossing = self.require_crossing(crossing_id)?;
        let (first_ref, second_ref) = (crossing.first(), crossing.second());

        let ties = std::mem::take(&mut self.crossings[crossing_id.0].ties);
        self.crossings[crossing_id.0].status = CrossingStatus::Skip;
        for tie in &ties {
            self.adjust_tie_count(first_ref, tie.snav_1, -1);
            self.adjust_tie_count(second_ref, tie.snav_2, -1);
        }
        self.inversion_status.demote();
        self.refresh_summary();
        debug!(crossing = %crossing_id, removed = ties.len(), "Skipped crossing");
        Ok(())
    }

    /// Canonicalizes every crossing, returning how many were reordered.
    pub fn canonicalize_crossings(&mut self) -> usize {
        self.crossings
            .iter_mut()
            .map(|c| c.canonicalize())
            .filter(|&swapped| swapped)
            .count()
    }

    fn adjust_tie_count(&mut self, section_ref: SectionRef, snav: SnavIndex, delta: i32) {
        if let Some(fix) = self
            .section_mut(section_ref)
            .and_then(|s| s.snavs.get_mut(snav.0))
        {
            fix.tie_count = if delta >= 0 {
                fix.tie_count.saturating_add(delta as u32)
            } else {
                fix.tie_count.saturating_sub(delta.unsigned_abs())
            };
        }
    }

    /// Recomputes the stored tie counts of every fix from the ties.
    pub(crate) fn rebuild_tie_counts(&mut self) {
        for file in &mut self.files {
            for section in &mut file.sections {
                reset_tie_counts(section);
            }
        }
        let refs: Vec<(SectionRef, SnavIndex, SectionRef, SnavIndex)> = self
            .crossings
            .iter()
            .flat_map(|c| {
                let (a, b) = (c.first(), c.second());
                c.ties.iter().map(move |t| (a, t.snav_1, b, t.snav_2))
            })
            .collect();
        for (a, snav_1, b, snav_2) in refs {
            self.adjust_tie_count(a, snav_1, 1);
            self.adjust_tie_count(b, snav_2, 1);
        }
    }

    // =========================================================================
    // Summary
    // =========================================================================

    /// Recomputes the cached counters from the arrays.
    pub fn refresh_summary(&mut self) {
        let mut summary = ProjectSummary {
            num_files: self.files.len(),
            num_blocks: self.num_blocks,
            num_crossings: self.crossings.len(),
            ..ProjectSummary::default()
        };
        for file in &self.files {
            summary.num_sections += file.sections.len();
            summary.num_snavs += file.sections.iter().map(Section::num_snavs).sum::<usize>();
        }
        for crossing in &self.crossings {
            let analyzed = crossing.status != CrossingStatus::None;
            if analyzed {
                summary.num_crossings_analyzed += 1;
            }
            if crossing.is_good() {
                summary.num_goodcrossings += 1;
            }
            if crossing.is_better() {
                summary.num_bettercrossings += 1;
            }
            if crossing.truecrossing {
                summary.num_truecrossings += 1;
                if analyzed {
                    summary.num_truecrossings_analyzed += 1;
                }
            }
            summary.num_ties += crossing.num_ties();
        }
        self.summary = summary;
    }
}

fn validate_section(section: &Section) -> Result<(), InvariantViolation> {
    if section.num_snavs() > MAX_SNAVS {
        return Err(InvariantViolation::TooManySnavs {
            count: section.num_snavs(),
            limit: MAX_SNAVS,
        });
    }
    Ok(())
}

fn reset_tie_counts(section: &mut Section) {
    for fix in &mut section.snavs {
        fix.tie_count = 0;
    }
}
