//! Tie count consistency checks.

use serde::Serialize;

use crate::model::{Project, SectionRef};

/// A section whose stored per-fix tie counts disagree with its ties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TieCountMismatch {
    pub section: SectionRef,
    pub stored: Vec<u32>,
    pub derived: Vec<u32>,
}

/// Counts the ties referencing each fix of a section.
pub fn tie_counts_for(project: &Project, section_ref: SectionRef) -> Vec<u32> {
    let Some(section) = project.section(section_ref) else {
        return Vec::new();
    };
    let mut counts = vec![0u32; section.num_snavs()];
    for crossing in project.crossings() {
        for tie in crossing.ties() {
            if crossing.first() == section_ref {
                if let Some(n) = counts.get_mut(tie.snav_1.0) {
                    *n += 1;
                }
            }
            if crossing.second() == section_ref {
                if let Some(n) = counts.get_mut(tie.snav_2.0) {
                    *n += 1;
                }
            }
        }
    }
    counts
}

/// Lists every section whose stored tie counts differ from the ties.
pub fn verify_tie_counts(project: &Project) -> Vec<TieCountMismatch> {
    project
        .sections()
        .filter_map(|(section_ref, section)| {
            let stored = section.snav_tie_counts();
            let derived = tie_counts_for(project, section_ref);
            (stored != derived).then_some(TieCountMismatch {
                section: section_ref,
                stored,
                derived,
            })
        })
        .collect()
}
