//! Profile completion scoring.

mod rules;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::StudentProfile;
use super::visibility::{ProfileSection, SectionVisibility};
use rules::section_completed;

/// Completion percentage of `profile` over the sections visible under `visibility`.
///
/// Absent visibility means every section applies. Returns `0.0` when nothing is visible.
pub fn compute_completion(
    profile: &StudentProfile,
    visibility: Option<&SectionVisibility>,
) -> f64 {
    CompletionReport::evaluate(profile, visibility).percentage
}

/// Outcome for a single section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionStatus {
    pub section: ProfileSection,
    pub completed: bool,
    pub visible: bool,
}

/// Completion percentage together with the per-section trail it was computed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionReport {
    pub percentage: f64,
    pub completed_sections: usize,
    pub visible_sections: usize,
    pub sections: Vec<SectionStatus>,
}

impl CompletionReport {
    pub fn evaluate(profile: &StudentProfile, visibility: Option<&SectionVisibility>) -> Self {
        let sections: Vec<SectionStatus> = ProfileSection::ALL
            .into_iter()
            .map(|section| SectionStatus {
                section,
                completed: section_completed(profile, section),
                visible: visibility
                    .map(|config| config.is_visible(section))
                    .unwrap_or(true),
            })
            .collect();

        let visible_sections = sections.iter().filter(|status| status.visible).count();
        let completed_sections = sections
            .iter()
            .filter(|status| status.visible && status.completed)
            .count();

        let percentage = if visible_sections == 0 {
            0.0
        } else {
            round_to_hundredths(completed_sections as f64 * 100.0 / visible_sections as f64)
        };

        debug!(
            completed_sections,
            visible_sections, percentage, "profile completion evaluated"
        );

        Self {
            percentage,
            completed_sections,
            visible_sections,
            sections,
        }
    }

    /// Visible sections that still need input.
    pub fn outstanding(&self) -> impl Iterator<Item = ProfileSection> + '_ {
        self.sections
            .iter()
            .filter(|status| status.visible && !status.completed)
            .map(|status| status.section)
    }
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
