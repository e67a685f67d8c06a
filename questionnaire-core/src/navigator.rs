//! One-question-at-a-time pagination with guarded transitions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::validator::InputValidator;
use crate::QuestionnaireError;

/// Guidance blocks per question never exceed this rank.
pub const MAX_GUIDANCE_RANK: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavOutcome {
    Moved { from: usize, to: usize },
    /// Guard passed but the active question is already at the boundary.
    Stayed,
    /// The active answer failed validation; the field shows the alert style.
    Rejected,
}

/// Identifier of a guidance block, rendered as `guidelines-Q{question}-T{rank}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GuidancePanel {
    pub question: usize,
    pub rank: usize,
}

impl GuidancePanel {
    /// Only the first ranked block starts expanded.
    pub fn expanded(&self) -> bool {
        self.rank == 1
    }

    pub fn dom_id(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for GuidancePanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "guidelines-Q{}-T{}", self.question, self.rank)
    }
}

/// What the page shows for the current state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageView {
    pub active: usize,
    pub total: usize,
    pub show_previous: bool,
    pub show_next: bool,
    pub guidance: Vec<GuidancePanel>,
}

impl PageView {
    pub fn is_active(&self, question: usize) -> bool {
        self.active == question
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Navigator {
    active: usize,
    total: usize,
    has_guidance: Vec<bool>,
    guidance_counts: Vec<usize>,
}

impl Navigator {
    /// `has_guidance` and `guidance_counts` are indexed by display position.
    pub fn new(
        total: usize,
        has_guidance: Vec<bool>,
        guidance_counts: Vec<usize>,
    ) -> Result<Self, QuestionnaireError> {
        if total == 0 {
            return Err(QuestionnaireError::MissingData);
        }
        for actual in [has_guidance.len(), guidance_counts.len()] {
            if actual != total {
                return Err(QuestionnaireError::LengthMismatch {
                    expected: total,
                    actual,
                });
            }
        }
        Ok(Self {
            active: 1,
            total,
            has_guidance,
            guidance_counts,
        })
    }

    /// Navigator without any guidance panels.
    pub fn plain(total: usize) -> Result<Self, QuestionnaireError> {
        Self::new(total, vec![false; total], vec![0; total])
    }

    /// 1-based index of the active question.
    pub fn active(&self) -> usize {
        self.active
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Zero-based slot of the active question, for indexing answer arrays.
    pub fn active_slot(&self) -> usize {
        self.active - 1
    }

    pub fn next(&mut self, answer: &str, validator: &InputValidator<'_>) -> NavOutcome {
        if !validator.check(answer).accepted {
            return NavOutcome::Rejected;
        }
        self.move_to((self.active + 1).min(self.total))
    }

    pub fn back(&mut self, answer: &str, validator: &InputValidator<'_>) -> NavOutcome {
        if !validator.check_allow_empty(answer).accepted {
            return NavOutcome::Rejected;
        }
        self.move_to(self.active.saturating_sub(1).max(1))
    }

    fn move_to(&mut self, target: usize) -> NavOutcome {
        if target == self.active {
            return NavOutcome::Stayed;
        }
        let from = self.active;
        self.active = target;
        NavOutcome::Moved { from, to: target }
    }

    pub fn view(&self) -> PageView {
        PageView {
            active: self.active,
            total: self.total,
            show_previous: self.active > 1,
            show_next: self.active < self.total,
            guidance: self.visible_guidance(),
        }
    }

    fn visible_guidance(&self) -> Vec<GuidancePanel> {
        let slot = self.active_slot();
        if !self.has_guidance.get(slot).copied().unwrap_or(false) {
            return Vec::new();
        }
        let count = self
            .guidance_counts
            .get(slot)
            .copied()
            .unwrap_or(0)
            .min(MAX_GUIDANCE_RANK);
        (1..=count)
            .map(|rank| GuidancePanel {
                question: self.active,
                rank,
            })
            .collect()
    }
}
