//! Acceptance check for free-text answers.

use serde::{Deserialize, Serialize};

use crate::vocabulary::Vocabulary;

/// Border treatment of the answer field after a check.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FieldStyle {
    #[default]
    Normal,
    Alert,
}

impl FieldStyle {
    /// Border colour applied to the input.
    pub fn border_color(self) -> Option<&'static str> {
        match self {
            FieldStyle::Normal => None,
            FieldStyle::Alert => Some("#b42318"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Verdict {
    pub accepted: bool,
    pub style: FieldStyle,
}

impl Verdict {
    fn from_accepted(accepted: bool) -> Self {
        Self {
            accepted,
            style: if accepted {
                FieldStyle::Normal
            } else {
                FieldStyle::Alert
            },
        }
    }
}

/// Accepts a value only when it is exactly one of the vocabulary labels.
///
/// Substring and case-insensitive matching belong to suggestion filtering;
/// acceptance never relaxes.
#[derive(Debug, Clone, Copy)]
pub struct InputValidator<'a> {
    vocabulary: &'a Vocabulary,
}

impl<'a> InputValidator<'a> {
    pub fn new(vocabulary: &'a Vocabulary) -> Self {
        Self { vocabulary }
    }

    pub fn is_valid(&self, value: &str) -> bool {
        self.vocabulary.contains_label(value)
    }

    pub fn check(&self, value: &str) -> Verdict {
        Verdict::from_accepted(self.is_valid(value))
    }

    /// Same as [`check`](Self::check) but an untouched (empty) field passes.
    pub fn check_allow_empty(&self, value: &str) -> Verdict {
        Verdict::from_accepted(value.is_empty() || self.is_valid(value))
    }
}
