//! Imaging-study vocabulary offered through autocomplete.

use serde::{Deserialize, Serialize};

use crate::QuestionnaireError;

/// Label appended to every study list.
pub const NONE_LABEL: &str = "None";

/// Separator between alternate search strings in an entry's canonical value.
pub const ALTERNATE_SEPARATOR: &str = "<|***|>";

/// Which form of an entry the suggestion filter compares against.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MatchKey {
    Label,
    #[default]
    Value,
}

/// One acceptable answer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VocabularyEntry {
    /// Canonical search form, including alternate terms.
    pub value: String,
    /// What the participant sees and what gets submitted.
    pub label: String,
}

impl VocabularyEntry {
    /// Entry whose canonical value is the label itself.
    pub fn new(label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            value: label.clone(),
            label,
        }
    }

    /// Entry whose canonical value carries the alternate search terms.
    pub fn with_alternates(label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            value: expand_alternates(&label),
            label,
        }
    }

    pub fn key(&self, key: MatchKey) -> &str {
        match key {
            MatchKey::Label => &self.label,
            MatchKey::Value => &self.value,
        }
    }

    /// Strings the filter looks into; the separator itself is never searched.
    pub fn search_terms(&self, key: MatchKey) -> impl Iterator<Item = &str> {
        self.key(key).split(ALTERNATE_SEPARATOR)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Vocabulary {
    entries: Vec<VocabularyEntry>,
}

impl Vocabulary {
    pub fn new(entries: Vec<VocabularyEntry>) -> Self {
        Self { entries }
    }

    /// Builds entries from display labels; values equal labels.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: labels.into_iter().map(VocabularyEntry::new).collect(),
        }
    }

    /// Reads one study per line and appends [`NONE_LABEL`].
    ///
    /// Blank lines are skipped, so positions here are suggestion positions,
    /// not the indices recorded in responses.
    pub fn parse_study_list(text: &str) -> Result<Self, QuestionnaireError> {
        let mut labels: Vec<String> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        if labels.is_empty() {
            return Err(QuestionnaireError::MissingData);
        }
        labels.push(NONE_LABEL.to_string());
        Ok(Self::from_labels(labels))
    }

    /// Recomputes every canonical value with alternate search terms.
    pub fn with_alternates(self) -> Self {
        Self {
            entries: self
                .entries
                .into_iter()
                .map(|entry| VocabularyEntry::with_alternates(entry.label))
                .collect(),
        }
    }

    pub fn entries(&self) -> &[VocabularyEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.label.as_str())
    }

    /// Exact, case-sensitive membership among display labels.
    pub fn contains_label(&self, candidate: &str) -> bool {
        self.entries.iter().any(|entry| entry.label == candidate)
    }

    /// Position of a label in the study list, as recorded in responses.
    pub fn position(&self, label: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.label == label)
    }

    /// Indices of entries with a search term containing `query`, ignoring case.
    pub fn filter(&self, query: &str, key: MatchKey) -> Vec<usize> {
        let needle = query.to_uppercase();
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| {
                entry
                    .search_terms(key)
                    .any(|term| term.to_uppercase().contains(&needle))
            })
            .map(|(idx, _)| idx)
            .collect()
    }
}

/// Appends alternate search terms so that e.g. "CXR" finds chest radiographs.
pub fn expand_alternates(label: &str) -> String {
    let lower = label.to_lowercase();
    let words: Vec<&str> = lower
        .split(|ch: char| !ch.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .collect();
    let has_word = |needle: &str| words.iter().any(|word| *word == needle);

    let mut alternates: Vec<&str> = Vec::new();
    if lower.contains("radiograph") {
        alternates.extend(["X-ray", "X ray"]);
        if lower.contains("chest") {
            alternates.extend(["CXR", "Chest X-ray", "Chest X ray"]);
        }
    }
    if lower.contains("mri") {
        alternates.push("Magnetic Resonance Imaging");
    }
    if has_word("ct") {
        alternates.push("Computed Tomography");
    }
    if has_word("us") {
        alternates.push("Ultrasound");
    }

    let mut value = label.to_string();
    for alternate in alternates {
        value.push_str(ALTERNATE_SEPARATOR);
        value.push_str(alternate);
    }
    value
}
