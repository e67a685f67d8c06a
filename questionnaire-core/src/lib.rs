//! Core state machines for the imaging-order case questionnaire.
//!
//! Everything here is platform neutral: the browser layer feeds user events
//! in and renders the returned view state.

use serde::{Deserialize, Serialize};

pub mod access;
pub mod autocomplete;
pub mod completion;
pub mod navigator;
pub mod submission;
pub mod timer;
pub mod validator;
pub mod vocabulary;

pub use access::{AccessGate, UID_LENGTH};
pub use autocomplete::{Autocomplete, Key, KeyOutcome};
pub use completion::{Completion, CompletionTracker};
pub use navigator::{GuidancePanel, NavOutcome, Navigator, PageView};
pub use submission::SubmissionForm;
pub use timer::{Countdown, Tick, TimeParts, TICK_INTERVAL_MS};
pub use validator::{FieldStyle, InputValidator, Verdict};
pub use vocabulary::{MatchKey, Vocabulary, VocabularyEntry, NONE_LABEL};

/// Default countdown length for timed sessions.
pub const DEFAULT_TIME_LIMIT_SECS: u32 = 30 * 60;

/// Per-participant settings handed to the page at load time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PageConfig {
    pub uid: String,
    pub seed: u64,
    /// Original case index of each displayed question, in display order.
    pub sort_idxs: Vec<usize>,
    /// Whether each displayed question gets the guidance panel.
    pub with_guidance: Vec<bool>,
    pub timed: bool,
    pub time_limit_secs: u32,
    pub match_key: MatchKey,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            uid: String::new(),
            seed: 0,
            sort_idxs: Vec::new(),
            with_guidance: Vec::new(),
            timed: false,
            time_limit_secs: DEFAULT_TIME_LIMIT_SECS,
            match_key: MatchKey::default(),
        }
    }
}

impl PageConfig {
    /// Builds the config from the string attributes rendered into the page
    /// (`timed="1"`, `with_guidance="0110"`, `sort_idxs="2,0,1"`).
    pub fn from_attributes(
        uid: &str,
        seed: &str,
        sort_idxs: &str,
        with_guidance: &str,
        timed: &str,
    ) -> Result<Self, QuestionnaireError> {
        let seed = seed
            .trim()
            .parse::<u64>()
            .map_err(|err| QuestionnaireError::Parse(format!("seed {seed:?}: {err}")))?;

        Ok(Self {
            uid: uid.to_string(),
            seed,
            sort_idxs: parse_index_list(sort_idxs)?,
            with_guidance: parse_flag_string(with_guidance)?,
            timed: parse_flag(timed)?,
            ..Self::default()
        })
    }

    /// Attribute form of `sort_idxs`.
    pub fn sort_idxs_attr(&self) -> String {
        self.sort_idxs
            .iter()
            .map(usize::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Attribute form of `with_guidance`.
    pub fn with_guidance_attr(&self) -> String {
        self.with_guidance
            .iter()
            .map(|flag| if *flag { '1' } else { '0' })
            .collect()
    }

    pub fn timed_attr(&self) -> &'static str {
        if self.timed {
            "1"
        } else {
            "0"
        }
    }
}

/// Parses `"3,1,0"`, tolerating surrounding brackets and whitespace.
pub fn parse_index_list(raw: &str) -> Result<Vec<usize>, QuestionnaireError> {
    let trimmed = raw.trim().trim_start_matches('[').trim_end_matches(']');
    if trimmed.trim().is_empty() {
        return Ok(Vec::new());
    }
    trimmed
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<usize>()
                .map_err(|err| QuestionnaireError::Parse(format!("index {part:?}: {err}")))
        })
        .collect()
}

/// Parses a string of `0`/`1` characters into flags.
pub fn parse_flag_string(raw: &str) -> Result<Vec<bool>, QuestionnaireError> {
    raw.trim()
        .chars()
        .map(|ch| match ch {
            '0' => Ok(false),
            '1' => Ok(true),
            other => Err(QuestionnaireError::Parse(format!(
                "unexpected flag character {other:?}"
            ))),
        })
        .collect()
}

/// Any non-zero integer counts as set.
pub fn parse_flag(raw: &str) -> Result<bool, QuestionnaireError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(false);
    }
    raw.parse::<i64>()
        .map(|value| value != 0)
        .map_err(|err| QuestionnaireError::Parse(format!("flag {raw:?}: {err}")))
}

/// Errors shared across the questionnaire crates.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum QuestionnaireError {
    #[error("required input is missing")]
    MissingData,
    #[error("required page element is missing: {0}")]
    MissingElement(String),
    #[error("could not parse input: {0}")]
    Parse(String),
    #[error("length mismatch: expected {expected}, found {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("submission rejected: {0}")]
    Rejected(String),
}
