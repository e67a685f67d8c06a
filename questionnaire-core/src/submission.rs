//! Fields posted when the participant submits.

use serde::{Deserialize, Serialize};

use crate::{PageConfig, QuestionnaireError};

/// Endpoint the questionnaire form posts to.
pub const SUBMIT_ACTION: &str = "/api/v1/submit";

/// Text of the confirmation dialog shown before submitting.
pub const CONFIRM_PROMPT: &str =
    "Are you sure you want to submit? You will not be able to change your answers.";

/// Name of the hidden field that must stay empty.
pub const HONEYPOT_FIELD: &str = "name";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmissionForm {
    pub uid: String,
    pub seed: String,
    pub sort_idxs: String,
    pub with_guidance: String,
    pub timed: String,
    pub duration: String,
    /// Answers in display order; posted as `Q1`, `Q2`, ...
    pub answers: Vec<String>,
    #[serde(default)]
    pub honeypot: String,
}

impl SubmissionForm {
    /// Collects the page's pass-through fields, the answers and the elapsed
    /// duration computed by the countdown (or `None` when untimed).
    pub fn new(config: &PageConfig, answers: Vec<String>, elapsed_secs: Option<i64>) -> Self {
        Self {
            uid: config.uid.clone(),
            seed: config.seed.to_string(),
            sort_idxs: config.sort_idxs_attr(),
            with_guidance: config.with_guidance_attr(),
            timed: config.timed_attr().to_string(),
            duration: elapsed_secs
                .map(|secs| secs.to_string())
                .unwrap_or_default(),
            answers,
            honeypot: String::new(),
        }
    }

    pub fn answer_key(position: usize) -> String {
        format!("Q{}", position + 1)
    }

    /// Form-encoded pairs in posting order.
    pub fn fields(&self) -> Vec<(String, String)> {
        let mut fields: Vec<(String, String)> = self
            .answers
            .iter()
            .enumerate()
            .map(|(idx, answer)| (Self::answer_key(idx), answer.clone()))
            .collect();
        fields.extend([
            (HONEYPOT_FIELD.to_string(), self.honeypot.clone()),
            ("uid".to_string(), self.uid.clone()),
            ("seed".to_string(), self.seed.clone()),
            ("sort_idxs".to_string(), self.sort_idxs.clone()),
            ("with_guidance".to_string(), self.with_guidance.clone()),
            ("timed".to_string(), self.timed.clone()),
            ("duration".to_string(), self.duration.clone()),
        ]);
        fields
    }

    /// Rebuilds a form from posted pairs; answers are the `Q<n>` fields in
    /// posting order.
    pub fn from_fields<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut form = Self::default();
        for (key, value) in fields {
            let value = value.into();
            match key.as_ref() {
                "uid" => form.uid = value,
                "seed" => form.seed = value,
                "sort_idxs" => form.sort_idxs = value,
                "with_guidance" => form.with_guidance = value,
                "timed" => form.timed = value,
                "duration" => form.duration = value,
                HONEYPOT_FIELD => form.honeypot = value,
                other if is_answer_key(other) => form.answers.push(value),
                _ => {}
            }
        }
        form
    }

    /// Bots fill every field they find; people never see the honeypot.
    pub fn ensure_human(&self) -> Result<(), QuestionnaireError> {
        if self.honeypot.is_empty() {
            Ok(())
        } else {
            Err(QuestionnaireError::Rejected(format!(
                "hidden field {HONEYPOT_FIELD:?} was filled in"
            )))
        }
    }

    pub fn is_demo(&self) -> bool {
        self.uid.eq_ignore_ascii_case("demo")
    }
}

/// `Q` followed by one or more digits, nothing else.
pub fn is_answer_key(key: &str) -> bool {
    key.strip_prefix('Q')
        .is_some_and(|digits| !digits.is_empty() && digits.chars().all(|ch| ch.is_ascii_digit()))
}
