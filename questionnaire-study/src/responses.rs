//! Encoding of a posted questionnaire into study response rows.

use chrono::{DateTime, FixedOffset, Local, SecondsFormat, Timelike};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

use questionnaire_core::{QuestionnaireError, SubmissionForm};

use crate::study_index::StudyIndex;

/// Characters left as-is in form-encoded values; space becomes `+`.
const FORM_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~');

/// Rows of the form `Q{case},A{answer},{guided}` where `case` is the original
/// case index, `answer` the slot in the study list (`-1` when unknown)
/// and `guided` the question's guidance flag. Inputs are zipped to the
/// shortest.
pub fn encode_responses(
    form: &SubmissionForm,
    studies: &StudyIndex,
) -> Result<Vec<String>, QuestionnaireError> {
    form.ensure_human()?;
    if form.is_demo() {
        return Ok(Vec::new());
    }

    let case_indices: Vec<&str> = form
        .sort_idxs
        .trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .split(',')
        .map(str::trim)
        .collect();

    let rows = case_indices
        .into_iter()
        .zip(form.answers.iter())
        .zip(form.with_guidance.chars())
        .map(|((case_idx, answer), guided)| {
            let answer_idx = studies
                .position(answer)
                .map(|pos| pos.to_string())
                .unwrap_or_else(|| "-1".to_string());
            format!("Q{case_idx},A{answer_idx},{guided}")
        })
        .collect();
    Ok(rows)
}

/// What gets stored for one completed questionnaire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubmissionRecord {
    pub uid: String,
    pub responses: Vec<String>,
    pub submitted_at: DateTime<FixedOffset>,
    pub duration: String,
    pub timed: String,
    pub seed: String,
}

impl SubmissionRecord {
    /// `None` for demo submissions, which are acknowledged but not kept.
    pub fn from_form(
        form: &SubmissionForm,
        studies: &StudyIndex,
        submitted_at: DateTime<FixedOffset>,
    ) -> Result<Option<Self>, QuestionnaireError> {
        let responses = encode_responses(form, studies)?;
        if form.is_demo() {
            return Ok(None);
        }
        Ok(Some(Self {
            uid: form.uid.clone(),
            responses,
            submitted_at: submitted_at.with_nanosecond(0).unwrap_or(submitted_at),
            duration: form.duration.clone(),
            timed: form.timed.clone(),
            seed: form.seed.clone(),
        }))
    }

    /// Same as [`from_form`](Self::from_form), stamped with the local time.
    pub fn now(
        form: &SubmissionForm,
        studies: &StudyIndex,
    ) -> Result<Option<Self>, QuestionnaireError> {
        Self::from_form(form, studies, Local::now().fixed_offset())
    }

    /// ISO-8601 timestamp with offset and whole seconds.
    pub fn timestamp(&self) -> String {
        self.submitted_at
            .to_rfc3339_opts(SecondsFormat::Secs, false)
    }

    /// Responses as the JSON array string sent to the response sheet,
    /// elements separated by `", "`.
    pub fn responses_json(&self) -> String {
        let items: Vec<String> = self
            .responses
            .iter()
            .map(|row| serde_json::to_string(row).unwrap_or_default())
            .collect();
        format!("[{}]", items.join(", "))
    }

    /// Prefilled response-sheet URL for this record. Sending it is left to
    /// the host.
    pub fn sheet_url(&self, sheet: &ResponseSheet) -> String {
        let entries = sheet.entries;
        format!(
            "{}?&submit=Submit?usp=pp_url&entry.{}={}&entry.{}={}&entry.{}={}&entry.{}={}&entry.{}={}",
            sheet.form_url,
            entries.user,
            self.uid,
            entries.answer,
            form_encode(&self.responses_json()),
            entries.time,
            form_encode(&self.timestamp()),
            entries.duration,
            self.duration,
            entries.timed,
            self.timed,
        )
    }
}

/// Entry ids of the response sheet's fields.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SheetEntries {
    pub user: u64,
    pub answer: u64,
    pub time: u64,
    pub duration: u64,
    pub timed: u64,
}

/// Where submission records are filed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ResponseSheet {
    pub form_url: String,
    pub entries: SheetEntries,
}

impl Default for ResponseSheet {
    fn default() -> Self {
        Self {
            form_url: "https://docs.google.com/forms/d/e/\
                1FAIpQLSdjaP9_HApCZgCC9VaoPFMCMUIgJmXfRcC2Tb31jURG4NPxqQ/formResponse"
                .to_string(),
            entries: SheetEntries {
                user: 1_566_494_565,
                answer: 1_604_544_479,
                time: 921_671_925,
                duration: 2_066_832_372,
                timed: 734_084_621,
            },
        }
    }
}

fn form_encode(value: &str) -> String {
    value
        .split(' ')
        .map(|part| utf8_percent_encode(part, FORM_VALUE).to_string())
        .collect::<Vec<_>>()
        .join("+")
}
