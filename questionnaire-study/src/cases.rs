use serde::{Deserialize, Serialize};

use questionnaire_core::QuestionnaireError;

/// One clinical vignette and the guideline topics relevant to it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PatientCase {
    pub case: String,
    #[serde(default)]
    pub topics: Vec<String>,
}

/// Reads one case per JSON line; blank lines are skipped.
pub fn parse_cases(jsonl: &str) -> Result<Vec<PatientCase>, QuestionnaireError> {
    parse_jsonl(jsonl)
}

pub(crate) fn parse_jsonl<T>(jsonl: &str) -> Result<Vec<T>, QuestionnaireError>
where
    T: for<'de> Deserialize<'de>,
{
    jsonl
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str(line)
                .map_err(|err| QuestionnaireError::Parse(format!("line {}: {err}", idx + 1)))
        })
        .collect()
}
