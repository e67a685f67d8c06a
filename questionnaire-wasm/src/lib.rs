//! Framework-neutral WASM <-> JavaScript bridge for the questionnaire.

use serde::Deserialize;
use serde_wasm_bindgen::{from_value, to_value};
use questionnaire_core::{
    AccessGate, InputValidator, MatchKey, QuestionnaireError, SubmissionForm, Vocabulary,
};
use questionnaire_study::{AssignmentPolicy, StudyIndex, StudyPage, SubmissionRecord};
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
struct JsPageConfig {
    #[serde(default)]
    always_timed: Option<Vec<String>>,
    #[serde(default)]
    match_key: Option<MatchKey>,
    #[serde(default)]
    time_limit_secs: Option<u32>,
}

impl JsPageConfig {
    fn policy(&self) -> AssignmentPolicy {
        AssignmentPolicy {
            always_timed: self.always_timed.clone().unwrap_or_default(),
        }
    }

    fn apply(&self, page: &mut StudyPage) {
        if let Some(key) = self.match_key {
            page.config.match_key = key;
        }
        if let Some(secs) = self.time_limit_secs {
            page.config.time_limit_secs = secs;
        }
    }
}

/// Builds the page payload for one participant from the raw study files.
#[wasm_bindgen]
pub fn prepare_page(
    uid: &str,
    cases_jsonl: &str,
    guidelines_jsonl: &str,
    study_list: &str,
    config: Option<JsValue>,
) -> Result<JsValue, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let cfg = match config {
        Some(js_cfg) => from_value::<JsPageConfig>(js_cfg)
            .map_err(|err| JsValue::from_str(&format!("Cannot read config: {err}")))?,
        None => JsPageConfig::default(),
    };

    let mut page = StudyPage::from_sources(
        uid,
        cases_jsonl,
        guidelines_jsonl,
        study_list,
        &cfg.policy(),
    )
    .map_err(|err| JsValue::from_str(&format_questionnaire_error(err)))?;
    cfg.apply(&mut page);

    to_value(&page).map_err(|err| JsValue::from_str(&format!("Cannot serialize page: {err}")))
}

/// Exact, case-sensitive check of an answer against the vocabulary labels.
#[wasm_bindgen]
pub fn validate_answer(vocabulary: JsValue, answer: &str) -> Result<bool, JsValue> {
    let vocabulary = read_vocabulary(vocabulary)?;
    Ok(InputValidator::new(&vocabulary).is_valid(answer))
}

/// Labels of the entries whose match key contains `query`, ignoring case.
#[wasm_bindgen]
pub fn filter_suggestions(
    vocabulary: JsValue,
    query: &str,
    match_key: Option<String>,
) -> Result<JsValue, JsValue> {
    let vocabulary = read_vocabulary(vocabulary)?;
    let key = match match_key.as_deref() {
        None => MatchKey::default(),
        Some("label") => MatchKey::Label,
        Some("value") => MatchKey::Value,
        Some(other) => {
            return Err(JsValue::from_str(&format!("Unknown match key {other:?}")));
        }
    };
    let labels: Vec<&str> = vocabulary
        .filter(query, key)
        .into_iter()
        .map(|idx| vocabulary.entries()[idx].label.as_str())
        .collect();
    to_value(&labels).map_err(|err| JsValue::from_str(&format!("Cannot serialize labels: {err}")))
}

/// Continue target for the access page, or `undefined` while the gate is shut.
#[wasm_bindgen]
pub fn check_identifier(consent: bool, identifier: &str) -> Option<String> {
    AccessGate::new(consent, identifier).continue_target()
}

/// Encodes posted form pairs into response rows and the stored record.
///
/// Returns `null` for demo submissions.
#[wasm_bindgen]
pub fn encode_submission(fields: JsValue, study_list: &str) -> Result<JsValue, JsValue> {
    let pairs: Vec<(String, String)> = from_value(fields)
        .map_err(|err| JsValue::from_str(&format!("Cannot read form fields: {err}")))?;
    let studies = StudyIndex::parse(study_list)
        .map_err(|err| JsValue::from_str(&format_questionnaire_error(err)))?;
    let form = SubmissionForm::from_fields(pairs);

    let record = SubmissionRecord::now(&form, &studies)
        .map_err(|err| JsValue::from_str(&format_questionnaire_error(err)))?;
    to_value(&record).map_err(|err| JsValue::from_str(&format!("Cannot serialize record: {err}")))
}

fn read_vocabulary(value: JsValue) -> Result<Vocabulary, JsValue> {
    from_value::<Vocabulary>(value)
        .map_err(|err| JsValue::from_str(&format!("Cannot read vocabulary: {err}")))
}

fn format_questionnaire_error(err: QuestionnaireError) -> String {
    format!("Questionnaire error: {err}")
}

#[cfg(test)]
mod tests {
    use super::*;

    const CASES: &str = r#"{"case": "Pleuritic chest pain.", "topics": []}
{"case": "First seizure.", "topics": []}"#;
    const STUDIES: &str = "CT chest with IV contrast\nMRI head without IV contrast\n";

    #[test]
    fn partial_config_overrides_only_given_fields() {
        let cfg: JsPageConfig =
            serde_json::from_str(r#"{"time_limit_secs": 600}"#).expect("config parses");
        let mut page =
            StudyPage::from_sources("abc", CASES, "", STUDIES, &cfg.policy()).expect("page builds");
        let key_before = page.config.match_key;
        cfg.apply(&mut page);

        assert_eq!(page.config.time_limit_secs, 600);
        assert_eq!(page.config.match_key, key_before);
    }

    #[test]
    fn always_timed_list_reaches_assignment() {
        let cfg: JsPageConfig =
            serde_json::from_str(r#"{"always_timed": ["abc"], "match_key": "label"}"#)
                .expect("config parses");
        let mut page =
            StudyPage::from_sources("abc", CASES, "", STUDIES, &cfg.policy()).expect("page builds");
        cfg.apply(&mut page);

        assert!(page.config.timed);
        assert_eq!(page.config.match_key, MatchKey::Label);
    }
}
