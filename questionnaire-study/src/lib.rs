//! Study data to `StudyPage` converter: patient cases, ACR guideline tables,
//! per-participant assignment and response encoding.

use serde::{Deserialize, Serialize};

use questionnaire_core::{Navigator, PageConfig, QuestionnaireError, Vocabulary};

mod assignment;
mod cases;
mod guidance;
mod participant;
mod responses;
mod study_index;

pub use assignment::{assign, hash_uid, Assignment, AssignmentPolicy, DEMO_UID};
pub use cases::{parse_cases, PatientCase};
pub use guidance::{
    guidance_tables, parse_guidelines, CategoryColor, GuidanceBlock, GuidanceRow, Guideline,
    Scenario, StudyRating,
};
pub use participant::participant_uid;
pub use responses::{encode_responses, ResponseSheet, SheetEntries, SubmissionRecord};
pub use study_index::StudyIndex;

/// Everything the questionnaire page needs, already ordered for display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StudyPage {
    pub questions: Vec<String>,
    /// Guidance blocks per displayed question; block `i` has rank `i + 1`.
    pub guidance: Vec<Vec<GuidanceBlock>>,
    pub vocabulary: Vocabulary,
    pub config: PageConfig,
}

impl StudyPage {
    /// Builds the page for one participant.
    ///
    /// `studies` is the plain study list; alternate search terms are added
    /// here so that suggestions match abbreviations.
    pub fn build(
        uid: &str,
        cases: &[PatientCase],
        guidelines: &[Guideline],
        studies: &Vocabulary,
        policy: &AssignmentPolicy,
    ) -> Result<Self, QuestionnaireError> {
        if cases.is_empty() || studies.is_empty() {
            return Err(QuestionnaireError::MissingData);
        }

        let tables = guidance_tables(guidelines);
        let blocks = cases
            .iter()
            .map(|case| {
                case.topics
                    .iter()
                    .map(|topic| {
                        tables
                            .get(topic)
                            .map(|table| GuidanceBlock {
                                topic: topic.clone(),
                                table: table.clone(),
                            })
                            .ok_or_else(|| {
                                QuestionnaireError::Parse(format!(
                                    "no guideline for topic {topic:?}"
                                ))
                            })
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        let assignment = assign(uid, cases.len(), policy);
        let questions = assignment
            .order
            .iter()
            .map(|idx| cases[*idx].case.clone())
            .collect();
        let guidance = assignment
            .order
            .iter()
            .map(|idx| blocks[*idx].clone())
            .collect();
        let with_guidance = assignment
            .order
            .iter()
            .map(|idx| assignment.with_guidance[*idx])
            .collect();

        Ok(Self {
            questions,
            guidance,
            vocabulary: studies.clone().with_alternates(),
            config: PageConfig {
                uid: uid.to_string(),
                seed: assignment.seed,
                sort_idxs: assignment.order,
                with_guidance,
                timed: assignment.timed,
                ..PageConfig::default()
            },
        })
    }

    /// Parses the raw study files and builds the page.
    pub fn from_sources(
        uid: &str,
        cases_jsonl: &str,
        guidelines_jsonl: &str,
        study_list: &str,
        policy: &AssignmentPolicy,
    ) -> Result<Self, QuestionnaireError> {
        let cases = parse_cases(cases_jsonl)?;
        let guidelines = parse_guidelines(guidelines_jsonl)?;
        let studies = Vocabulary::parse_study_list(study_list)?;
        Self::build(uid, &cases, &guidelines, &studies, policy)
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn guidance_counts(&self) -> Vec<usize> {
        self.guidance.iter().map(Vec::len).collect()
    }

    /// Navigator over the displayed questions, with this page's guidance flags.
    pub fn navigator(&self) -> Result<Navigator, QuestionnaireError> {
        Navigator::new(
            self.question_count(),
            self.config.with_guidance.clone(),
            self.guidance_counts(),
        )
    }
}
