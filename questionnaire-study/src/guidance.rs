//! ACR Appropriateness Criteria tables shown in the guidance panel.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use questionnaire_core::QuestionnaireError;

use crate::cases::parse_jsonl;

const RADIATION_GLYPH: &str = "\u{2622} ";
const PULMONARY_EMBOLISM_TOPIC: &str = "Suspected Pulmonary Embolism";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Guideline {
    #[serde(rename = "Topic")]
    pub topic: String,
    #[serde(rename = "Scenarios", default)]
    pub scenarios: Vec<Scenario>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Scenario {
    #[serde(rename = "Scenario", default)]
    pub name: String,
    #[serde(rename = "Studies", default)]
    pub studies: Vec<StudyRating>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StudyRating {
    #[serde(rename = "Procedure")]
    pub procedure: String,
    /// Adult relative radiation level, 0 meaning none.
    #[serde(rename = "Adult RRL", deserialize_with = "deserialize_rrl")]
    pub adult_rrl: u32,
    #[serde(rename = "Appropriateness Category")]
    pub category: String,
}

/// Row colour for an appropriateness category.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CategoryColor {
    Green,
    Yellow,
    Red,
    Gray,
}

impl CategoryColor {
    pub fn from_category(category: &str) -> Self {
        match category {
            "Usually appropriate" => CategoryColor::Green,
            "May be appropriate" => CategoryColor::Yellow,
            "Usually not appropriate" => CategoryColor::Red,
            _ => CategoryColor::Gray,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CategoryColor::Green => "green",
            CategoryColor::Yellow => "yellow",
            CategoryColor::Red => "red",
            CategoryColor::Gray => "gray",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GuidanceRow {
    pub procedure: String,
    pub radiation: String,
    pub category: CategoryColor,
}

impl GuidanceRow {
    fn from_rating(rating: &StudyRating) -> Self {
        let radiation = if rating.adult_rrl > 0 {
            RADIATION_GLYPH.repeat(rating.adult_rrl as usize)
        } else {
            "None".to_string()
        };
        Self {
            procedure: rating.procedure.clone(),
            radiation,
            category: CategoryColor::from_category(&rating.category),
        }
    }
}

/// One topic's table attached to a question.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GuidanceBlock {
    pub topic: String,
    pub table: Vec<GuidanceRow>,
}

/// Reads one guideline topic per JSON line.
///
/// The pulmonary embolism topic is reordered so that its second-to-last
/// scenario is the one tabulated.
pub fn parse_guidelines(jsonl: &str) -> Result<Vec<Guideline>, QuestionnaireError> {
    let mut guidelines: Vec<Guideline> = parse_jsonl(jsonl)?;
    if let Some(guideline) = guidelines
        .iter_mut()
        .find(|guideline| guideline.topic == PULMONARY_EMBOLISM_TOPIC)
    {
        let count = guideline.scenarios.len();
        if count >= 2 {
            let promoted = guideline.scenarios[count - 2].clone();
            guideline.scenarios.push(promoted);
            guideline.scenarios.reverse();
        }
    }
    Ok(guidelines)
}

/// Table rows from the first scenario of every topic, keyed by topic.
pub fn guidance_tables(guidelines: &[Guideline]) -> HashMap<String, Vec<GuidanceRow>> {
    guidelines
        .iter()
        .map(|guideline| {
            let rows = guideline
                .scenarios
                .first()
                .map(|scenario| scenario.studies.iter().map(GuidanceRow::from_rating).collect())
                .unwrap_or_default();
            (guideline.topic.clone(), rows)
        })
        .collect()
}

fn deserialize_rrl<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let parsed = match &value {
        Value::Number(number) => number.as_u64(),
        Value::String(text) => text.trim().parse::<u64>().ok(),
        Value::Null => Some(0),
        _ => None,
    };
    parsed
        .and_then(|level| u32::try_from(level).ok())
        .ok_or_else(|| serde::de::Error::custom(format!("invalid Adult RRL {value}")))
}
