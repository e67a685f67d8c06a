use questionnaire_core::{QuestionnaireError, NONE_LABEL};

/// The study list as positioned in recorded responses.
///
/// Every line keeps its slot, blank ones included, followed by
/// [`NONE_LABEL`]; answer indices in response rows refer to these slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudyIndex {
    slots: Vec<String>,
}

impl StudyIndex {
    pub fn parse(text: &str) -> Result<Self, QuestionnaireError> {
        let mut slots: Vec<String> = text.lines().map(|line| line.trim().to_string()).collect();
        if slots.iter().all(String::is_empty) {
            return Err(QuestionnaireError::MissingData);
        }
        slots.push(NONE_LABEL.to_string());
        Ok(Self { slots })
    }

    /// First slot holding exactly `answer`.
    pub fn position(&self, answer: &str) -> Option<usize> {
        self.slots.iter().position(|slot| slot == answer)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_keep_their_slot() {
        let index = StudyIndex::parse("CT head\n\nUS abdomen\n").expect("non-empty list");
        assert_eq!(index.len(), 4);
        assert_eq!(index.position("CT head"), Some(0));
        assert_eq!(index.position("US abdomen"), Some(2));
        assert_eq!(index.position("None"), Some(3));
        assert_eq!(index.position("MRI"), None);
    }

    #[test]
    fn blank_list_is_missing_data() {
        assert_eq!(StudyIndex::parse("\n \n"), Err(QuestionnaireError::MissingData));
    }
}
