//! Whole-form completion state driving the submit button and unload guard.

use serde::{Deserialize, Serialize};

use crate::validator::InputValidator;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    pub answered: Vec<bool>,
    pub complete: bool,
}

impl Completion {
    pub fn submit_visible(&self) -> bool {
        self.complete
    }

    /// Leaving the page asks for confirmation while anything is unanswered.
    pub fn unload_guard_armed(&self) -> bool {
        !self.complete
    }

    /// Whether a submit attempt goes through. `confirm` is only asked once
    /// every answer is valid, so implicit form submission cannot bypass the
    /// gate.
    pub fn confirm_submit(&self, confirm: impl FnOnce() -> bool) -> bool {
        self.complete && confirm()
    }

    pub fn answered_count(&self) -> usize {
        self.answered.iter().filter(|flag| **flag).count()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CompletionTracker<'a> {
    validator: InputValidator<'a>,
}

impl<'a> CompletionTracker<'a> {
    pub fn new(validator: InputValidator<'a>) -> Self {
        Self { validator }
    }

    pub fn evaluate<S: AsRef<str>>(&self, answers: &[S]) -> Completion {
        let answered: Vec<bool> = answers
            .iter()
            .map(|answer| self.validator.is_valid(answer.as_ref()))
            .collect();
        let complete = answered.iter().all(|flag| *flag);
        Completion { answered, complete }
    }
}
