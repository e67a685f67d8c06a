//! Consent and identifier gate in front of the questionnaire.

use serde::{Deserialize, Serialize};

/// Required identifier length, in characters.
pub const UID_LENGTH: usize = 512;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessGate {
    pub consent: bool,
    pub identifier: String,
}

impl AccessGate {
    pub fn new(consent: bool, identifier: impl Into<String>) -> Self {
        Self {
            consent,
            identifier: identifier.into(),
        }
    }

    pub fn identifier_is_valid(&self) -> bool {
        self.identifier.chars().count() == UID_LENGTH
            && self.identifier.chars().all(|ch| ch.is_ascii_alphanumeric())
    }

    /// The "continue" control is active only when this holds.
    pub fn is_ready(&self) -> bool {
        self.consent && self.identifier_is_valid()
    }

    /// Navigation target of the "continue" control.
    pub fn continue_target(&self) -> Option<String> {
        self.is_ready()
            .then(|| format!("/?uid={}", self.identifier))
    }
}
