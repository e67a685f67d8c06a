//! Suggestion list controller for the active question's answer field.

use serde::{Deserialize, Serialize};

use crate::vocabulary::{MatchKey, Vocabulary};

/// Keys the controller reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowDown,
    ArrowUp,
    Enter,
    Other,
}

impl Key {
    /// Maps a DOM `KeyboardEvent.key` value.
    pub fn from_dom(key: &str) -> Self {
        match key {
            "ArrowDown" | "Down" => Key::ArrowDown,
            "ArrowUp" | "Up" => Key::ArrowUp,
            "Enter" => Key::Enter,
            _ => Key::Other,
        }
    }
}

/// Result of a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Highlight moved to this position in the visible list.
    Moved(usize),
    /// A suggestion was chosen; the caller writes the label into the field
    /// and suppresses the default form action.
    Selected(String),
    Ignored,
}

impl KeyOutcome {
    pub fn prevents_default(&self) -> bool {
        matches!(self, KeyOutcome::Selected(_))
    }
}

/// Filtering and keyboard navigation over the vocabulary.
///
/// One controller serves whichever question is active; navigation calls
/// [`detach`](Self::detach) instead of rebinding handlers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Autocomplete {
    match_key: MatchKey,
    query: String,
    visible: Vec<usize>,
    focus: Option<usize>,
    open: bool,
}

impl Autocomplete {
    pub fn new(vocabulary: &Vocabulary, match_key: MatchKey) -> Self {
        Self {
            match_key,
            query: String::new(),
            visible: (0..vocabulary.len()).collect(),
            focus: None,
            open: false,
        }
    }

    pub fn match_key(&self) -> MatchKey {
        self.match_key
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Highlighted position within [`visible`](Self::visible).
    pub fn focus(&self) -> Option<usize> {
        self.focus
    }

    /// Vocabulary indices currently shown, in vocabulary order.
    pub fn visible(&self) -> &[usize] {
        &self.visible
    }

    /// Vocabulary index of the highlighted suggestion.
    pub fn focused_entry(&self) -> Option<usize> {
        self.focus.and_then(|pos| self.visible.get(pos).copied())
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    /// Outer click: close without touching the query.
    pub fn dismiss(&mut self) {
        self.open = false;
        self.focus = None;
    }

    /// Keystroke in the field: refilter from scratch and clear the highlight.
    pub fn input(&mut self, text: &str, vocabulary: &Vocabulary) {
        self.query = text.to_string();
        self.focus = None;
        self.visible = vocabulary.filter(&self.query, self.match_key);
        self.open = true;
    }

    /// Keys only act on an open list.
    pub fn key(&mut self, key: Key, vocabulary: &Vocabulary) -> KeyOutcome {
        if !self.open {
            return KeyOutcome::Ignored;
        }
        let count = self.visible.len();
        match key {
            Key::ArrowDown if count > 0 => {
                let next = match self.focus {
                    Some(pos) if pos + 1 < count => pos + 1,
                    _ => 0,
                };
                self.focus = Some(next);
                KeyOutcome::Moved(next)
            }
            Key::ArrowUp if count > 0 => {
                let next = match self.focus {
                    Some(pos) if pos > 0 => pos - 1,
                    _ => count - 1,
                };
                self.focus = Some(next);
                KeyOutcome::Moved(next)
            }
            Key::Enter => match self.focus {
                Some(pos) => self.select(pos, vocabulary),
                None => KeyOutcome::Ignored,
            },
            _ => KeyOutcome::Ignored,
        }
    }

    /// Click on the suggestion at `position` of the visible list.
    pub fn select(&mut self, position: usize, vocabulary: &Vocabulary) -> KeyOutcome {
        let Some(entry) = self
            .visible
            .get(position)
            .and_then(|idx| vocabulary.entries().get(*idx))
        else {
            return KeyOutcome::Ignored;
        };
        let label = entry.label.clone();
        self.query = label.clone();
        self.focus = None;
        self.open = false;
        KeyOutcome::Selected(label)
    }

    /// Leaving the question: close and show every suggestion again.
    pub fn detach(&mut self, vocabulary: &Vocabulary) {
        self.query.clear();
        self.focus = None;
        self.open = false;
        self.visible = (0..vocabulary.len()).collect();
    }
}
