//! Selection lists: a "Select..." placeholder at index 0 followed by the real entries.

use crate::models::{GameError, PlayerId};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

/// Text of the placeholder entry.
pub const PLACEHOLDER: &str = "Select...";

/// Index 0 means nothing is selected.
pub const NO_SELECTION: usize = 0;

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct SelectionList {
    entries: Vec<String>,
}

impl Default for SelectionList {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl SelectionList {
    pub fn new(items: Vec<String>) -> Self {
        let mut entries = Vec::with_capacity(items.len() + 1);
        entries.push(PLACEHOLDER.to_string());
        entries.extend(items);
        Self { entries }
    }

    /// Same items in random order.
    pub fn shuffled<R: Rng + ?Sized>(mut items: Vec<String>, rng: &mut R) -> Self {
        items.shuffle(rng);
        Self::new(items)
    }

    /// All entries including the placeholder.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.len() <= 1
    }

    /// Reject indices past the end; 0 is always valid.
    pub fn check_index(&self, index: usize) -> Result<usize, GameError> {
        if index < self.entries.len() {
            Ok(index)
        } else {
            Err(GameError::InvalidSelection {
                index,
                len: self.entries.len(),
            })
        }
    }

    /// Map a list index to a roster id. Only valid for lists built from roster order.
    pub fn player_at(&self, index: usize) -> Option<PlayerId> {
        if index == NO_SELECTION || index >= self.entries.len() {
            None
        } else {
            Some(index - 1)
        }
    }

    /// Entry text, or None for the placeholder.
    pub fn text_at(&self, index: usize) -> Option<&str> {
        if index == NO_SELECTION {
            None
        } else {
            self.entries.get(index).map(String::as_str)
        }
    }
}
