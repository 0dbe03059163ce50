// src/entity/note.rs
use serde::{Deserialize, Serialize};

/// A note as every adapter stores and returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub title: String,
    pub content: String,
    pub completed: bool,
}

/// Loosely-typed note payload as it arrives on the wire.
///
/// Nothing is validated before dispatch; the store layer decides which
/// fields the operation at hand requires.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NoteInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

/// Partial-update payload for a note. The id is immutable and never
/// part of a patch.
#[derive(Debug, Clone, Default)]
pub struct NotePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub completed: Option<bool>,
}

impl NotePatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.completed.is_none()
    }
}

impl From<&NoteInput> for NotePatch {
    fn from(input: &NoteInput) -> Self {
        Self {
            title: input.title.clone(),
            content: input.content.clone(),
            completed: input.completed,
        }
    }
}
