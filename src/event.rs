//! Inbound event contract as delivered by the external request router.

use serde::{Deserialize, Serialize};

use crate::entity::NoteInput;

/// An inbound resolver invocation: an operation name plus a
/// loosely-typed arguments bag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverEvent {
    pub info: EventInfo,
    #[serde(default)]
    pub arguments: EventArguments,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventInfo {
    #[serde(rename = "fieldName")]
    pub field_name: String,
}

/// Which argument an operation reads is operation-specific:
/// createNote/updateNote read `note`, getNoteById/deleteNote read
/// `noteId`, listNotes reads neither.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventArguments {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<NoteInput>,
    #[serde(rename = "noteId", default, skip_serializing_if = "Option::is_none")]
    pub note_id: Option<String>,
}

impl ResolverEvent {
    /// An event with no arguments, as the CLI verbs start from.
    pub fn new(field_name: impl Into<String>) -> Self {
        Self {
            info: EventInfo {
                field_name: field_name.into(),
            },
            arguments: EventArguments::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_wire_shape() {
        let raw = r#"{
            "info": { "fieldName": "getNoteById" },
            "arguments": { "noteId": "abc-123" }
        }"#;
        let event: ResolverEvent = serde_json::from_str(raw).unwrap();
        assert_eq!(event.info.field_name, "getNoteById");
        assert_eq!(event.arguments.note_id.as_deref(), Some("abc-123"));
        assert!(event.arguments.note.is_none());
    }

    #[test]
    fn test_deserialize_note_argument() {
        let raw = r#"{
            "info": { "fieldName": "createNote" },
            "arguments": { "note": { "title": "Groceries", "content": "milk" } }
        }"#;
        let event: ResolverEvent = serde_json::from_str(raw).unwrap();
        let note = event.arguments.note.unwrap();
        assert_eq!(note.title.as_deref(), Some("Groceries"));
        assert_eq!(note.content.as_deref(), Some("milk"));
        assert!(note.id.is_none());
        assert!(note.completed.is_none());
    }

    #[test]
    fn test_missing_arguments_defaults_empty() {
        let raw = r#"{ "info": { "fieldName": "listNotes" } }"#;
        let event: ResolverEvent = serde_json::from_str(raw).unwrap();
        assert!(event.arguments.note.is_none());
        assert!(event.arguments.note_id.is_none());
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let raw = r#"{
            "info": { "fieldName": "listNotes", "parentTypeName": "Query" },
            "arguments": {},
            "identity": null
        }"#;
        let event: ResolverEvent = serde_json::from_str(raw).unwrap();
        assert_eq!(event.info.field_name, "listNotes");
    }
}
