//! Operation registry and dispatch.
//!
//! The registry is a closed set of five operations. It drives dispatch
//! and doubles as the declaration of what the external gateway routes,
//! so the two can never drift apart.

mod handlers;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, warn};

use crate::event::ResolverEvent;
use crate::store::NoteStore;

/// Gateway-side grouping for an operation. Dispatch itself never
/// branches on this; it exists so the gateway configuration and this
/// registry enumerate the same routable set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationKind {
    Query,
    Mutation,
}

/// The closed set of routable operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ListNotes,
    GetNoteById,
    CreateNote,
    UpdateNote,
    DeleteNote,
}

impl Operation {
    /// The registry: every routable operation, in declaration order.
    pub const ALL: [Operation; 5] = [
        Operation::ListNotes,
        Operation::GetNoteById,
        Operation::CreateNote,
        Operation::UpdateNote,
        Operation::DeleteNote,
    ];

    /// Wire name as the gateway sends it.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::ListNotes => "listNotes",
            Operation::GetNoteById => "getNoteById",
            Operation::CreateNote => "createNote",
            Operation::UpdateNote => "updateNote",
            Operation::DeleteNote => "deleteNote",
        }
    }

    /// Parse a wire name; `None` for anything outside the registry.
    pub fn parse(name: &str) -> Option<Operation> {
        Operation::ALL.iter().copied().find(|op| op.name() == name)
    }

    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::ListNotes | Operation::GetNoteById => OperationKind::Query,
            Operation::CreateNote | Operation::UpdateNote | Operation::DeleteNote => {
                OperationKind::Mutation
            }
        }
    }
}

/// One registry entry in the shape the external gateway consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverMapping {
    #[serde(rename = "typeName")]
    pub type_name: OperationKind,
    #[serde(rename = "fieldName")]
    pub field_name: String,
}

/// The registry as routable-operation declarations for the gateway.
pub fn resolver_mappings() -> Vec<ResolverMapping> {
    Operation::ALL
        .iter()
        .map(|op| ResolverMapping {
            type_name: op.kind(),
            field_name: op.name().to_string(),
        })
        .collect()
}

/// Single entrypoint: look up the named operation and run its handler.
///
/// Unknown operation names return `Value::Null` without invoking
/// anything. Handler failures are logged here and collapsed to
/// `Value::Null`, so to the caller a failed operation is
/// indistinguishable from an absent record.
pub fn dispatch(store: &dyn NoteStore, event: &ResolverEvent) -> Value {
    let field_name = event.info.field_name.as_str();
    match Operation::parse(field_name) {
        Some(operation) => match handlers::resolve(store, operation, &event.arguments) {
            Ok(value) => value,
            Err(e) => {
                error!(operation = field_name, error = %e, "operation failed");
                Value::Null
            }
        },
        None => {
            warn!(operation = field_name, "unknown operation");
            Value::Null
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Note, NoteInput, NotePatch};
    use crate::error::{NoteVaultError, Result};
    use crate::event::{EventArguments, EventInfo};
    use crate::store::{DocumentStore, MemoryBackend};
    use serde_json::json;

    /// Fails every store call; used to prove errors never escape
    /// the dispatch boundary.
    struct FailingStore;

    impl NoteStore for FailingStore {
        fn list(&self) -> Result<Vec<Note>> {
            Err(NoteVaultError::Storage("connection refused".to_string()))
        }
        fn get(&self, _id: &str) -> Result<Option<Note>> {
            Err(NoteVaultError::Storage("connection refused".to_string()))
        }
        fn create(&self, _input: &NoteInput) -> Result<Note> {
            Err(NoteVaultError::Storage("connection refused".to_string()))
        }
        fn update(&self, _id: &str, _patch: &NotePatch) -> Result<u64> {
            Err(NoteVaultError::Storage("connection refused".to_string()))
        }
        fn delete(&self, _id: &str) -> Result<u64> {
            Err(NoteVaultError::Storage("connection refused".to_string()))
        }
    }

    /// Panics on any store call; used to prove unknown operations
    /// invoke no handler.
    struct PanickingStore;

    impl NoteStore for PanickingStore {
        fn list(&self) -> Result<Vec<Note>> {
            panic!("store must not be touched");
        }
        fn get(&self, _id: &str) -> Result<Option<Note>> {
            panic!("store must not be touched");
        }
        fn create(&self, _input: &NoteInput) -> Result<Note> {
            panic!("store must not be touched");
        }
        fn update(&self, _id: &str, _patch: &NotePatch) -> Result<u64> {
            panic!("store must not be touched");
        }
        fn delete(&self, _id: &str) -> Result<u64> {
            panic!("store must not be touched");
        }
    }

    fn event(field_name: &str, arguments: EventArguments) -> ResolverEvent {
        ResolverEvent {
            info: EventInfo {
                field_name: field_name.to_string(),
            },
            arguments,
        }
    }

    fn memory_store() -> DocumentStore<MemoryBackend> {
        DocumentStore::new(MemoryBackend::new())
    }

    #[test]
    fn test_registry_names_round_trip() {
        for op in Operation::ALL {
            assert_eq!(Operation::parse(op.name()), Some(op));
        }
    }

    #[test]
    fn test_registry_kinds() {
        let kinds: Vec<OperationKind> = Operation::ALL.iter().map(|op| op.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                OperationKind::Query,
                OperationKind::Query,
                OperationKind::Mutation,
                OperationKind::Mutation,
                OperationKind::Mutation,
            ]
        );
    }

    #[test]
    fn test_parse_rejects_unregistered_names() {
        assert_eq!(Operation::parse("dropAllNotes"), None);
        assert_eq!(Operation::parse("ListNotes"), None);
        assert_eq!(Operation::parse(""), None);
    }

    #[test]
    fn test_resolver_mappings_enumerate_the_registry() {
        let mappings = resolver_mappings();
        assert_eq!(mappings.len(), 5);

        let names: Vec<&str> = mappings.iter().map(|m| m.field_name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "listNotes",
                "getNoteById",
                "createNote",
                "updateNote",
                "deleteNote"
            ]
        );

        let rendered = serde_json::to_value(&mappings[0]).unwrap();
        assert_eq!(
            rendered,
            json!({ "typeName": "Query", "fieldName": "listNotes" })
        );
    }

    #[test]
    fn test_unknown_operation_invokes_nothing() {
        let result = dispatch(
            &PanickingStore,
            &event("dropAllNotes", EventArguments::default()),
        );
        assert_eq!(result, Value::Null);
    }

    #[test]
    fn test_store_failure_collapses_to_null() {
        for op in Operation::ALL {
            let arguments = EventArguments {
                note: Some(NoteInput {
                    id: Some("n1".to_string()),
                    title: Some("t".to_string()),
                    content: Some("c".to_string()),
                    completed: None,
                }),
                note_id: Some("n1".to_string()),
            };
            let result = dispatch(&FailingStore, &event(op.name(), arguments));
            assert_eq!(result, Value::Null, "operation {}", op.name());
        }
    }

    #[test]
    fn test_missing_arguments_collapse_to_null() {
        // getNoteById without a noteId; createNote without a note.
        let store = memory_store();
        assert_eq!(
            dispatch(&store, &event("getNoteById", EventArguments::default())),
            Value::Null
        );
        assert_eq!(
            dispatch(&store, &event("createNote", EventArguments::default())),
            Value::Null
        );
    }

    #[test]
    fn test_create_then_get_round_trip() {
        let store = memory_store();

        let created = dispatch(
            &store,
            &event(
                "createNote",
                EventArguments {
                    note: Some(NoteInput {
                        id: None,
                        title: Some("Groceries".to_string()),
                        content: Some("milk".to_string()),
                        completed: None,
                    }),
                    note_id: None,
                },
            ),
        );
        let id = created["id"].as_str().unwrap().to_string();
        assert_eq!(created["title"], json!("Groceries"));
        assert_eq!(created["completed"], json!(false));

        let fetched = dispatch(
            &store,
            &event(
                "getNoteById",
                EventArguments {
                    note: None,
                    note_id: Some(id),
                },
            ),
        );
        assert_eq!(fetched, created);
    }

    #[test]
    fn test_get_absent_note_is_null() {
        let store = memory_store();
        let result = dispatch(
            &store,
            &event(
                "getNoteById",
                EventArguments {
                    note: None,
                    note_id: Some("missing".to_string()),
                },
            ),
        );
        assert_eq!(result, Value::Null);
    }

    #[test]
    fn test_update_patches_only_supplied_fields() {
        let store = memory_store();
        let created = dispatch(
            &store,
            &event(
                "createNote",
                EventArguments {
                    note: Some(NoteInput {
                        id: Some("n1".to_string()),
                        title: Some("Groceries".to_string()),
                        content: Some("milk".to_string()),
                        completed: None,
                    }),
                    note_id: None,
                },
            ),
        );
        assert_eq!(created["id"], json!("n1"));

        let affected = dispatch(
            &store,
            &event(
                "updateNote",
                EventArguments {
                    note: Some(NoteInput {
                        id: Some("n1".to_string()),
                        title: Some("Errands".to_string()),
                        content: None,
                        completed: None,
                    }),
                    note_id: None,
                },
            ),
        );
        assert_eq!(affected, json!(1));

        let fetched = dispatch(
            &store,
            &event(
                "getNoteById",
                EventArguments {
                    note: None,
                    note_id: Some("n1".to_string()),
                },
            ),
        );
        assert_eq!(fetched["title"], json!("Errands"));
        assert_eq!(fetched["content"], json!("milk"));
    }

    #[test]
    fn test_delete_then_get_is_null() {
        let store = memory_store();
        dispatch(
            &store,
            &event(
                "createNote",
                EventArguments {
                    note: Some(NoteInput {
                        id: Some("n1".to_string()),
                        title: Some("t".to_string()),
                        content: Some("c".to_string()),
                        completed: None,
                    }),
                    note_id: None,
                },
            ),
        );

        let deleted = dispatch(
            &store,
            &event(
                "deleteNote",
                EventArguments {
                    note: None,
                    note_id: Some("n1".to_string()),
                },
            ),
        );
        assert_eq!(deleted, json!(1));

        let fetched = dispatch(
            &store,
            &event(
                "getNoteById",
                EventArguments {
                    note: None,
                    note_id: Some("n1".to_string()),
                },
            ),
        );
        assert_eq!(fetched, Value::Null);
    }

    #[test]
    fn test_list_notes_returns_array() {
        let store = memory_store();
        assert_eq!(
            dispatch(&store, &event("listNotes", EventArguments::default())),
            json!([])
        );
    }
}
