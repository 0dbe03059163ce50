//! The five operation handlers.
//!
//! Uniform shape: log the inbound arguments, make exactly one store
//! call, log the outcome, return it as JSON. Typed errors propagate to
//! the dispatch boundary, where they are collapsed to null.

use serde_json::{json, Value};
use tracing::debug;

use crate::entity::NotePatch;
use crate::error::{NoteVaultError, Result};
use crate::event::EventArguments;
use crate::resolver::Operation;
use crate::store::NoteStore;

pub(super) fn resolve(
    store: &dyn NoteStore,
    operation: Operation,
    arguments: &EventArguments,
) -> Result<Value> {
    match operation {
        Operation::ListNotes => list_notes(store),
        Operation::GetNoteById => get_note_by_id(store, arguments),
        Operation::CreateNote => create_note(store, arguments),
        Operation::UpdateNote => update_note(store, arguments),
        Operation::DeleteNote => delete_note(store, arguments),
    }
}

fn list_notes(store: &dyn NoteStore) -> Result<Value> {
    debug!("listNotes");
    let notes = store.list()?;
    debug!(count = notes.len(), "listNotes result");
    Ok(serde_json::to_value(notes)?)
}

fn get_note_by_id(store: &dyn NoteStore, arguments: &EventArguments) -> Result<Value> {
    let note_id = arguments
        .note_id
        .as_deref()
        .ok_or(NoteVaultError::MalformedInput("noteId"))?;
    debug!(note_id, "getNoteById");

    match store.get(note_id)? {
        Some(note) => Ok(serde_json::to_value(note)?),
        None => {
            debug!(note_id, "getNoteById found nothing");
            Ok(Value::Null)
        }
    }
}

fn create_note(store: &dyn NoteStore, arguments: &EventArguments) -> Result<Value> {
    let input = arguments
        .note
        .as_ref()
        .ok_or(NoteVaultError::MalformedInput("note"))?;
    debug!(?input, "createNote");

    let note = store.create(input)?;
    debug!(id = %note.id, "createNote stored");
    Ok(serde_json::to_value(note)?)
}

fn update_note(store: &dyn NoteStore, arguments: &EventArguments) -> Result<Value> {
    let input = arguments
        .note
        .as_ref()
        .ok_or(NoteVaultError::MalformedInput("note"))?;
    let id = input
        .id
        .as_deref()
        .ok_or(NoteVaultError::MalformedInput("note.id"))?;
    debug!(id, "updateNote");

    let patch = NotePatch::from(input);
    let affected = store.update(id, &patch)?;
    debug!(id, affected, "updateNote result");
    Ok(json!(affected))
}

fn delete_note(store: &dyn NoteStore, arguments: &EventArguments) -> Result<Value> {
    let note_id = arguments
        .note_id
        .as_deref()
        .ok_or(NoteVaultError::MalformedInput("noteId"))?;
    debug!(note_id, "deleteNote");

    let deleted = store.delete(note_id)?;
    debug!(note_id, deleted, "deleteNote result");
    Ok(json!(deleted))
}
