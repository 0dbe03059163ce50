//! Persistence adapters for notes.
//!
//! Two interchangeable variants implement the same capability set: a
//! relational adapter over SQLite and a key-value document adapter.
//! Exactly one is active per deployment.

mod document;
mod relational;

pub use document::{
    DocumentStore, FileBackend, Item, KeyValueBackend, MemoryBackend, UpdateExpression,
};
pub use relational::{RelationalConfig, RelationalStore};

use std::path::PathBuf;

use crate::entity::{Note, NoteInput, NotePatch};
use crate::error::Result;

/// Capability set shared by both persistence adapters.
///
/// Every method is a single request-response round trip against the
/// backing store. There are no transactions, retries, or timeouts at
/// this layer; failures surface as `Err` and are collapsed at the
/// dispatch boundary.
pub trait NoteStore: Send + Sync {
    /// All notes, unfiltered and unpaginated.
    fn list(&self) -> Result<Vec<Note>>;

    /// A single note, or `Ok(None)` when the id is absent.
    fn get(&self, id: &str) -> Result<Option<Note>>;

    /// Store a new note and return it with its id.
    fn create(&self, input: &NoteInput) -> Result<Note>;

    /// Apply only the supplied fields; returns the affected-row count.
    fn update(&self, id: &str, patch: &NotePatch) -> Result<u64>;

    /// Remove a note by id; returns the deletion count.
    fn delete(&self, id: &str) -> Result<u64>;
}

/// Deployment-time adapter selection.
#[derive(Debug, Clone)]
pub enum StoreConfig {
    /// Relational adapter; connection parameters come from a secret
    /// lookup at first use.
    Relational {
        secrets_path: PathBuf,
        secret_id: String,
    },
    /// Document adapter over a file-backed item table.
    Document { path: PathBuf },
}

/// Construct the active adapter for a deployment.
pub fn open_store(config: &StoreConfig) -> Result<Box<dyn NoteStore>> {
    match config {
        StoreConfig::Relational {
            secrets_path,
            secret_id,
        } => Ok(Box::new(RelationalStore::new(RelationalConfig {
            secrets_path: secrets_path.clone(),
            secret_id: secret_id.clone(),
        }))),
        StoreConfig::Document { path } => {
            Ok(Box::new(DocumentStore::new(FileBackend::open(path)?)))
        }
    }
}
