//! Relational persistence adapter over SQLite.

use std::path::PathBuf;
use std::sync::Mutex;

use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};
use uuid::Uuid;

use crate::entity::{Note, NoteInput, NotePatch};
use crate::error::{NoteVaultError, Result};
use crate::secrets;
use crate::store::NoteStore;

/// Where the relational adapter finds its connection parameters.
#[derive(Debug, Clone)]
pub struct RelationalConfig {
    pub secrets_path: PathBuf,
    pub secret_id: String,
}

enum Source {
    Secret(RelationalConfig),
    Path(PathBuf),
    Memory,
}

/// Relational adapter for notes.
///
/// The connection is an explicitly owned, lazily-created resource:
/// opened on first use behind a blocking guard, shared for the
/// lifetime of the store, never explicitly closed.
pub struct RelationalStore {
    source: Source,
    conn: Mutex<Option<Connection>>,
}

impl RelationalStore {
    /// Adapter whose connection parameters come from a secret lookup.
    pub fn new(config: RelationalConfig) -> Self {
        Self {
            source: Source::Secret(config),
            conn: Mutex::new(None),
        }
    }

    /// Adapter over an explicit database path.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            source: Source::Path(path.into()),
            conn: Mutex::new(None),
        }
    }

    /// In-memory adapter for tests and scratch use.
    pub fn open_in_memory() -> Self {
        Self {
            source: Source::Memory,
            conn: Mutex::new(None),
        }
    }

    fn connect(&self) -> Result<Connection> {
        let conn = match &self.source {
            Source::Secret(config) => {
                let secret = secrets::fetch_secret(&config.secrets_path, &config.secret_id)?;
                info!(username = %secret.username, host = %secret.host, "opening notes database");
                Connection::open(&secret.host)?
            }
            Source::Path(path) => Connection::open(path)?,
            Source::Memory => Connection::open_in_memory()?,
        };

        conn.execute(
            "CREATE TABLE IF NOT EXISTS notes (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                content TEXT NOT NULL,
                completed INTEGER NOT NULL
            )",
            [],
        )?;

        Ok(conn)
    }

    /// Run `f` against the shared connection, opening it on first call.
    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let mut guard = self
            .conn
            .lock()
            .map_err(|_| NoteVaultError::Storage("connection lock poisoned".to_string()))?;

        if guard.is_none() {
            *guard = Some(self.connect()?);
            debug!("established new database connection");
        } else {
            debug!("reusing existing database connection");
        }

        match guard.as_ref() {
            Some(conn) => f(conn),
            None => Err(NoteVaultError::Storage(
                "connection unavailable after init".to_string(),
            )),
        }
    }
}

impl NoteStore for RelationalStore {
    fn list(&self) -> Result<Vec<Note>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT id, title, content, completed FROM notes")?;
            let notes = stmt
                .query_map([], row_to_note)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(notes)
        })
    }

    fn get(&self, id: &str) -> Result<Option<Note>> {
        self.with_conn(|conn| {
            let note = conn
                .query_row(
                    "SELECT id, title, content, completed FROM notes WHERE id = ?1",
                    [id],
                    row_to_note,
                )
                .optional()?;
            Ok(note)
        })
    }

    fn create(&self, input: &NoteInput) -> Result<Note> {
        let title = input
            .title
            .clone()
            .ok_or(NoteVaultError::MalformedInput("note.title"))?;
        let content = input
            .content
            .clone()
            .ok_or(NoteVaultError::MalformedInput("note.content"))?;

        // This variant always generates the id server-side.
        let note = Note {
            id: Uuid::new_v4().to_string(),
            title,
            content,
            completed: input.completed.unwrap_or(false),
        };

        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO notes (id, title, content, completed) VALUES (?1, ?2, ?3, ?4)",
                params![note.id, note.title, note.content, note.completed],
            )?;
            Ok(())
        })?;

        Ok(note)
    }

    fn update(&self, id: &str, patch: &NotePatch) -> Result<u64> {
        if patch.is_empty() {
            return Err(NoteVaultError::EmptyUpdate);
        }

        // Build the SET clause from only the supplied fields.
        let mut clauses: Vec<String> = Vec::new();
        let mut values: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();
        if let Some(title) = &patch.title {
            clauses.push(format!("title = ?{}", values.len() + 1));
            values.push(Box::new(title.clone()));
        }
        if let Some(content) = &patch.content {
            clauses.push(format!("content = ?{}", values.len() + 1));
            values.push(Box::new(content.clone()));
        }
        if let Some(completed) = patch.completed {
            clauses.push(format!("completed = ?{}", values.len() + 1));
            values.push(Box::new(completed));
        }
        values.push(Box::new(id.to_string()));

        let sql = format!(
            "UPDATE notes SET {} WHERE id = ?{}",
            clauses.join(", "),
            values.len()
        );

        self.with_conn(|conn| {
            let affected = conn.execute(
                &sql,
                rusqlite::params_from_iter(values.iter().map(|v| v.as_ref())),
            )?;
            Ok(affected as u64)
        })
    }

    fn delete(&self, id: &str) -> Result<u64> {
        self.with_conn(|conn| {
            let deleted = conn.execute("DELETE FROM notes WHERE id = ?1", [id])?;
            Ok(deleted as u64)
        })
    }
}

fn row_to_note(row: &rusqlite::Row<'_>) -> rusqlite::Result<Note> {
    Ok(Note {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        completed: row.get(3)?,
    })
}

impl From<rusqlite::Error> for NoteVaultError {
    fn from(e: rusqlite::Error) -> Self {
        NoteVaultError::Storage(format!("SQLite error: {}", e))
    }
}
