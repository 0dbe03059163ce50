//! Key-value document adapter for notes.
//!
//! Every operation is exactly one backend request keyed by the note
//! id. Partial updates go through a placeholder-based update
//! expression so attribute names that collide with store-reserved
//! words never appear literally in the expression.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use serde_json::{Map, Value};
use tracing::debug;
use uuid::Uuid;

use crate::entity::{Note, NoteInput, NotePatch};
use crate::error::{NoteVaultError, Result};
use crate::store::NoteStore;

/// A stored item: the raw attribute map keyed by attribute name.
pub type Item = Map<String, Value>;

/// Patchable attributes, in the fixed order expressions are built in.
const PATCH_ATTRS: [&str; 3] = ["title", "content", "completed"];

/// A `set` update expression with its parallel placeholder maps.
///
/// `expression` has the shape `set #a = :a, #b = :b`; `names` maps
/// each `#a` placeholder to the literal attribute name and `values`
/// maps each `:a` placeholder to the new value.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateExpression {
    pub expression: String,
    pub names: HashMap<String, String>,
    pub values: HashMap<String, Value>,
}

impl UpdateExpression {
    /// Build an expression from the supplied patch fields.
    ///
    /// One placeholder pair per attribute, `set ` opener, `, `
    /// separator between clauses, no trailing separator. An empty
    /// patch is an error.
    pub fn from_patch(patch: &NotePatch) -> Result<Self> {
        let mut attrs: Vec<(&str, Value)> = Vec::new();
        if let Some(title) = &patch.title {
            attrs.push(("title", Value::String(title.clone())));
        }
        if let Some(content) = &patch.content {
            attrs.push(("content", Value::String(content.clone())));
        }
        if let Some(completed) = patch.completed {
            attrs.push(("completed", Value::Bool(completed)));
        }
        if attrs.is_empty() {
            return Err(NoteVaultError::EmptyUpdate);
        }

        let mut expression = String::from("set ");
        let mut names = HashMap::new();
        let mut values = HashMap::new();
        for (i, (attr, value)) in attrs.into_iter().enumerate() {
            debug_assert!(PATCH_ATTRS.contains(&attr));
            if i > 0 {
                expression.push_str(", ");
            }
            let name_placeholder = format!("#{}", attr);
            let value_placeholder = format!(":{}", attr);
            expression.push_str(&format!("{} = {}", name_placeholder, value_placeholder));
            names.insert(name_placeholder, attr.to_string());
            values.insert(value_placeholder, value);
        }

        Ok(Self {
            expression,
            names,
            values,
        })
    }

    /// Apply the expression to an item, resolving both placeholder
    /// maps. Only `set` expressions are supported.
    pub fn apply(&self, item: &mut Item) -> Result<()> {
        let clauses = self.expression.strip_prefix("set ").ok_or_else(|| {
            NoteVaultError::Storage(format!(
                "unsupported update expression: {}",
                self.expression
            ))
        })?;

        for clause in clauses.split(", ") {
            let (name_placeholder, value_placeholder) =
                clause.split_once(" = ").ok_or_else(|| {
                    NoteVaultError::Storage(format!("malformed update clause: {}", clause))
                })?;
            let attr = self.names.get(name_placeholder).ok_or_else(|| {
                NoteVaultError::Storage(format!("unresolved name placeholder: {}", name_placeholder))
            })?;
            let value = self.values.get(value_placeholder).ok_or_else(|| {
                NoteVaultError::Storage(format!(
                    "unresolved value placeholder: {}",
                    value_placeholder
                ))
            })?;
            item.insert(attr.clone(), value.clone());
        }

        Ok(())
    }
}

/// One request per operation against a key-value table of items.
pub trait KeyValueBackend: Send + Sync {
    /// Unfiltered full scan of the table.
    fn scan(&self) -> Result<Vec<Item>>;

    /// Direct key lookup.
    fn get_item(&self, key: &str) -> Result<Option<Item>>;

    /// Raw put of the full item under its `id` attribute.
    fn put_item(&self, item: Item) -> Result<()>;

    /// Apply an update expression to the item at `key`. A missing key
    /// is an error, never a silent upsert.
    fn update_item(&self, key: &str, expression: &UpdateExpression) -> Result<u64>;

    /// Direct key delete; returns the deletion count.
    fn delete_item(&self, key: &str) -> Result<u64>;
}

fn item_key(item: &Item) -> Result<String> {
    match item.get("id") {
        Some(Value::String(id)) => Ok(id.clone()),
        _ => Err(NoteVaultError::Storage(
            "item has no string id attribute".to_string(),
        )),
    }
}

/// In-process item table; the unit-test backend.
#[derive(Default)]
pub struct MemoryBackend {
    items: Mutex<HashMap<String, Item>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, Item>>> {
        self.items
            .lock()
            .map_err(|_| NoteVaultError::Storage("item table lock poisoned".to_string()))
    }
}

impl KeyValueBackend for MemoryBackend {
    fn scan(&self) -> Result<Vec<Item>> {
        Ok(self.lock()?.values().cloned().collect())
    }

    fn get_item(&self, key: &str) -> Result<Option<Item>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn put_item(&self, item: Item) -> Result<()> {
        let key = item_key(&item)?;
        self.lock()?.insert(key, item);
        Ok(())
    }

    fn update_item(&self, key: &str, expression: &UpdateExpression) -> Result<u64> {
        let mut items = self.lock()?;
        let item = items
            .get_mut(key)
            .ok_or_else(|| NoteVaultError::NoteNotFound(key.to_string()))?;
        expression.apply(item)?;
        Ok(1)
    }

    fn delete_item(&self, key: &str) -> Result<u64> {
        Ok(if self.lock()?.remove(key).is_some() {
            1
        } else {
            0
        })
    }
}

/// File-backed item table: the whole map is read on open and rewritten
/// after every mutation. Suited to single-process CLI use.
pub struct FileBackend {
    path: PathBuf,
    items: Mutex<HashMap<String, Item>>,
}

impl FileBackend {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let items = if path.exists() {
            serde_json::from_str(&fs::read_to_string(&path)?)?
        } else {
            HashMap::new()
        };
        Ok(Self {
            path,
            items: Mutex::new(items),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, Item>>> {
        self.items
            .lock()
            .map_err(|_| NoteVaultError::Storage("item table lock poisoned".to_string()))
    }

    fn persist(&self, items: &HashMap<String, Item>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serde_json::to_string_pretty(items)?)?;
        Ok(())
    }
}

impl KeyValueBackend for FileBackend {
    fn scan(&self) -> Result<Vec<Item>> {
        Ok(self.lock()?.values().cloned().collect())
    }

    fn get_item(&self, key: &str) -> Result<Option<Item>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn put_item(&self, item: Item) -> Result<()> {
        let key = item_key(&item)?;
        let mut items = self.lock()?;
        items.insert(key, item);
        self.persist(&items)
    }

    fn update_item(&self, key: &str, expression: &UpdateExpression) -> Result<u64> {
        let mut items = self.lock()?;
        let item = items
            .get_mut(key)
            .ok_or_else(|| NoteVaultError::NoteNotFound(key.to_string()))?;
        expression.apply(item)?;
        self.persist(&items)?;
        Ok(1)
    }

    fn delete_item(&self, key: &str) -> Result<u64> {
        let mut items = self.lock()?;
        if items.remove(key).is_none() {
            return Ok(0);
        }
        self.persist(&items)?;
        Ok(1)
    }
}

/// Key-value persistence adapter for notes.
pub struct DocumentStore<B: KeyValueBackend> {
    backend: B,
}

impl<B: KeyValueBackend> DocumentStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }
}

fn note_from_item(item: Item) -> Result<Note> {
    Ok(serde_json::from_value(Value::Object(item))?)
}

fn note_to_item(note: &Note) -> Result<Item> {
    match serde_json::to_value(note)? {
        Value::Object(item) => Ok(item),
        _ => Err(NoteVaultError::Storage(
            "note did not serialize to an object".to_string(),
        )),
    }
}

impl<B: KeyValueBackend> NoteStore for DocumentStore<B> {
    fn list(&self) -> Result<Vec<Note>> {
        // Full scan; this variant does not paginate.
        self.backend
            .scan()?
            .into_iter()
            .map(note_from_item)
            .collect()
    }

    fn get(&self, id: &str) -> Result<Option<Note>> {
        match self.backend.get_item(id)? {
            Some(item) => Ok(Some(note_from_item(item)?)),
            None => Ok(None),
        }
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

        // A caller-supplied id is kept; a missing one is generated so
        // no item is ever written under an undefined key.
        let note = Note {
            id: input
                .id
                .clone()
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            title,
            content,
            completed: input.completed.unwrap_or(false),
        };

        self.backend.put_item(note_to_item(&note)?)?;
        Ok(note)
    }

    fn update(&self, id: &str, patch: &NotePatch) -> Result<u64> {
        let expression = UpdateExpression::from_patch(patch)?;
        debug!(id, expression = %expression.expression, "updating item");
        self.backend.update_item(id, &expression)
    }

    fn delete(&self, id: &str) -> Result<u64> {
        self.backend.delete_item(id)
    }
}
