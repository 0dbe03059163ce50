//! File-backed secret store for database credentials.
//!
//! Stands in for the managed secret service: a JSON file mapping a
//! secret id to a credentials record. The relational adapter resolves
//! its secret exactly once, during lazy connection init.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{NoteVaultError, Result};

/// Database credentials as stored under a secret id.
///
/// For a local SQLite deployment `host` carries the database path;
/// `username` and `password` keep the managed secret's record shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbSecret {
    pub username: String,
    pub password: String,
    pub host: String,
}

/// A loaded secret file: secret id -> credentials.
pub struct SecretFile {
    secrets: HashMap<String, DbSecret>,
}

impl SecretFile {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let secrets = serde_json::from_str(&raw)?;
        Ok(Self { secrets })
    }

    pub fn get(&self, secret_id: &str) -> Result<&DbSecret> {
        self.secrets
            .get(secret_id)
            .ok_or_else(|| NoteVaultError::SecretNotFound(secret_id.to_string()))
    }
}

/// Resolve a single secret from a secret file.
pub fn fetch_secret(path: &Path, secret_id: &str) -> Result<DbSecret> {
    debug!(secret_id, "retrieving database secret");
    let file = SecretFile::load(path)?;
    let secret = file.get(secret_id)?.clone();
    debug!(username = %secret.username, "obtained database credentials");
    Ok(secret)
}
