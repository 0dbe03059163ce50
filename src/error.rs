use thiserror::Error;

#[derive(Error, Debug)]
pub enum NoteVaultError {
    #[error("Note not found: {0}")]
    NoteNotFound(String),

    #[error("Missing required argument: {0}")]
    MalformedInput(&'static str),

    #[error("Update patch has no attributes")]
    EmptyUpdate,

    #[error("Secret not found: {0}")]
    SecretNotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NoteVaultError>;
