pub mod cli;
pub mod entity;
pub mod error;
pub mod event;
pub mod resolver;
pub mod secrets;
pub mod store;

pub use entity::Note;
pub use error::{NoteVaultError, Result};
pub use event::ResolverEvent;
pub use resolver::{dispatch, resolver_mappings, Operation, OperationKind};
pub use store::{open_store, NoteStore, StoreConfig};
