use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use crate::entity::NoteInput;
use crate::error::{NoteVaultError, Result};
use crate::event::{EventArguments, EventInfo, ResolverEvent};
use crate::resolver::{dispatch, resolver_mappings, Operation};
use crate::store::{open_store, StoreConfig};

use super::commands::{Cli, StoreKind};

/// Build the deployment's store selection from the global CLI flags.
pub fn store_config(cli: &Cli) -> Result<StoreConfig> {
    match cli.store {
        StoreKind::Document => Ok(StoreConfig::Document {
            path: cli.data.clone(),
        }),
        StoreKind::Relational => {
            let secrets_path = cli
                .secrets
                .clone()
                .ok_or(NoteVaultError::MalformedInput("--secrets"))?;
            Ok(StoreConfig::Relational {
                secrets_path,
                secret_id: cli.secret_id.clone(),
            })
        }
    }
}

pub fn handle_resolve(config: &StoreConfig, event_path: Option<PathBuf>) -> Result<()> {
    let raw = match event_path {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    let event: ResolverEvent = serde_json::from_str(&raw)?;

    run_event(config, event)
}

pub fn handle_list(config: &StoreConfig) -> Result<()> {
    run_operation(config, Operation::ListNotes, EventArguments::default())
}

pub fn handle_get(config: &StoreConfig, id: String) -> Result<()> {
    run_operation(
        config,
        Operation::GetNoteById,
        EventArguments {
            note: None,
            note_id: Some(id),
        },
    )
}

pub fn handle_create(
    config: &StoreConfig,
    title: String,
    content: String,
    completed: bool,
) -> Result<()> {
    let note = NoteInput {
        id: None,
        title: Some(title),
        content: Some(content),
        completed: Some(completed),
    };
    run_operation(
        config,
        Operation::CreateNote,
        EventArguments {
            note: Some(note),
            note_id: None,
        },
    )
}

pub fn handle_update(
    config: &StoreConfig,
    id: String,
    title: Option<String>,
    content: Option<String>,
    completed: Option<bool>,
) -> Result<()> {
    let note = NoteInput {
        id: Some(id),
        title,
        content,
        completed,
    };
    run_operation(
        config,
        Operation::UpdateNote,
        EventArguments {
            note: Some(note),
            note_id: None,
        },
    )
}

pub fn handle_delete(config: &StoreConfig, id: String) -> Result<()> {
    run_operation(
        config,
        Operation::DeleteNote,
        EventArguments {
            note: None,
            note_id: Some(id),
        },
    )
}

pub fn handle_mappings() -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&resolver_mappings())?);
    Ok(())
}

/// The CLI verbs build the same events the gateway would send, so
/// everything flows through the registry.
fn run_operation(
    config: &StoreConfig,
    operation: Operation,
    arguments: EventArguments,
) -> Result<()> {
    let event = ResolverEvent {
        info: EventInfo {
            field_name: operation.name().to_string(),
        },
        arguments,
    };
    run_event(config, event)
}

fn run_event(config: &StoreConfig, event: ResolverEvent) -> Result<()> {
    let store = open_store(config)?;
    let result = dispatch(store.as_ref(), &event);
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
