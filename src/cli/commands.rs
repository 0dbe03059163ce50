use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "notevault")]
#[command(version, about = "A gateway-ready CRUD resolver backend for notes")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Persistence adapter to use
    #[arg(long, value_enum, default_value = "document", global = true)]
    pub store: StoreKind,

    /// Item file for the document adapter
    #[arg(long, default_value = "notes.json", global = true)]
    pub data: PathBuf,

    /// Secret file for the relational adapter
    #[arg(long, global = true)]
    pub secrets: Option<PathBuf>,

    /// Secret id naming the database credentials
    #[arg(long, default_value = "notes-db", global = true)]
    pub secret_id: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum StoreKind {
    Relational,
    Document,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Dispatch a resolver event read from a file or stdin
    Resolve {
        /// Event JSON file (defaults to stdin)
        #[arg(long)]
        event: Option<PathBuf>,
    },

    /// List all notes
    List,

    /// Get a single note by id
    Get {
        /// Note id
        id: String,
    },

    /// Create a note
    Create {
        #[arg(long)]
        title: String,

        #[arg(long)]
        content: String,

        /// Mark the note completed on creation
        #[arg(long)]
        completed: bool,
    },

    /// Update fields of an existing note
    Update {
        /// Note id
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        content: Option<String>,

        #[arg(long)]
        completed: Option<bool>,
    },

    /// Delete a note by id
    Delete {
        /// Note id
        id: String,
    },

    /// Print the resolver registry as the gateway consumes it
    Mappings,
}
