mod commands;
mod handlers;

pub use commands::{Cli, Commands, StoreKind};
pub use handlers::{
    handle_create, handle_delete, handle_get, handle_list, handle_mappings, handle_resolve,
    handle_update, store_config,
};
