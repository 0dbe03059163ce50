use clap::Parser;
use notevault::cli::{
    handle_create, handle_delete, handle_get, handle_list, handle_mappings, handle_resolve,
    handle_update, store_config, Cli, Commands,
};
use tracing_subscriber::EnvFilter;

fn main() {
    // Logs go to stderr; stdout carries only operation results.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match store_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Resolve { event } => handle_resolve(&config, event),
        Commands::List => handle_list(&config),
        Commands::Get { id } => handle_get(&config, id),
        Commands::Create {
            title,
            content,
            completed,
        } => handle_create(&config, title, content, completed),
        Commands::Update {
            id,
            title,
            content,
            completed,
        } => handle_update(&config, id, title, content, completed),
        Commands::Delete { id } => handle_delete(&config, id),
        Commands::Mappings => handle_mappings(),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
