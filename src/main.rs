use clap::Parser;
use log::info;

use ocean_notes::{terminal_confirm, App, Cli, Config, NoteStore, NotesSession, Result};

fn initialize_logger(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_secs()
        .format_module_path(true)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let config = match cli.store {
        Some(path) => Config::with_store_path(path),
        None => Config::load()?,
    };
    info!("Using note store at {}", config.store_path.display());

    let store = NoteStore::open(config).await;
    let session = NotesSession::open(store, terminal_confirm()).await;

    let mut app = App::new(session, cli.verbose);
    app.run(cli.command).await
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    initialize_logger(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
