// Entrypoint for the CLI application.
// - Keeps `main` small: build the session, the API client and hand them
//   to the UI loop.
// - Returns `anyhow::Result` so setup failures print a readable chain.

use anyhow::{Context, Result};
use gopress_cli::notify::TerminalNotifier;
use gopress_cli::storage::FileStore;
use gopress_cli::{ui::main_menu, Config, HttpClient, TokenStore};
use indicatif::MultiProgress;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Quiet by default so log lines don't interleave with the prompts;
    // `RUST_LOG=gopress_cli=debug` shows every request and navigation.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    // Base URL comes from `GOPRESS_API_BASE_URL`. See `Config::from_env`.
    let config = Config::from_env().context("Failed to read configuration")?;
    tracing::info!(base_url = %config.base_url, "starting");

    // An unreadable saved session just means starting logged out.
    let tokens = TokenStore::load(Arc::new(FileStore::new(&config.state_dir)));
    // Spinners and error notices share one draw target.
    let progress = MultiProgress::new();
    let notifier = TerminalNotifier::new(progress.clone());
    let client = HttpClient::new(&config, tokens, Arc::new(notifier))
        .context("Failed to build HTTP client")?;

    // Start the interactive menu. This call blocks until the user exits.
    main_menu(client, progress)?;
    Ok(())
}
