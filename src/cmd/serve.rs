//! Issue board server command. Serving is the default action.

use anyhow::{Context, Result};
use broken_promises::board::server::{ServerConfig, start_server};
use broken_promises::board::store::IssueStore;

pub async fn cmd_serve(config: ServerConfig, init: bool) -> Result<()> {
    if init {
        let store = IssueStore::new(&config.data_file);
        let created = store
            .init()
            .with_context(|| format!("Failed to initialize {}", store.path().display()))?;
        if created {
            println!("Data file initialized at {}", store.path().display());
        } else {
            println!("Data file already exists at {}", store.path().display());
        }
        return Ok(());
    }

    start_server(config).await
}
