// SPDX-License-Identifier: GPL-3.0-only
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

use maze_server::api::HttpServer;
use maze_server::config::Config;
use maze_server::logging::setup_logging;
use maze_server::registry::MazeManager;
use maze_server::store::{FileMazeStore, MazeStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::load()?;

    // Initialize logging
    setup_logging(&config.log_level, config.log_json)?;

    info!("Starting maze server v{}", env!("CARGO_PKG_VERSION"));

    // Mazes load in the background, the HTTP server starts right away
    let storage_dir = config.storage_dir();
    info!(dir = %storage_dir.display(), "Using maze storage directory");
    let store: Arc<dyn MazeStore> = Arc::new(FileMazeStore::new(storage_dir));
    let manager = MazeManager::start(store);

    let http_server = HttpServer::new(Arc::clone(&manager), config.api_bind);
    if let Err(e) = http_server.serve(shutdown_signal()).await {
        error!(error = %e, "HTTP server error");
        return Err(e);
    }

    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Received shutdown signal (Ctrl+C)");
        }
        Err(err) => {
            error!(error = %err, "Unable to listen for shutdown signal");
            // Without a signal handler the server runs until the process is killed
            std::future::pending::<()>().await;
        }
    }
}
