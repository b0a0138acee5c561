// SPDX-License-Identifier: GPL-3.0-only
use std::path::Path;
use std::sync::Arc;
use crate::config::Config;
use crate::registry::MazeManager;
use crate::store::FileMazeStore;

/// The 7x10 maze used across tests: start at 0-0, end at 6-9
pub fn sample_rows() -> Vec<String> {
    [
        "SOXXXXXXXX",
        "OOOXXXXXXX",
        "OXOOOXOOOO",
        "XXXXOXOXXO",
        "OOOOOOOXXO",
        "OXXOXXXXXO",
        "OOOOXXXXXE",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Start a manager on `dir` and wait for its startup load
pub async fn setup_test_manager(dir: &Path) -> Arc<MazeManager> {
    let store = Arc::new(FileMazeStore::new(dir.to_path_buf()));
    let manager = MazeManager::start(store);
    manager.wait_until_initialized().await;
    manager
}

/// Create a test configuration pointing at `storage_dir`
pub fn create_test_config(storage_dir: &Path) -> Config {
    use std::net::SocketAddr;

    Config {
        storage_dir: Some(storage_dir.to_path_buf()),
        api_bind: SocketAddr::from(([127, 0, 0, 1], 0)), // Use port 0 to auto-assign
        log_level: "error".to_string(), // Reduce log noise in tests
        log_json: false,
    }
}

/// Create a temporary directory for tests
pub fn create_temp_dir() -> tempfile::TempDir {
    tempfile::TempDir::new().expect("Failed to create temp directory")
}
