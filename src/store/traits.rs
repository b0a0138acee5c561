// SPDX-License-Identifier: GPL-3.0-only
use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

use crate::maze::Maze;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Invalid maze file path: {0}")]
    InvalidPath(String),

    #[error("Storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[async_trait]
pub trait MazeStore: Send + Sync {
    /// Read every persisted maze
    ///
    /// Files that cannot be read or hold no cells are skipped, only a
    /// failure to access the storage location itself is an error.
    async fn load_all(&self) -> Result<Vec<Maze>, StoreError>;

    /// Durably write a maze, replacing any earlier copy with the same id
    async fn save(&self, maze: &Maze) -> Result<(), StoreError>;
}
