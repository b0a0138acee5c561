// SPDX-License-Identifier: GPL-3.0-only
use thiserror::Error;

use crate::store::StoreError;

/// Reasons a maze is not accepted into the registry
#[derive(Debug, Error)]
pub enum MazeError {
    #[error("No grid cells found for maze")]
    EmptyGrid,

    #[error("No start position found for maze")]
    MissingStart,

    #[error("No end position found for maze")]
    MissingEnd,

    #[error("Maze {field} {reason}")]
    InvalidField {
        field: &'static str,
        reason: &'static str,
    },

    #[error("A maze with id {0} already exists")]
    DuplicateId(String),

    #[error("Failed to persist maze {id}: {source}")]
    Persist {
        id: String,
        #[source]
        source: StoreError,
    },
}

impl MazeError {
    /// True when the caller sent a maze that can never be accepted as is
    pub fn is_validation(&self) -> bool {
        !matches!(self, MazeError::Persist { .. })
    }
}
