// SPDX-License-Identifier: GPL-3.0-only
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::maze::grid::is_wall;
use crate::maze::{decode_rows, Direction, Maze};
use crate::registry::error::MazeError;
use crate::store::{MazeStore, StoreError};

/// Longest accepted maze id in bytes. The id is escaped into a file name,
/// which can triple its length, and must stay under the 255 byte limit.
pub const MAX_ID_LEN: usize = 80;

const LINE_BREAKS: [char; 2] = ['\n', '\r'];
const NO_LINE_BREAKS: &str = "must not contain line breaks";

/// Startup progress of the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitState {
    Uninitialized,
    Loading,
    Initialized,
}

/// Owns the maze registry.
///
/// Built once per process with [`MazeManager::start`] and shared through
/// `Arc`. All operations can run concurrently; none of them waits for the
/// startup load to finish.
pub struct MazeManager {
    mazes: DashMap<String, Maze>,
    store: Arc<dyn MazeStore>,
    state: watch::Receiver<InitState>,
}

impl MazeManager {
    /// Create the manager and load persisted mazes in the background.
    ///
    /// Must be called from within a tokio runtime. Returns immediately, use
    /// [`MazeManager::wait_until_initialized`] to wait for the load.
    pub fn start(store: Arc<dyn MazeStore>) -> Arc<Self> {
        let (state_tx, state_rx) = watch::channel(InitState::Uninitialized);
        let manager = Arc::new(Self {
            mazes: DashMap::new(),
            store,
            state: state_rx,
        });

        let loader = Arc::clone(&manager);
        tokio::spawn(async move {
            state_tx.send_replace(InitState::Loading);

            // A separate task so a panic while loading still ends in Initialized
            let load = tokio::spawn(async move { loader.load_persisted().await });
            match load.await {
                Ok(Ok(count)) => info!(count, "Maze registry initialized"),
                Ok(Err(e)) => error!(error = %e, "Error loading persisted mazes"),
                Err(e) => error!(error = %e, "Maze loading task failed"),
            }

            state_tx.send_replace(InitState::Initialized);
        });

        manager
    }

    async fn load_persisted(&self) -> Result<usize, StoreError> {
        let mut count = 0;

        for maze in self.store.load_all().await? {
            match self.mazes.entry(maze.id.clone()) {
                Entry::Occupied(_) => {
                    warn!(maze_id = %maze.id, name = %maze.name, "Duplicate persisted maze id, skipping");
                }
                Entry::Vacant(slot) => {
                    debug!(maze_id = %maze.id, name = %maze.name, "Added existing maze");
                    slot.insert(maze);
                    count += 1;
                }
            }
        }

        Ok(count)
    }

    pub fn init_state(&self) -> InitState {
        *self.state.borrow()
    }

    pub fn is_initialized(&self) -> bool {
        self.init_state() == InitState::Initialized
    }

    /// Resolves once the startup load has finished, successfully or not
    pub async fn wait_until_initialized(&self) {
        let mut state = self.state.clone();
        // Err only if the loader went away, which happens after it reported Initialized
        let _ = state.wait_for(|s| *s == InitState::Initialized).await;
    }

    /// Validate, register and persist a new maze built from `rows`.
    ///
    /// A missing or empty `id` gets a fresh UUID, a missing `name` becomes
    /// empty. On a persistence failure the maze is taken out of the registry
    /// again so memory and disk stay in step.
    pub async fn add_new_maze<I, S>(
        &self,
        rows: I,
        name: Option<String>,
        id: Option<String>,
    ) -> Result<Maze, MazeError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rows: Vec<S> = rows.into_iter().collect();

        // Each row is written as one line of the maze file
        if rows.iter().any(|row| row.as_ref().contains(LINE_BREAKS)) {
            warn!("Maze grid row contains a line break");
            return Err(MazeError::InvalidField {
                field: "grid",
                reason: NO_LINE_BREAKS,
            });
        }

        let decoded = decode_rows(&rows);

        if decoded.grid.is_empty() {
            warn!("No grid cells found for maze");
            return Err(MazeError::EmptyGrid);
        }
        debug!(cells = decoded.grid.len(), "Decoded maze grid");

        if !decoded.saw_start {
            warn!("No start position found for maze");
            return Err(MazeError::MissingStart);
        }
        if !decoded.saw_end {
            warn!("No end position found for maze");
            return Err(MazeError::MissingEnd);
        }

        let id = id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let name = name.unwrap_or_default();

        // Both end up on a line of their own in the maze file
        if id.contains(LINE_BREAKS) {
            warn!("Maze id contains a line break");
            return Err(MazeError::InvalidField {
                field: "id",
                reason: NO_LINE_BREAKS,
            });
        }
        if id.len() > MAX_ID_LEN {
            warn!(len = id.len(), max = MAX_ID_LEN, "Maze id too long");
            return Err(MazeError::InvalidField {
                field: "id",
                reason: "must be at most 80 bytes long",
            });
        }
        if name.contains(LINE_BREAKS) {
            warn!(maze_id = %id, "Maze name contains a line break");
            return Err(MazeError::InvalidField {
                field: "name",
                reason: NO_LINE_BREAKS,
            });
        }

        let maze = Maze::new(id, name, decoded.grid);
        self.try_register(&maze)?;

        if let Err(e) = self.store.save(&maze).await {
            error!(error = %e, maze_id = %maze.id, "Error persisting maze, removing it from the registry");
            self.mazes.remove_if(&maze.id, |_, stored| stored == &maze);
            return Err(MazeError::Persist {
                id: maze.id,
                source: e,
            });
        }

        info!(maze_id = %maze.id, name = %maze.name, cells = maze.grid.len(), "Added new maze");
        Ok(maze)
    }

    fn try_register(&self, maze: &Maze) -> Result<(), MazeError> {
        match self.mazes.entry(maze.id.clone()) {
            Entry::Occupied(_) => {
                warn!(maze_id = %maze.id, "Maze id already exists");
                Err(MazeError::DuplicateId(maze.id.clone()))
            }
            Entry::Vacant(slot) => {
                slot.insert(maze.clone());
                Ok(())
            }
        }
    }

    /// Directions from `(x, y)` that do not lead into a wall.
    ///
    /// `None` when the maze is unknown or `(x, y)` is not one of its cells.
    pub fn get_next_available_moves(&self, maze_id: &str, x: i32, y: i32) -> Option<Vec<Direction>> {
        let Some(maze) = self.mazes.get(maze_id) else {
            warn!(maze_id, "No maze found with id");
            return None;
        };

        let Some(surrounding) = maze.surrounding_cells(x, y) else {
            warn!(maze_id, x, y, "Invalid position for maze");
            return None;
        };

        Some(
            surrounding
                .into_iter()
                .filter(|(_, cell)| !is_wall(*cell))
                .map(|(direction, _)| direction)
                .collect(),
        )
    }

    /// Snapshot of every registered maze, in no particular order
    pub fn get_all_mazes(&self) -> Vec<Maze> {
        self.mazes.iter().map(|entry| entry.value().clone()).collect()
    }

    pub fn get_maze(&self, maze_id: &str) -> Option<Maze> {
        self.mazes.get(maze_id).map(|entry| entry.value().clone())
    }

    /// Remove a maze from the registry. Its file is left on disk.
    pub fn delete_maze(&self, maze_id: &str) -> bool {
        let removed = self.mazes.remove(maze_id).is_some();
        if removed {
            info!(maze_id, "Removed maze from registry");
        }
        removed
    }

    pub fn clear_mazes(&self) {
        self.mazes.clear();
        info!("Cleared maze registry");
    }

    pub fn len(&self) -> usize {
        self.mazes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mazes.is_empty()
    }
}
