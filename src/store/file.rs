// SPDX-License-Identifier: GPL-3.0-only
use async_trait::async_trait;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::maze::Maze;
use crate::store::format::{parse_maze_file, render_maze_file};
use crate::store::traits::{MazeStore, StoreError};
use crate::utils::{escape_file_stem, validate_path_within_base_new};

/// Extension of maze files; anything else in the directory is ignored
pub const MAZE_FILE_EXTENSION: &str = "txt";

/// One text file per maze, named after the escaped maze id
pub struct FileMazeStore {
    dir: PathBuf,
}

impl FileMazeStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Location of the file holding the maze with `id`
    pub fn path_for(&self, id: &str) -> Result<PathBuf, StoreError> {
        let file_name = PathBuf::from(format!("{}.{}", escape_file_stem(id), MAZE_FILE_EXTENSION));
        validate_path_within_base_new(&file_name, &self.dir)
            .map_err(|e| StoreError::InvalidPath(e.to_string()))?;
        Ok(self.dir.join(file_name))
    }

    /// Parse one file. `Ok(None)` means the file holds no cells.
    async fn load_file(&self, path: &Path) -> Result<Option<Maze>, StoreError> {
        let contents = tokio::fs::read_to_string(path).await?;
        let parsed = parse_maze_file(&contents);

        if parsed.grid.is_empty() {
            return Ok(None);
        }

        let id = parsed.id.unwrap_or_else(|| Uuid::new_v4().to_string());
        Ok(Some(Maze::new(id, parsed.name, parsed.grid)))
    }

    fn is_maze_file(path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(MAZE_FILE_EXTENSION))
    }
}

#[async_trait]
impl MazeStore for FileMazeStore {
    async fn load_all(&self) -> Result<Vec<Maze>, StoreError> {
        match tokio::fs::metadata(&self.dir).await {
            Ok(metadata) if metadata.is_dir() => {}
            Ok(_) => return Err(StoreError::NotADirectory(self.dir.clone())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tokio::fs::create_dir_all(&self.dir).await?;
                info!(dir = %self.dir.display(), "Created maze storage directory, nothing to load");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        }

        let mut mazes = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if !Self::is_maze_file(&path) {
                continue;
            }
            match entry.file_type().await {
                Ok(file_type) if file_type.is_file() => {}
                _ => continue,
            }

            match self.load_file(&path).await {
                Ok(Some(maze)) => {
                    debug!(maze_id = %maze.id, name = %maze.name, path = %path.display(), "Loaded maze file");
                    mazes.push(maze);
                }
                Ok(None) => {
                    warn!(path = %path.display(), "Maze file has no grid cells, skipping");
                }
                Err(e) => {
                    warn!(error = %e, path = %path.display(), "Failed to load maze file, skipping");
                }
            }
        }

        info!(count = mazes.len(), dir = %self.dir.display(), "Loaded maze files");
        Ok(mazes)
    }

    async fn save(&self, maze: &Maze) -> Result<(), StoreError> {
        let path = self.path_for(&maze.id)?;
        let dir = self.dir.clone();
        let contents = render_maze_file(maze);

        let target = path.clone();
        tokio::task::spawn_blocking(move || write_atomically(&dir, &target, contents.as_bytes()))
            .await??;

        debug!(maze_id = %maze.id, path = %path.display(), "Maze written to file");
        Ok(())
    }
}

/// Write `bytes` to a temp file next to `path`, sync it, then rename it over
/// `path`. Readers see either the old file or the complete new one.
///
/// On Unix the directory is synced after the rename so the new entry
/// survives a power loss. Other platforms only get the file sync.
fn write_atomically(dir: &Path, path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    std::fs::create_dir_all(dir)?;

    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(bytes)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;

    #[cfg(unix)]
    std::fs::File::open(dir)?.sync_all()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::decode_rows;
    use crate::test_helpers;

    fn sample_maze(id: &str, name: &str) -> Maze {
        Maze::new(id.to_string(), name.to_string(), decode_rows(test_helpers::sample_rows()).grid)
    }

    #[tokio::test]
    async fn test_load_creates_missing_directory() {
        let temp_dir = test_helpers::create_temp_dir();
        let dir = temp_dir.path().join("Mazes");
        let store = FileMazeStore::new(dir.clone());

        let mazes = store.load_all().await.unwrap();
        assert!(mazes.is_empty());
        assert!(dir.is_dir());
    }

    #[tokio::test]
    async fn test_load_rejects_file_as_directory() {
        let temp_dir = test_helpers::create_temp_dir();
        let file = temp_dir.path().join("not-a-dir");
        std::fs::write(&file, "x").unwrap();

        let store = FileMazeStore::new(file);
        let result = store.load_all().await;
        assert!(matches!(result, Err(StoreError::NotADirectory(_))));
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let temp_dir = test_helpers::create_temp_dir();
        let store = FileMazeStore::new(temp_dir.path().to_path_buf());
        let maze = sample_maze("maze-1", "Test Maze");

        store.save(&maze).await.unwrap();

        let mazes = store.load_all().await.unwrap();
        assert_eq!(mazes, vec![maze]);
    }

    #[tokio::test]
    async fn test_save_names_file_after_id() {
        let temp_dir = test_helpers::create_temp_dir();
        let store = FileMazeStore::new(temp_dir.path().to_path_buf());

        store.save(&sample_maze("maze-1", "Same Name")).await.unwrap();
        store.save(&sample_maze("maze-2", "Same Name")).await.unwrap();

        assert!(temp_dir.path().join("maze-1.txt").is_file());
        assert!(temp_dir.path().join("maze-2.txt").is_file());
        assert_eq!(store.load_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_save_escapes_unsafe_ids() {
        let temp_dir = test_helpers::create_temp_dir();
        let store = FileMazeStore::new(temp_dir.path().to_path_buf());

        store.save(&sample_maze("../escape", "Sneaky")).await.unwrap();

        assert!(temp_dir.path().join("%2E%2E%2Fescape.txt").is_file());
        let mazes = store.load_all().await.unwrap();
        assert_eq!(mazes[0].id, "../escape");
    }

    #[tokio::test]
    async fn test_save_overwrites_existing_file() {
        let temp_dir = test_helpers::create_temp_dir();
        let store = FileMazeStore::new(temp_dir.path().to_path_buf());

        store.save(&sample_maze("maze-1", "First")).await.unwrap();
        let replacement = Maze::new("maze-1".to_string(), "Second".to_string(), decode_rows(["SE"]).grid);
        store.save(&replacement).await.unwrap();

        let contents = std::fs::read_to_string(temp_dir.path().join("maze-1.txt")).unwrap();
        assert_eq!(contents, "Id=maze-1\nName=Second\nSE\n");

        // no temp files left behind
        let entries = std::fs::read_dir(temp_dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn test_write_atomically_creates_directory_and_file() {
        let temp_dir = test_helpers::create_temp_dir();
        let dir = temp_dir.path().join("nested").join("Mazes");
        let path = dir.join("maze.txt");

        write_atomically(&dir, &path, b"Id=maze\nName=\nSE\n").unwrap();
        write_atomically(&dir, &path, b"Id=maze\nName=\nES\n").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Id=maze\nName=\nES\n");
        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_load_generates_missing_id() {
        let temp_dir = test_helpers::create_temp_dir();
        std::fs::write(temp_dir.path().join("legacy.txt"), "Name=Legacy\nSO\nOE\n").unwrap();

        let store = FileMazeStore::new(temp_dir.path().to_path_buf());
        let mazes = store.load_all().await.unwrap();

        assert_eq!(mazes.len(), 1);
        assert_eq!(mazes[0].name, "Legacy");
        assert!(Uuid::parse_str(&mazes[0].id).is_ok());
    }

    #[tokio::test]
    async fn test_load_skips_bad_files() {
        let temp_dir = test_helpers::create_temp_dir();
        std::fs::write(temp_dir.path().join("empty.txt"), "").unwrap();
        std::fs::write(temp_dir.path().join("headers-only.txt"), "Id=abc\nName=Nothing\n").unwrap();
        std::fs::write(temp_dir.path().join("binary.txt"), [0xff, 0xfe, 0x00, 0xc3]).unwrap();
        std::fs::write(temp_dir.path().join("notes.md"), "SOE").unwrap();
        std::fs::create_dir(temp_dir.path().join("nested.txt")).unwrap();
        std::fs::write(temp_dir.path().join("good.txt"), "Id=good\nName=Good\nSE\n").unwrap();

        let store = FileMazeStore::new(temp_dir.path().to_path_buf());
        let mazes = store.load_all().await.unwrap();

        assert_eq!(mazes.len(), 1);
        assert_eq!(mazes[0].id, "good");
    }
}
