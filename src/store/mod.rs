// SPDX-License-Identifier: GPL-3.0-only
pub mod file;
pub mod format;
pub mod traits;

pub use file::FileMazeStore;
pub use traits::{MazeStore, StoreError};
