// SPDX-License-Identifier: GPL-3.0-only
pub mod error;
pub mod manager;

pub use error::MazeError;
pub use manager::{InitState, MazeManager};
