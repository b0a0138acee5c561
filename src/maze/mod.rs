// SPDX-License-Identifier: GPL-3.0-only
pub mod grid;
pub mod models;

pub use grid::{decode_rows, encode_rows, Coordinate, Grid};
pub use models::{Direction, Maze};
