// SPDX-License-Identifier: GPL-3.0-only
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::maze::grid::{Coordinate, Grid};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// Step applied to a coordinate when moving in this direction
    fn step(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, 1),
            Direction::Down => (0, -1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Maze {
    /// Unique identifier for the maze
    pub id: String,

    /// Display name, may be empty
    pub name: String,

    /// Cells keyed by (row, column)
    pub grid: Grid,
}

impl Maze {
    pub fn new(id: String, name: String, grid: Grid) -> Self {
        Self { id, name, grid }
    }

    /// Cells adjacent to `(x, y)` keyed by direction.
    ///
    /// Returns `None` when `(x, y)` is not part of the grid. Neighbors that
    /// fall outside the grid are left out. Directions keep the order of
    /// [`Direction::ALL`].
    pub fn surrounding_cells(&self, x: i32, y: i32) -> Option<Vec<(Direction, char)>> {
        let origin = Coordinate::new(x, y);
        if !self.grid.contains(origin) {
            return None;
        }

        let surrounding = Direction::ALL
            .into_iter()
            .filter_map(|direction| {
                let (dx, dy) = direction.step();
                self.grid
                    .get(origin.offset(dx, dy))
                    .map(|cell| (direction, cell))
            })
            .collect();

        Some(surrounding)
    }
}
