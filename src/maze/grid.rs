// SPDX-License-Identifier: GPL-3.0-only
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Position of a single cell.
///
/// `x` is the index of the input row and `y` the index of the character
/// within that row. Every codec, the file format and the neighbor lookup
/// share this mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coordinate {
    pub x: i32,
    pub y: i32,
}

impl Coordinate {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Renders the `"{x}-{y}"` cell key
impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.x, self.y)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid cell key: {0:?}")]
pub struct InvalidCellKey(pub String);

impl FromStr for Coordinate {
    type Err = InvalidCellKey;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        // The separator is the first '-' after position 0, so "-1--2" parses as (-1, -2)
        let (split, _) = key
            .char_indices()
            .skip(1)
            .find(|(_, c)| *c == '-')
            .ok_or_else(|| InvalidCellKey(key.to_string()))?;

        let x = key[..split].parse().map_err(|_| InvalidCellKey(key.to_string()))?;
        let y = key[split + 1..].parse().map_err(|_| InvalidCellKey(key.to_string()))?;
        Ok(Self::new(x, y))
    }
}

pub fn is_start(cell: char) -> bool {
    cell.eq_ignore_ascii_case(&'s')
}

pub fn is_end(cell: char) -> bool {
    cell.eq_ignore_ascii_case(&'e')
}

/// Walls are the only impassable cells; start and end markers are open.
pub fn is_wall(cell: char) -> bool {
    cell.eq_ignore_ascii_case(&'x')
}

/// Coordinate-keyed cell map.
///
/// Serializes as a JSON object of `"x-y"` keys to single-character strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    cells: BTreeMap<Coordinate, char>,
}

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, at: Coordinate) -> Option<char> {
        self.cells.get(&at).copied()
    }

    pub fn contains(&self, at: Coordinate) -> bool {
        self.cells.contains_key(&at)
    }

    pub fn insert(&mut self, at: Coordinate, cell: char) -> Option<char> {
        self.cells.insert(at, cell)
    }

    /// Cells ordered by row, then by column
    pub fn iter(&self) -> impl Iterator<Item = (Coordinate, char)> + '_ {
        self.cells.iter().map(|(at, cell)| (*at, *cell))
    }
}

impl FromIterator<(Coordinate, char)> for Grid {
    fn from_iter<I: IntoIterator<Item = (Coordinate, char)>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

impl Serialize for Grid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter().map(|(at, cell)| (at.to_string(), cell.to_string())))
    }
}

impl<'de> Deserialize<'de> for Grid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, String>::deserialize(deserializer)?;
        let mut grid = Grid::new();

        for (key, value) in raw {
            let at = key.parse::<Coordinate>().map_err(de::Error::custom)?;
            let mut chars = value.chars();
            let cell = match (chars.next(), chars.next()) {
                (Some(cell), None) => cell,
                _ => {
                    return Err(de::Error::custom(format!(
                        "cell {} must hold exactly one character, got {:?}",
                        key, value
                    )));
                }
            };
            grid.insert(at, cell);
        }

        Ok(grid)
    }
}

/// Result of turning row strings into a grid
#[derive(Debug, Clone, Default)]
pub struct DecodedRows {
    pub grid: Grid,
    pub saw_start: bool,
    pub saw_end: bool,
}

/// Key of the cell at row `i`, character `j`. `None` past `i32::MAX`.
fn cell_coordinate(i: usize, j: usize) -> Option<Coordinate> {
    Some(Coordinate::new(i32::try_from(i).ok()?, i32::try_from(j).ok()?))
}

/// Split rows into characters, keying each by `(row index, char index)`.
///
/// Rows or characters beyond `i32::MAX` have no key and are dropped.
pub fn decode_rows<I, S>(rows: I) -> DecodedRows
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut decoded = DecodedRows::default();

    for (i, row) in rows.into_iter().enumerate() {
        for (j, cell) in row.as_ref().chars().enumerate() {
            let Some(at) = cell_coordinate(i, j) else {
                break;
            };
            decoded.saw_start |= is_start(cell);
            decoded.saw_end |= is_end(cell);
            decoded.grid.insert(at, cell);
        }
    }

    decoded
}

/// Rebuild row strings: one per distinct `x` (ascending), cells ordered by `y`.
///
/// Missing cells are not padded. Grids built by [`decode_rows`] never have
/// gaps inside a row, so any rows without empty lines round-trip exactly.
pub fn encode_rows(grid: &Grid) -> Vec<String> {
    let mut rows: Vec<String> = Vec::new();
    let mut current_row = None;

    for (at, cell) in grid.iter() {
        if current_row != Some(at.x) {
            current_row = Some(at.x);
            rows.push(String::new());
        }
        if let Some(row) = rows.last_mut() {
            row.push(cell);
        }
    }

    rows
}
