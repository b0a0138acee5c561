// SPDX-License-Identifier: GPL-3.0-only
//! Line-oriented maze file format
//!
//! ```text
//! Id=<maze id>
//! Name=<maze name>
//! <row 0>
//! <row 1>
//! ```
//!
//! Header prefixes are matched case-insensitively. Headers are only read
//! before the first grid row and each one at most once, so a row whose text
//! starts with `Id=` or `Name=` stays a row. Blank lines are ignored. Every
//! other line is one grid row, split into single characters.

use std::fmt::Write;

use crate::maze::{decode_rows, encode_rows, Grid, Maze};

const ID_PREFIX: &str = "Id=";
const NAME_PREFIX: &str = "Name=";

/// File contents before an id has been assigned
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedMazeFile {
    pub id: Option<String>,
    pub name: String,
    pub grid: Grid,
}

fn strip_prefix_ignore_case<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    let head = line.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(&line[prefix.len()..])
    } else {
        None
    }
}

pub fn parse_maze_file(contents: &str) -> ParsedMazeFile {
    let mut id = None;
    let mut name = String::new();
    let mut seen_id = false;
    let mut seen_name = false;
    let mut rows = Vec::new();

    for line in contents.lines() {
        if line.is_empty() {
            continue;
        }
        if rows.is_empty() {
            if !seen_id {
                if let Some(value) = strip_prefix_ignore_case(line, ID_PREFIX) {
                    id = Some(value.to_string()).filter(|v| !v.is_empty());
                    seen_id = true;
                    continue;
                }
            }
            if !seen_name {
                if let Some(value) = strip_prefix_ignore_case(line, NAME_PREFIX) {
                    name = value.to_string();
                    seen_name = true;
                    continue;
                }
            }
        }
        rows.push(line);
    }

    ParsedMazeFile {
        id,
        name,
        grid: decode_rows(rows).grid,
    }
}

pub fn render_maze_file(maze: &Maze) -> String {
    let mut contents = String::new();
    // Writing into a String cannot fail
    let _ = writeln!(contents, "{}{}", ID_PREFIX, maze.id);
    let _ = writeln!(contents, "{}{}", NAME_PREFIX, maze.name);
    for row in encode_rows(&maze.grid) {
        contents.push_str(&row);
        contents.push('\n');
    }
    contents
}
