// SPDX-License-Identifier: GPL-3.0-only
//! Maze service: a registry of text mazes persisted one file per maze,
//! answering which moves are legal from a given cell.

pub mod api;
pub mod config;
pub mod logging;
pub mod maze;
pub mod registry;
pub mod store;
pub mod utils;

#[cfg(test)]
mod test_helpers;
