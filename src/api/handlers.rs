// SPDX-License-Identifier: GPL-3.0-only
use axum::body::Bytes;
use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::maze::{Direction, Maze};
use crate::registry::MazeManager;

/// Direction names advertised by `GET /Maze`
pub const DIRECTION_NAMES: [&str; 4] = ["Up", "Down", "Left", "Right"];

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMazeRequest {
    pub maze_id: Option<String>,
    pub maze_name: Option<String>,
    /// Rows separated by `,` or newlines
    pub maze_grid: String,
}

#[derive(Debug, Deserialize)]
pub struct MovesQuery {
    pub id: String,
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AllMazesResponse {
    pub mazes: Vec<Maze>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub initialized: bool,
    pub mazes: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

/// Split the `mazeGrid` string into rows, dropping empty segments
pub fn split_grid_rows(grid: &str) -> Vec<String> {
    grid.split([',', '\n'])
        .map(|row| row.trim_end_matches('\r'))
        .filter(|row| !row.is_empty())
        .map(String::from)
        .collect()
}

pub struct ApiHandlers {
    manager: Arc<MazeManager>,
}

impl ApiHandlers {
    pub fn new(manager: Arc<MazeManager>) -> Self {
        Self { manager }
    }

    pub fn manager(&self) -> &Arc<MazeManager> {
        &self.manager
    }
}

impl ApiHandlers {
    pub async fn directions() -> Json<[&'static str; 4]> {
        Json(DIRECTION_NAMES)
    }

    pub fn health(&self) -> Json<ApiResponse<HealthStatus>> {
        Json(ApiResponse::success(HealthStatus {
            status: "ok".to_string(),
            initialized: self.manager.is_initialized(),
            mazes: self.manager.len(),
        }))
    }

    pub fn get_moves(&self, Query(query): Query<MovesQuery>) -> Result<Json<Vec<Direction>>, StatusCode> {
        match self.manager.get_next_available_moves(&query.id, query.x, query.y) {
            Some(moves) => Ok(Json(moves)),
            None => Err(StatusCode::NOT_FOUND),
        }
    }

    pub async fn add_maze(&self, body: Bytes) -> (StatusCode, Json<ApiResponse<String>>) {
        let request: AddMazeRequest = match serde_json::from_slice(&body) {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "Malformed add maze request");
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ApiResponse::error(format!("Invalid request body: {}", e))),
                );
            }
        };

        debug!(
            maze_id = ?request.maze_id,
            maze_name = ?request.maze_name,
            "Received request to add maze"
        );

        let rows = split_grid_rows(&request.maze_grid);
        match self.manager.add_new_maze(rows, request.maze_name, request.maze_id).await {
            Ok(maze) => {
                info!(maze_id = %maze.id, "Maze added");
                (StatusCode::OK, Json(ApiResponse::success(maze.id)))
            }
            Err(e) if e.is_validation() => {
                (StatusCode::BAD_REQUEST, Json(ApiResponse::error(e.to_string())))
            }
            Err(e) => {
                error!(error = %e, "Error processing new maze");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(ApiResponse::error(e.to_string())))
            }
        }
    }

    pub fn all_mazes(&self) -> Json<AllMazesResponse> {
        Json(AllMazesResponse {
            mazes: self.manager.get_all_mazes(),
        })
    }

    pub fn get_maze(&self, Path(id): Path<String>) -> Result<Json<Maze>, StatusCode> {
        self.manager
            .get_maze(&id)
            .map(Json)
            .ok_or(StatusCode::NOT_FOUND)
    }

    pub fn delete_maze(&self, Path(id): Path<String>) -> Result<Json<ApiResponse<()>>, StatusCode> {
        if self.manager.delete_maze(&id) {
            Ok(Json(ApiResponse::success(())))
        } else {
            Err(StatusCode::NOT_FOUND)
        }
    }
}
