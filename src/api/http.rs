// SPDX-License-Identifier: GPL-3.0-only
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use crate::api::handlers::{AllMazesResponse, ApiHandlers, ApiResponse, HealthStatus, MovesQuery};
use crate::maze::{Direction, Maze};
use crate::registry::MazeManager;

pub struct HttpServer {
    handlers: ApiHandlers,
    addr: SocketAddr,
}

impl HttpServer {
    pub fn new(manager: Arc<MazeManager>, addr: SocketAddr) -> Self {
        Self {
            handlers: ApiHandlers::new(manager),
            addr,
        }
    }

    /// Serve until `shutdown` resolves
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = router(Arc::new(self.handlers));

        let listener = tokio::net::TcpListener::bind(&self.addr).await?;
        info!(addr = %listener.local_addr()?, "Starting HTTP server");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        Ok(())
    }
}

pub fn router(handlers: Arc<ApiHandlers>) -> Router {
    // The UI shell is served from another origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/Maze", get(directions_handler))
        .route("/maze", get(directions_handler))
        .route("/getmoves", get(get_moves_handler))
        .route("/addmaze", post(add_maze_handler))
        .route("/allmazes", get(all_mazes_handler))
        .route("/maze/:id", get(get_maze_handler).delete(delete_maze_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(handlers)
}

async fn directions_handler() -> Json<[&'static str; 4]> {
    ApiHandlers::directions().await
}

async fn health_handler(
    State(handlers): State<Arc<ApiHandlers>>,
) -> Json<ApiResponse<HealthStatus>> {
    handlers.health()
}

async fn get_moves_handler(
    State(handlers): State<Arc<ApiHandlers>>,
    query: Query<MovesQuery>,
) -> Result<Json<Vec<Direction>>, StatusCode> {
    handlers.get_moves(query)
}

async fn add_maze_handler(
    State(handlers): State<Arc<ApiHandlers>>,
    body: Bytes,
) -> (StatusCode, Json<ApiResponse<String>>) {
    handlers.add_maze(body).await
}

async fn all_mazes_handler(
    State(handlers): State<Arc<ApiHandlers>>,
) -> Json<AllMazesResponse> {
    handlers.all_mazes()
}

async fn get_maze_handler(
    State(handlers): State<Arc<ApiHandlers>>,
    Path(id): Path<String>,
) -> Result<Json<Maze>, StatusCode> {
    handlers.get_maze(Path(id))
}

async fn delete_maze_handler(
    State(handlers): State<Arc<ApiHandlers>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, StatusCode> {
    handlers.delete_maze(Path(id))
}
