//! HTTP service for creating, reading, updating and deleting todo items
//! stored in SQLite.
//!
//! # Overview
//! `app` builds the axum router over a shared connection pool; `run` serves
//! it on a listener. Each request checks out its own connection (`Session`)
//! and returns it when the request completes.

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod model;
pub mod store;

use axum::{routing::get, Router};
use sqlx::SqlitePool;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub use config::Config;
pub use db::AppState;
pub use error::{AppError, FieldError};
pub use model::{Todo, TodoDraft, TodoRequest};

use handlers::{create_todo, delete_todo, get_todo, list_todos, update_todo};

pub fn app(pool: SqlitePool) -> Router {
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/{id}", get(get_todo).put(update_todo).delete(delete_todo))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState::new(pool))
}

pub async fn run(listener: TcpListener, pool: SqlitePool) -> Result<(), std::io::Error> {
    axum::serve(listener, app(pool)).await
}
