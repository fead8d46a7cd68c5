//! Process-wide connection pool and the per-request session drawn from it.
//!
//! # Design
//! The pool is built once at startup and shared through axum state. Each
//! handler that touches the store takes a `Session` extractor, which checks
//! a connection out of the pool for the lifetime of the request. Dropping
//! the session returns the connection, so release happens on every exit
//! path, including early returns through `?`.

use std::ops::{Deref, DerefMut};
use std::str::FromStr;

use axum::{extract::FromRequestParts, http::request::Parts};
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{Sqlite, SqliteConnection};

use crate::error::AppError;
use crate::store;

/// State shared by every handler.
#[derive(Clone, Debug)]
pub struct AppState {
    pub pool: SqlitePool,
}

impl AppState {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

/// Open the pool for `database_url`.
///
/// File databases are created on first use. An in-memory database lives
/// only as long as its connection, so it is pinned to a single connection
/// that never idles out.
pub async fn connect(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    let pool_options = if is_in_memory(database_url) {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new()
    };

    pool_options.connect_with(options).await
}

/// Connect and make sure the `todos` table exists.
pub async fn init(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let pool = connect(database_url).await?;
    let mut conn = pool.acquire().await?;
    store::init_schema(&mut conn).await?;
    tracing::debug!("todos schema ready");
    Ok(pool)
}

/// A pooled connection scoped to one request.
pub struct Session(PoolConnection<Sqlite>);

impl FromRequestParts<AppState> for Session {
    type Rejection = AppError;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let conn = state.pool.acquire().await?;
        Ok(Session(conn))
    }
}

impl Deref for Session {
    type Target = SqliteConnection;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Session {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}
