//! Row operations on the `todos` table.
//!
//! Every function borrows a single connection, so callers decide the scope
//! of the session that carries it.

use sqlx::SqliteConnection;

use crate::model::{Todo, TodoRequest};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS todos (
    id          INTEGER PRIMARY KEY,
    title       TEXT    NOT NULL,
    description TEXT    NOT NULL,
    priority    INTEGER NOT NULL,
    complete    BOOLEAN NOT NULL DEFAULT 0
)
"#;

pub async fn init_schema(conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    sqlx::query(SCHEMA).execute(conn).await?;
    Ok(())
}

pub async fn list(conn: &mut SqliteConnection) -> Result<Vec<Todo>, sqlx::Error> {
    sqlx::query_as::<_, Todo>(
        "SELECT id, title, description, priority, complete FROM todos ORDER BY id",
    )
    .fetch_all(conn)
    .await
}

pub async fn get(conn: &mut SqliteConnection, id: i64) -> Result<Option<Todo>, sqlx::Error> {
    sqlx::query_as::<_, Todo>(
        "SELECT id, title, description, priority, complete FROM todos WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(conn)
    .await
}

pub async fn insert(conn: &mut SqliteConnection, todo: &TodoRequest) -> Result<Todo, sqlx::Error> {
    sqlx::query_as::<_, Todo>(
        r#"
        INSERT INTO todos (title, description, priority, complete)
        VALUES (?, ?, ?, ?)
        RETURNING id, title, description, priority, complete
        "#,
    )
    .bind(todo.title())
    .bind(todo.description())
    .bind(todo.priority())
    .bind(todo.complete())
    .fetch_one(conn)
    .await
}

/// Overwrite all mutable fields. `None` when no row has `id`.
pub async fn update(
    conn: &mut SqliteConnection,
    id: i64,
    todo: &TodoRequest,
) -> Result<Option<Todo>, sqlx::Error> {
    sqlx::query_as::<_, Todo>(
        r#"
        UPDATE todos
        SET title = ?, description = ?, priority = ?, complete = ?
        WHERE id = ?
        RETURNING id, title, description, priority, complete
        "#,
    )
    .bind(todo.title())
    .bind(todo.description())
    .bind(todo.priority())
    .bind(todo.complete())
    .bind(id)
    .fetch_optional(conn)
    .await
}

/// Returns whether a row was removed.
pub async fn delete(conn: &mut SqliteConnection, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM todos WHERE id = ?")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected() > 0)
}
