//! Handlers for the five todo routes.

use axum::{http::StatusCode, Json};

use crate::db::Session;
use crate::error::AppError;
use crate::extract::{TodoId, ValidTodo};
use crate::model::Todo;
use crate::store;

pub async fn list_todos(mut session: Session) -> Result<Json<Vec<Todo>>, AppError> {
    let todos = store::list(&mut session).await?;
    tracing::debug!(count = todos.len(), "listed todos");
    Ok(Json(todos))
}

pub async fn get_todo(TodoId(id): TodoId, mut session: Session) -> Result<Json<Todo>, AppError> {
    store::get(&mut session, id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound)
}

// Returns the persisted row, including the assigned id, rather than echoing
// the request body.
pub async fn create_todo(
    mut session: Session,
    ValidTodo(input): ValidTodo,
) -> Result<(StatusCode, Json<Todo>), AppError> {
    let todo = store::insert(&mut session, &input).await?;
    tracing::info!(id = todo.id, "created todo");
    Ok((StatusCode::CREATED, Json(todo)))
}

pub async fn update_todo(
    TodoId(id): TodoId,
    mut session: Session,
    ValidTodo(input): ValidTodo,
) -> Result<Json<Todo>, AppError> {
    let Some(todo) = store::update(&mut session, id, &input).await? else {
        tracing::warn!(id, "update of missing todo");
        return Err(AppError::NotFound);
    };
    tracing::info!(id, "updated todo");
    Ok(Json(todo))
}

pub async fn delete_todo(TodoId(id): TodoId, mut session: Session) -> Result<StatusCode, AppError> {
    if !store::delete(&mut session, id).await? {
        tracing::warn!(id, "delete of missing todo");
        return Err(AppError::NotFound);
    }
    tracing::info!(id, "Todo deleted successfully.");
    Ok(StatusCode::NO_CONTENT)
}
