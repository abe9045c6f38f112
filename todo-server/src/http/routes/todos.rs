//! Todo endpoints

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};

use crate::http::error::ApiError;
use crate::http::extractors::{JsonBody, PriorityQuery, TodoIdPath};
use crate::http::server::AppState;
use crate::models::{Todo, TodoId, TodoPayload};

/// POST /api/v1/todos - create a todo, respond with its id
async fn create_todo(
    State(state): State<Arc<AppState>>,
    JsonBody(payload): JsonBody<TodoPayload>,
) -> Result<(StatusCode, Json<TodoId>), ApiError> {
    let new_todo = payload.into_new_todo()?;
    let id = state.todos.create_todo(new_todo).await?;

    Ok((StatusCode::CREATED, Json(id)))
}

/// GET /api/v1/todos - list every todo
async fn get_all_todos(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Todo>>, ApiError> {
    Ok(Json(state.todos.get_all_todos().await?))
}

/// GET /api/v1/todos/{id}
async fn get_todo_by_id(
    State(state): State<Arc<AppState>>,
    TodoIdPath(id): TodoIdPath,
) -> Result<Json<Todo>, ApiError> {
    Ok(Json(state.todos.get_todo_by_id(id).await?))
}

/// GET /api/v1/todos/priority?priority=X
async fn get_todos_by_priority(
    State(state): State<Arc<AppState>>,
    PriorityQuery(priority): PriorityQuery,
) -> Result<Json<Vec<Todo>>, ApiError> {
    Ok(Json(state.todos.get_todos_by_priority(priority).await?))
}

/// PUT /api/v1/todos/{id}
async fn update_todo(
    State(state): State<Arc<AppState>>,
    TodoIdPath(id): TodoIdPath,
    JsonBody(payload): JsonBody<TodoPayload>,
) -> Result<Json<Todo>, ApiError> {
    let changes = payload.into_changes()?;
    Ok(Json(state.todos.update_todo(id, changes).await?))
}

/// DELETE /api/v1/todos/{id} - 200 with an empty body
async fn delete_todo(
    State(state): State<Arc<AppState>>,
    TodoIdPath(id): TodoIdPath,
) -> Result<StatusCode, ApiError> {
    state.todos.delete_todo(id).await?;
    Ok(StatusCode::OK)
}

/// Todo routes, relative to the versioned base path
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/todos", get(get_all_todos).post(create_todo))
        .route("/todos/priority", get(get_todos_by_priority))
        .route(
            "/todos/{id}",
            get(get_todo_by_id).put(update_todo).delete(delete_todo),
        )
}
