use axum::extract::{Query, State};

use crate::api::extract::ValidJson;
use crate::api::request::{AddTodoRequest, DeleteTodoRequest, ListQuery};
use crate::database::models::{Todo, TodoStatus};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// POST /todos - Create a todo
#[utoipa::path(
    post,
    path = "/todos",
    tag = "todos",
    request_body = AddTodoRequest,
    responses(
        (status = 201, description = "Todo created", body = Todo,
            headers(("Location" = String, description = "Path of the created todo"))),
        (status = 400, description = "Malformed JSON"),
        (status = 415, description = "Body is not JSON"),
        (status = 422, description = "Missing or blank title, or invalid field values")
    )
)]
pub async fn post(
    State(state): State<AppState>,
    ValidJson(new_todo): ValidJson<AddTodoRequest>,
) -> ApiResult<Todo> {
    let todo = state.todos.create(new_todo).await?;
    state.metrics.record_created();

    tracing::info!(id = todo.id, status = %todo.status, "Created todo");

    let location = state.config.todo_location(todo.id);
    Ok(ApiResponse::created(todo, location))
}

/// GET /todos - List todos, optionally by status
#[utoipa::path(
    get,
    path = "/todos",
    tag = "todos",
    params(ListQuery),
    responses(
        (status = 200, description = "All matching todos ordered by id", body = [Todo]),
        (status = 400, description = "Unknown status filter")
    )
)]
pub async fn get(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<Todo>> {
    let status = query
        .status
        .as_deref()
        .map(str::parse::<TodoStatus>)
        .transpose()
        .map_err(ApiError::bad_request)?;

    let todos = state.todos.find_all(status).await?;
    Ok(ApiResponse::success(todos))
}

/// DELETE /todos - Delete the todo named in the body.
/// Deleting an id that does not exist is not an error.
#[utoipa::path(
    delete,
    path = "/todos",
    tag = "todos",
    request_body = DeleteTodoRequest,
    responses(
        (status = 204, description = "Todo deleted, or no todo had that id"),
        (status = 422, description = "Missing id")
    )
)]
pub async fn delete(
    State(state): State<AppState>,
    ValidJson(id): ValidJson<DeleteTodoRequest>,
) -> ApiResult<()> {
    if state.todos.delete_by_id(id).await? {
        state.metrics.record_deleted();
        tracing::info!(id, "Deleted todo");
    } else {
        tracing::debug!(id, "Delete requested for missing todo");
    }

    Ok(ApiResponse::no_content())
}
