use axum::extract::{Path, State};

use crate::database::models::Todo;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /todos/:id - Get a single todo by id
#[utoipa::path(
    get,
    path = "/todos/{id}",
    tag = "todos",
    params(("id" = i64, Path, description = "Todo id")),
    responses(
        (status = 200, description = "The stored todo", body = Todo),
        (status = 404, description = "No todo with this id")
    )
)]
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Todo> {
    let not_found = || {
        state.metrics.record_not_found();
        ApiError::not_found(format!("todo {} not found", id))
    };

    // Only the canonical decimal form names a record: "+2" and "002" do not
    let Some(numeric_id) = id.parse::<i64>().ok().filter(|n| n.to_string() == id) else {
        return Err(not_found());
    };

    match state.todos.find_by_id(numeric_id).await? {
        Some(todo) => Ok(ApiResponse::success(todo)),
        None => Err(not_found()),
    }
}
