use async_trait::async_trait;

use crate::database::manager::DatabaseError;
use crate::database::models::{NewTodo, Todo, TodoStatus};

/// Persistence port for todos. Each call is a single atomic unit against the store.
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// Persist a new todo and return it with its assigned id
    async fn create(&self, todo: NewTodo) -> Result<Todo, DatabaseError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Todo>, DatabaseError>;

    /// All todos ordered by id, optionally restricted to one status
    async fn find_all(&self, status: Option<TodoStatus>) -> Result<Vec<Todo>, DatabaseError>;

    /// Returns true if a record was removed, false if none matched
    async fn delete_by_id(&self, id: i64) -> Result<bool, DatabaseError>;

    /// Cheap round trip used by the readiness probe
    async fn ping(&self) -> Result<(), DatabaseError>;
}
