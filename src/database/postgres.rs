use async_trait::async_trait;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{NewTodo, Todo, TodoRow, TodoStatus};
use crate::database::repository::TodoRepository;

const COLUMNS: &str = "id, title, description, status, created_at";

pub struct PgTodoRepository {
    db: DatabaseManager,
}

impl PgTodoRepository {
    pub fn new(db: DatabaseManager) -> Self {
        Self { db }
    }

    fn into_todo(row: TodoRow) -> Result<Todo, DatabaseError> {
        Todo::try_from(row).map_err(DatabaseError::QueryError)
    }
}

#[async_trait]
impl TodoRepository for PgTodoRepository {
    async fn create(&self, todo: NewTodo) -> Result<Todo, DatabaseError> {
        let sql = format!(
            "INSERT INTO todos (title, description, status) VALUES ($1, $2, $3) RETURNING {}",
            COLUMNS
        );
        let row = sqlx::query_as::<_, TodoRow>(&sql)
            .bind(&todo.title)
            .bind(&todo.description)
            .bind(todo.status.as_str())
            .fetch_one(self.db.pool())
            .await?;

        tracing::debug!("Inserted todo {}", row.id);
        Self::into_todo(row)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Todo>, DatabaseError> {
        let sql = format!("SELECT {} FROM todos WHERE id = $1", COLUMNS);
        sqlx::query_as::<_, TodoRow>(&sql)
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?
            .map(Self::into_todo)
            .transpose()
    }

    async fn find_all(&self, status: Option<TodoStatus>) -> Result<Vec<Todo>, DatabaseError> {
        let rows = match status {
            Some(status) => {
                let sql = format!("SELECT {} FROM todos WHERE status = $1 ORDER BY id", COLUMNS);
                sqlx::query_as::<_, TodoRow>(&sql)
                    .bind(status.as_str())
                    .fetch_all(self.db.pool())
                    .await?
            }
            None => {
                let sql = format!("SELECT {} FROM todos ORDER BY id", COLUMNS);
                sqlx::query_as::<_, TodoRow>(&sql)
                    .fetch_all(self.db.pool())
                    .await?
            }
        };

        rows.into_iter().map(Self::into_todo).collect()
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1")
            .bind(id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        self.db.health_check().await
    }
}
