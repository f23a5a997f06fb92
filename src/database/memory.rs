use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::database::manager::DatabaseError;
use crate::database::models::{NewTodo, Todo, TodoStatus};
use crate::database::repository::TodoRepository;

#[derive(Debug)]
struct Store {
    next_id: i64,
    todos: BTreeMap<i64, Todo>,
}

/// Process-local todo store with the same contract as the PostgreSQL one.
/// Ids start at 1 and are never handed out twice, even after deletion.
#[derive(Debug)]
pub struct MemoryTodoRepository {
    store: RwLock<Store>,
}

impl MemoryTodoRepository {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(Store {
                next_id: 1,
                todos: BTreeMap::new(),
            }),
        }
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.store.read().await.todos.len()
    }
}

impl Default for MemoryTodoRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TodoRepository for MemoryTodoRepository {
    async fn create(&self, todo: NewTodo) -> Result<Todo, DatabaseError> {
        let mut store = self.store.write().await;
        let id = store.next_id;
        store.next_id += 1;

        let created = Todo {
            id,
            title: todo.title,
            description: todo.description,
            status: todo.status,
            created_at: Utc::now(),
        };
        store.todos.insert(id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Todo>, DatabaseError> {
        Ok(self.store.read().await.todos.get(&id).cloned())
    }

    async fn find_all(&self, status: Option<TodoStatus>) -> Result<Vec<Todo>, DatabaseError> {
        let store = self.store.read().await;
        Ok(store
            .todos
            .values()
            .filter(|t| status.map_or(true, |s| t.status == s))
            .cloned()
            .collect())
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, DatabaseError> {
        Ok(self.store.write().await.todos.remove(&id).is_some())
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}
