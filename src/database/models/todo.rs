use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Workflow state of a todo, stored as TEXT
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TodoStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl TodoStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TodoStatus::Todo => "TODO",
            TodoStatus::InProgress => "IN_PROGRESS",
            TodoStatus::Done => "DONE",
        }
    }
}

impl fmt::Display for TodoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TodoStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TODO" => Ok(TodoStatus::Todo),
            "IN_PROGRESS" => Ok(TodoStatus::InProgress),
            "DONE" => Ok(TodoStatus::Done),
            other => Err(format!("unknown todo status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Todo {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Write the quarterly report")]
    pub title: String,
    pub description: Option<String>,
    pub status: TodoStatus,
    pub created_at: DateTime<Utc>,
}

/// Validated input for a new todo; id and created_at are assigned by the store
#[derive(Debug, Clone, PartialEq)]
pub struct NewTodo {
    pub title: String,
    pub description: Option<String>,
    pub status: TodoStatus,
}

/// Raw `todos` row as returned by PostgreSQL
#[derive(Debug, Clone, FromRow)]
pub struct TodoRow {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<TodoRow> for Todo {
    type Error = String;

    fn try_from(row: TodoRow) -> Result<Self, Self::Error> {
        Ok(Todo {
            id: row.id,
            title: row.title,
            description: row.description,
            status: row.status.parse()?,
            created_at: row.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_uses_screaming_snake_case_on_the_wire() {
        assert_eq!(serde_json::to_value(TodoStatus::InProgress).unwrap(), json!("IN_PROGRESS"));
        let parsed: TodoStatus = serde_json::from_value(json!("DONE")).unwrap();
        assert_eq!(parsed, TodoStatus::Done);
        assert!(serde_json::from_value::<TodoStatus>(json!("done")).is_err());
    }

    #[test]
    fn status_text_matches_serde_names() {
        for status in [TodoStatus::Todo, TodoStatus::InProgress, TodoStatus::Done] {
            assert_eq!(serde_json::to_value(status).unwrap(), json!(status.as_str()));
            assert_eq!(status.as_str().parse::<TodoStatus>(), Ok(status));
        }
    }

    #[test]
    fn row_with_unknown_status_is_rejected() {
        let row = TodoRow {
            id: 3,
            title: "t".into(),
            description: None,
            status: "ARCHIVED".into(),
            created_at: Utc::now(),
        };
        assert!(Todo::try_from(row).is_err());
    }
}
