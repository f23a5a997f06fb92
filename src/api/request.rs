use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::database::models::{NewTodo, TodoStatus};
use crate::error::FieldErrors;

// PostgreSQL TEXT cannot hold U+0000
const NUL_MESSAGE: &str = "must not contain NUL characters";

/// Turns a loosely-typed request payload into a checked domain value
pub trait Validate {
    type Output;

    fn validate(self) -> Result<Self::Output, FieldErrors>;
}

/// Body of `POST /todos`. Every field is optional on the wire so that
/// missing values surface as field errors rather than parse failures.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct AddTodoRequest {
    #[schema(example = "Write the quarterly report")]
    pub title: Option<String>,
    pub description: Option<String>,
    /// Defaults to TODO
    pub status: Option<TodoStatus>,
}

impl Validate for AddTodoRequest {
    type Output = NewTodo;

    fn validate(self) -> Result<NewTodo, FieldErrors> {
        let mut errors = FieldErrors::new();

        let title = match self.title {
            Some(title) if title.contains('\0') => {
                errors.insert("title".into(), NUL_MESSAGE.into());
                String::new()
            }
            Some(title) if !title.trim().is_empty() => title,
            Some(_) => {
                errors.insert("title".into(), "must not be blank".into());
                String::new()
            }
            None => {
                errors.insert("title".into(), "is required".into());
                String::new()
            }
        };

        if self.description.as_deref().is_some_and(|d| d.contains('\0')) {
            errors.insert("description".into(), NUL_MESSAGE.into());
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(NewTodo {
            title,
            description: self.description,
            status: self.status.unwrap_or_default(),
        })
    }
}

/// Body of `DELETE /todos`
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct DeleteTodoRequest {
    #[schema(example = 1)]
    pub id: Option<i64>,
}

impl Validate for DeleteTodoRequest {
    type Output = i64;

    fn validate(self) -> Result<i64, FieldErrors> {
        self.id.ok_or_else(|| {
            let mut errors = FieldErrors::new();
            errors.insert("id".into(), "is required".into());
            errors
        })
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListQuery {
    /// Only return todos in this status (TODO, IN_PROGRESS, DONE)
    pub status: Option<String>,
}
