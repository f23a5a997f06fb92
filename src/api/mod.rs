pub mod extract;
pub mod openapi;
pub mod request;

pub use extract::ValidJson;
pub use request::{AddTodoRequest, DeleteTodoRequest, ListQuery, Validate};
