pub mod collection;
pub mod record;

// Re-export handler functions for use in routing
pub use collection::delete as todos_delete;
pub use collection::get as todos_get;
pub use collection::post as todos_post;

pub use record::get as todo_get;
