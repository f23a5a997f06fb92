use axum::extract::FromRef;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::{MemoryTodoRepository, TodoRepository};
use crate::metrics::Metrics;

/// Shared, read-only handler context. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub todos: Arc<dyn TodoRepository>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(config: AppConfig, todos: Arc<dyn TodoRepository>) -> Self {
        Self {
            config: Arc::new(config),
            todos,
            metrics: Arc::new(Metrics::new()),
        }
    }

    /// Development config backed by a fresh in-memory store
    pub fn in_memory() -> Self {
        Self::new(AppConfig::development(), Arc::new(MemoryTodoRepository::new()))
    }
}

impl FromRef<AppState> for Arc<Metrics> {
    fn from_ref(state: &AppState) -> Self {
        state.metrics.clone()
    }
}
