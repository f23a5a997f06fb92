use utoipa::OpenApi;

use crate::api::request::{AddTodoRequest, DeleteTodoRequest};
use crate::database::models::{Todo, TodoStatus};
use crate::handlers::probe::{HealthCheck, HealthReport, HealthStatus};
use crate::metrics::MetricsSnapshot;

/// Todo resource, documented relative to the API prefix
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Focusify Todo API",
        description = "Create, fetch, list and delete todo items"
    ),
    paths(
        crate::handlers::todo::collection::post,
        crate::handlers::todo::collection::get,
        crate::handlers::todo::collection::delete,
        crate::handlers::todo::record::get,
    ),
    components(schemas(Todo, TodoStatus, AddTodoRequest, DeleteTodoRequest)),
    tags((name = "todos", description = "Todo management"))
)]
pub struct TodoApiDoc;

/// Operational endpoints, always mounted at /q
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::probe::health::live,
        crate::handlers::probe::health::ready,
        crate::handlers::probe::health::health,
        crate::handlers::probe::metrics::application,
    ),
    components(schemas(HealthReport, HealthCheck, HealthStatus, MetricsSnapshot)),
    tags(
        (name = "health", description = "Liveness and readiness probes"),
        (name = "metrics", description = "Application counters")
    )
)]
pub struct OpsApiDoc;

/// Full document with todo paths moved under `prefix`
pub fn openapi(prefix: &str) -> utoipa::openapi::OpenApi {
    let mut doc = TodoApiDoc::openapi();

    let paths = std::mem::take(&mut doc.paths.paths);
    doc.paths.paths = paths
        .into_iter()
        .map(|(path, item)| (format!("{}{}", prefix, path), item))
        .collect();

    doc.merge(OpsApiDoc::openapi());
    doc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn todo_paths_are_prefixed() {
        let doc = openapi("/api");
        assert!(doc.paths.paths.contains_key("/api/todos"));
        assert!(doc.paths.paths.contains_key("/api/todos/{id}"));
        assert!(!doc.paths.paths.contains_key("/todos"));
    }

    #[test]
    fn ops_paths_are_not_prefixed() {
        let doc = openapi("/api");
        assert!(doc.paths.paths.contains_key("/q/health/live"));
        assert!(doc.paths.paths.contains_key("/q/metrics/application"));
    }

    #[test]
    fn documents_todo_schema() {
        let doc = openapi("");
        let schemas = &doc.components.expect("components").schemas;
        assert!(schemas.contains_key("Todo"));
        assert!(schemas.contains_key("AddTodoRequest"));
    }
}
