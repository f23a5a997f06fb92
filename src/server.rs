use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::get,
    Router,
};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::openapi::openapi;
use crate::config::{AppConfig, SecurityConfig, ServerConfig, StorageBackend};
use crate::database::{DatabaseManager, MemoryTodoRepository, PgTodoRepository, TodoRepository};
use crate::error::ApiError;
use crate::handlers;
use crate::state::AppState;

/// Build the complete application router
pub fn app(state: AppState) -> Router {
    let config = state.config.clone();
    let prefix = config.api.prefix.as_str();

    let router = Router::new()
        .route("/", get(handlers::root))
        .merge(probe_routes())
        .merge(docs_routes(prefix));

    // Router::nest rejects an empty path
    let mut router = if prefix.is_empty() {
        router.merge(todo_routes())
    } else {
        router.nest(prefix, todo_routes())
    };

    router = router
        .fallback(|| async { ApiError::not_found("no route matches this path") })
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
        .layer(middleware::from_fn_with_state(
            state.metrics.clone(),
            crate::middleware::track_requests,
        ));

    if let Some(cors) = cors_layer(&config.security) {
        router = router.layer(cors);
    }
    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}

fn todo_routes() -> Router<AppState> {
    use handlers::todo;

    Router::new()
        // Collection: create, list, delete-by-body
        .route(
            "/todos",
            get(todo::todos_get)
                .post(todo::todos_post)
                .delete(todo::todos_delete),
        )
        // Single record
        .route("/todos/:id", get(todo::todo_get))
}

fn probe_routes() -> Router<AppState> {
    use handlers::probe;

    Router::new()
        .route("/q/health", get(probe::health))
        .route("/q/health/live", get(probe::live))
        .route("/q/health/ready", get(probe::ready))
        .route("/q/metrics/application", get(probe::metrics_application))
}

fn docs_routes(prefix: &str) -> Router<AppState> {
    Router::new().merge(SwaggerUi::new("/q/swagger-ui").url("/q/openapi", openapi(prefix)))
}

fn cors_layer(security: &SecurityConfig) -> Option<CorsLayer> {
    if !security.enable_cors {
        return None;
    }
    if security.cors_origins.is_empty() {
        return Some(CorsLayer::permissive());
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    Some(
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any),
    )
}

/// Resolve the configured storage backend into application state.
/// The database manager is returned so the caller can close the pool on shutdown.
pub async fn build_state(config: AppConfig) -> anyhow::Result<(AppState, Option<DatabaseManager>)> {
    match config.storage.backend {
        StorageBackend::Memory => {
            info!("Using in-memory todo storage");
            let repo: Arc<dyn TodoRepository> = Arc::new(MemoryTodoRepository::new());
            Ok((AppState::new(config, repo), None))
        }
        StorageBackend::Postgres => {
            let db = DatabaseManager::connect(&config.database)
                .await
                .context("failed to connect to PostgreSQL")?;
            let repo: Arc<dyn TodoRepository> = Arc::new(PgTodoRepository::new(db.clone()));
            Ok((AppState::new(config, repo), Some(db)))
        }
    }
}

pub async fn bind(server: &ServerConfig) -> anyhow::Result<TcpListener> {
    let bind_addr = format!("{}:{}", server.host, server.port);
    TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))
}

/// Serve until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr().context("listener has no local address")?;
    let prefix = state.config.api.prefix.clone();
    info!("Todo API listening on http://{}{}/todos", addr, prefix);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown)
        .await
        .context("server error")
}

/// Resolves on Ctrl-C or SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl-C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::DatabaseError;
    use crate::database::models::{NewTodo, Todo, TodoStatus};
    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        response::Response,
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn create_then_fetch_round_trip() {
        let app = app(AppState::in_memory());

        let res = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/todos",
                json!({ "title": "Ship it", "description": "v1", "status": "IN_PROGRESS" }),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
        let location = res.headers()[header::LOCATION].to_str().unwrap().to_string();
        assert_eq!(location, "/api/todos/1");

        let res = app.oneshot(get_request(&location)).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body = body_json(res).await;
        assert_eq!(body["data"]["title"], "Ship it");
        assert_eq!(body["data"]["description"], "v1");
        assert_eq!(body["data"]["status"], "IN_PROGRESS");
    }

    #[tokio::test]
    async fn invalid_create_persists_nothing() {
        let state = AppState::in_memory();
        let app = app(state.clone());

        let res = app
            .clone()
            .oneshot(json_request("POST", "/api/todos", json!({ "description": "no title" })))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

        assert!(state.todos.find_all(None).await.unwrap().is_empty());
        assert_eq!(state.metrics.snapshot().validation_failures_total, 1);
        assert_eq!(state.metrics.snapshot().todos_created_total, 0);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let app = app(AppState::in_memory());

        for _ in 0..2 {
            let res = app
                .clone()
                .oneshot(json_request("DELETE", "/api/todos", json!({ "id": 1 })))
                .await
                .unwrap();
            assert_eq!(res.status(), StatusCode::NO_CONTENT);
        }
    }

    #[tokio::test]
    async fn non_numeric_id_is_not_found() {
        let app = app(AppState::in_memory());
        let res = app.oneshot(get_request("/api/todos/abc")).await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body = body_json(res).await;
        assert_eq!(body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn only_canonical_ids_match() {
        let app = app(AppState::in_memory());
        for _ in 0..2 {
            let res = app
                .clone()
                .oneshot(json_request("POST", "/api/todos", json!({ "title": "two" })))
                .await
                .unwrap();
            assert_eq!(res.status(), StatusCode::CREATED);
        }

        let res = app.clone().oneshot(get_request("/api/todos/2")).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        for uri in ["/api/todos/+2", "/api/todos/002", "/api/todos/-0"] {
            let res = app.clone().oneshot(get_request(uri)).await.unwrap();
            assert_eq!(res.status(), StatusCode::NOT_FOUND, "{}", uri);
        }
    }

    #[tokio::test]
    async fn nul_in_title_is_unprocessable() {
        let state = AppState::in_memory();
        let app = app(state.clone());
        let res = app
            .oneshot(json_request("POST", "/api/todos", json!({ "title": "a\u{0}b" })))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body_json(res).await["field_errors"].get("title").is_some());
        assert!(state.todos.find_all(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_rejects_unknown_status_filter() {
        let app = app(AppState::in_memory());
        let res = app.oneshot(get_request("/api/todos?status=LATER")).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn empty_prefix_mounts_at_root() {
        let mut config = AppConfig::development();
        config.api.prefix = String::new();
        let state = AppState::new(config, Arc::new(MemoryTodoRepository::new()));
        let app = app(state);

        let res = app
            .oneshot(json_request("POST", "/todos", json!({ "title": "root" })))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
        assert_eq!(res.headers()[header::LOCATION], "/todos/1");
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let mut config = AppConfig::development();
        config.api.max_request_size_bytes = 64;
        let app = app(AppState::new(config, Arc::new(MemoryTodoRepository::new())));

        let res = app
            .oneshot(json_request("POST", "/api/todos", json!({ "title": "x".repeat(200) })))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn unknown_route_is_json_not_found() {
        let app = app(AppState::in_memory());
        let res = app.oneshot(get_request("/nope")).await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(res).await["error"], true);
    }

    struct UnreachableStore;

    #[async_trait]
    impl TodoRepository for UnreachableStore {
        async fn create(&self, _todo: NewTodo) -> Result<Todo, DatabaseError> {
            Err(DatabaseError::Sqlx(sqlx::Error::PoolTimedOut))
        }

        async fn find_by_id(&self, _id: i64) -> Result<Option<Todo>, DatabaseError> {
            Err(DatabaseError::Sqlx(sqlx::Error::PoolTimedOut))
        }

        async fn find_all(&self, _status: Option<TodoStatus>) -> Result<Vec<Todo>, DatabaseError> {
            Err(DatabaseError::Sqlx(sqlx::Error::PoolTimedOut))
        }

        async fn delete_by_id(&self, _id: i64) -> Result<bool, DatabaseError> {
            Err(DatabaseError::Sqlx(sqlx::Error::PoolTimedOut))
        }

        async fn ping(&self) -> Result<(), DatabaseError> {
            Err(DatabaseError::Sqlx(sqlx::Error::PoolTimedOut))
        }
    }

    #[tokio::test]
    async fn unreachable_store_fails_readiness_but_not_liveness() {
        let state = AppState::new(AppConfig::development(), Arc::new(UnreachableStore));
        let app = app(state.clone());

        let res = app.clone().oneshot(get_request("/q/health/live")).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let res = app.clone().oneshot(get_request("/q/health/ready")).await.unwrap();
        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body_json(res).await["status"], "DOWN");

        let res = app.oneshot(get_request("/api/todos/1")).await.unwrap();
        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
        // readiness 503 + lookup 503
        assert_eq!(state.metrics.snapshot().http_responses_5xx_total, 2);
    }
}
