use axum::extract::State;
use serde_json::{json, Value};

use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET / - service name, version and endpoint map
pub async fn root(State(state): State<AppState>) -> ApiResult<Value> {
    let prefix = &state.config.api.prefix;

    Ok(ApiResponse::success(json!({
        "name": "Focusify Todo API",
        "version": env!("CARGO_PKG_VERSION"),
        "environment": state.config.environment,
        "storage": state.config.storage.backend,
        "endpoints": {
            "todos": format!("{}/todos[/:id]", prefix),
            "openapi": "/q/openapi",
            "swagger_ui": "/q/swagger-ui",
            "metrics": "/q/metrics/application",
            "health": "/q/health, /q/health/live, /q/health/ready",
        }
    })))
}
