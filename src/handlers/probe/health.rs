use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum HealthStatus {
    Up,
    Down,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Probe response: overall status plus the individual checks
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub checks: Vec<HealthCheck>,
}

impl HealthReport {
    fn from_checks(checks: Vec<HealthCheck>) -> Self {
        let status = if checks.iter().all(|c| c.status == HealthStatus::Up) {
            HealthStatus::Up
        } else {
            HealthStatus::Down
        };
        Self { status, checks }
    }
}

impl IntoResponse for HealthReport {
    fn into_response(self) -> axum::response::Response {
        let code = match self.status {
            HealthStatus::Up => StatusCode::OK,
            HealthStatus::Down => StatusCode::SERVICE_UNAVAILABLE,
        };
        (code, Json(self)).into_response()
    }
}

fn liveness_check() -> HealthCheck {
    HealthCheck {
        name: "alive".into(),
        status: HealthStatus::Up,
        error: None,
    }
}

async fn storage_check(state: &AppState) -> HealthCheck {
    match state.todos.ping().await {
        Ok(()) => HealthCheck {
            name: "storage".into(),
            status: HealthStatus::Up,
            error: None,
        },
        Err(e) => {
            tracing::warn!("Readiness check failed: {}", e);
            HealthCheck {
                name: "storage".into(),
                status: HealthStatus::Down,
                error: Some(e.to_string()),
            }
        }
    }
}

/// Liveness: the process is serving HTTP
#[utoipa::path(
    get,
    path = "/q/health/live",
    tag = "health",
    responses((status = 200, description = "Service is alive", body = HealthReport))
)]
pub async fn live() -> HealthReport {
    HealthReport::from_checks(vec![liveness_check()])
}

/// Readiness: the todo store answers
#[utoipa::path(
    get,
    path = "/q/health/ready",
    tag = "health",
    responses(
        (status = 200, description = "Ready to serve traffic", body = HealthReport),
        (status = 503, description = "Storage unreachable", body = HealthReport)
    )
)]
pub async fn ready(State(state): State<AppState>) -> HealthReport {
    HealthReport::from_checks(vec![storage_check(&state).await])
}

/// Combined liveness and readiness
#[utoipa::path(
    get,
    path = "/q/health",
    tag = "health",
    responses(
        (status = 200, description = "All checks up", body = HealthReport),
        (status = 503, description = "At least one check down", body = HealthReport)
    )
)]
pub async fn health(State(state): State<AppState>) -> HealthReport {
    HealthReport::from_checks(vec![liveness_check(), storage_check(&state).await])
}
