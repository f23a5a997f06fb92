use axum::{extract::State, Json};

use crate::metrics::MetricsSnapshot;
use crate::state::AppState;

/// Application counters since process start
#[utoipa::path(
    get,
    path = "/q/metrics/application",
    tag = "metrics",
    responses((status = 200, description = "Current counter values", body = MetricsSnapshot))
)]
pub async fn application(State(state): State<AppState>) -> Json<MetricsSnapshot> {
    Json(state.metrics.snapshot())
}
