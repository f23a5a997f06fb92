// Operational endpoints under /q: health probes and application metrics.
// These bypass the success envelope so orchestrators can read them as-is.
pub mod health;
pub mod metrics;

pub use health::{health, live, ready, HealthCheck, HealthReport, HealthStatus};
pub use metrics::application as metrics_application;
