use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use utoipa::ToSchema;

/// Process-local application counters, exposed at `/q/metrics/application`
#[derive(Debug, Default)]
pub struct Metrics {
    http_requests: AtomicU64,
    http_responses_5xx: AtomicU64,
    validation_failures: AtomicU64,
    todos_created: AtomicU64,
    todos_deleted: AtomicU64,
    todos_not_found: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct MetricsSnapshot {
    pub http_requests_total: u64,
    pub http_responses_5xx_total: u64,
    pub validation_failures_total: u64,
    pub todos_created_total: u64,
    pub todos_deleted_total: u64,
    pub todos_not_found_total: u64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_request(&self) {
        self.http_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_server_error(&self) {
        self.http_responses_5xx.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_validation_failure(&self) {
        self.validation_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_created(&self) {
        self.todos_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_deleted(&self) {
        self.todos_deleted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_not_found(&self) {
        self.todos_not_found.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            http_requests_total: self.http_requests.load(Ordering::Relaxed),
            http_responses_5xx_total: self.http_responses_5xx.load(Ordering::Relaxed),
            validation_failures_total: self.validation_failures.load(Ordering::Relaxed),
            todos_created_total: self.todos_created.load(Ordering::Relaxed),
            todos_deleted_total: self.todos_deleted.load(Ordering::Relaxed),
            todos_not_found_total: self.todos_not_found.load(Ordering::Relaxed),
        }
    }
}
