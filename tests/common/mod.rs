#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use focusify_api::config::AppConfig;
use focusify_api::database::{MemoryTodoRepository, TodoRepository};
use focusify_api::{server, AppState};
use reqwest::StatusCode;
use tokio::net::TcpListener;

pub const API_PREFIX: &str = "/api";

/// One server per test, each with its own empty in-memory store
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub state: AppState,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn todos_url(&self) -> String {
        self.url(&format!("{}/todos", API_PREFIX))
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            if let Ok(resp) = client.get(self.url("/q/health/live")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

pub async fn spawn_server() -> Result<TestServer> {
    spawn_server_with(Arc::new(MemoryTodoRepository::new())).await
}

/// Serve the given store, e.g. a PostgreSQL repository
pub async fn spawn_server_with(todos: Arc<dyn TodoRepository>) -> Result<TestServer> {
    // Pick an unused port for isolation
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let base_url = format!("http://127.0.0.1:{}", port);

    let mut config = AppConfig::development();
    config.api.prefix = API_PREFIX.to_string();
    config.api.enable_request_logging = false;
    let state = AppState::new(config, todos);

    let listener = TcpListener::bind(("127.0.0.1", port))
        .await
        .with_context(|| format!("failed to bind port {}", port))?;
    let served = state.clone();
    tokio::spawn(async move {
        if let Err(e) = server::serve(listener, served, std::future::pending()).await {
            eprintln!("test server exited: {e:?}");
        }
    });

    let server = TestServer { port, base_url, state };
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}
