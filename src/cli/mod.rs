use clap::Parser;

use crate::config::{normalize_prefix, AppConfig, StorageBackend};

/// Command-line overrides for the server. Anything left unset falls back to
/// the environment-derived configuration.
#[derive(Parser, Debug, Default)]
#[command(name = "focusify-api")]
#[command(about = "Todo REST API server")]
#[command(version)]
pub struct Cli {
    #[arg(long, help = "Interface to bind (default from HOST or 0.0.0.0)")]
    pub host: Option<String>,

    #[arg(short, long, help = "Port to listen on (default from TODO_API_PORT/PORT or 8080)")]
    pub port: Option<u16>,

    #[arg(long, help = "Storage backend: memory or postgres")]
    pub storage: Option<StorageBackend>,

    #[arg(long, help = "PostgreSQL connection URL")]
    pub database_url: Option<String>,

    #[arg(long, help = "Mount path of the todo API, e.g. /api")]
    pub prefix: Option<String>,

    #[arg(long, help = "Skip embedded database migrations at startup")]
    pub skip_migrations: bool,
}

impl Cli {
    pub fn apply(self, mut config: AppConfig) -> AppConfig {
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(backend) = self.storage {
            config.storage.backend = backend;
        }
        if let Some(url) = self.database_url {
            config.database.url = Some(url);
        }
        if let Some(prefix) = self.prefix {
            config.api.prefix = normalize_prefix(&prefix);
        }
        if self.skip_migrations {
            config.database.run_migrations = false;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let cli = Cli::try_parse_from([
            "focusify-api",
            "--port",
            "9001",
            "--storage",
            "postgres",
            "--database-url",
            "postgres://localhost/todos",
            "--prefix",
            "api/v1/",
            "--skip-migrations",
        ])
        .unwrap();

        let config = cli.apply(AppConfig::development());
        assert_eq!(config.server.port, 9001);
        assert_eq!(config.storage.backend, StorageBackend::Postgres);
        assert_eq!(config.database.url.as_deref(), Some("postgres://localhost/todos"));
        assert_eq!(config.api.prefix, "/api/v1");
        assert!(!config.database.run_migrations);
    }

    #[test]
    fn no_flags_keep_config() {
        let cli = Cli::try_parse_from(["focusify-api"]).unwrap();
        let config = cli.apply(AppConfig::development());
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.storage.backend, StorageBackend::Memory);
    }

    #[test]
    fn rejects_unknown_storage() {
        assert!(Cli::try_parse_from(["focusify-api", "--storage", "redis"]).is_err());
    }
}
