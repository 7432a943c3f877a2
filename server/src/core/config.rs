use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::utils::file::expand_path;

use super::cli::CliConfig;
use super::constants::{
    APP_DOT_FOLDER, CONFIG_FILE_NAME, DEFAULT_HOST, DEFAULT_PORT, ENV_POSTGRES_URL,
    POSTGRES_DEFAULT_ACQUIRE_TIMEOUT_SECS, POSTGRES_DEFAULT_IDLE_TIMEOUT_SECS,
    POSTGRES_DEFAULT_MAX_CONNECTIONS, POSTGRES_DEFAULT_MAX_LIFETIME_SECS,
    POSTGRES_DEFAULT_MIN_CONNECTIONS, POSTGRES_DEFAULT_STATEMENT_TIMEOUT_SECS,
};

// =============================================================================
// File Config Structs (all optional, as read from JSON)
// =============================================================================

/// Server configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ServerFileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    /// Extra origins allowed by CORS
    pub cors_origins: Option<Vec<String>>,
}

/// PostgreSQL configuration section (from JSON config file)
#[derive(Debug, Default, Clone, Deserialize)]
pub struct PostgresFileConfig {
    /// PostgreSQL connection URL (or use RICHELIEU_POSTGRES_URL env var)
    pub url: Option<String>,
    /// Maximum number of connections in the pool (default: 20)
    pub max_connections: Option<u32>,
    /// Minimum number of connections to keep warm (default: 2)
    pub min_connections: Option<u32>,
    /// Connection acquire timeout in seconds (default: 30)
    pub acquire_timeout_secs: Option<u64>,
    /// Idle connection timeout in seconds (default: 600)
    pub idle_timeout_secs: Option<u64>,
    /// Max connection lifetime in seconds (default: 1800)
    pub max_lifetime_secs: Option<u64>,
    /// Statement timeout in seconds (default: 60)
    pub statement_timeout_secs: Option<u64>,
}

/// Database configuration section (from JSON config file)
#[derive(Debug, Default, Clone, Deserialize)]
pub struct DatabaseFileConfig {
    pub postgres: Option<PostgresFileConfig>,
}

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub server: Option<ServerFileConfig>,
    pub database: Option<DatabaseFileConfig>,
    pub debug: Option<bool>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::trace!(config = ?config, "Parsed config file");
        Ok(config)
    }

    /// Warn about unknown top-level fields (likely typos)
    fn warn_unknown_fields(&self) {
        if let serde_json::Value::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys: Vec<&str> = map.keys().map(|k| k.as_str()).collect();
            tracing::warn!(
                fields = %keys.join(", "),
                "Unknown fields in config file (possible typos)"
            );
        }
    }

    /// Merge another FileConfig into this one (other takes precedence)
    fn merge(&mut self, other: FileConfig) {
        if let Some(server) = other.server {
            let current = self.server.get_or_insert_with(ServerFileConfig::default);
            if server.host.is_some() {
                tracing::trace!(host = ?server.host, "Merging server.host");
                current.host = server.host;
            }
            if server.port.is_some() {
                tracing::trace!(port = ?server.port, "Merging server.port");
                current.port = server.port;
            }
            if server.cors_origins.is_some() {
                tracing::trace!(cors_origins = ?server.cors_origins, "Merging server.cors_origins");
                current.cors_origins = server.cors_origins;
            }
        }

        if let Some(postgres) = other.database.and_then(|d| d.postgres) {
            let current = self
                .database
                .get_or_insert_with(DatabaseFileConfig::default)
                .postgres
                .get_or_insert_with(PostgresFileConfig::default);

            // url is never traced, it may carry a password
            if postgres.url.is_some() {
                tracing::trace!("Merging database.postgres.url");
                current.url = postgres.url;
            }
            macro_rules! merge_field {
                ($($field:ident),*) => {$(
                    if postgres.$field.is_some() {
                        tracing::trace!(
                            field = stringify!($field),
                            value = ?postgres.$field,
                            "Merging database.postgres field"
                        );
                        current.$field = postgres.$field;
                    }
                )*};
            }
            merge_field!(
                max_connections,
                min_connections,
                acquire_timeout_secs,
                idle_timeout_secs,
                max_lifetime_secs,
                statement_timeout_secs
            );
        }

        if other.debug.is_some() {
            tracing::trace!(debug = ?other.debug, "Merging debug");
            self.debug = other.debug;
        }
    }
}

// =============================================================================
// Runtime Config Structs (final merged configuration)
// =============================================================================

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
}

/// PostgreSQL configuration (final/runtime)
#[derive(Debug, Clone, Default)]
pub struct PostgresConfig {
    /// PostgreSQL connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections to keep warm
    pub min_connections: u32,
    /// Connection acquire timeout in seconds
    pub acquire_timeout_secs: u64,
    /// Idle connection timeout in seconds
    pub idle_timeout_secs: u64,
    /// Max connection lifetime in seconds
    pub max_lifetime_secs: u64,
    /// Statement timeout in seconds
    pub statement_timeout_secs: u64,
}

/// Database configuration (final/runtime)
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// `None` when no URL was configured
    pub postgres: Option<PostgresConfig>,
}

/// Final merged application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub debug: bool,
}

impl AppConfig {
    /// Load configuration from all sources
    ///
    /// Priority (lowest to highest):
    /// 1. Defaults
    /// 2. Profile directory config (~/.richelieu/richelieu.json)
    /// 3. Local directory config OR CLI-specified config path
    /// 4. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading application configuration");

        let mut file_config = FileConfig::default();
        let mut found_configs: Vec<String> = Vec::new();

        if let Some(profile_path) = get_profile_config_path()
            && profile_path.exists()
        {
            let profile_config = FileConfig::load_from_file(&profile_path)?;
            profile_config.warn_unknown_fields();
            file_config.merge(profile_config);
            found_configs.push(profile_path.display().to_string());
        }

        let overlay_path = if let Some(ref path) = cli.config {
            let expanded = expand_path(&path.to_string_lossy());
            if !expanded.exists() {
                anyhow::bail!("Config file not found: {}", expanded.display());
            }
            Some(expanded)
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        if let Some(path) = overlay_path {
            let overlay_config = FileConfig::load_from_file(&path)?;
            overlay_config.warn_unknown_fields();
            file_config.merge(overlay_config);
            found_configs.push(path.display().to_string());
        }

        tracing::debug!(configs = ?found_configs, "Config files loaded");

        Self::from_layers(cli, file_config)
    }

    /// Layer defaults, file config and CLI/env overrides, then validate
    fn from_layers(cli: &CliConfig, file_config: FileConfig) -> Result<Self> {
        let file_server = file_config.server.unwrap_or_default();
        let file_postgres = file_config
            .database
            .and_then(|d| d.postgres)
            .unwrap_or_default();

        let host = cli
            .host
            .clone()
            .or(file_server.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = cli.port.or(file_server.port).unwrap_or(DEFAULT_PORT);
        let cors_origins = cli
            .cors_origins
            .clone()
            .or(file_server.cors_origins)
            .unwrap_or_default();

        let debug = cli.debug || file_config.debug.unwrap_or(false);

        let postgres = cli
            .postgres_url
            .clone()
            .or(file_postgres.url)
            .filter(|url| !url.trim().is_empty())
            .map(|url| {
                let max_connections = cli
                    .postgres_max_connections
                    .or(file_postgres.max_connections)
                    .unwrap_or(POSTGRES_DEFAULT_MAX_CONNECTIONS);
                PostgresConfig {
                    url,
                    max_connections,
                    min_connections: file_postgres
                        .min_connections
                        .unwrap_or(POSTGRES_DEFAULT_MIN_CONNECTIONS.min(max_connections)),
                    acquire_timeout_secs: file_postgres
                        .acquire_timeout_secs
                        .unwrap_or(POSTGRES_DEFAULT_ACQUIRE_TIMEOUT_SECS),
                    idle_timeout_secs: file_postgres
                        .idle_timeout_secs
                        .unwrap_or(POSTGRES_DEFAULT_IDLE_TIMEOUT_SECS),
                    max_lifetime_secs: file_postgres
                        .max_lifetime_secs
                        .unwrap_or(POSTGRES_DEFAULT_MAX_LIFETIME_SECS),
                    statement_timeout_secs: cli
                        .postgres_statement_timeout
                        .or(file_postgres.statement_timeout_secs)
                        .unwrap_or(POSTGRES_DEFAULT_STATEMENT_TIMEOUT_SECS),
                }
            });

        let config = Self {
            server: ServerConfig {
                host,
                port,
                cors_origins,
            },
            database: DatabaseConfig { postgres },
            debug,
        };

        config.validate()?;

        tracing::debug!(
            host = %config.server.host,
            port = config.server.port,
            cors_origins = ?config.server.cors_origins,
            debug = config.debug,
            postgres_configured = config.database.postgres.is_some(),
            "Configuration loaded"
        );

        Ok(config)
    }

    /// Validate the configuration for consistency and correctness
    fn validate(&self) -> Result<()> {
        if self.server.host.is_empty() {
            anyhow::bail!("Configuration error: server.host must not be empty");
        }

        // Port 0 would bind a random port
        if self.server.port == 0 {
            anyhow::bail!("Configuration error: server.port must be greater than 0");
        }

        if let Some(ref pg) = self.database.postgres {
            if pg.max_connections == 0 {
                anyhow::bail!(
                    "Configuration error: database.postgres.max_connections must be greater than 0"
                );
            }
            if pg.min_connections > pg.max_connections {
                anyhow::bail!(
                    "Configuration error: database.postgres.min_connections ({}) must not exceed max_connections ({})",
                    pg.min_connections,
                    pg.max_connections
                );
            }
        }

        Ok(())
    }

    /// PostgreSQL settings, required to serve searches
    pub fn require_postgres(&self) -> Result<&PostgresConfig> {
        self.database.postgres.as_ref().ok_or_else(|| {
            anyhow::anyhow!(
                "Configuration error: database.postgres.url is required. \
                 Set via {} env var, --postgres-url, or database.postgres.url in config file.",
                ENV_POSTGRES_URL
            )
        })
    }
}

/// Get the profile config path (~/.richelieu/richelieu.json)
fn get_profile_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(APP_DOT_FOLDER).join(CONFIG_FILE_NAME))
}

/// Check if host binds to all network interfaces
pub fn is_all_interfaces(host: &str) -> bool {
    matches!(host, "0.0.0.0" | "::" | "[::]")
}
