// =============================================================================
// Application Identity
// =============================================================================

/// Application name in title case (for display)
pub const APP_NAME: &str = "Richelieu";

/// Application name in lowercase (for paths and identifiers)
pub const APP_NAME_LOWER: &str = "richelieu";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".richelieu";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "richelieu.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "RICHELIEU_CONFIG";

// =============================================================================
// Environment Variables - Debug
// =============================================================================

/// Environment variable for debug mode
pub const ENV_DEBUG: &str = "RICHELIEU_DEBUG";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "RICHELIEU_LOG";

// =============================================================================
// Environment Variables - Server
// =============================================================================

/// Environment variable for server host
pub const ENV_HOST: &str = "RICHELIEU_HOST";

/// Environment variable for server port
pub const ENV_PORT: &str = "RICHELIEU_PORT";

/// Environment variable for extra CORS origins (comma separated)
pub const ENV_CORS_ORIGINS: &str = "RICHELIEU_CORS_ORIGINS";

// =============================================================================
// Server Defaults
// =============================================================================

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 5380;

/// Request body limit for routes without a specific limit
pub const DEFAULT_BODY_LIMIT: usize = 256 * 1024;

/// Request body limit for search parameters
pub const SEARCH_BODY_LIMIT: usize = 64 * 1024;

/// Time allowed for background tasks to finish on shutdown
pub const SHUTDOWN_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// PostgreSQL
// =============================================================================

/// Environment variable for the PostgreSQL connection URL
pub const ENV_POSTGRES_URL: &str = "RICHELIEU_POSTGRES_URL";

/// Environment variable for the pool size
pub const ENV_POSTGRES_MAX_CONNECTIONS: &str = "RICHELIEU_POSTGRES_MAX_CONNECTIONS";

/// Environment variable for the statement timeout (seconds)
pub const ENV_POSTGRES_STATEMENT_TIMEOUT: &str = "RICHELIEU_POSTGRES_STATEMENT_TIMEOUT";

/// Default maximum pool size
pub const POSTGRES_DEFAULT_MAX_CONNECTIONS: u32 = 20;

/// Default number of connections kept warm
pub const POSTGRES_DEFAULT_MIN_CONNECTIONS: u32 = 2;

/// Default connection acquire timeout
pub const POSTGRES_DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 30;

/// Default idle connection timeout
pub const POSTGRES_DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600;

/// Default connection lifetime
pub const POSTGRES_DEFAULT_MAX_LIFETIME_SECS: u64 = 1800;

/// Default statement timeout
pub const POSTGRES_DEFAULT_STATEMENT_TIMEOUT_SECS: u64 = 60;

/// Interval between background `SELECT 1` checks
pub const POSTGRES_HEALTH_CHECK_INTERVAL_SECS: u64 = 60;
