use clap::{Parser, Subcommand};

use std::path::PathBuf;

use super::constants::{
    ENV_CONFIG, ENV_CORS_ORIGINS, ENV_DEBUG, ENV_HOST, ENV_PORT, ENV_POSTGRES_MAX_CONNECTIONS,
    ENV_POSTGRES_STATEMENT_TIMEOUT, ENV_POSTGRES_URL,
};

#[derive(Parser)]
#[command(name = "richelieu")]
#[command(version, about = "Advanced search over the Richelieu iconography collection", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Server host address
    #[arg(long, short = 'H', global = true, env = ENV_HOST)]
    pub host: Option<String>,

    /// Server port
    #[arg(long, short = 'p', global = true, env = ENV_PORT)]
    pub port: Option<u16>,

    /// Enable debug logging for the application
    #[arg(long, global = true, env = ENV_DEBUG)]
    pub debug: bool,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// Extra origins allowed by CORS (comma separated)
    #[arg(long, global = true, env = ENV_CORS_ORIGINS, value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    // Database options
    /// PostgreSQL connection URL of the collection database
    #[arg(long, global = true, env = ENV_POSTGRES_URL)]
    pub postgres_url: Option<String>,

    /// Maximum number of pooled PostgreSQL connections
    #[arg(long, global = true, env = ENV_POSTGRES_MAX_CONNECTIONS)]
    pub postgres_max_connections: Option<u32>,

    /// PostgreSQL statement timeout in seconds
    #[arg(long, global = true, env = ENV_POSTGRES_STATEMENT_TIMEOUT)]
    pub postgres_statement_timeout: Option<u64>,
}

#[derive(Subcommand, Clone, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the server (default command)
    Start,
    /// Print the SQL a search would run, without connecting
    Explain {
        /// Search parameters as a JSON object, `@file` to read a file, or `-` for stdin
        params: String,
    },
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub debug: bool,
    pub config: Option<PathBuf>,
    pub cors_origins: Option<Vec<String>>,
    pub postgres_url: Option<String>,
    pub postgres_max_connections: Option<u32>,
    pub postgres_statement_timeout: Option<u64>,
}

impl From<Cli> for (CliConfig, Option<Commands>) {
    fn from(cli: Cli) -> Self {
        let config = CliConfig {
            host: cli.host,
            port: cli.port,
            debug: cli.debug,
            config: cli.config,
            cors_origins: cli.cors_origins,
            postgres_url: cli.postgres_url,
            postgres_max_connections: cli.postgres_max_connections,
            postgres_statement_timeout: cli.postgres_statement_timeout,
        };
        (config, cli.command)
    }
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Option<Commands>) {
    Cli::parse().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_from(args: &[&str]) -> (CliConfig, Option<Commands>) {
        Cli::try_parse_from(args).unwrap().into()
    }

    #[test]
    fn test_no_command_defaults_to_none() {
        let (config, command) = parse_from(&["richelieu"]);
        assert_eq!(command, None);
        assert!(!config.debug);
    }

    #[test]
    fn test_global_args_after_subcommand() {
        let (config, command) = parse_from(&["richelieu", "start", "--port", "9000", "-H", "0.0.0.0"]);
        assert_eq!(command, Some(Commands::Start));
        assert_eq!(config.port, Some(9000));
        assert_eq!(config.host.as_deref(), Some("0.0.0.0"));
    }

    #[test]
    fn test_explain_params() {
        let (_, command) = parse_from(&["richelieu", "explain", r#"{"title": ["bourse"]}"#]);
        assert_eq!(
            command,
            Some(Commands::Explain {
                params: r#"{"title": ["bourse"]}"#.to_string()
            })
        );
    }

    #[test]
    fn test_cors_origins_are_split() {
        let (config, _) = parse_from(&[
            "richelieu",
            "--cors-origins",
            "https://a.example,https://b.example",
        ]);
        assert_eq!(
            config.cors_origins,
            Some(vec![
                "https://a.example".to_string(),
                "https://b.example".to_string()
            ])
        );
    }
}
