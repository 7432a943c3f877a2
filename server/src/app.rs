//! Core application

use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::api::ApiServer;
use crate::core::cli::{self, CliConfig, Commands};
use crate::core::config::AppConfig;
use crate::core::constants::{APP_NAME_LOWER, ENV_LOG};
use crate::core::shutdown::ShutdownService;
use crate::data::PostgresService;
use crate::domain::search::{ICONOGRAPHY, prepare, sanitize};
use crate::utils::file::read_input;

pub struct CoreApp {
    pub shutdown: ShutdownService,
    pub config: AppConfig,
    pub database: Arc<PostgresService>,
}

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub async fn run() -> Result<()> {
        dotenvy::dotenv().ok();

        let (cli_config, command) = cli::parse();
        Self::init_logging(cli_config.debug);

        tracing::debug!("Application starting");
        tracing::trace!(command = ?command, "Parsed command");

        match command {
            Some(Commands::Explain { params }) => return Self::explain(&params),
            Some(Commands::Start) | None => {}
        }

        let app = Self::init(&cli_config).await?;
        Self::start_server(app).await
    }

    async fn init(cli: &CliConfig) -> Result<Self> {
        let config = AppConfig::load(cli)?;
        let postgres = config.require_postgres()?;

        let database = Arc::new(
            PostgresService::init(postgres)
                .await
                .context("Failed to connect to PostgreSQL")?,
        );
        let shutdown = ShutdownService::new(database.clone());

        Ok(Self {
            shutdown,
            config,
            database,
        })
    }

    /// Print the normalized parameters and the statement a search would run
    fn explain(input: &str) -> Result<()> {
        let text = read_input(input)?;
        let raw: Value = serde_json::from_str(&text).context("Search parameters are not valid JSON")?;
        let Value::Object(raw) = raw else {
            anyhow::bail!("Search parameters must be a JSON object");
        };

        let params = sanitize(&raw)?;
        let prepared = prepare(&ICONOGRAPHY, &params);

        println!(
            "params: {}",
            serde_json::to_string_pretty(&Value::Object(params.to_raw()))?
        );
        println!("sql: {}", prepared.sql);
        for (i, value) in prepared.values.iter().enumerate() {
            println!("${} = {}", i + 1, value);
        }
        Ok(())
    }

    fn init_logging(debug: bool) {
        let default_filter = if debug {
            format!("info,{}=debug", APP_NAME_LOWER)
        } else {
            format!("info,{}=info", APP_NAME_LOWER)
        };

        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(default_filter);

        tracing_subscriber::fmt()
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .compact()
            .with_env_filter(filter)
            .init();
    }

    async fn start_server(app: Self) -> Result<()> {
        // Install signal handlers before anything can block
        app.shutdown.install_signal_handlers();

        app.start_background_tasks().await;

        let server = ApiServer::new(app);
        let app = server.start().await?;
        app.shutdown.shutdown().await;

        Ok(())
    }

    pub async fn start_background_tasks(&self) {
        self.shutdown
            .register(
                self.database
                    .start_health_check_task(self.shutdown.subscribe()),
            )
            .await;

        tracing::debug!("Background tasks started");
    }
}
