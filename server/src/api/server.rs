//! API server initialization

use std::net::SocketAddr;

use anyhow::Result;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::response::Redirect;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use super::middleware::{self, AllowedOrigins};
use super::openapi::{openapi_json, swagger_ui_html};
use super::routes::{health, search};
use crate::core::CoreApp;
use crate::core::constants::{DEFAULT_BODY_LIMIT, SEARCH_BODY_LIMIT};

pub struct ApiServer {
    app: CoreApp,
    allowed_origins: AllowedOrigins,
}

impl ApiServer {
    pub fn new(app: CoreApp) -> Self {
        let allowed_origins = AllowedOrigins::new(
            &app.config.server.host,
            app.config.server.port,
            &app.config.server.cors_origins,
        );

        Self {
            app,
            allowed_origins,
        }
    }

    /// Build the HTTP router
    pub fn router(&self) -> Router {
        let database = self.app.database.clone();

        let search_routes =
            search::routes(database.clone()).layer(DefaultBodyLimit::max(SEARCH_BODY_LIMIT));

        Router::new()
            .route("/", get(|| async { Redirect::temporary("/api/docs") }))
            .route("/api/v1/health", get(health::health).with_state(database))
            .route("/api/openapi.json", get(openapi_json))
            .route("/api/docs", get(swagger_ui_html))
            .route("/api/docs/", get(swagger_ui_html))
            .nest("/api/v1/search", search_routes)
            .fallback(middleware::handle_404)
            .layer(CompressionLayer::new())
            .layer(middleware::cors(&self.allowed_origins))
            .layer(DefaultBodyLimit::max(DEFAULT_BODY_LIMIT))
            .layer(TraceLayer::new_for_http())
    }

    /// Serve until shutdown; returns CoreApp for graceful shutdown
    pub async fn start(self) -> Result<CoreApp> {
        let router = self.router();
        let Self { app, .. } = self;

        let shutdown = app.shutdown.clone();
        let addr = SocketAddr::new(app.config.server.host.parse()?, app.config.server.port);

        let listener = TcpListener::bind(addr).await?;
        tracing::info!("Listening on http://{}", addr);

        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown.wait())
        .await?;

        Ok(app)
    }
}
