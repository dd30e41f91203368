//! API server — assembles the REST router and serves it.

use crate::rest::{self, AppState};
use crate::swagger::ApiDoc;
use crate::voice_rest;
use axum::routing::{get, post};
use axum::Router;
use door_core::config::AppConfig;
use std::net::SocketAddr;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Main API server for the wizard flow.
pub struct ApiServer {
    config: AppConfig,
    state: AppState,
}

impl ApiServer {
    pub fn new(config: AppConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// Start the HTTP REST server (blocks until shutdown).
    pub async fn start_http(&self) -> anyhow::Result<()> {
        let app = Router::new()
            // Wizard flow
            .route("/v1/sessions", post(rest::create_session))
            .route("/v1/sessions/:id", get(rest::get_session))
            .route("/v1/sessions/:id/step", post(rest::change_step))
            .route("/v1/sessions/:id/user-details", post(rest::submit_user_details))
            .route("/v1/sessions/:id/destination", post(rest::select_destination))
            .route("/v1/sessions/:id/trip", post(rest::submit_trip))
            .route("/v1/destinations", get(rest::list_destinations))
            // Voice bridge
            .route("/v1/voice/submit", post(voice_rest::voice_submit))
            .route("/v1/voice/message", post(voice_rest::voice_message))
            .route("/v1/voice/transcript", post(voice_rest::voice_transcript))
            // Operational endpoints
            .route("/health", get(rest::health_check))
            .route("/ready", get(rest::readiness))
            .route("/live", get(rest::liveness))
            // API docs
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
            // Middleware
            .layer(CompressionLayer::new())
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone());

        let addr = SocketAddr::new(self.config.api.host.parse()?, self.config.api.http_port);

        info!(addr = %addr, "Starting HTTP server");

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }

    /// Start the metrics server on a separate port.
    pub async fn start_metrics(&self) -> anyhow::Result<()> {
        let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
        let handle = builder
            .with_http_listener(SocketAddr::new(
                self.config.api.host.parse()?,
                self.config.metrics.port,
            ))
            .install_recorder()?;

        info!(port = self.config.metrics.port, "Metrics exporter started");

        // Keep the handle alive
        std::mem::forget(handle);
        Ok(())
    }
}
